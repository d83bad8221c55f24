/// Integration tests for the Mesa API
///
/// These drive the full in-process router end-to-end: authentication,
/// the uniform CRUD surface per entity, referential checks, and the
/// order-to-invoice aggregation. They require `DATABASE_URL` and
/// `JWT_SECRET` in the environment.
mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::json;

/// Signup issues a token pair and login returns the record without the
/// password
#[tokio::test]
async fn test_signup_and_login_flow() {
    let ctx = TestContext::new().await.unwrap();

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("flow-{}@example.com", suffix);
    let signup_payload = json!({
        "name": "Flow User",
        "email": email,
        "phone": format!("777{}", &suffix[..9]),
        "password": "secret-password"
    });

    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/user/signup",
        None,
        Some(signup_payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user_id"].is_string());
    assert!(body["token"].is_string());
    assert!(body["refresh_token"].is_string());

    // Duplicate signup must fail and not create a second record
    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/user/signup",
        None,
        Some(signup_payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Login with the right password
    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/user/login",
        None,
        Some(json!({"email": email, "password": "secret-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password").is_none(), "password must be excluded");
    assert!(body["token"].is_string());

    // Wrong password: generic credential failure, no token in the body
    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/user/login",
        None,
        Some(json!({"email": email, "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

/// A refresh token buys a new pair; an access token does not
#[tokio::test]
async fn test_token_refresh() {
    let ctx = TestContext::new().await.unwrap();

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/user/signup",
        None,
        Some(json!({
            "name": "Refresh User",
            "email": format!("refresh-{}@example.com", suffix),
            "phone": format!("888{}", &suffix[..9]),
            "password": "secret-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/user/refresh",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert!(body["refresh_token"].is_string());

    // An access token is not accepted in place of a refresh token
    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/user/refresh",
        None,
        Some(json!({"refresh_token": access})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Write endpoints reject requests without a bearer token
#[tokio::test]
async fn test_writes_require_authentication() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/menus",
        None,
        Some(json!({"name": "espresso", "category": "drinks", "price": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::request(
        &ctx,
        Method::PATCH,
        "/menu/doesnotexist",
        None,
        Some(json!({"price": 3.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Create, fetch, and partially update a menu entry
#[tokio::test]
async fn test_menu_crud() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let menu_id = common::create_menu(&ctx, &token, "lasagna", 10.0).await;

    // Created record is readable under its external ID
    let (status, body) =
        common::request(&ctx, Method::GET, &format!("/menu/{}", menu_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["menu_id"], json!(menu_id));
    assert_eq!(body["name"], json!("lasagna"));
    assert_eq!(body["price"], json!(10.0));

    // Partial update: only the supplied field changes
    let (status, body) = common::request(
        &ctx,
        Method::PATCH,
        &format!("/menu/{}", menu_id),
        Some(token.as_str()),
        Some(json!({"price": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], json!(12.0));
    assert_eq!(body["name"], json!("lasagna"));

    // Idempotent: applying the same patch twice yields the same state
    let (status, body) = common::request(
        &ctx,
        Method::PATCH,
        &format!("/menu/{}", menu_id),
        Some(token.as_str()),
        Some(json!({"price": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], json!(12.0));
    assert_eq!(body["name"], json!("lasagna"));

    // Patching a missing record is not an upsert
    let (status, _) = common::request(
        &ctx,
        Method::PATCH,
        "/menu/doesnotexist",
        Some(token.as_str()),
        Some(json!({"price": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// An inverted validity window is rejected without touching the record
#[tokio::test]
async fn test_menu_window_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let menu_id = common::create_menu(&ctx, &token, "seasonal card", 20.0).await;

    let (status, _) = common::request(
        &ctx,
        Method::PATCH,
        &format!("/menu/{}", menu_id),
        Some(token.as_str()),
        Some(json!({
            "name": "late card",
            "start_date": "2030-06-01T00:00:00Z",
            "end_date": "2030-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The stored menu is unchanged
    let (status, body) =
        common::request(&ctx, Method::GET, &format!("/menu/{}", menu_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("seasonal card"));
    assert!(body["start_date"].is_null());
}

/// Orders check their table reference at write time
#[tokio::test]
async fn test_order_reference_checks() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    // Unknown table reference is rejected before any write
    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/orders",
        Some(token.as_str()),
        Some(json!({"table_id": "doesnotexist"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // With an existing table the order is accepted
    let table_id = common::create_table(&ctx, &token, 7).await;
    let order_id = common::create_order(&ctx, &token, Some(&table_id)).await;

    let (status, body) = common::request(
        &ctx,
        Method::GET,
        &format!("/order/{}", order_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["table_id"], json!(table_id));
}

/// Order-items check both references at write time
#[tokio::test]
async fn test_order_item_reference_checks() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let order_id = common::create_order(&ctx, &token, None).await;

    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/orderItems",
        Some(token.as_str()),
        Some(json!({
            "order_id": order_id,
            "menu_id": "doesnotexist",
            "quantity": 1,
            "unit_price": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// The aggregated invoice view joins items, menus, and the table
#[tokio::test]
async fn test_invoice_aggregation_totals() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let table_id = common::create_table(&ctx, &token, 3).await;
    let order_id = common::create_order(&ctx, &token, Some(&table_id)).await;

    // quantities 2 and 3 at prices 10 and 5 -> 35
    let menu_a = common::create_menu(&ctx, &token, "lasagna", 10.0).await;
    let menu_b = common::create_menu(&ctx, &token, "tiramisu", 5.0).await;
    common::create_order_item(&ctx, &token, &order_id, &menu_a, 2, 10.0).await;
    common::create_order_item(&ctx, &token, &order_id, &menu_b, 3, 5.0).await;

    let invoice_id = common::create_invoice(&ctx, &token, &order_id).await;

    let (status, body) = common::request(
        &ctx,
        Method::GET,
        &format!("/invoice/{}", invoice_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice_id"], json!(invoice_id));
    assert_eq!(body["order_id"], json!(order_id));
    assert_eq!(body["payment_due"], json!(35.0));
    assert_eq!(body["table_number"], json!(3));
    assert_eq!(body["payment_status"], json!("PENDING"));
    assert_eq!(body["payment_method"], json!("null"));
    assert_eq!(body["order_details"].as_array().unwrap().len(), 2);
}

/// An order with zero items aggregates to an empty, zero-total view
#[tokio::test]
async fn test_invoice_aggregation_zero_items() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let order_id = common::create_order(&ctx, &token, None).await;
    let invoice_id = common::create_invoice(&ctx, &token, &order_id).await;

    let (status, body) = common::request(
        &ctx,
        Method::GET,
        &format!("/invoice/{}", invoice_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_due"], json!(0.0));
    assert!(body["order_details"].as_array().unwrap().is_empty());
    assert!(body["table_number"].is_null());
}

/// Invoices refuse to reference a missing order
#[tokio::test]
async fn test_invoice_requires_existing_order() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let (status, _) = common::request(
        &ctx,
        Method::POST,
        "/invoices",
        Some(token.as_str()),
        Some(json!({"order_id": "doesnotexist"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Lookups of absent records answer 404
#[tokio::test]
async fn test_get_missing_record() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) =
        common::request(&ctx, Method::GET, "/menu/doesnotexist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        common::request(&ctx, Method::GET, "/invoice/doesnotexist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Items of one order are listed together; list endpoints carry the
/// paginated envelope
#[tokio::test]
async fn test_order_items_by_order_and_list_envelope() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let order_id = common::create_order(&ctx, &token, None).await;
    let menu_id = common::create_menu(&ctx, &token, "espresso", 2.5).await;
    common::create_order_item(&ctx, &token, &order_id, &menu_id, 1, 2.5).await;
    common::create_order_item(&ctx, &token, &order_id, &menu_id, 2, 2.5).await;

    let (status, body) = common::request(
        &ctx,
        Method::GET,
        &format!("/orderItems-order/{}", order_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // List envelope: a window no larger than requested plus a total
    let (status, body) = common::request(
        &ctx,
        Method::GET,
        "/orderItems?page=1&records_per_page=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["total_count"].as_i64().unwrap() >= 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = common::request(&ctx, Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["total_count"].as_i64().unwrap() >= 1);
    assert!(body["items"].is_array());
}

/// Validation failures report a structured detail list
#[tokio::test]
async fn test_validation_details() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = common::signup(&ctx).await;

    let (status, body) = common::request(
        &ctx,
        Method::POST,
        "/tables",
        Some(token.as_str()),
        Some(json!({"number_of_guests": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("validation_error"));

    let details = body["details"].as_array().unwrap();
    assert!(details
        .iter()
        .any(|d| d["field"] == json!("table_number")));
}
