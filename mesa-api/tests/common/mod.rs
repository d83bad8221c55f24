/// Common test utilities for integration tests
///
/// Shared infrastructure: database setup (migrations run on first
/// connect), an in-process router, and helpers for issuing JSON requests
/// and creating accounts. Tests require `DATABASE_URL` and `JWT_SECRET`
/// in the environment; every created record carries a unique identity so
/// tests never assert against global state.
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use mesa_api::app::{build_router, AppState};
use mesa_api::config::Config;
use mesa_shared::db::{migrations::run_migrations, pool::create_pool, store::Store};
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the in-process app and its dependencies
pub struct TestContext {
    pub app: Router,
    pub config: Config,
    pub store: Store,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let pool = create_pool(config.database.clone()).await?;
        run_migrations(&pool).await?;

        let store = Store::new(pool, config.database.op_timeout());
        let state = AppState::new(store.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { app, config, store })
    }
}

/// Issues one JSON request against the in-process app
pub async fn request(
    ctx: &TestContext,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .expect("request should build");

    let response = ctx
        .app
        .clone()
        .call(request)
        .await
        .expect("app should answer");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

/// Creates a unique account and returns `(user_id, access_token)`
pub async fn signup(ctx: &TestContext) -> (String, String) {
    let suffix = Uuid::new_v4().simple().to_string();
    let payload = json!({
        "name": "Test User",
        "email": format!("test-{}@example.com", suffix),
        "phone": format!("555{}", &suffix[..9]),
        "password": "secret-password"
    });

    let (status, body) = request(ctx, Method::POST, "/user/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);

    (
        body["user_id"].as_str().expect("user_id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}

/// Creates a table and returns its external ID
pub async fn create_table(ctx: &TestContext, token: &str, number: i32) -> String {
    let (status, body) = request(
        ctx,
        Method::POST,
        "/tables",
        Some(token),
        Some(json!({"table_number": number, "number_of_guests": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "table create failed: {}", body);
    body["table_id"].as_str().expect("table_id").to_string()
}

/// Creates an order (optionally at a table) and returns its external ID
pub async fn create_order(ctx: &TestContext, token: &str, table_id: Option<&str>) -> String {
    let payload = match table_id {
        Some(id) => json!({"table_id": id}),
        None => json!({}),
    };

    let (status, body) = request(ctx, Method::POST, "/orders", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "order create failed: {}", body);
    body["order_id"].as_str().expect("order_id").to_string()
}

/// Creates a menu entry and returns its external ID
pub async fn create_menu(ctx: &TestContext, token: &str, name: &str, price: f64) -> String {
    let (status, body) = request(
        ctx,
        Method::POST,
        "/menus",
        Some(token),
        Some(json!({"name": name, "category": "food", "price": price})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "menu create failed: {}", body);
    body["menu_id"].as_str().expect("menu_id").to_string()
}

/// Creates an order-item and returns its external ID
pub async fn create_order_item(
    ctx: &TestContext,
    token: &str,
    order_id: &str,
    menu_id: &str,
    quantity: i32,
    unit_price: f64,
) -> String {
    let (status, body) = request(
        ctx,
        Method::POST,
        "/orderItems",
        Some(token),
        Some(json!({
            "order_id": order_id,
            "menu_id": menu_id,
            "quantity": quantity,
            "unit_price": unit_price
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "order-item create failed: {}", body);
    body["order_item_id"]
        .as_str()
        .expect("order_item_id")
        .to_string()
}

/// Creates an invoice for an order and returns its external ID
pub async fn create_invoice(ctx: &TestContext, token: &str, order_id: &str) -> String {
    let (status, body) = request(
        ctx,
        Method::POST,
        "/invoices",
        Some(token),
        Some(json!({"order_id": order_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "invoice create failed: {}", body);
    body["invoice_id"].as_str().expect("invoice_id").to_string()
}
