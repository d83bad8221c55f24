/// Application state and router builder
///
/// The state carries the collection handles and configuration; it is
/// cloned per request via Axum's `State` extractor. The router wires
/// every resource surface plus a process-wide write gate: POST/PATCH
/// requests must present a bearer access token before any handler runs,
/// with only the auth endpoints themselves exempt.
///
/// # Example
///
/// ```no_run
/// use mesa_api::{app::AppState, config::Config};
/// use mesa_shared::db::{pool::create_pool, store::Store};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let store = Store::new(pool, config.database.op_timeout());
/// let app = mesa_api::app::build_router(AppState::new(store, config));
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use mesa_shared::auth::middleware::{bearer_auth, AuthError};
use mesa_shared::db::store::Store;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Collection handles, one per entity
    pub store: Store,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Write endpoints that must stay reachable without a token: they are
/// how tokens are obtained in the first place.
const OPEN_WRITE_PATHS: [&str; 3] = ["/user/signup", "/user/login", "/user/refresh"];

fn requires_bearer(method: &Method, path: &str) -> bool {
    matches!(*method, Method::POST | Method::PATCH) && !OPEN_WRITE_PATHS.contains(&path)
}

/// Process-wide request gate
///
/// Validates the bearer access token on every write request before it
/// reaches a handler; reads and the auth endpoints pass through.
async fn write_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if requires_bearer(req.method(), req.uri().path()) {
        bearer_auth(state.jwt_secret().to_string(), req, next).await
    } else {
        Ok(next.run(req).await)
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                      # liveness + store connectivity
/// ├── /users · /user/:user_id      # accounts
/// │   └── /user/{signup,login,refresh}
/// ├── /menus · /menu/:menu_id
/// ├── /tables · /table/:table_id
/// ├── /orders · /order/:order_id
/// ├── /orderItems · /orderItem/:order_item_id
/// │   └── /orderItems-order/:order_id
/// └── /invoices · /invoice/:invoice_id   # GET is the aggregated view
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Users and authentication
        .route("/users", get(routes::users::list_users))
        .route("/user/:user_id", get(routes::users::get_user))
        .route("/user/signup", post(routes::auth::signup))
        .route("/user/login", post(routes::auth::login))
        .route("/user/refresh", post(routes::auth::refresh))
        // Menus
        .route("/menus", get(routes::menus::list_menus).post(routes::menus::create_menu))
        .route(
            "/menu/:menu_id",
            get(routes::menus::get_menu).patch(routes::menus::update_menu),
        )
        // Tables
        .route(
            "/tables",
            get(routes::tables::list_tables).post(routes::tables::create_table),
        )
        .route(
            "/table/:table_id",
            get(routes::tables::get_table).patch(routes::tables::update_table),
        )
        // Orders
        .route(
            "/orders",
            get(routes::orders::list_orders).post(routes::orders::create_order),
        )
        .route(
            "/order/:order_id",
            get(routes::orders::get_order).patch(routes::orders::update_order),
        )
        // Order-items
        .route(
            "/orderItems",
            get(routes::order_items::list_order_items).post(routes::order_items::create_order_item),
        )
        .route(
            "/orderItem/:order_item_id",
            get(routes::order_items::get_order_item).patch(routes::order_items::update_order_item),
        )
        .route(
            "/orderItems-order/:order_id",
            get(routes::order_items::list_order_items_by_order),
        )
        // Invoices
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route(
            "/invoice/:invoice_id",
            get(routes::invoices::get_invoice).patch(routes::invoices::update_invoice),
        )
        .layer(axum::middleware::from_fn_with_state(state.clone(), write_gate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
