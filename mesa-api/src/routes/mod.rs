/// API route handlers
///
/// Organized by resource:
///
/// - `health`: liveness endpoint
/// - `auth`: signup, login, token refresh
/// - `users`, `menus`, `tables`, `orders`, `order_items`: the uniform
///   list/get/create/update surface per entity
/// - `invoices`: invoice CRUD plus the aggregated invoice view

pub mod auth;
pub mod health;
pub mod invoices;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod tables;
pub mod users;
