/// Authentication primitives
///
/// - `jwt`: token pair issuing and validation
/// - `password`: one-way password hashing with verify
/// - `middleware`: bearer-token request gate for Axum routers

pub mod jwt;
pub mod middleware;
pub mod password;
