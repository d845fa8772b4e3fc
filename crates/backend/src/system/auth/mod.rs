pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

/// Name of the HttpOnly cookie that carries the access token
pub const SESSION_COOKIE: &str = "session";
