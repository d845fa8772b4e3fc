pub mod auth;
pub mod handlers;
pub mod initialization;
pub mod middleware;
pub mod logging;
pub mod users;
