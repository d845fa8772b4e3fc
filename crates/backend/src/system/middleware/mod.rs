pub mod page_guard;
pub mod request_logger;
