pub mod api_response;
pub mod cascading_selector;
pub mod category_cache;
pub mod contact_list;
pub mod validation;
