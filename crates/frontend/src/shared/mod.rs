pub mod api_utils;
pub mod category_store;
pub mod components;
pub mod icons;
