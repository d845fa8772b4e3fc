use crate::layout::global_context::AppGlobalContext;
use crate::routes::AppRoutes;
use crate::shared::category_store::CategoryStore;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Active page and panel state for the whole console
    provide_context(AppGlobalContext::new());

    // Category lists shared by every form and filter
    provide_context(CategoryStore::new());

    view! {
        <AuthProvider>
            <AppRoutes />
        </AuthProvider>
    }
}
