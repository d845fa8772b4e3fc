use crate::dashboards::d400_directory_summary::ui::DirectorySummary;
use crate::domain::a004_contact::ui::list::ContactList;
use crate::domain::categories::CategoriesPage;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::guard::RequireAdmin;
use crate::system::users::ui::list::UsersList;
use leptos::prelude::*;

/// Content of the active page
#[component]
pub fn Center() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="app-content">
            {move || match ctx.active.get().as_str() {
                "a004_contact" => view! { <ContactList /> }.into_any(),
                "categories" => view! { <CategoriesPage /> }.into_any(),
                "sys_users" => view! {
                    <RequireAdmin>
                        <UsersList />
                    </RequireAdmin>
                }.into_any(),
                _ => view! { <DirectorySummary /> }.into_any(),
            }}
        </div>
    }
}
