use leptos::prelude::*;

use super::context::use_auth;

/// Renders children for Admin or DataEntry users only
#[component]
pub fn RequireEditor(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show when=move || auth_state.get().can_edit()>
            {children()}
        </Show>
    }
}

/// Renders children for admins, an access notice otherwise
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().is_admin()
            fallback=|| view! { <div class="error">"Access denied. Admin privileges required."</div> }
        >
            {children()}
        </Show>
    }
}
