use crate::layout::global_context::{AppGlobalContext, PAGES};
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

/// Left navigation. The users page is listed for admins only.
#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();

    let is_admin = move || {
        auth_state
            .get()
            .user_info
            .as_ref()
            .map(|u| u.is_admin())
            .unwrap_or(false)
    };

    view! {
        <nav class="sidebar">
            <ul class="sidebar__menu">
                {PAGES
                    .iter()
                    .map(|(key, label, icon_name)| {
                        let key = *key;
                        let admin_only = key == "sys_users";
                        view! {
                            <Show when=move || !admin_only || is_admin()>
                                <li
                                    class="sidebar__item"
                                    class:sidebar__item--active=move || ctx.active.get() == key
                                    on:click=move |_| ctx.open(key)
                                >
                                    {icon(icon_name)}
                                    <span>{*label}</span>
                                </li>
                            </Show>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
