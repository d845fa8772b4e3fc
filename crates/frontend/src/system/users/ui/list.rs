use contracts::system::users::SystemUser;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{ChangePasswordForm, UserDetails};
use crate::shared::components::modal::Modal;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use crate::system::users::api;

#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    Edit(Option<SystemUser>),
    Password(SystemUser),
}

/// `2024-05-01T08:30:00Z` as `2024-05-01 08:30`
fn format_login(value: Option<&str>) -> String {
    match value {
        None => "never".to_string(),
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

fn role_color(role: &str) -> BadgeColor {
    match role {
        "Admin" => BadgeColor::Danger,
        "DataEntry" => BadgeColor::Brand,
        _ => BadgeColor::Informative,
    }
}

/// Console accounts (admin only)
#[component]
pub fn UsersList() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let (users, set_users) = signal(Vec::<SystemUser>::new());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);
    let dialog = RwSignal::new(None::<Dialog>);

    let current_uid = move || {
        auth_state
            .get()
            .user_info
            .map(|u| u.id)
            .unwrap_or_default()
    };

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(list) => {
                    set_users.set(list);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.message())),
            }
            set_loading.set(false);
        });
    };

    let delete_user = move |user: SystemUser| {
        let prompt = format!("Delete user {}?", user.email);
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&prompt).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.uid).await {
                Ok(()) => load(),
                Err(e) => set_error.set(Some(e.message())),
            }
        });
    };

    let close = Callback::new(move |_| dialog.set(None));
    let saved = Callback::new(move |_| {
        dialog.set(None);
        load();
    });

    load();

    view! {
        <div class="content">
            <div class="header">
                <h2>"Users"</h2>
                <Flex gap=FlexGap::Small>
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| dialog.set(Some(Dialog::Edit(None)))>
                        {icon("plus")}
                        "New user"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                        "Refresh"
                    </Button>
                </Flex>
            </div>

            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <Show when=move || loading.get()>
                <Flex gap=FlexGap::Small style="align-items: center; justify-content: center; padding: var(--spacing-xl);">
                    <Spinner />
                    <span>"Loading..."</span>
                </Flex>
            </Show>

            <div class="table-container">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Email"</th>
                            <th class="table__header-cell">"Name"</th>
                            <th class="table__header-cell">"Role"</th>
                            <th class="table__header-cell">"Status"</th>
                            <th class="table__header-cell">"Last login"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || users.get().into_iter().map(|user| {
                            let is_self = user.uid == current_uid();
                            let for_edit = user.clone();
                            let for_password = user.clone();
                            let for_delete = user.clone();
                            let role = user.role.as_str();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{user.email.clone()}</td>
                                    <td class="table__cell">{user.full_name.clone()}</td>
                                    <td class="table__cell">
                                        <Badge appearance=BadgeAppearance::Tint color=role_color(role)>
                                            {role}
                                        </Badge>
                                    </td>
                                    <td class="table__cell">
                                        {if user.is_active { "Active" } else { "Disabled" }}
                                    </td>
                                    <td class="table__cell">
                                        {format_login(user.last_login_at.as_deref())}
                                    </td>
                                    <td class="table__cell table__cell--actions">
                                        <Button
                                            size=ButtonSize::Small
                                            appearance=ButtonAppearance::Subtle
                                            on_click=move |_| dialog.set(Some(Dialog::Edit(Some(for_edit.clone()))))
                                        >
                                            {icon("edit")}
                                        </Button>
                                        <Button
                                            size=ButtonSize::Small
                                            appearance=ButtonAppearance::Subtle
                                            on_click=move |_| dialog.set(Some(Dialog::Password(for_password.clone())))
                                        >
                                            "Password"
                                        </Button>
                                        <Button
                                            size=ButtonSize::Small
                                            appearance=ButtonAppearance::Subtle
                                            disabled=is_self
                                            on_click=move |_| delete_user(for_delete.clone())
                                        >
                                            {icon("delete")}
                                        </Button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>

            {move || dialog.get().map(|d| match d {
                Dialog::Edit(user) => {
                    let title = if user.is_some() { "Edit user" } else { "New user" };
                    view! {
                        <Modal title=title.to_string() on_close=close>
                            <UserDetails user=user on_saved=saved on_cancel=close />
                        </Modal>
                    }
                    .into_any()
                }
                Dialog::Password(user) => {
                    let title = format!("Change password: {}", user.email);
                    let is_self = user.uid == current_uid();
                    view! {
                        <Modal title=title on_close=close>
                            <ChangePasswordForm uid=user.uid ask_old=is_self on_saved=saved on_cancel=close />
                        </Modal>
                    }
                    .into_any()
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_login() {
        assert_eq!(format_login(None), "never");
        assert_eq!(format_login(Some("2024-05-01T08:30:00Z")), "2024-05-01 08:30");
        assert_eq!(format_login(Some("yesterday")), "yesterday");
    }
}
