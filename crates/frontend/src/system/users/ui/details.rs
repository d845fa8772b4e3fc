use contracts::shared::cascading_selector::CascadingSelection;
use contracts::shared::validation::{validate_user, ErrorMap};
use contracts::system::users::{ChangePasswordDto, SystemUser, SystemUserDto, UserRole};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::api_utils::ApiFailure;
use crate::shared::category_store::use_categories;
use crate::shared::components::field_error::FieldError;
use crate::system::users::api;

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Create or edit a console account
#[component]
pub fn UserDetails(
    user: Option<SystemUser>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let categories = use_categories();
    let is_new = user.is_none();
    let uid = StoredValue::new(user.as_ref().map(|u| u.uid.clone()));
    let initial = user.as_ref().map(SystemUserDto::from).unwrap_or_default();

    let selection = RwSignal::new(CascadingSelection::from_record(
        &initial.department_id,
        &initial.institute_id,
        &initial.unit_id,
    ));
    let is_active = RwSignal::new(initial.is_active);
    let form = RwSignal::new(initial);
    let errors = RwSignal::new(ErrorMap::new());
    let (message, set_message) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    spawn_local(async move { categories.ensure_loaded().await });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut dto = form.get_untracked();
        let (department_id, institute_id, unit_id) = selection.get_untracked().to_form_values();
        dto.department_id = department_id;
        dto.institute_id = institute_id;
        dto.unit_id = unit_id;
        dto.is_active = is_active.get_untracked();
        dto.password = dto.password.and_then(non_empty);

        let found = validate_user(&dto, is_new);
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        errors.set(ErrorMap::new());
        set_saving.set(true);
        spawn_local(async move {
            let result = match uid.get_value() {
                Some(uid) => api::update_user(&uid, &dto).await.map(|_| ()),
                None => api::create_user(&dto).await.map(|_| ()),
            };
            set_saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(ApiFailure::Invalid(server_errors)) => errors.set(server_errors),
                Err(e) => set_message.set(Some(e.message())),
            }
        });
    };

    let errors_signal = Signal::from(errors);

    let text_input = move |label: &'static str,
                           field: &'static str,
                           kind: &'static str,
                           get: fn(&SystemUserDto) -> String,
                           set: fn(&mut SystemUserDto, String)| {
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    class="form__input"
                    type=kind
                    prop:value=move || form.with(|f| get(f))
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                />
                <FieldError errors=errors_signal field=field />
            </div>
        }
    };

    let password_label = if is_new { "Password" } else { "New password (leave blank to keep)" };

    view! {
        <form class="details-form" on:submit=on_submit>
            {move || message.get().map(|m| view! { <div class="error">{m}</div> })}

            {text_input("Email", "email", "email", |f| f.email.clone(), |f, v| f.email = v)}
            {text_input("Full name", "fullName", "text", |f| f.full_name.clone(), |f, v| f.full_name = v)}
            {text_input(
                password_label,
                "password",
                "password",
                |f| f.password.clone().unwrap_or_default(),
                |f, v| f.password = Some(v),
            )}
            {text_input("Designation", "designation", "text", |f| f.designation.clone(), |f, v| f.designation = v)}
            {text_input("Contact number", "contactNumber", "text", |f| f.contact_number.clone(), |f, v| f.contact_number = v)}

            <div class="form__group">
                <label class="form__label">"Role"</label>
                <select
                    class="form__select"
                    prop:value=move || form.with(|f| f.role.as_str().to_string())
                    on:change=move |ev| {
                        let role = UserRole::from_str_lenient(&event_target_value(&ev));
                        form.update(|f| f.role = role);
                    }
                >
                    {UserRole::all().into_iter().map(|role| view! {
                        <option value=role.as_str()>{role.as_str()}</option>
                    }).collect_view()}
                </select>
            </div>

            <div class="form__group">
                <label class="form__label">"Department"</label>
                <select
                    class="form__select"
                    prop:value=move || selection.with(|s| s.department().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        selection.update(|s| s.set_department(value));
                    }
                >
                    <option value="">"None"</option>
                    {move || categories.snapshot().departments.into_iter().map(|item| {
                        let id = item.id.clone();
                        view! {
                            <option value=item.id selected=move || selection.with(|s| s.department() == Some(id.as_str()))>
                                {item.name}
                            </option>
                        }
                    }).collect_view()}
                </select>
            </div>

            <div class="form__group">
                <label class="form__label">"Institute"</label>
                <select
                    class="form__select"
                    prop:value=move || selection.with(|s| s.institute().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        let snapshot = categories.snapshot();
                        selection.update(|s| s.pick_institute(&snapshot, value));
                    }
                >
                    <option value="">"None"</option>
                    {move || {
                        let snapshot = categories.snapshot();
                        selection.get().eligible_institutes(&snapshot).into_iter().cloned().map(|item| {
                            let id = item.id.clone();
                            view! {
                                <option value=item.id selected=move || selection.with(|s| s.institute() == Some(id.as_str()))>
                                    {item.name}
                                </option>
                            }
                        }).collect_view()
                    }}
                </select>
                <FieldError errors=errors_signal field="instituteId" />
            </div>

            <div class="form__group">
                <label class="form__label">"Unit"</label>
                <select
                    class="form__select"
                    prop:value=move || selection.with(|s| s.unit().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        let snapshot = categories.snapshot();
                        selection.update(|s| s.pick_unit(&snapshot, value));
                    }
                >
                    <option value="">"None"</option>
                    {move || {
                        let snapshot = categories.snapshot();
                        selection.get().eligible_units(&snapshot).into_iter().cloned().map(|item| {
                            let id = item.id.clone();
                            view! {
                                <option value=item.id selected=move || selection.with(|s| s.unit() == Some(id.as_str()))>
                                    {item.name}
                                </option>
                            }
                        }).collect_view()
                    }}
                </select>
                <FieldError errors=errors_signal field="unitId" />
            </div>

            <div class="form__group">
                <Switch checked=is_active label="Active" />
            </div>

            <Flex gap=FlexGap::Small>
                <button class="button button--primary" type="submit" disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </Flex>
        </form>
    }
}

/// Set a new password. Users changing their own password confirm the
/// current one.
#[component]
pub fn ChangePasswordForm(
    uid: String,
    ask_old: bool,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let uid = StoredValue::new(uid);
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(ErrorMap::new());
    let (message, set_message) = signal(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut found = ErrorMap::new();
        let new_value = new_password.get_untracked();
        if new_value.chars().count() < 6 {
            found.insert("newPassword".into(), "Password must be at least 6 characters".into());
        } else if new_value != confirm.get_untracked() {
            found.insert("confirm".into(), "Passwords do not match".into());
        }
        if ask_old && old_password.with_untracked(|p| p.is_empty()) {
            found.insert("oldPassword".into(), "Current password is required".into());
        }
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        let dto = ChangePasswordDto {
            old_password: ask_old.then(|| old_password.get_untracked()),
            new_password: new_value,
        };
        spawn_local(async move {
            match api::change_password(&uid.get_value(), &dto).await {
                Ok(()) => on_saved.run(()),
                Err(ApiFailure::Invalid(server_errors)) => errors.set(server_errors),
                Err(e) => set_message.set(Some(e.message())),
            }
        });
    };

    let errors_signal = Signal::from(errors);

    let password_input = move |label: &'static str, field: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    class="form__input"
                    type="password"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
                <FieldError errors=errors_signal field=field />
            </div>
        }
    };

    view! {
        <form class="details-form" on:submit=on_submit>
            {move || message.get().map(|m| view! { <div class="error">{m}</div> })}
            {ask_old.then(|| password_input("Current password", "oldPassword", old_password))}
            {password_input("New password", "newPassword", new_password)}
            {password_input("Confirm password", "confirm", confirm)}
            <Flex gap=FlexGap::Small>
                <button class="button button--primary" type="submit">
                    "Change password"
                </button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancel"
                </Button>
            </Flex>
        </form>
    }
}
