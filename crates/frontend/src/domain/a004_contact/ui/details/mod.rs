use crate::domain::a004_contact::api;
use crate::shared::api_utils::{upload_file, ApiFailure};
use crate::shared::category_store::use_categories;
use crate::shared::components::field_error::FieldError;
use crate::system::auth::context::use_auth;
use contracts::domain::a004_contact::aggregate::{ContactDto, ContactPatch, ContactStatus, ContactType};
use contracts::shared::cascading_selector::CascadingSelection;
use contracts::shared::validation::{validate_contact, ErrorMap, ValidationPolicy};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Create or edit form of a contact. Viewers get the same form read-only.
#[component]
pub fn ContactDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let categories = use_categories();
    let is_new = id.is_none();
    let contact_id = StoredValue::new(id);

    let form = RwSignal::new(ContactDto::default());
    let selection = RwSignal::new(CascadingSelection::new());
    let errors = RwSignal::new(ErrorMap::new());
    let (message, set_message) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let (uploading, set_uploading) = signal(false);

    let read_only = move || !auth_state.get().can_edit();

    spawn_local(async move {
        categories.ensure_loaded().await;
        let Some(id) = contact_id.get_value() else {
            return;
        };
        match api::fetch_by_id(&id).await {
            Ok(contact) => {
                selection.set(CascadingSelection::from_record(
                    &contact.department_id,
                    &contact.institute_id,
                    &contact.unit_id,
                ));
                form.set(contact.to_dto());
            }
            Err(e) => set_message.set(Some(e.message())),
        }
    });

    // Keep the three ids of the form in step with the selector
    Effect::new(move |_| {
        let (department_id, institute_id, unit_id) = selection.get().to_form_values();
        form.update(|f| {
            f.department_id = department_id;
            f.institute_id = institute_id;
            f.unit_id = unit_id;
        });
    });

    let on_file = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            match upload_file("contact", &file).await {
                Ok(url) => {
                    form.update(|f| f.profile_picture = url);
                    errors.update(|e| {
                        e.remove("profilePicture");
                    });
                }
                Err(e) => errors.update(|errs| {
                    errs.insert("profilePicture".into(), e.message());
                }),
            }
            set_uploading.set(false);
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let dto = form.get_untracked();
        let found = validate_contact(&dto, is_new);
        let blocked = ValidationPolicy::default().blocks(is_new, &found);
        errors.set(found);
        if blocked {
            return;
        }
        set_saving.set(true);
        spawn_local(async move {
            let result = match contact_id.get_value() {
                Some(id) => api::update(&id, &ContactPatch::from(&dto)).await.map(|_| ()),
                None => api::create(&dto).await.map(|_| ()),
            };
            set_saving.set(false);
            match result {
                Ok(()) => on_saved.run(()),
                Err(ApiFailure::Invalid(server_errors)) => errors.set(server_errors),
                Err(e) => set_message.set(Some(e.message())),
            }
        });
    };

    let on_delete = move |_| {
        let Some(id) = contact_id.get_value() else {
            return;
        };
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this contact?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::delete(&id).await {
                Ok(()) => on_saved.run(()),
                Err(e) => set_message.set(Some(e.message())),
            }
        });
    };

    let errors_signal = Signal::from(errors);

    let text_input = move |label: &'static str,
                           field: &'static str,
                           get: fn(&ContactDto) -> String,
                           set: fn(&mut ContactDto, String)| {
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || form.with(|f| get(f))
                    prop:disabled=read_only
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                />
                <FieldError errors=errors_signal field=field />
            </div>
        }
    };

    view! {
        <form class="details-form" on:submit=on_submit>
            {move || message.get().map(|m| view! { <div class="error">{m}</div> })}
            {move || categories.error.get().map(|m| view! { <div class="warning">{m}</div> })}

            {text_input("Full name", "fullName", |f| f.full_name.clone(), |f, v| f.full_name = v)}
            {text_input("Designation", "designation", |f| f.designation.clone(), |f, v| f.designation = v)}

            <div class="form__group">
                <label class="form__label">"Department"</label>
                <select
                    class="form__select"
                    prop:disabled=read_only
                    prop:value=move || selection.with(|s| s.department().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        selection.update(|s| s.set_department(value));
                    }
                >
                    <option value="">"Select department"</option>
                    {move || categories.snapshot().departments.into_iter().map(|item| view! {
                        <option
                            value=item.id.clone()
                            selected=move || selection.with(|s| s.department() == Some(item.id.as_str()))
                        >
                            {item.name.clone()}
                        </option>
                    }).collect_view()}
                </select>
                <FieldError errors=errors_signal field="departmentId" />
            </div>

            <div class="form__group">
                <label class="form__label">"Institute"</label>
                <select
                    class="form__select"
                    prop:disabled=read_only
                    prop:value=move || selection.with(|s| s.institute().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        let snapshot = categories.snapshot();
                        selection.update(|s| s.pick_institute(&snapshot, value));
                    }
                >
                    <option value="">"Select institute"</option>
                    {move || {
                        let snapshot = categories.snapshot();
                        let current = selection.get();
                        current.eligible_institutes(&snapshot).into_iter().cloned().map(|item| view! {
                            <option
                                value=item.id.clone()
                                selected=move || selection.with(|s| s.institute() == Some(item.id.as_str()))
                            >
                                {item.name.clone()}
                            </option>
                        }).collect_view()
                    }}
                </select>
                <FieldError errors=errors_signal field="instituteId" />
            </div>

            <div class="form__group">
                <label class="form__label">"Unit"</label>
                <select
                    class="form__select"
                    prop:disabled=read_only
                    prop:value=move || selection.with(|s| s.unit().unwrap_or_default().to_string())
                    on:change=move |ev| {
                        let value = non_empty(event_target_value(&ev));
                        let snapshot = categories.snapshot();
                        selection.update(|s| s.pick_unit(&snapshot, value));
                    }
                >
                    <option value="">"Select unit"</option>
                    {move || {
                        let snapshot = categories.snapshot();
                        let current = selection.get();
                        current.eligible_units(&snapshot).into_iter().cloned().map(|item| view! {
                            <option
                                value=item.id.clone()
                                selected=move || selection.with(|s| s.unit() == Some(item.id.as_str()))
                            >
                                {item.name.clone()}
                            </option>
                        }).collect_view()
                    }}
                </select>
                <FieldError errors=errors_signal field="unitId" />
            </div>

            {text_input("Official email", "officialEmail", |f| f.official_email.clone(), |f, v| f.official_email = v)}
            {text_input("Personal email", "personalEmail", |f| f.personal_email.clone(), |f, v| f.personal_email = v)}
            {text_input("Mobile 1", "mobileNo1", |f| f.mobile_no1.clone(), |f, v| f.mobile_no1 = v)}
            {text_input("Mobile 2", "mobileNo2", |f| f.mobile_no2.clone(), |f, v| f.mobile_no2 = v)}
            {text_input("Land line", "landLine", |f| f.land_line.clone(), |f, v| f.land_line = v)}
            {text_input("Extension", "extension", |f| f.extension.clone(), |f, v| f.extension = v)}

            <div class="form__row">
                <div class="form__group">
                    <label class="form__label">"Type"</label>
                    <select
                        class="form__select"
                        prop:disabled=read_only
                        prop:value=move || form.with(|f| f.contact_type.as_str().to_string())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            if let Some(kind) = ContactType::from_str_lenient(&value) {
                                form.update(|f| f.contact_type = kind);
                            }
                        }
                    >
                        {ContactType::all().into_iter().map(|kind| view! {
                            <option value=kind.as_str()>{kind.as_str()}</option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form__group">
                    <label class="form__label">"Status"</label>
                    <select
                        class="form__select"
                        prop:disabled=read_only
                        prop:value=move || form.with(|f| f.contact_status.as_str().to_string())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            if let Some(status) = ContactStatus::from_str_lenient(&value) {
                                form.update(|f| f.contact_status = status);
                            }
                        }
                    >
                        {ContactStatus::all().into_iter().map(|status| view! {
                            <option value=status.as_str()>{status.as_str()}</option>
                        }).collect_view()}
                    </select>
                </div>
            </div>

            <div class="form__group">
                <label class="form__label">"Picture"</label>
                {move || {
                    let url = form.with(|f| f.profile_picture.clone());
                    (!url.is_empty()).then(|| view! { <img class="avatar avatar--large" src=url alt="Profile picture" /> })
                }}
                <Show when=move || !read_only()>
                    <input type="file" accept="image/jpeg,image/png" on:change=on_file />
                </Show>
                <Show when=move || uploading.get()>
                    <span class="muted">"Uploading..."</span>
                </Show>
                <FieldError errors=errors_signal field="profilePicture" />
            </div>

            <div class="form__actions">
                <Show when=move || !read_only()>
                    <button class="button button--primary" type="submit" disabled=move || saving.get() || uploading.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                    <Show when=move || !is_new>
                        <button class="button button--danger" type="button" on:click=on_delete>
                            "Delete"
                        </button>
                    </Show>
                </Show>
                <button class="button button--secondary" type="button" on:click=move |_| on_cancel.run(())>
                    {if is_new { "Cancel" } else { "Close" }}
                </button>
            </div>
        </form>
    }
}
