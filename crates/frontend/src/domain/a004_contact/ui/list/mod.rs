pub mod state;

use self::state::create_state;
use crate::domain::a004_contact::api;
use crate::domain::a004_contact::ui::details::ContactDetails;
use crate::shared::components::modal::Modal;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use contracts::domain::a004_contact::aggregate::{Contact, ContactStatus, ContactType};
use contracts::shared::contact_list::{self, SortDirection, ALL};
use leptos::prelude::*;

/// Sortable columns: (field, header)
const COLUMNS: [(&str, &str); 5] = [
    ("fullName", "Name"),
    ("designation", "Designation"),
    ("department", "Department"),
    ("officialEmail", "Official email"),
    ("contactStatus", "Status"),
];

fn sort_indicator(active_field: &str, field: &str, direction: SortDirection) -> &'static str {
    if active_field != field {
        return "";
    }
    match direction {
        SortDirection::Asc => " ▲",
        SortDirection::Desc => " ▼",
    }
}

/// Which contact the modal shows: `Some(None)` is a new one
type Editing = Option<Option<String>>;

#[component]
pub fn ContactList() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let state = create_state();
    let contacts = RwSignal::new(Vec::<Contact>::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let editing = RwSignal::new(Editing::None);

    let fetch = move || {
        set_loading.set(true);
        leptos::task::spawn_local(async move {
            match api::fetch_all().await {
                Ok(v) => {
                    contacts.set(v);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.message())),
            }
            set_loading.set(false);
        });
    };

    let visible = Memo::new(move |_| {
        let s = state.get();
        contacts.with(|records| contact_list::apply(records, &s.query, s.page, s.page_size))
    });

    let can_edit = move || auth_state.get().can_edit();
    let is_admin = move || auth_state.get().is_admin();

    let fill_test_data = move |_| {
        leptos::task::spawn_local(async move {
            match api::fill_test_data().await {
                Ok(()) => fetch(),
                Err(e) => set_error.set(Some(e.message())),
            }
        });
    };

    let close_modal = Callback::new(move |_| editing.set(None));
    let on_saved = Callback::new(move |_| {
        editing.set(None);
        fetch();
    });

    fetch();

    view! {
        <div class="content">
            <div class="header">
                <h2>"Contacts"</h2>
                <div class="header__actions">
                    <Show when=can_edit>
                        <button class="button button--primary" on:click=move |_| editing.set(Some(None))>
                            {icon("plus")}
                            "New contact"
                        </button>
                    </Show>
                    <Show when=is_admin>
                        <button class="button button--secondary" on:click=fill_test_data>
                            {icon("download")}
                            "Fill test data"
                        </button>
                    </Show>
                    <button class="button button--secondary" on:click=move |_| fetch()>
                        {icon("refresh")}
                        "Refresh"
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <div class="filter-panel__search">
                    {icon("search")}
                    <input
                        type="search"
                        placeholder="Search name, department, designation, email or phone"
                        prop:value=move || state.with(|s| s.query.search_term.clone())
                        on:input=move |ev| {
                            let term = event_target_value(&ev);
                            state.update(|s| {
                                s.query.search_term = term;
                                s.page = 1;
                            });
                        }
                    />
                </div>
                <select
                    prop:value=move || state.with(|s| s.query.status_filter.clone())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| {
                            s.query.status_filter = value;
                            s.page = 1;
                        });
                    }
                >
                    <option value=ALL>"All statuses"</option>
                    {ContactStatus::all().into_iter().map(|status| view! {
                        <option value=status.as_str()>{status.as_str()}</option>
                    }).collect_view()}
                </select>
                <select
                    prop:value=move || state.with(|s| s.query.type_filter.clone())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        state.update(|s| {
                            s.query.type_filter = value;
                            s.page = 1;
                        });
                    }
                >
                    <option value=ALL>"All types"</option>
                    {ContactType::all().into_iter().map(|kind| view! {
                        <option value=kind.as_str()>{kind.as_str()}</option>
                    }).collect_view()}
                </select>
            </div>

            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
            <Show when=move || loading.get()>
                <div class="loading">"Loading..."</div>
            </Show>

            <div class="table-container">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {COLUMNS.iter().map(|&(field, header)| view! {
                                <th
                                    class="table__header-cell table__header-cell--sortable"
                                    on:click=move |_| state.update(|s| s.toggle_sort(field))
                                >
                                    {header}
                                    <span class="sort-indicator">
                                        {move || state.with(|s| sort_indicator(&s.query.sort_field, field, s.query.sort_direction))}
                                    </span>
                                </th>
                            }).collect_view()}
                            <th class="table__header-cell">"Mobile"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || visible.get().items.into_iter().map(|contact| {
                            let id = contact.to_string_id();
                            view! {
                                <tr class="table__row" on:click=move |_| editing.set(Some(Some(id.clone())))>
                                    <td class="table__cell">{contact.full_name}</td>
                                    <td class="table__cell">{contact.designation}</td>
                                    <td class="table__cell">{contact.department}</td>
                                    <td class="table__cell">{contact.official_email}</td>
                                    <td class="table__cell">
                                        <span class=format!("badge badge--{}", contact.contact_status.as_str().to_lowercase())>
                                            {contact.contact_status.as_str()}
                                        </span>
                                    </td>
                                    <td class="table__cell">{contact.mobile_no1}</td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
                <Show when=move || visible.with(|p| p.total_count == 0) && !loading.get()>
                    <div class="table__empty">"No contacts match the current filters"</div>
                </Show>
            </div>

            <PaginationControls
                current_page=Signal::derive(move || visible.with(|p| p.page))
                total_pages=Signal::derive(move || visible.with(|p| p.total_pages))
                total_count=Signal::derive(move || visible.with(|p| p.total_count))
                page_size=Signal::derive(move || state.with(|s| s.page_size))
                on_page_change=Callback::new(move |page| state.update(|s| s.page = page))
                on_page_size_change=Callback::new(move |size| state.update(|s| {
                    s.page_size = size;
                    s.page = 1;
                }))
            />

            {move || editing.get().map(|id| {
                let title = if id.is_some() { "Contact" } else { "New contact" };
                view! {
                    <Modal title=title.to_string() on_close=close_modal>
                        <ContactDetails id=id on_saved=on_saved on_cancel=close_modal />
                    </Modal>
                }
            })}
        </div>
    }
}
