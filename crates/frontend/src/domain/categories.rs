//! Departments, institutes and units side by side.
//!
//! Each column lists one level with its parent's name. Editors can add,
//! rename, re-parent and delete entries; every change reloads the shared
//! category lists so open contact forms see it.

use contracts::domain::a001_department::aggregate::DepartmentDto;
use contracts::domain::a002_institute::aggregate::InstituteDto;
use contracts::domain::a003_unit::aggregate::UnitDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::{a001_department, a002_institute, a003_unit};
use crate::shared::api_utils::ApiFailure;
use crate::shared::category_store::use_categories;
use crate::shared::components::modal::Modal;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Department,
    Institute,
    Unit,
}

impl Level {
    fn title(self) -> &'static str {
        match self {
            Level::Department => "Departments",
            Level::Institute => "Institutes",
            Level::Unit => "Units",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            Level::Department => "department",
            Level::Institute => "institute",
            Level::Unit => "unit",
        }
    }

    fn parent(self) -> Option<Level> {
        match self {
            Level::Department => None,
            Level::Institute => Some(Level::Department),
            Level::Unit => Some(Level::Institute),
        }
    }
}

/// Row of any level
#[derive(Debug, Clone, Default, PartialEq)]
struct Entry {
    id: String,
    name: String,
    description: String,
    parent_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Lists {
    departments: Vec<Entry>,
    institutes: Vec<Entry>,
    units: Vec<Entry>,
}

impl Lists {
    fn of(&self, level: Level) -> &[Entry] {
        match level {
            Level::Department => &self.departments,
            Level::Institute => &self.institutes,
            Level::Unit => &self.units,
        }
    }

    fn name_of(&self, level: Level, id: &str) -> String {
        self.of(level)
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }
}

async fn load_lists() -> Result<Lists, ApiFailure> {
    let departments = a001_department::api::fetch_all().await?;
    let institutes = a002_institute::api::fetch(None).await?;
    let units = a003_unit::api::fetch(None).await?;
    Ok(Lists {
        departments: departments
            .into_iter()
            .map(|d| Entry {
                id: d.to_string_id(),
                name: d.name,
                description: d.description.unwrap_or_default(),
                parent_id: String::new(),
            })
            .collect(),
        institutes: institutes
            .into_iter()
            .map(|i| Entry {
                id: i.to_string_id(),
                name: i.name,
                description: i.description.unwrap_or_default(),
                parent_id: i.department_id,
            })
            .collect(),
        units: units
            .into_iter()
            .map(|u| Entry {
                id: u.to_string_id(),
                name: u.name,
                description: u.description.unwrap_or_default(),
                parent_id: u.institute_id,
            })
            .collect(),
    })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

async fn save(level: Level, entry: Entry) -> Result<(), ApiFailure> {
    let id = optional(&entry.id);
    match level {
        Level::Department => {
            let dto = DepartmentDto {
                id: id.clone(),
                name: entry.name,
                description: optional(&entry.description),
            };
            match id {
                Some(id) => a001_department::api::update(&id, &dto).await,
                None => a001_department::api::create(&dto).await,
            }
        }
        Level::Institute => {
            let dto = InstituteDto {
                id: id.clone(),
                name: entry.name,
                description: optional(&entry.description),
                department_id: entry.parent_id,
            };
            match id {
                Some(id) => a002_institute::api::update(&id, &dto).await,
                None => a002_institute::api::create(&dto).await,
            }
        }
        Level::Unit => {
            let dto = UnitDto {
                id: id.clone(),
                name: entry.name,
                description: optional(&entry.description),
                institute_id: entry.parent_id,
            };
            match id {
                Some(id) => a003_unit::api::update(&id, &dto).await,
                None => a003_unit::api::create(&dto).await,
            }
        }
    }
}

async fn remove(level: Level, id: &str) -> Result<(), ApiFailure> {
    match level {
        Level::Department => a001_department::api::delete(id).await,
        Level::Institute => a002_institute::api::delete(id).await,
        Level::Unit => a003_unit::api::delete(id).await,
    }
}

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let store = use_categories();
    let lists = RwSignal::new(Lists::default());
    let (error, set_error) = signal::<Option<String>>(None);
    // Level and entry under edit; an empty id is a new entry
    let editing = RwSignal::new(None::<(Level, Entry)>);

    let refresh = move || {
        spawn_local(async move {
            match load_lists().await {
                Ok(loaded) => {
                    lists.set(loaded);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.message())),
            }
            store.reload().await;
        });
    };

    let on_delete = move |level: Level, entry: Entry| {
        let prompt = format!("Delete {} \"{}\"?", level.singular(), entry.name);
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&prompt).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match remove(level, &entry.id).await {
                Ok(()) => refresh(),
                Err(e) => set_error.set(Some(e.message())),
            }
        });
    };

    let can_edit = move || auth_state.get().can_edit();

    let column = move |level: Level| {
        view! {
            <div class="category-column">
                <div class="category-column__header">
                    <h3>{level.title()}</h3>
                    <Show when=can_edit>
                        <button
                            class="button button--icon"
                            title=format!("New {}", level.singular())
                            on:click=move |_| editing.set(Some((level, Entry::default())))
                        >
                            {icon("plus")}
                        </button>
                    </Show>
                </div>
                <ul class="category-list">
                    {move || lists.with(|l| {
                        l.of(level)
                            .iter()
                            .cloned()
                            .map(|entry| {
                                let parent_name = level
                                    .parent()
                                    .map(|p| l.name_of(p, &entry.parent_id))
                                    .unwrap_or_default();
                                let for_edit = entry.clone();
                                let for_delete = entry.clone();
                                view! {
                                    <li class="category-list__item">
                                        <div>
                                            <div class="category-list__name">{entry.name}</div>
                                            <div class="category-list__parent muted">{parent_name}</div>
                                        </div>
                                        <Show when=can_edit>
                                            {
                                                let for_edit = for_edit.clone();
                                                let for_delete = for_delete.clone();
                                                view! {
                                                    <button
                                                        class="button button--icon"
                                                        title="Edit"
                                                        on:click=move |_| editing.set(Some((level, for_edit.clone())))
                                                    >
                                                        {icon("edit")}
                                                    </button>
                                                    <button
                                                        class="button button--icon"
                                                        title="Delete"
                                                        on:click=move |_| on_delete(level, for_delete.clone())
                                                    >
                                                        {icon("delete")}
                                                    </button>
                                                }
                                            }
                                        </Show>
                                    </li>
                                }
                            })
                            .collect_view()
                    })}
                </ul>
            </div>
        }
    };

    let close = Callback::new(move |_| editing.set(None));
    let saved = Callback::new(move |_| {
        editing.set(None);
        refresh();
    });

    refresh();

    view! {
        <div class="content">
            <div class="header">
                <h2>"Categories"</h2>
                <button class="button button--secondary" on:click=move |_| refresh()>
                    {icon("refresh")}
                    "Refresh"
                </button>
            </div>
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
            <div class="category-columns">
                {column(Level::Department)}
                {column(Level::Institute)}
                {column(Level::Unit)}
            </div>
            {move || editing.get().map(|(level, entry)| {
                let title = if entry.id.is_empty() {
                    format!("New {}", level.singular())
                } else {
                    format!("Edit {}", level.singular())
                };
                let parents = level
                    .parent()
                    .map(|p| lists.with_untracked(|l| l.of(p).to_vec()))
                    .unwrap_or_default();
                view! {
                    <Modal title=title on_close=close>
                        <CategoryForm level=level entry=entry parents=parents on_saved=saved on_cancel=close />
                    </Modal>
                }
            })}
        </div>
    }
}

#[component]
fn CategoryForm(
    level: Level,
    entry: Entry,
    parents: Vec<Entry>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(entry);
    let (message, set_message) = signal::<Option<String>>(None);
    let parent_label = level.parent().map(|p| p.singular()).unwrap_or_default();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let entry = form.get_untracked();
        if entry.name.trim().is_empty() {
            set_message.set(Some("Name is required".into()));
            return;
        }
        if level.parent().is_some() && entry.parent_id.is_empty() {
            set_message.set(Some(format!("Select a {}", parent_label)));
            return;
        }
        spawn_local(async move {
            match save(level, entry).await {
                Ok(()) => on_saved.run(()),
                Err(e) => set_message.set(Some(e.message())),
            }
        });
    };

    view! {
        <form class="details-form" on:submit=on_submit>
            {move || message.get().map(|m| view! { <div class="error">{m}</div> })}
            <div class="form__group">
                <label class="form__label">"Name"</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.name = value);
                    }
                />
            </div>
            <div class="form__group">
                <label class="form__label">"Description"</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || form.with(|f| f.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.description = value);
                    }
                />
            </div>
            {level.parent().map(|_| view! {
                <div class="form__group">
                    <label class="form__label">{format!("Parent {}", parent_label)}</label>
                    <select
                        class="form__select"
                        prop:value=move || form.with(|f| f.parent_id.clone())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.parent_id = value);
                        }
                    >
                        <option value="">{format!("Select {}", parent_label)}</option>
                        {parents.iter().map(|p| {
                            let id = p.id.clone();
                            view! {
                                <option
                                    value=p.id.clone()
                                    selected=move || form.with(|f| f.parent_id == id)
                                >
                                    {p.name.clone()}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </div>
            })}
            <div class="form__actions">
                <button class="button button--primary" type="submit">"Save"</button>
                <button class="button button--secondary" type="button" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_levels() {
        assert_eq!(Level::Department.parent(), None);
        assert_eq!(Level::Institute.parent(), Some(Level::Department));
        assert_eq!(Level::Unit.parent(), Some(Level::Institute));
    }

    #[test]
    fn test_name_of_missing_parent_is_blank() {
        let lists = Lists {
            departments: vec![Entry {
                id: "d1".into(),
                name: "Department of Agriculture".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(lists.name_of(Level::Department, "d1"), "Department of Agriculture");
        assert_eq!(lists.name_of(Level::Department, "gone"), "");
    }
}
