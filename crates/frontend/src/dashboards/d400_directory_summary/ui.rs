use contracts::dashboards::d400_directory_summary::{CountRow, DirectorySummaryResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;

#[component]
fn Tile(label: &'static str, #[prop(into)] value: Signal<u64>) -> impl IntoView {
    view! {
        <div class="summary-tile">
            <div class="summary-tile__value">{move || value.get()}</div>
            <div class="summary-tile__label">{label}</div>
        </div>
    }
}

#[component]
fn Breakdown(title: &'static str, rows: Vec<CountRow>, total: u64) -> impl IntoView {
    view! {
        <div class="summary-breakdown">
            <h3>{title}</h3>
            <table class="table__data">
                <tbody>
                    {rows.into_iter().map(|row| {
                        let share = if total == 0 { 0.0 } else { row.count as f64 * 100.0 / total as f64 };
                        view! {
                            <tr class="table__row">
                                <td class="table__cell">{row.label}</td>
                                <td class="table__cell table__cell--number">{row.count}</td>
                                <td class="table__cell table__cell--number">{format!("{:.0}%", share)}</td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

/// Landing page: counts of contacts, categories and users
#[component]
pub fn DirectorySummary() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (data, set_data) = signal(None::<DirectorySummaryResponse>);
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::get_directory_summary().await {
                Ok(summary) => {
                    set_data.set(Some(summary));
                    set_error.set(None);
                }
                Err(e) => {
                    log::error!("Failed to load directory summary: {}", e.message());
                    set_error.set(Some(e.message()));
                }
            }
            set_loading.set(false);
        });
    };

    let field = move |pick: fn(&DirectorySummaryResponse) -> u64| {
        Signal::derive(move || data.with(|d| d.as_ref().map(pick).unwrap_or(0)))
    };

    load();

    view! {
        <div class="content">
            <div class="header">
                <h2>"Dashboard"</h2>
                <div class="header__actions">
                    <button class="button button--secondary" on:click=move |_| ctx.open("a004_contact")>
                        {icon("contact")}
                        "Open directory"
                    </button>
                    <button class="button button--secondary" on:click=move |_| load() disabled=move || loading.get()>
                        {icon("refresh")}
                        "Refresh"
                    </button>
                </div>
            </div>
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
            <div class="summary-tiles">
                <Tile label="Contacts" value=field(|d| d.total_contacts) />
                <Tile label="Active" value=field(|d| d.status_count("Active")) />
                <Tile label="Departments" value=field(|d| d.departments) />
                <Tile label="Institutes" value=field(|d| d.institutes) />
                <Tile label="Units" value=field(|d| d.units) />
                <Tile label="Users" value=field(|d| d.users) />
            </div>
            {move || data.get().map(|d| {
                let total = d.total_contacts;
                view! {
                    <div class="summary-breakdowns">
                        <Breakdown title="By status" rows=d.by_status total=total />
                        <Breakdown title="By type" rows=d.by_type total=total />
                    </div>
                }
            })}
        </div>
    }
}
