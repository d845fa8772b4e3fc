use contracts::shared::validation::ErrorMap;
use leptos::prelude::*;

/// Message for `field`, shown under the input
#[component]
pub fn FieldError(errors: Signal<ErrorMap>, field: &'static str) -> impl IntoView {
    view! {
        {move || errors.get().get(field).cloned().map(|message| view! {
            <div class="field-error">{message}</div>
        })}
    }
}
