//! Region search by name

use crate::controller::use_controller;
use leptos::prelude::*;

#[component]
pub fn SearchBox(#[prop(optional, into)] placeholder: Option<String>) -> impl IntoView {
    let controller = use_controller();
    let query = RwSignal::new(String::new());
    let placeholder = placeholder.unwrap_or_else(|| "Search region...".to_string());

    let submit = {
        let controller = controller.clone();
        move || controller.search(&query.get_untracked())
    };
    let on_key = {
        let submit = submit.clone();
        move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Enter" {
                submit();
            }
        }
    };

    view! {
        <div class="search-box">
            <input
                id="search-input"
                type="text"
                placeholder=placeholder
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
                on:keydown=on_key
            />
            <button class="search-button" on:click=move |_| submit()>
                "Search"
            </button>
        </div>
    }
}
