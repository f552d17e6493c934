//! Nitrogen Budget Dashboard - WASM entry point

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use nbudget_components::Dashboard;
use nbudget_http::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use nbudget_state::provide_app_state;
use tracing_subscriber::prelude::*;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

fn main() {
    console_error_panic_hook::set_once();

    let wasm_layer = WASMLayer::new(
        WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
    tracing_subscriber::registry().with(wasm_layer).init();

    tracing::info!("starting nitrogen budget dashboard");
    mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    provide_meta_context();
    provide_app_state();

    let api = ApiConfig::new(DEFAULT_BASE_URL).timeout(DEFAULT_TIMEOUT_MS);

    view! {
        <Title text="Nitrogen Budget Dashboard" />
        <Dashboard api=api />
    }
}
