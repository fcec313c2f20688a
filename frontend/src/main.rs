mod api;
mod components;
mod session;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatWidget;
use state::WidgetState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    WidgetState::provide(session::session_from_location());

    view! { <ChatWidget /> }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
