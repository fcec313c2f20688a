use chat_widget_core::Message;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::state::WidgetState;

/// Floating chat panel: history, typing indicator and input.
#[component]
pub fn ChatWidget() -> impl IntoView {
    let state = expect_context::<WidgetState>();
    let list_ref = NodeRef::<html::Div>::new();
    let message_count = state.message_count;

    // Keep the newest entry in view.
    Effect::new(move |_| {
        message_count.track();
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    view! {
        <div class="chat-widget">
            <div class="chat-header">"Flight log assistant"</div>

            <div class="messages-container" node_ref=list_ref>
                {move || {
                    (message_count.get() == 0).then(|| {
                        view! {
                            <div class="empty-state">"Ask a question about your flight"</div>
                        }
                    })
                }}
                // Positional keys: entries are only ever appended.
                <For
                    each=move || {
                        message_count.track();
                        state.messages_untracked()
                    }
                    key=|(index, _)| *index
                    children=move |(_, message)| view! { <MessageBubble message /> }
                />
                <Show when=move || state.is_busy()>
                    <div class="message bot typing">"Thinking…"</div>
                </Show>
            </div>

            <ChatInput />
        </div>
    }
}

/// A single chat message bubble.
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let css_class = format!("message {}", message.role());

    view! {
        <div class=css_class>
            <div>{message.content().to_string()}</div>
        </div>
    }
}

/// Draft textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<WidgetState>();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            state.submit();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="1"
                    placeholder="Type a message… (Enter to send, Shift+Enter for newline)"
                    prop:value=move || state.draft()
                    on:input=move |ev| state.set_draft(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=move || state.is_busy()
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.submit()
                    disabled=move || !state.can_submit()
                >
                    {move || if state.is_busy() { "Sending…" } else { "Send" }}
                </button>
            </div>
        </div>
    }
}
