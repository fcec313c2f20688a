use chat_widget_core::SessionContext;
use log::{info, warn};

/// Query parameter the host page uses to hand over the backend session id.
const SESSION_PARAM: &str = "session";

/// Reads the session id from the page URL once, at startup.
pub fn session_from_location() -> SessionContext {
    let id = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
        .and_then(|params| params.get(SESSION_PARAM))
        .filter(|id| !id.is_empty());

    match id {
        Some(id) => {
            info!("Chat session {id}");
            SessionContext::new(id)
        }
        None => {
            warn!("No `{SESSION_PARAM}` query parameter; chat requests will be rejected");
            SessionContext::new("")
        }
    }
}
