use leptos::prelude::*;

use super::storage::{LocalStorageSession, SessionStore};
use crate::shared::navigation::{Navigator, RouterNavigator, LOGIN_ROUTE};

/// Sends the user to the login route when no credential is stored.
/// Returns whether the protected content may render.
pub fn enforce_session(store: &impl SessionStore, navigator: &impl Navigator) -> bool {
    if store.token().is_some() {
        return true;
    }
    log::info!("No session credential, redirecting to login");
    navigator.navigate(LOGIN_ROUTE);
    false
}

/// Renders children only with a stored credential
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let allowed = LocalStorageSession.token().is_some();
    let navigator = RouterNavigator::new();

    Effect::new(move |_| {
        enforce_session(&LocalStorageSession, &navigator);
    });

    view! {
        <Show when=move || allowed>
            {children()}
        </Show>
    }
}
