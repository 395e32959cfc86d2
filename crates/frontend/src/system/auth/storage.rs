use web_sys::window;

/// localStorage key of the admin bearer token
pub const TOKEN_KEY: &str = "admin_token";

/// Where the session credential lives between page loads.
pub trait SessionStore {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear(&self);
}

/// Token kept in the browser's localStorage under [`TOKEN_KEY`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSession;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl SessionStore for LocalStorageSession {
    fn token(&self) -> Option<String> {
        get_local_storage()?
            .get_item(TOKEN_KEY)
            .ok()?
            .filter(|t| !t.is_empty())
    }

    fn set_token(&self, token: &str) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    fn clear(&self) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

#[cfg(test)]
pub use memory::MemorySessionStore;
