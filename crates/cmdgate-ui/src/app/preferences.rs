//! Persistence and environment helpers for the app shell.

use cmdgate_console::{Credential, CredentialStore};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;

use crate::endpoint::resolve_api_base;

pub(crate) const API_KEY_KEY: &str = "cmdgate.api_key";
pub(crate) const API_BASE_KEY: &str = "cmdgate.api_base";

/// Keeps the last-used key in local storage.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStorageCredentials;

impl CredentialStore for LocalStorageCredentials {
    fn load(&self) -> Option<Credential> {
        LocalStorage::get::<String>(API_KEY_KEY)
            .ok()
            .and_then(|value| Credential::parse(&value))
    }

    fn save(&self, credential: &Credential) {
        if let Err(err) = LocalStorage::set(API_KEY_KEY, credential.expose()) {
            log_storage_error("set", API_KEY_KEY, &err.to_string());
        }
    }

    fn clear(&self) {
        LocalStorage::delete(API_KEY_KEY);
    }
}

pub(crate) fn api_base_url() -> String {
    let href = window().location().href().unwrap_or_default();
    let override_base = LocalStorage::get::<String>(API_BASE_KEY).ok();
    resolve_api_base(&href, override_base.as_deref())
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
