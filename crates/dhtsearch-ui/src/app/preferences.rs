//! Persistence and environment helpers for the app shell.

use crate::config::SiteConfig;
use crate::i18n::{LocaleStore, LocaleStoreError};
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;

/// Locale persisted in `localStorage` under the configured key.
pub(crate) struct BrowserLocaleStore {
    key: String,
}

impl BrowserLocaleStore {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl LocaleStore for BrowserLocaleStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get::<String>(&self.key).ok()
    }

    fn save(&self, tag: &str) -> Result<(), LocaleStoreError> {
        LocalStorage::set(&self.key, tag).map_err(|err| LocaleStoreError::Write(err.to_string()))
    }
}

/// API origin: the configured one, else the page's own origin.
pub(crate) fn api_base_url(site: &SiteConfig) -> String {
    site.api_origin().map_or_else(
        || window().location().origin().unwrap_or_default(),
        str::to_string,
    )
}
