//! Locale context shared by every translated surface.
//!
//! # Design
//! - One resolver instance per app boot, cloned into consumers as a handle.
//! - The active locale changes only through [`LocaleResolver::set_locale`] or
//!   the one-shot [`LocaleResolver::hydrate`].
//! - Persistence sits behind [`LocaleStore`] so browser storage stays out of
//!   native tests.

use super::{DEFAULT_LOCALE, I18nArg, LocaleCode, TranslationBundle};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Errors raised by a [`LocaleStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleStoreError {
    /// Storage is not reachable (private mode, quota disabled).
    #[error("locale storage unavailable")]
    Unavailable,
    /// The write was rejected.
    #[error("failed to persist locale: {0}")]
    Write(String),
}

/// Persistence for the single locale entry.
pub trait LocaleStore {
    /// Read the persisted locale tag, if any.
    fn load(&self) -> Option<String>;

    /// Persist the locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleStoreError`] when the backend rejects the write.
    fn save(&self, tag: &str) -> Result<(), LocaleStoreError>;
}

/// In-memory store used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryLocaleStore {
    value: RefCell<Option<String>>,
    writes: Cell<usize>,
}

impl MemoryLocaleStore {
    /// Store pre-seeded with a persisted tag.
    #[must_use]
    pub fn with_value(tag: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(tag.into())),
            writes: Cell::new(0),
        }
    }

    /// Current persisted tag.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Number of successful writes.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn load(&self) -> Option<String> {
        self.value()
    }

    fn save(&self, tag: &str) -> Result<(), LocaleStoreError> {
        *self.value.borrow_mut() = Some(tag.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl<S: LocaleStore + ?Sized> LocaleStore for Rc<S> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, tag: &str) -> Result<(), LocaleStoreError> {
        (**self).save(tag)
    }
}

#[derive(Debug)]
struct Catalog {
    zh: TranslationBundle,
    en: TranslationBundle,
}

impl Catalog {
    const fn bundle(&self, locale: LocaleCode) -> &TranslationBundle {
        match locale {
            LocaleCode::Zh => &self.zh,
            LocaleCode::En => &self.en,
        }
    }
}

/// Handle to the process-wide locale state.
///
/// Clones share the same state; hand one to each consumer.
#[derive(Clone)]
pub struct LocaleResolver {
    catalog: Rc<Catalog>,
    active: Rc<Cell<LocaleCode>>,
    hydrated: Rc<Cell<bool>>,
    store: Rc<dyn LocaleStore>,
}

impl fmt::Debug for LocaleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("active", &self.active.get())
            .field("hydrated", &self.hydrated.get())
            .finish_non_exhaustive()
    }
}

impl PartialEq for LocaleResolver {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.active, &other.active)
    }
}

impl LocaleResolver {
    /// Resolver over the embedded tables, starting on [`DEFAULT_LOCALE`].
    #[must_use]
    pub fn new(store: impl LocaleStore + 'static) -> Self {
        Self::with_bundles(
            store,
            TranslationBundle::builtin(LocaleCode::Zh).clone(),
            TranslationBundle::builtin(LocaleCode::En).clone(),
        )
    }

    /// Resolver over caller-supplied tables.
    #[must_use]
    pub fn with_bundles(
        store: impl LocaleStore + 'static,
        zh: TranslationBundle,
        en: TranslationBundle,
    ) -> Self {
        Self {
            catalog: Rc::new(Catalog { zh, en }),
            active: Rc::new(Cell::new(DEFAULT_LOCALE)),
            hydrated: Rc::new(Cell::new(false)),
            store: Rc::new(store),
        }
    }

    /// Load the persisted locale once. Absent or unknown tags keep the default.
    pub fn hydrate(&self) -> LocaleCode {
        if self.hydrated.replace(true) {
            return self.active.get();
        }
        match self.store.load() {
            Some(tag) => match LocaleCode::from_lang_tag(&tag) {
                Some(locale) => self.active.set(locale),
                None => tracing::debug!(tag = %tag, "ignoring unsupported persisted locale"),
            },
            None => tracing::trace!("no persisted locale"),
        }
        self.active.get()
    }

    /// Whether [`Self::hydrate`] has run.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.get()
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> LocaleCode {
        self.active.get()
    }

    /// Switch the active table and persist the choice.
    pub fn set_locale(&self, locale: LocaleCode) {
        self.active.set(locale);
        self.hydrated.set(true);
        if let Err(err) = self.store.save(locale.code()) {
            tracing::warn!(locale = locale.code(), error = %err, "locale not persisted");
        }
    }

    /// Bundle for the active locale.
    #[must_use]
    pub fn bundle(&self) -> &TranslationBundle {
        self.catalog.bundle(self.active.get())
    }

    /// Resolve `key` against the active table.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        self.bundle().resolve(key)
    }

    /// Resolve `key` against the active table with interpolation.
    #[must_use]
    pub fn resolve_with(&self, key: &str, args: &[I18nArg]) -> String {
        self.bundle().resolve_with(key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl LocaleStore for BrokenStore {
        fn load(&self) -> Option<String> {
            None
        }

        fn save(&self, _tag: &str) -> Result<(), LocaleStoreError> {
            Err(LocaleStoreError::Unavailable)
        }
    }

    #[test]
    fn defaults_to_english_before_hydrate() {
        let store = Rc::new(MemoryLocaleStore::with_value("zh"));
        let resolver = LocaleResolver::new(Rc::clone(&store));
        assert_eq!(resolver.locale(), LocaleCode::En);
        assert!(!resolver.is_hydrated());
        assert_eq!(resolver.resolve("common.search"), "Search");
    }

    #[test]
    fn hydrate_applies_persisted_locale() {
        let resolver = LocaleResolver::new(MemoryLocaleStore::with_value("zh"));
        assert_eq!(resolver.hydrate(), LocaleCode::Zh);
        assert_eq!(resolver.resolve("common.search"), "搜索");
    }

    #[test]
    fn hydrate_ignores_invalid_tags() {
        let resolver = LocaleResolver::new(MemoryLocaleStore::with_value("klingon"));
        assert_eq!(resolver.hydrate(), LocaleCode::En);
    }

    #[test]
    fn hydrate_runs_once() {
        let store = Rc::new(MemoryLocaleStore::with_value("zh"));
        let resolver = LocaleResolver::new(Rc::clone(&store));
        resolver.hydrate();
        resolver.set_locale(LocaleCode::En);
        assert_eq!(resolver.hydrate(), LocaleCode::En);
    }

    #[test]
    fn set_locale_persists_and_is_shared_by_clones() {
        let store = Rc::new(MemoryLocaleStore::default());
        let resolver = LocaleResolver::new(Rc::clone(&store));
        let consumer = resolver.clone();

        resolver.set_locale(LocaleCode::Zh);
        assert_eq!(consumer.locale(), LocaleCode::Zh);
        assert_eq!(consumer.resolve("search.sort_by"), "排序");
        assert_eq!(store.value().as_deref(), Some("zh"));

        resolver.set_locale(LocaleCode::Zh);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn storage_failures_still_switch_locale() {
        let resolver = LocaleResolver::new(BrokenStore);
        resolver.set_locale(LocaleCode::Zh);
        assert_eq!(resolver.locale(), LocaleCode::Zh);
    }

    #[test]
    fn interpolation_uses_active_table() {
        let resolver = LocaleResolver::new(MemoryLocaleStore::default());
        let args = [I18nArg::new("count", 5)];
        assert_eq!(
            resolver.resolve_with("common.date.days_ago", &args),
            "5 days ago"
        );
    }
}
