//! Lightweight JSON-backed translations with per-locale bundles.

mod resolver;

pub use resolver::{LocaleResolver, LocaleStore, LocaleStoreError, MemoryLocaleStore};

use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::LazyLock;

/// Supported locale codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// Chinese (Simplified), the primary locale.
    Zh,
    /// English, the secondary locale.
    En,
}

impl LocaleCode {
    #[must_use]
    /// All supported locales in display order.
    pub const fn all() -> [Self; 2] {
        [Self::Zh, Self::En]
    }

    /// Two-letter tag persisted in storage.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Translation key holding the locale's switcher label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Zh => "locale.zh",
            Self::En => "locale.en",
        }
    }

    /// Map an arbitrary language tag to a supported locale, falling back to None.
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let base = lowered.split(['-', '_']).next().unwrap_or_default();
        Self::all()
            .iter()
            .copied()
            .find(|locale| locale.code() == base)
    }
}

/// Default locale used until persisted state is loaded.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::En;

/// Named interpolation parameter for [`TranslationBundle::resolve_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct I18nArg {
    name: &'static str,
    value: String,
}

impl I18nArg {
    /// Capture the display form of `value` under `name`.
    #[must_use]
    pub fn new(name: &'static str, value: impl Display) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// Translation bundle containing a parsed JSON tree for the locale.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Locale backing this bundle.
    pub locale: LocaleCode,
    tree: Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale && self.tree == other.tree
    }
}

impl TranslationBundle {
    /// Build the embedded bundle for `locale`.
    ///
    /// A table that fails to parse degrades to an empty tree so every lookup
    /// returns its key.
    #[must_use]
    pub fn new(locale: LocaleCode) -> Self {
        Self::from_json(locale, raw_locale(locale))
    }

    /// Build a bundle from an arbitrary JSON document.
    #[must_use]
    pub fn from_json(locale: LocaleCode, raw: &str) -> Self {
        let tree = serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(locale = locale.code(), error = %err, "translation table failed to parse");
            Value::Null
        });
        Self { locale, tree }
    }

    /// Shared embedded bundle for `locale`.
    #[must_use]
    pub fn builtin(locale: LocaleCode) -> &'static Self {
        match locale {
            LocaleCode::Zh => &ZH_BUNDLE,
            LocaleCode::En => &EN_BUNDLE,
        }
    }

    /// Resolve a dotted path (`section.key`); a miss returns the key itself.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        lookup(&self.tree, key).map_or_else(|| key.to_string(), ToString::to_string)
    }

    /// Resolve a dotted path and substitute `{name}` / `{{name}}` placeholders.
    #[must_use]
    pub fn resolve_with(&self, key: &str, args: &[I18nArg]) -> String {
        lookup(&self.tree, key).map_or_else(
            || key.to_string(),
            |template| interpolate(template, args),
        )
    }
}

static ZH_BUNDLE: LazyLock<TranslationBundle> =
    LazyLock::new(|| TranslationBundle::new(LocaleCode::Zh));
static EN_BUNDLE: LazyLock<TranslationBundle> =
    LazyLock::new(|| TranslationBundle::new(LocaleCode::En));

fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a str> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str()
}

fn interpolate(template: &str, args: &[I18nArg]) -> String {
    let mut output = template.to_string();
    for arg in args {
        // Double braces first so `{{name}}` never leaves a stray pair behind.
        output = output.replace(&format!("{{{{{}}}}}", arg.name), &arg.value);
        output = output.replace(&format!("{{{}}}", arg.name), &arg.value);
    }
    output
}

const fn raw_locale(locale: LocaleCode) -> &'static str {
    match locale {
        LocaleCode::Zh => include_str!("../../i18n/zh.json"),
        LocaleCode::En => include_str!("../../i18n/en.json"),
    }
}
