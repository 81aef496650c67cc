//! Site configuration.
//!
//! Values default to the public deployment; `DHTSEARCH_API_URL` and
//! `DHTSEARCH_API_KEY` are read at build time, and [`SiteConfig::from_json`]
//! accepts overrides for embedding or tests.

use serde::Deserialize;

/// Key used when no build-time API key is provided.
pub const DEMO_API_KEY: &str = "demo_key_12345";

/// Errors raised while loading configuration overrides.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`SiteConfig`].
    #[error("invalid site configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// Page size outside `1..=max_page_size`.
    #[error("page size {page_size} must be between 1 and {max_page_size}")]
    InvalidPageSize {
        /// Requested page size.
        page_size: u32,
        /// Upper bound accepted by the API.
        max_page_size: u32,
    },
}

/// Static configuration for the web client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name used in titles.
    pub name: String,
    /// API origin; `None` means same origin as the page.
    pub api_base_url: Option<String>,
    /// Key passed as the `api_key` query parameter.
    pub api_key: String,
    /// Results per page (`limit`).
    pub page_size: u32,
    /// Largest `limit` the API accepts.
    pub max_page_size: u32,
    /// Longest keyword accepted from the search box, in characters.
    pub max_keyword_len: usize,
    /// Search page title template; the first `%s` is the search text, the
    /// second the site name.
    pub search_title_template: String,
    /// Local storage key holding the chosen locale.
    pub locale_storage_key: String,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "DHT Search".to_string(),
            api_base_url: option_env!("DHTSEARCH_API_URL").map(str::to_string),
            api_key: option_env!("DHTSEARCH_API_KEY")
                .unwrap_or(DEMO_API_KEY)
                .to_string(),
            page_size: 20,
            max_page_size: 100,
            max_keyword_len: 100,
            search_title_template: "%s - %s".to_string(),
            locale_storage_key: "locale".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse overrides on top of the defaults and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or not an object, or
    /// the page size is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let document: serde_json::Value = serde_json::from_str(raw)?;
        if !document.is_object() {
            return Err(ConfigError::Parse(serde::de::Error::custom(
                "site configuration must be a JSON object",
            )));
        }
        let config: Self = serde_json::from_value(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPageSize`] when the page size is zero or
    /// exceeds the maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > self.max_page_size {
            return Err(ConfigError::InvalidPageSize {
                page_size: self.page_size,
                max_page_size: self.max_page_size,
            });
        }
        Ok(())
    }

    /// Fill the search title template.
    #[must_use]
    pub fn search_title(&self, text: &str) -> String {
        self.search_title_template
            .replacen("%s", text, 1)
            .replacen("%s", &self.name, 1)
    }

    /// API origin with any trailing slash removed.
    #[must_use]
    pub fn api_origin(&self) -> Option<&str> {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_deployment() {
        let config = SiteConfig::default();
        assert_eq!(config.name, "DHT Search");
        assert_eq!(config.page_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_merge_with_defaults() {
        let config =
            SiteConfig::from_json(r#"{"page_size": 50, "api_base_url": "https://api.test/"}"#)
                .unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.api_origin(), Some("https://api.test"));
    }

    #[test]
    fn out_of_range_page_size_is_rejected() {
        let err = SiteConfig::from_json(r#"{"page_size": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPageSize { page_size: 0, .. }));
        assert!(SiteConfig::from_json(r#"{"page_size": 101}"#).is_err());
        assert!(matches!(
            SiteConfig::from_json("[]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        for raw in ["[]", "null", "42", r#""text""#] {
            assert!(
                matches!(SiteConfig::from_json(raw), Err(ConfigError::Parse(_))),
                "{raw} accepted"
            );
        }
        assert!(SiteConfig::from_json("{}").is_ok());
    }

    #[test]
    fn locale_key_matches_existing_deployments() {
        assert_eq!(SiteConfig::default().locale_storage_key, "locale");
    }

    #[test]
    fn search_title_fills_both_slots() {
        let config = SiteConfig::default();
        assert_eq!(config.search_title("ubuntu"), "ubuntu - DHT Search");
    }
}
