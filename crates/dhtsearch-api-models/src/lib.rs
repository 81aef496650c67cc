#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the DHT Search public API.
//!
//! The web client decodes these types straight from the search endpoint, so the
//! field names and defaults mirror what the server emits. Numeric fields are
//! decoded leniently because the backend occasionally serialises database
//! decimals as strings.

use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Length of a hex-encoded v1 info-hash.
pub const INFO_HASH_HEX_LEN: usize = 40;

/// Errors produced while validating an [`InfoHash`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InfoHashError {
    /// Value did not contain exactly 40 characters.
    #[error("info hash must be {INFO_HASH_HEX_LEN} characters, got {0}")]
    Length(usize),
    /// Value contained a character outside `[0-9a-fA-F]`.
    #[error("info hash contains non-hex character {0:?}")]
    NonHex(char),
}

/// Content identifier of a torrent: 40 hex characters, normalised to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InfoHash(String);

impl InfoHash {
    /// Validate and normalise a raw hex string.
    ///
    /// # Errors
    ///
    /// Returns [`InfoHashError`] when the value is not 40 hex characters.
    pub fn parse(raw: &str) -> Result<Self, InfoHashError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len != INFO_HASH_HEX_LEN {
            return Err(InfoHashError::Length(len));
        }
        if let Some(bad) = trimmed.chars().find(|ch| !ch.is_ascii_hexdigit()) {
            return Err(InfoHashError::NonHex(bad));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Lowercase hex representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InfoHash {
    type Err = InfoHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for InfoHash {
    type Error = InfoHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InfoHash> for String {
    fn from(value: InfoHash) -> Self {
        value.0
    }
}

/// Result ordering accepted by `GET /api/search`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Time,
    /// Best swarm health first.
    Health,
    /// Most requested first.
    Hot,
    /// Largest payload first.
    Size,
    /// Full-text relevance.
    Relevance,
}

impl SortKey {
    /// All sort keys in the order the sort menu lists them.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Time,
            Self::Health,
            Self::Hot,
            Self::Size,
            Self::Relevance,
        ]
    }

    /// Query-string value for the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Health => "health",
            Self::Hot => "hot",
            Self::Size => "size",
            Self::Relevance => "relevance",
        }
    }

    /// Parse a query-string value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|key| key.as_str() == lowered)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One torrent row in a search result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentSummary {
    /// Content identifier.
    pub info_hash: InfoHash,
    /// Display name.
    pub name: String,
    /// Payload size in bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_size: u64,
    /// Number of files in the torrent.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_count: u64,
    /// Swarm health score in the range 0-100.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub health_score: f64,
    /// Whether the payload contains video files.
    #[serde(default)]
    pub has_video: bool,
    /// Whether the payload contains audio files.
    #[serde(default)]
    pub has_audio: bool,
    /// First-seen timestamp as emitted by the server.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of a successful `GET /api/search` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Rows for the requested page. Rows that fail to decode are skipped.
    #[serde(default, deserialize_with = "skip_invalid_rows")]
    pub results: Vec<TorrentSummary>,
    /// Total number of matches across all pages.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
    /// Page echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of pages for the requested page size.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_pages: u64,
    /// Keyword echoed back by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    /// Error detail; either plain text or a structured object.
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

impl ErrorBody {
    /// Human-readable message carried by the body, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let message = match self.detail.as_ref()? {
            ErrorDetail::Text(text) => text.as_str(),
            ErrorDetail::Structured(detail) => detail.message.as_deref()?,
            ErrorDetail::Other(_) => return None,
        };
        let message = message.trim();
        (!message.is_empty()).then_some(message)
    }
}

/// Shape of the `detail` field in an error body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain message, e.g. `"rate limited"`.
    Text(String),
    /// Object with a `message` field, e.g. banned-keyword rejections.
    Structured(StructuredDetail),
    /// Anything else (validation arrays, numbers).
    Other(IgnoredAny),
}

/// Structured error detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StructuredDetail {
    /// Machine-readable error code.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Optional category of the rejection.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeRow {
    Row(TorrentSummary),
    Invalid(IgnoredAny),
}

fn skip_invalid_rows<'de, D>(deserializer: D) -> Result<Vec<TorrentSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<MaybeRow>>::deserialize(deserializer)?.unwrap_or_default();
    let total = rows.len();
    let valid: Vec<TorrentSummary> = rows
        .into_iter()
        .filter_map(|row| match row {
            MaybeRow::Row(row) => Some(row),
            MaybeRow::Invalid(_) => None,
        })
        .collect();
    if valid.len() < total {
        tracing::warn!(
            skipped = total - valid.len(),
            kept = valid.len(),
            "skipping undecodable search rows"
        );
    }
    Ok(valid)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Unsigned(value)) => value,
        Some(NumberOrText::Float(value)) => float_to_u64(value),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(float_to_u64))
                .unwrap_or(0)
        }
        None => 0,
    };
    Ok(value)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        #[allow(clippy::cast_precision_loss)]
        Some(NumberOrText::Unsigned(value)) => value as f64,
        Some(NumberOrText::Float(value)) if value.is_finite() => value,
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0),
        Some(NumberOrText::Float(_)) | None => 0.0,
    };
    Ok(value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}
