//! Display helpers for torrent rows.

use crate::i18n::{I18nArg, LocaleResolver};
use chrono::{DateTime, NaiveDateTime, Utc};
use dhtsearch_api_models::InfoHash;

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Timestamp layout emitted by the search API.
const SERVER_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Size label with two decimals: GB from 1 GiB upwards, MB below.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let (unit, label) = if bytes >= GIB { (GIB, "GB") } else { (MIB, "MB") };
    let hundredths = (u128::from(bytes) * 100 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{:02} {label}", hundredths / 100, hundredths % 100)
}

/// Colour band for a health score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTone {
    /// 70 and above.
    Good,
    /// 40 to 70.
    Fair,
    /// Below 40.
    Poor,
}

impl HealthTone {
    /// Band for `score`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// CSS modifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Score rounded to a whole number; unknown (zero) scores read `-`.
#[must_use]
pub fn health_label(score: f64) -> String {
    if score > 0.0 {
        format!("{score:.0}")
    } else {
        "-".to_string()
    }
}

/// `magnet:` URI for a torrent.
#[must_use]
pub fn magnet_link(hash: &InfoHash) -> String {
    format!("magnet:?xt=urn:btih:{hash}")
}

/// Detail page path, remembering the keyword the user came from.
#[must_use]
pub fn detail_path(hash: &InfoHash, keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        format!("/torrent/{hash}")
    } else {
        format!("/torrent/{hash}?from={}", urlencoding::encode(keyword))
    }
}

/// Age bucket of a first-seen timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeDate {
    /// Same day, or in the future.
    Today,
    /// One day ago.
    Yesterday,
    /// 2 to 6 days ago.
    DaysAgo(i64),
    /// 1 to 4 weeks ago.
    WeeksAgo(i64),
    /// 1 to 12 months ago.
    MonthsAgo(i64),
    /// A year or more ago.
    YearsAgo(i64),
    /// Missing or unparseable timestamp.
    Unknown,
}

impl RelativeDate {
    /// Bucket `created_at` relative to `now`.
    ///
    /// Accepts the server's `YYYY-MM-DD HH:MM:SS` (UTC) and RFC 3339.
    #[must_use]
    pub fn from_timestamp(created_at: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(then) = created_at.and_then(parse_timestamp) else {
            return Self::Unknown;
        };
        let days = (now - then).num_days();
        match days {
            i64::MIN..=0 => Self::Today,
            1 => Self::Yesterday,
            2..=6 => Self::DaysAgo(days),
            7..=29 => Self::WeeksAgo(days / 7),
            30..=364 => Self::MonthsAgo(days / 30),
            _ => Self::YearsAgo(days / 365),
        }
    }

    /// Translated label.
    #[must_use]
    pub fn label(self, locale: &LocaleResolver) -> String {
        let counted = |key: &str, count: i64| {
            locale.resolve_with(key, &[I18nArg::new("count", count)])
        };
        match self {
            Self::Today => locale.resolve("common.date.today"),
            Self::Yesterday => locale.resolve("common.date.yesterday"),
            Self::DaysAgo(count) => counted("common.date.days_ago", count),
            Self::WeeksAgo(count) => counted("common.date.weeks_ago", count),
            Self::MonthsAgo(count) => counted("common.date.months_ago", count),
            Self::YearsAgo(count) => counted("common.date.years_ago", count),
            Self::Unknown => locale.resolve("common.date.unknown"),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, SERVER_TIMESTAMP)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|parsed| parsed.with_timezone(&Utc)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LocaleCode, MemoryLocaleStore};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn hash() -> InfoHash {
        InfoHash::parse("ABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap()
    }

    #[test]
    fn sizes_switch_units_at_one_gib() {
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(512 * 1024), "0.50 MB");
        assert_eq!(format_size(GIB - MIB), "1023.00 MB");
        assert_eq!(format_size(GIB), "1.00 GB");
        assert_eq!(format_size(6_114_656_256), "5.69 GB");
    }

    #[test]
    fn health_bands() {
        assert_eq!(HealthTone::from_score(87.5), HealthTone::Good);
        assert_eq!(HealthTone::from_score(70.0), HealthTone::Good);
        assert_eq!(HealthTone::from_score(40.0), HealthTone::Fair);
        assert_eq!(HealthTone::from_score(12.0), HealthTone::Poor);
        assert_eq!(health_label(0.0), "-");
        assert_eq!(health_label(87.6), "88");
    }

    #[test]
    fn links_use_lowercase_hash() {
        assert_eq!(
            magnet_link(&hash()),
            "magnet:?xt=urn:btih:abcdef0123456789abcdef0123456789abcdef01"
        );
        assert_eq!(
            detail_path(&hash(), "big buck"),
            "/torrent/abcdef0123456789abcdef0123456789abcdef01?from=big%20buck"
        );
        assert!(!detail_path(&hash(), " ").contains('?'));
    }

    #[test]
    fn dates_bucket_by_age() {
        let at = |raw: &str| RelativeDate::from_timestamp(Some(raw), now());
        assert_eq!(at("2024-06-01 08:00:00"), RelativeDate::Today);
        assert_eq!(at("2024-05-31 10:00:00"), RelativeDate::Yesterday);
        assert_eq!(at("2024-05-28T12:00:00Z"), RelativeDate::DaysAgo(4));
        assert_eq!(at("2024-05-11 12:00:00"), RelativeDate::WeeksAgo(3));
        assert_eq!(at("2024-02-01 12:00:00"), RelativeDate::MonthsAgo(4));
        assert_eq!(at("2021-06-01 12:00:00"), RelativeDate::YearsAgo(3));
        assert_eq!(at("2099-01-01 00:00:00"), RelativeDate::Today);
        assert_eq!(at("yesterday-ish"), RelativeDate::Unknown);
        assert_eq!(
            RelativeDate::from_timestamp(None, now()),
            RelativeDate::Unknown
        );
    }

    #[test]
    fn date_labels_are_translated() {
        let locale = LocaleResolver::new(MemoryLocaleStore::default());
        assert_eq!(RelativeDate::DaysAgo(3).label(&locale), "3 days ago");
        locale.set_locale(LocaleCode::Zh);
        assert_eq!(RelativeDate::Yesterday.label(&locale), "昨天");
        assert_eq!(RelativeDate::WeeksAgo(2).label(&locale), "2 周前");
    }
}
