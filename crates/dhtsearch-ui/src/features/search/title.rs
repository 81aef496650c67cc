//! Document title for the search page.

use crate::config::SiteConfig;
use crate::i18n::{I18nArg, LocaleResolver};

/// Title for the search page.
///
/// Empty keywords show the bare site name. Otherwise the title reads
/// `seo.search_results_for` once results are known and `seo.searching_for`
/// before, wrapped in the site's title template.
#[must_use]
pub fn page_title(
    keyword: &str,
    total_count: u64,
    locale: &LocaleResolver,
    site: &SiteConfig,
) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return site.name.clone();
    }
    let args = [
        I18nArg::new("keyword", keyword),
        I18nArg::new("count", format_count(total_count)),
    ];
    let text = if total_count > 0 {
        locale.resolve_with("seo.search_results_for", &args)
    } else {
        locale.resolve_with("seo.searching_for", &args)
    };
    site.search_title(&text)
}

/// Group digits in threes: `1234567` becomes `1,234,567`.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LocaleCode, MemoryLocaleStore};

    fn locale() -> LocaleResolver {
        LocaleResolver::new(MemoryLocaleStore::default())
    }

    #[test]
    fn empty_keyword_is_site_name() {
        assert_eq!(
            page_title("  ", 10, &locale(), &SiteConfig::default()),
            "DHT Search"
        );
    }

    #[test]
    fn results_title_mentions_keyword_and_count() {
        let title = page_title("ubuntu", 134, &locale(), &SiteConfig::default());
        assert_eq!(title, "ubuntu - 134 results - DHT Search");
    }

    #[test]
    fn pending_title_omits_count() {
        let title = page_title("ubuntu", 0, &locale(), &SiteConfig::default());
        assert_eq!(title, "Searching for ubuntu - DHT Search");
    }

    #[test]
    fn title_follows_active_locale() {
        let resolver = locale();
        resolver.set_locale(LocaleCode::Zh);
        let title = page_title("ubuntu", 1_500, &resolver, &SiteConfig::default());
        assert!(title.contains("ubuntu"));
        assert!(title.contains("1,500"));
        assert!(title.ends_with("DHT Search"));
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
