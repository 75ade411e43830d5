//! Locale tags and Accept-Language negotiation

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed BCP 47 tag (language, optional script, optional region).
///
/// # Examples
///
/// ```
/// use shipfaster_i18n::Locale;
///
/// let zh = Locale::parse("zh-hans-cn").unwrap();
/// assert_eq!(zh.tag(), "zh-Hans-CN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Language code (ISO 639, e.g. "en", "zh")
    pub language: String,
    /// Optional script (e.g. "Hans")
    pub script: Option<String>,
    /// Optional region (ISO 3166-1 alpha-2 or UN M.49)
    pub region: Option<String>,
}

impl Locale {
    /// Create a locale from a language and optional region.
    pub fn new(language: impl Into<String>, region: Option<impl Into<String>>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            script: None,
            region: region.map(|r| r.into().to_uppercase()),
        }
    }

    /// Parse from a BCP 47 tag (e.g. "en-US", "zh-Hans-CN").
    ///
    /// Underscores are accepted as separators. Unknown subtags (variants,
    /// extensions) are rejected so configured locales stay unambiguous.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.split(['-', '_']);

        let language = parts
            .next()
            .map(str::to_lowercase)
            .filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(|| I18nError::InvalidLocale(tag.to_string()))?;

        let mut script = None;
        let mut region = None;

        for part in parts {
            let alpha = part.chars().all(|c| c.is_ascii_alphabetic());
            match part.len() {
                4 if alpha && script.is_none() && region.is_none() => {
                    script = Some(title_case(part));
                }
                2 if alpha && region.is_none() => {
                    region = Some(part.to_uppercase());
                }
                3 if part.chars().all(|c| c.is_ascii_digit()) && region.is_none() => {
                    region = Some(part.to_string());
                }
                _ => return Err(I18nError::InvalidLocale(tag.to_string())),
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    /// Canonical language tag (e.g. "en-US").
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(ref script) = self.script {
            tag.push('-');
            tag.push_str(script);
        }
        if let Some(ref region) = self.region {
            tag.push('-');
            tag.push_str(region);
        }
        tag
    }

    /// Same locale without its region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: self.script.clone(),
            region: None,
        }
    }

    /// Calculate match score (higher is better).
    ///
    /// - 100: identical tags
    /// - 50: language + region
    /// - 25: language + script
    /// - 10: language only
    /// - 0: different language
    pub fn match_score(&self, other: &Locale) -> u32 {
        if self.language != other.language {
            return 0;
        }
        if self == other {
            return 100;
        }

        let mut score = 10;
        if self.region.is_some() && self.region == other.region {
            score += 40;
        }
        if self.script.is_some() && self.script == other.script {
            score += 15;
        }
        score
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

// ============================================================================
// Accept-Language Parsing
// ============================================================================

#[derive(Debug, Clone)]
struct AcceptLanguageEntry {
    locale: Locale,
    quality: f32,
}

/// Parse an Accept-Language header into locales, highest quality first.
///
/// Wildcards, malformed tags and `q=0` entries are dropped. Entries with the
/// same quality keep their header order.
///
/// ```
/// use shipfaster_i18n::parse_accept_language;
///
/// let locales = parse_accept_language("de-CH,fr;q=0.8,*;q=0.1,en;q=0.9");
/// let tags: Vec<_> = locales.iter().map(|l| l.tag()).collect();
/// assert_eq!(tags, ["de-CH", "en", "fr"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<Locale> {
    let mut entries: Vec<AcceptLanguageEntry> = header
        .split(',')
        .filter_map(|part| {
            let mut split = part.trim().splitn(2, ';');
            let tag = split.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = split
                .next()
                .and_then(|q| q.trim().strip_prefix("q="))
                .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0);
            if quality <= 0.0 {
                return None;
            }

            let locale = Locale::parse(tag).ok()?;
            Some(AcceptLanguageEntry { locale, quality })
        })
        .collect();

    // Stable sort keeps header order for equal weights
    entries.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));

    entries.into_iter().map(|e| e.locale).collect()
}

/// Pick the best available locale for a list of preferences.
///
/// Each preference is tried in order: an exact tag match first, then the
/// closest locale sharing its language.
///
/// ```
/// use shipfaster_i18n::{negotiate_locale, parse_accept_language, Locale};
///
/// let available: Vec<Locale> = ["en", "zh", "de"].iter().map(|t| t.parse().unwrap()).collect();
/// let requested = parse_accept_language("fr-CA,zh-TW;q=0.9,en;q=0.8");
///
/// assert_eq!(negotiate_locale(&requested, &available).unwrap().tag(), "zh");
/// ```
pub fn negotiate_locale<'a>(requested: &[Locale], available: &'a [Locale]) -> Option<&'a Locale> {
    requested.iter().find_map(|req| {
        available
            .iter()
            .find(|a| *a == req)
            .or_else(|| best_match(req, available))
    })
}

/// Highest-scoring available locale for a single preference.
pub fn best_match<'a>(requested: &Locale, available: &'a [Locale]) -> Option<&'a Locale> {
    let mut best: Option<(&Locale, u32)> = None;

    for locale in available {
        let score = locale.match_score(requested);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((locale, score));
        }
    }

    best.map(|(l, _)| l)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales(tags: &[&str]) -> Vec<Locale> {
        tags.iter().map(|t| Locale::parse(t).unwrap()).collect()
    }

    #[test]
    fn test_locale_parse() {
        let en = Locale::parse("en").unwrap();
        assert_eq!(en.language, "en");
        assert!(en.region.is_none());

        let pt_br = Locale::parse("pt_br").unwrap();
        assert_eq!(pt_br.tag(), "pt-BR");

        let zh = Locale::parse("ZH-hans-cn").unwrap();
        assert_eq!(zh.script.as_deref(), Some("Hans"));
        assert_eq!(zh.tag(), "zh-Hans-CN");

        let es_419 = Locale::parse("es-419").unwrap();
        assert_eq!(es_419.region.as_deref(), Some("419"));
    }

    #[test]
    fn test_locale_parse_rejects_garbage() {
        for tag in ["", "e", "english", "en-", "en-US-US", "12", "en-x-private", "de/ch"] {
            assert!(Locale::parse(tag).is_err(), "{} should be rejected", tag);
        }
    }

    #[test]
    fn test_parse_accept_language() {
        let tags: Vec<_> = parse_accept_language("en-US,en;q=0.9,fr;q=0.8")
            .iter()
            .map(Locale::tag)
            .collect();
        assert_eq!(tags, ["en-US", "en", "fr"]);
    }

    #[test]
    fn test_parse_accept_language_drops_wildcard_and_zero_quality() {
        let tags: Vec<_> = parse_accept_language("fr-FR, *;q=0.5, de;q=0, ja;q=bogus")
            .iter()
            .map(Locale::tag)
            .collect();
        assert_eq!(tags, ["fr-FR"]);
    }

    #[test]
    fn test_negotiate_exact_before_language() {
        let available = locales(&["en", "pt", "pt-BR"]);
        let requested = parse_accept_language("pt-BR,en;q=0.5");
        assert_eq!(negotiate_locale(&requested, &available).unwrap().tag(), "pt-BR");

        let requested = parse_accept_language("pt-PT");
        assert_eq!(negotiate_locale(&requested, &available).unwrap().tag(), "pt");
    }

    #[test]
    fn test_negotiate_no_match() {
        let available = locales(&["en", "de"]);
        let requested = parse_accept_language("ko,ar;q=0.5");
        assert!(negotiate_locale(&requested, &available).is_none());
    }

    #[test]
    fn test_match_score() {
        let en_us = Locale::parse("en-US").unwrap();
        let en = Locale::parse("en").unwrap();
        let fr = Locale::parse("fr").unwrap();

        assert_eq!(en_us.match_score(&en_us), 100);
        assert_eq!(en.match_score(&en_us), 10);
        assert_eq!(en_us.match_score(&fr), 0);
    }
}
