//! Pathname templates and the canonical → localized pathname table
//!
//! Templates are absolute paths made of static segments, `[name]` or
//! `{name}` parameters and an optional trailing `[...name]` catch-all:
//!
//! ```
//! use shipfaster_i18n::PathTemplate;
//!
//! let template = PathTemplate::parse("/ai/[websiteName]").unwrap();
//! let params = template.match_path("/ai/chat-gpt").unwrap();
//! assert_eq!(params["websiteName"], "chat-gpt");
//! ```

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Parameter values keyed by name
pub type Params = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

/// A parsed pathname template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse and validate a template.
    pub fn parse(template: &str) -> Result<Self> {
        let body = template
            .strip_prefix('/')
            .ok_or_else(|| I18nError::pathname(template, "must start with '/'"))?;

        let mut segments = Vec::new();
        if !body.is_empty() {
            for part in body.split('/') {
                segments.push(parse_segment(template, part)?);
            }
        }

        let mut seen = BTreeSet::new();
        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Static(_) => {}
                Segment::Param(name) | Segment::CatchAll(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(I18nError::pathname(
                            template,
                            format!("duplicate parameter '{}'", name),
                        ));
                    }
                }
            }
            if matches!(segment, Segment::CatchAll(_)) && index + 1 != segments.len() {
                return Err(I18nError::pathname(template, "catch-all must be the last segment"));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the template's parameters
    pub fn params(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    pub fn is_dynamic(&self) -> bool {
        !self.params().is_empty()
    }

    /// Match a concrete path, returning the raw (still encoded) parameter values.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let body = path.strip_prefix('/')?;
        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };

        let mut params = Params::new();
        let mut index = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if parts.get(index) != Some(&expected.as_str()) {
                        return None;
                    }
                    index += 1;
                }
                Segment::Param(name) => {
                    let value = parts.get(index).filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), value.to_string());
                    index += 1;
                }
                Segment::CatchAll(name) => {
                    let rest = &parts[index.min(parts.len())..];
                    if rest.is_empty() || rest.iter().any(|p| p.is_empty()) {
                        return None;
                    }
                    params.insert(name.clone(), rest.join("/"));
                    index = parts.len();
                }
            }
        }

        (index == parts.len()).then_some(params)
    }

    /// Fill the template with already-encoded values.
    pub fn render(&self, params: &Params) -> Result<String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param(name) | Segment::CatchAll(name) => {
                    let value = params.get(name).ok_or_else(|| I18nError::MissingParam {
                        template: self.raw.clone(),
                        param: name.clone(),
                    })?;
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }

    /// Fill the template with plain values, percent-encoding each segment.
    ///
    /// Catch-all values are split on `/` and encoded piecewise.
    pub fn compile(&self, params: &HashMap<String, String>) -> Result<String> {
        let mut encoded = Params::new();
        for segment in &self.segments {
            match segment {
                Segment::Param(name) => {
                    if let Some(value) = params.get(name) {
                        encoded.insert(name.clone(), urlencoding::encode(value).into_owned());
                    }
                }
                Segment::CatchAll(name) => {
                    if let Some(value) = params.get(name) {
                        let joined = value
                            .trim_matches('/')
                            .split('/')
                            .map(|part| urlencoding::encode(part).into_owned())
                            .collect::<Vec<_>>()
                            .join("/");
                        encoded.insert(name.clone(), joined);
                    }
                }
                Segment::Static(_) => {}
            }
        }
        self.render(&encoded)
    }

    /// Sort key: static templates first, catch-alls last.
    fn specificity(&self) -> (usize, usize, std::cmp::Reverse<usize>) {
        let catch_alls = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::CatchAll(_)))
            .count();
        let params = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count();
        (catch_alls, params, std::cmp::Reverse(self.segments.len()))
    }
}

fn parse_segment(template: &str, part: &str) -> Result<Segment> {
    if part.is_empty() {
        return Err(I18nError::pathname(template, "empty path segment"));
    }

    let (name, catch_all) = if let Some(inner) = part
        .strip_prefix("[...")
        .and_then(|s| s.strip_suffix(']'))
    {
        (inner, true)
    } else if let Some(inner) = part
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| part.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
    {
        (inner, false)
    } else {
        if part.contains(['[', ']', '{', '}']) {
            return Err(I18nError::pathname(
                template,
                format!("malformed parameter segment '{}'", part),
            ));
        }
        return Ok(Segment::Static(part.to_string()));
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(I18nError::pathname(
            template,
            format!("invalid parameter name in '{}'", part),
        ));
    }

    Ok(if catch_all {
        Segment::CatchAll(name.to_string())
    } else {
        Segment::Param(name.to_string())
    })
}

/// Localized side of a pathname entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Localized {
    /// One template for every locale
    Shared(String),
    /// Template per locale code
    PerLocale(BTreeMap<String, String>),
}

/// Pathname map as written in configuration: canonical template → localized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pathnames(BTreeMap<String, Localized>);

impl Pathnames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry shared by every locale
    pub fn shared(mut self, canonical: impl Into<String>, localized: impl Into<String>) -> Self {
        self.0.insert(canonical.into(), Localized::Shared(localized.into()));
        self
    }

    /// Builder-style entry with one template per locale
    pub fn per_locale<I, K, V>(mut self, canonical: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.0.insert(canonical.into(), Localized::PerLocale(map));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Localized)> {
        self.0.iter()
    }
}

/// One compiled pathname entry
#[derive(Debug, Clone)]
pub struct PathnameEntry {
    canonical: PathTemplate,
    shared: Option<PathTemplate>,
    localized: HashMap<String, PathTemplate>,
}

impl PathnameEntry {
    pub fn canonical(&self) -> &PathTemplate {
        &self.canonical
    }

    /// Template shown in the browser for `locale`
    pub fn localized(&self, locale: &str) -> &PathTemplate {
        self.localized
            .get(locale)
            .or(self.shared.as_ref())
            .unwrap_or(&self.canonical)
    }
}

/// Compiled, validated pathname table
#[derive(Debug, Clone, Default)]
pub struct PathnameTable {
    entries: Vec<PathnameEntry>,
}

impl PathnameTable {
    /// Compile a pathname map for the configured locales.
    ///
    /// Every localized template must use exactly the canonical template's
    /// parameters, and per-locale tables must cover exactly `locales`.
    pub fn build(pathnames: &Pathnames, locales: &[String]) -> Result<Self> {
        let mut entries = Vec::with_capacity(pathnames.len());

        for (canonical_raw, localized) in pathnames.iter() {
            let canonical = PathTemplate::parse(canonical_raw)?;
            let expected = canonical.params();

            let check = |template: &PathTemplate, locale: Option<&str>| -> Result<()> {
                let found = template.params();
                if found != expected {
                    return Err(I18nError::pathname(
                        template.as_str(),
                        format!(
                            "parameters {:?}{} differ from canonical '{}' {:?}",
                            found,
                            locale.map(|l| format!(" (locale {})", l)).unwrap_or_default(),
                            canonical_raw,
                            expected
                        ),
                    ));
                }
                Ok(())
            };

            let mut entry = PathnameEntry {
                canonical: canonical.clone(),
                shared: None,
                localized: HashMap::new(),
            };

            match localized {
                Localized::Shared(raw) => {
                    let template = PathTemplate::parse(raw)?;
                    check(&template, None)?;
                    entry.shared = Some(template);
                }
                Localized::PerLocale(map) => {
                    for key in map.keys() {
                        if !locales.contains(key) {
                            return Err(I18nError::pathname(
                                canonical_raw.as_str(),
                                format!("names unconfigured locale '{}'", key),
                            ));
                        }
                    }
                    for locale in locales {
                        let raw = map.get(locale).ok_or_else(|| {
                            I18nError::pathname(
                                canonical_raw.as_str(),
                                format!("no template for locale '{}'", locale),
                            )
                        })?;
                        let template = PathTemplate::parse(raw)?;
                        check(&template, Some(locale))?;
                        entry.localized.insert(locale.clone(), template);
                    }
                }
            }

            entries.push(entry);
        }

        entries.sort_by_key(|e| e.canonical.specificity());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PathnameEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry keyed by its exact canonical template string
    pub fn get(&self, canonical: &str) -> Option<&PathnameEntry> {
        self.entries.iter().find(|e| e.canonical.as_str() == canonical)
    }

    /// Match a concrete path against the canonical templates
    pub fn match_canonical(&self, path: &str) -> Option<(&PathnameEntry, Params)> {
        self.entries
            .iter()
            .find_map(|e| e.canonical.match_path(path).map(|p| (e, p)))
    }

    /// Match a concrete path against `locale`'s localized templates
    pub fn match_localized(&self, locale: &str, path: &str) -> Option<(&PathnameEntry, Params)> {
        self.entries
            .iter()
            .find_map(|e| e.localized(locale).match_path(path).map(|p| (e, p)))
    }
}
