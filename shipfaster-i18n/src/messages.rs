//! Message catalogues
//!
//! One JSON file per locale (`messages/en.json`, `messages/de.json`, ...).
//! Nested objects are addressed with dotted keys, so
//! `{"Navigation": {"explore": "Explore"}}` provides `Navigation.explore`.

use crate::{I18nError, Locale, Result};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Messages for a single locale.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    /// Flattened messages keyed by dotted path
    messages: HashMap<String, String>,
    /// Original nested tree, handed to the client-side provider as is
    tree: Map<String, Value>,
}

impl MessageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(tree) = value else {
            return Err(I18nError::ParseError("message file must contain an object".into()));
        };

        let mut messages = HashMap::new();
        flatten("", &tree, &mut messages);
        Ok(Self { messages, tree })
    }

    /// Add a message under a dotted key.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let key = key.into();
        let message = message.into();

        let mut node = &mut self.tree;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                node.insert(part.to_string(), Value::String(message.clone()));
                break;
            }
            let slot = node
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(map) => node = map,
                _ => break,
            }
        }

        self.messages.insert(key, message);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.messages.keys()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Nested message tree
    pub fn to_value(&self) -> Value {
        Value::Object(self.tree.clone())
    }
}

fn flatten(prefix: &str, tree: &Map<String, Value>, out: &mut HashMap<String, String>) {
    for (key, value) in tree {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::String(s) => {
                out.insert(path, s.clone());
            }
            Value::Number(_) | Value::Bool(_) => {
                out.insert(path, value.to_string());
            }
            Value::Object(nested) => flatten(&path, nested, out),
            Value::Array(_) | Value::Null => {}
        }
    }
}

/// Bundles for every loaded locale.
#[derive(Debug, Default)]
pub struct Messages {
    /// Bundles keyed by locale tag
    bundles: HashMap<String, MessageBundle>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bundle(&mut self, locale: &Locale, bundle: MessageBundle) {
        self.bundles.insert(locale.tag(), bundle);
    }

    /// Bundle for a locale, falling back to its language-only form.
    pub fn get_bundle(&self, locale: &Locale) -> Option<&MessageBundle> {
        self.bundles.get(&locale.tag()).or_else(|| {
            locale
                .region
                .as_ref()
                .and_then(|_| self.bundles.get(&locale.language_only().tag()))
        })
    }

    pub fn locales(&self) -> impl Iterator<Item = &String> {
        self.bundles.keys()
    }

    /// Load every `*.json` file in `dir`, named by locale.
    ///
    /// Returns the number of bundles loaded.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut loaded = 0;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| I18nError::ParseError(format!("invalid file name {:?}", path)))?;
            let locale = Locale::parse(stem)?;
            let content = fs::read_to_string(&path)?;
            let bundle = MessageBundle::from_json(&content)
                .map_err(|e| I18nError::ParseError(format!("{}: {}", path.display(), e)))?;

            debug!(locale = %locale, messages = bundle.len(), "Loaded message bundle");
            self.add_bundle(&locale, bundle);
            loaded += 1;
        }

        Ok(loaded)
    }
}

/// Thread-safe translator with default-locale fallback.
#[derive(Clone)]
pub struct I18n {
    messages: Arc<RwLock<Messages>>,
    default_locale: Locale,
}

impl I18n {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Messages::new())),
            default_locale,
        }
    }

    /// Load message files from a directory.
    pub fn load_from_dir(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.messages.write().load_from_dir(dir)?;
        Ok(self)
    }

    /// Add (or replace) a bundle.
    pub fn add_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        self.messages.write().add_bundle(locale, bundle);
    }

    /// Add a bundle unless one is already loaded for the locale.
    pub fn add_bundle_if_missing(&self, locale: &Locale, bundle: MessageBundle) -> bool {
        let mut messages = self.messages.write();
        if messages.bundles.contains_key(&locale.tag()) {
            return false;
        }
        messages.add_bundle(locale, bundle);
        true
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Translate a key: locale, then default locale, then the key itself.
    pub fn t(&self, key: &str, locale: &Locale) -> String {
        let messages = self.messages.read();

        let found = messages
            .get_bundle(locale)
            .and_then(|b| b.get(key))
            .or_else(|| {
                messages
                    .get_bundle(&self.default_locale)
                    .and_then(|b| b.get(key))
            });

        match found {
            Some(msg) => msg.to_string(),
            None => {
                warn!(key, locale = %locale, "Missing message");
                key.to_string()
            }
        }
    }

    /// Translate and replace `{name}` placeholders.
    pub fn t_args(&self, key: &str, locale: &Locale, args: &[(&str, &str)]) -> String {
        let mut result = self.t(key, locale);
        for (name, value) in args {
            result = result.replace(&format!("{{{}}}", name), value);
        }
        result
    }

    pub fn has(&self, key: &str, locale: &Locale) -> bool {
        self.messages
            .read()
            .get_bundle(locale)
            .is_some_and(|b| b.has(key))
    }

    /// Message tree for a locale, filled in from the default locale.
    ///
    /// This is the payload handed to the client-side provider.
    pub fn messages_json(&self, locale: &Locale) -> Value {
        let messages = self.messages.read();
        let mut tree = messages
            .get_bundle(&self.default_locale)
            .map(MessageBundle::to_value)
            .unwrap_or_else(|| Value::Object(Map::new()));

        if let Some(bundle) = messages.get_bundle(locale) {
            overlay(&mut tree, bundle.to_value());
        }
        tree
    }
}

fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
