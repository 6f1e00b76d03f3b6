//! src/i18n/mod.rs
//!
//! Locale tables for command metadata. Each `<locale>.json` file under the
//! locales directory holds a (possibly nested) JSON object; nested keys are
//! addressed with dot paths such as `cmd.ping.description`.
//!
//! Lookups never fail: a missing `(locale, key)` falls back to the base
//! locale, and a key missing there too comes back verbatim.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Error;

pub const BASE_LOCALE: &str = "en-US";

static GLOBAL: OnceCell<Arc<I18n>> = OnceCell::new();

/// Install the process-wide resolver. The first call wins; returns whether
/// this call installed it.
pub fn init(i18n: Arc<I18n>) -> bool {
    GLOBAL.set(i18n).is_ok()
}

pub fn global() -> Option<Arc<I18n>> {
    GLOBAL.get().cloned()
}

/// One locale's name/description pair, as produced by [`I18n::localize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    pub name: (String, String),
    pub description: (String, String),
}

#[derive(Debug, Clone)]
pub struct I18n {
    base: String,
    // BTreeMap so that `locales()` is sorted and duplicate-free.
    tables: BTreeMap<String, HashMap<String, String>>,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(BASE_LOCALE)
    }
}

impl I18n {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Read every `*.json` file in `dir`, in file-name order.
    pub async fn load_dir(dir: impl AsRef<Path>, base: impl Into<String>) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let mut i18n = Self::new(base);

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let raw = tokio::fs::read_to_string(&path).await?;
            let table: Value = serde_json::from_str(&raw)?;
            i18n.add_locale(&locale, &table);
            debug!("(I18n) loaded locale '{}' from {}", locale, path.display());
        }

        if !i18n.tables.contains_key(&i18n.base) {
            warn!("(I18n) base locale '{}' has no table in {}", i18n.base, dir.display());
        }
        info!("(I18n) {} locale(s) loaded from {}", i18n.tables.len(), dir.display());
        Ok(i18n)
    }

    /// Merge a JSON object into `locale`'s table, flattening nested objects.
    pub fn add_locale(&mut self, locale: &str, table: &Value) {
        let entries = self.tables.entry(locale.to_string()).or_default();
        flatten_into(entries, String::new(), table);
    }

    pub fn insert(&mut self, locale: &str, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(locale.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn base_locale(&self) -> &str {
        &self.base
    }

    /// Every locale with a loaded table, sorted. Includes the base locale.
    pub fn locales(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.base, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// `translate` plus `{placeholder}` substitution.
    pub fn translate_with(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(locale, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn localize(&self, locale: &str, name: &str, description: &str) -> Localization {
        Localization {
            name: (locale.to_string(), self.translate(locale, name)),
            description: (locale.to_string(), self.translate(locale, description)),
        }
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|t| t.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                flatten_into(out, key, v);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix, b.to_string());
        }
        // arrays and nulls carry no translatable text
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> I18n {
        let mut i18n = I18n::new("en-US");
        i18n.add_locale("en-US", &json!({
            "cmd": { "ping": { "description": "Shows the latency" } },
            "greeting": "Hello {user}"
        }));
        i18n.add_locale("fr", &json!({
            "cmd": { "ping": { "description": "Affiche la latence" } },
            "ping": "latence"
        }));
        i18n.add_locale("de", &json!({ "cmd": { "ping": { "description": "" } } }));
        i18n
    }

    #[test]
    fn translates_nested_keys() {
        let i18n = sample();
        assert_eq!(i18n.translate("fr", "cmd.ping.description"), "Affiche la latence");
        assert_eq!(i18n.translate("fr", "ping"), "latence");
    }

    #[test]
    fn falls_back_to_base_then_key() {
        let i18n = sample();
        assert_eq!(i18n.translate("ja", "cmd.ping.description"), "Shows the latency");
        assert_eq!(i18n.translate("fr", "greeting"), "Hello {user}");
        assert_eq!(i18n.translate("fr", "cmd.unknown"), "cmd.unknown");
    }

    #[test]
    fn empty_translation_is_treated_as_missing() {
        let i18n = sample();
        assert_eq!(i18n.translate("de", "cmd.ping.description"), "Shows the latency");
    }

    #[test]
    fn locales_are_sorted_and_unique() {
        let mut i18n = sample();
        i18n.insert("fr", "extra", "encore");
        assert_eq!(i18n.locales(), vec!["de", "en-US", "fr"]);
    }

    #[test]
    fn localize_uses_same_fallback() {
        let i18n = sample();
        let loc = i18n.localize("fr", "play", "cmd.ping.description");
        assert_eq!(loc.name, ("fr".to_string(), "play".to_string()));
        assert_eq!(loc.description, ("fr".to_string(), "Affiche la latence".to_string()));
    }

    #[test]
    fn placeholders_are_substituted() {
        let i18n = sample();
        assert_eq!(i18n.translate_with("en-US", "greeting", &[("user", "maow")]), "Hello maow");
    }

    #[tokio::test]
    async fn load_dir_reads_json_files_only() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("en-US.json"), r#"{"a":{"b":"base"}}"#).await.unwrap();
        tokio::fs::write(dir.path().join("es-ES.json"), r#"{"a":{"b":"base es"}}"#).await.unwrap();
        tokio::fs::write(dir.path().join("README.md"), "not a locale").await.unwrap();

        let i18n = I18n::load_dir(dir.path(), "en-US").await.unwrap();
        assert_eq!(i18n.locales(), vec!["en-US", "es-ES"]);
        assert_eq!(i18n.translate("es-ES", "a.b"), "base es");
    }

    #[test]
    fn first_init_wins() {
        let first = Arc::new(sample());
        let installed = init(first.clone());
        let current = global().expect("resolver installed");
        if installed {
            assert!(Arc::ptr_eq(&current, &first));
        }

        assert!(!init(Arc::new(sample())));
        assert!(Arc::ptr_eq(&global().unwrap(), &current));
    }
}
