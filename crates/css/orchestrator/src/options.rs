//! User-facing options and their resolution into a `RewritePolicy`.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use css_variables::{PrefixFilter, RewritePolicy, compose_suffix};
use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Options as a user writes them, e.g. in a JSON config file:
///
/// ```json
/// { "hash": "a1b2c3", "delimiter": "_", "maxLength": 4, "ignorePrefixes": ["tw-"] }
/// ```
///
/// Unknown keys are ignored and a value of the wrong type counts as unset, so any JSON object
/// is a valid set of options. Nothing is renamed unless `hash` (or `staticHash`) is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    #[serde(deserialize_with = "lenient_string")]
    pub hash: Option<String>,
    /// Used when `hash` is absent or empty.
    #[serde(deserialize_with = "lenient_string")]
    pub static_hash: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub delimiter: Option<String>,
    /// Caps the hash part of the suffix. Anything but a positive whole number counts as unset.
    #[serde(deserialize_with = "lenient_max_length")]
    pub max_length: Option<usize>,
    #[serde(deserialize_with = "lenient_prefixes")]
    pub ignore_prefixes: Vec<String>,
    #[serde(deserialize_with = "lenient_prefixes")]
    pub include_prefixes: Vec<String>,
}

/// Keep a string, drop anything else.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Keep the string entries of an array; anything that is not an array is an empty list.
fn lenient_prefixes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(prefix) => Some(prefix),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Accept any JSON value for `maxLength`, keeping only positive whole numbers (`5` or `5.0`).
fn lenient_max_length<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let whole = raw
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite() && *number >= 1.0 && number.fract() == 0.0);
    Ok(whole.map(|number| number as usize))
}

impl Options {
    /// Parse options from JSON text.
    ///
    /// Only text that is not JSON at all is an error. A JSON document that is not an object
    /// gives the default options, and mistyped fields are unset.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(text).context("Failed to parse var-hash options")?;
        if !document.is_object() {
            debug!(target: "css_orchestrator", "options are not a JSON object, using defaults");
            return Ok(Self::default());
        }
        serde_json::from_value(document).context("Failed to read var-hash options")
    }

    /// Read options from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold valid options.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Layer `overrides` on top of these options. Set values and non-empty lists win.
    #[must_use]
    pub fn merged_with(self, overrides: Self) -> Self {
        fn pick_list(base: Vec<String>, over: Vec<String>) -> Vec<String> {
            if over.is_empty() { base } else { over }
        }
        Self {
            hash: overrides.hash.or(self.hash),
            static_hash: overrides.static_hash.or(self.static_hash),
            delimiter: overrides.delimiter.or(self.delimiter),
            max_length: overrides.max_length.or(self.max_length),
            ignore_prefixes: pick_list(self.ignore_prefixes, overrides.ignore_prefixes),
            include_prefixes: pick_list(self.include_prefixes, overrides.include_prefixes),
        }
    }

    /// The hash in effect: `hash`, or `staticHash` when `hash` is missing or empty.
    pub fn effective_hash(&self) -> Option<&str> {
        self.hash
            .as_deref()
            .filter(|hash| !hash.is_empty())
            .or_else(|| self.static_hash.as_deref().filter(|hash| !hash.is_empty()))
    }

    /// Resolve into the immutable policy used for one pass.
    pub fn policy(&self) -> RewritePolicy {
        RewritePolicy::new(
            compose_suffix(
                self.delimiter.as_deref(),
                self.effective_hash(),
                self.max_length,
            ),
            PrefixFilter::new(self.include_prefixes.clone(), self.ignore_prefixes.clone()),
        )
    }
}
