//! # engine::normalizer
//!
//! Maps a raw asset tag (`$eth`, `#bitcoin`) to its canonical code.

use std::collections::HashMap;

/// Built-in corrections for tags that name a coin instead of its ticker.
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[("#bitcoin", "$BTC")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNormalizer {
    overrides: HashMap<String, String>,
}

impl Default for SymbolNormalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_OVERRIDES
                .iter()
                .map(|&(raw, canonical)| (raw.to_string(), canonical.to_string())),
        )
    }
}

impl SymbolNormalizer {
    /// Builds a normalizer over exactly the given override table.
    pub fn new<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            overrides: overrides.into_iter().collect(),
        }
    }

    /// Default table with `extra` entries layered on top (later wins).
    pub fn with_overrides<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut normalizer = Self::default();
        normalizer.overrides.extend(extra);
        normalizer
    }

    /// Exact-match overrides are returned verbatim; everything else is
    /// upper-cased. Never fails.
    pub fn normalize(&self, raw_tag: &str) -> String {
        match self.overrides.get(raw_tag) {
            Some(canonical) => canonical.clone(),
            None => raw_tag.to_uppercase(),
        }
    }
}
