//! Language allow-lists.
//!
//! Collected from the site's language dropdowns:
//!
//! ```js
//! Array.from(document.querySelectorAll("button[data-testid^='translator-lang-option']"))
//!   .map(e => e.getAttribute('data-testid').split('translator-lang-option-')[1].toLowerCase())
//! ```

use serde::Serialize;

use crate::error::{DeeplError, LanguageSide};

/// Source sentinel asking the site to detect the input language.
pub const AUTO: &str = "auto";

/// Valid source language codes.
pub static SOURCE_LANGS: &[&str] = &[
    AUTO, "ar", "bg", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "hu", "id", "it", "ja",
    "ko", "lt", "lv", "nb", "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr", "uk", "zh",
];

/// Valid target language codes: every concrete source code plus regional variants.
pub static TARGET_LANGS: &[&str] = &[
    "ar", "bg", "cs", "da", "de", "el", "en", "en-gb", "en-us", "es", "et", "fi", "fr", "hu", "id",
    "it", "ja", "ko", "lt", "lv", "nb", "nl", "pl", "pt", "pt-br", "pt-pt", "ro", "ru", "sk", "sl",
    "sv", "tr", "uk", "zh", "zh-hans", "zh-hant",
];

/// A validated source/target pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePair {
    source: String,
    target: String,
}

impl LanguagePair {
    /// Validate both codes against their allow-lists.
    ///
    /// Identical source and target codes are accepted; the site handles them.
    pub fn new(source: &str, target: &str) -> Result<Self, DeeplError> {
        check(LanguageSide::Source, source)?;
        check(LanguageSide::Target, target)?;
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_auto_detect(&self) -> bool {
        self.source == AUTO
    }
}

/// Check a single code against the allow-list for `side`.
pub(crate) fn check(side: LanguageSide, code: &str) -> Result<(), DeeplError> {
    let valid = match side {
        LanguageSide::Source => SOURCE_LANGS,
        LanguageSide::Target => TARGET_LANGS,
    };
    if valid.contains(&code) {
        Ok(())
    } else {
        Err(DeeplError::InvalidLanguage {
            side,
            value: code.to_string(),
            valid,
        })
    }
}

/// Primary subtag of a BCP 47 tag: `en-US` becomes `en`.
pub fn primary_subtag(tag: &str) -> String {
    tag.split('-').next().unwrap_or_default().trim().to_lowercase()
}
