//! # deepl-translator
//!
//! Translate text with the DeepL web translator by driving a headless
//! browser, without an API key.
//!
//! ```rust,ignore
//! use deepl_translator::{DeepL, TranslatorOptions};
//!
//! let deepl = DeepL::new("en", "ja", TranslatorOptions::default())?;
//! let result = deepl.translate("hello.")?;
//! println!("{}", result.text);
//! ```
//!
//! Every call launches its own browser and closes it on every exit path,
//! including when the future returned by [`DeepL::translate_async`] is
//! dropped mid-flight.

mod error;
mod filter;
mod languages;
mod options;
mod page;
mod result;
mod sanitize;
mod scripts;
mod translator;
mod workflow;

pub use error::{DeeplError, ErrorKind, LanguageSide};
pub use filter::should_block;
pub use languages::{primary_subtag, LanguagePair, AUTO, SOURCE_LANGS, TARGET_LANGS};
pub use options::TranslatorOptions;
pub use page::TranslatorPage;
pub use result::{join_lines, DetectedLanguages, TranslationResult};
pub use sanitize::{sanitize, unescape};
pub use translator::DeepL;
pub use workflow::{fragment_url, translator_url, Stage, TranslationRequest};

/// Result alias for translation operations.
pub type Result<T> = std::result::Result<T, DeeplError>;
