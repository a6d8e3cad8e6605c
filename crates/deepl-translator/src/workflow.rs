//! One translation attempt against a loaded page.

use std::fmt;
use std::time::Duration;

use deepl_cdp::CdpError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DeeplError, ErrorKind};
use crate::languages::{primary_subtag, LanguagePair};
use crate::options::TranslatorOptions;
use crate::page::TranslatorPage;
use crate::result::{join_lines, DetectedLanguages, TranslationResult};
use crate::sanitize::sanitize;
use crate::scripts;

/// Upper bound on waiting for the extension toast, which often never shows.
const TOAST_WAIT: Duration = Duration::from_secs(2);

/// Progress of a translation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    BrowserAcquiring,
    PageLoading,
    AwaitingOutput,
    Extracting,
    Completed,
    Failed(ErrorKind),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Created => write!(f, "created"),
            Stage::BrowserAcquiring => write!(f, "browser-acquiring"),
            Stage::PageLoading => write!(f, "page-loading"),
            Stage::AwaitingOutput => write!(f, "awaiting-output"),
            Stage::Extracting => write!(f, "extracting"),
            Stage::Completed => write!(f, "completed"),
            Stage::Failed(kind) => write!(f, "failed ({:?})", kind),
        }
    }
}

/// Records stage transitions and logs each one.
#[derive(Debug)]
pub(crate) struct StageTracker {
    current: Stage,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: Stage::Created,
        }
    }

    pub(crate) fn current(&self) -> Stage {
        self.current
    }

    pub(crate) fn advance(&mut self, next: Stage) {
        if self.current.is_terminal() {
            return;
        }
        debug!(from = %self.current, to = %next, "Translation stage");
        self.current = next;
    }
}

/// Everything the workflow needs to know about one call.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub pair: LanguagePair,
    /// Input with trailing newlines trimmed, as typed into the page.
    pub text: String,
    /// Sanitized script, separators escaped.
    pub script: String,
    pub use_dom_submit: bool,
    pub base_url: String,
    pub locale: String,
    pub timeout: Duration,
}

impl TranslationRequest {
    /// Sanitize `text` against the options' length limit.
    pub fn new(
        pair: LanguagePair,
        text: &str,
        options: &TranslatorOptions,
    ) -> Result<Self, DeeplError> {
        let script = sanitize(text, options.max_length)?;
        Ok(Self {
            pair,
            text: text.trim_end_matches('\n').to_string(),
            script,
            use_dom_submit: options.use_dom_submit,
            base_url: options.base_url.clone(),
            locale: options.locale.clone(),
            timeout: options.timeout,
        })
    }

    /// Address the page is opened at.
    pub fn url(&self) -> String {
        if self.use_dom_submit {
            translator_url(&self.base_url, &self.locale)
        } else {
            fragment_url(&self.base_url, &self.locale, &self.pair, &self.script)
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn fail(&self, message: impl Into<String>, cause: CdpError) -> DeeplError {
        DeeplError::page_load(message, self.timeout_ms(), cause)
    }
}

/// `<base>/<locale>/translator`
pub fn translator_url(base_url: &str, locale: &str) -> String {
    format!("{}/{}/translator", base_url.trim_end_matches('/'), locale)
}

/// Translator URL carrying the pair and the percent-encoded script in its fragment.
pub fn fragment_url(base_url: &str, locale: &str, pair: &LanguagePair, script: &str) -> String {
    format!(
        "{}#{}/{}/{}",
        translator_url(base_url, locale),
        pair.source(),
        pair.target(),
        urlencoding::encode(script)
    )
}

/// Load the translator, wait for every output line and read them back.
pub(crate) async fn drive(
    page: &dyn TranslatorPage,
    request: &TranslationRequest,
    stages: &mut StageTracker,
) -> Result<TranslationResult, DeeplError> {
    stages.advance(Stage::PageLoading);

    let url = request.url();
    page.goto(&url)
        .await
        .map_err(|e| request.fail("Unable to open the translator page", e))?;

    page.wait_for_function(scripts::MAIN_READY, None)
        .await
        .map_err(|e| request.fail("Maybe Time limit exceeded.", e))?;

    if request.use_dom_submit {
        submit_through_form(page, request).await?;
    }

    stages.advance(Stage::AwaitingOutput);

    page.wait_for_function(&scripts::output_ready(), None)
        .await
        .map_err(|e| request.fail("Time limit exceeded.", e))?;

    const LINE_COUNT_FAILED: &str = "Unable to evaluate line count of the translation";
    let count = page
        .evaluate(&scripts::line_count())
        .await
        .map_err(|e| request.fail(LINE_COUNT_FAILED, e))?;
    let count = match count.as_u64() {
        Some(n) if n > 0 => n as usize,
        _ => {
            return Err(request.fail(
                LINE_COUNT_FAILED,
                CdpError::InvalidResponse(format!("line count is {}", count)),
            ));
        }
    };

    stages.advance(Stage::Extracting);

    let mut lines = Vec::with_capacity(count);
    for index in 0..count {
        page.wait_for_function(&scripts::line_ready(index), None)
            .await
            .map_err(|e| request.fail(format!("Time limit exceeded for line {}.", index), e))?;

        let unreadable = format!("Unable get translated text for line {}", index);
        let value = page
            .evaluate(&scripts::line_text(index))
            .await
            .map_err(|e| request.fail(unreadable.clone(), e))?;
        match value {
            Value::String(text) => lines.push(text),
            other => {
                return Err(request.fail(
                    unreadable,
                    CdpError::InvalidResponse(format!("line text is {}", other)),
                ));
            }
        }
    }

    let detected = detect_languages(page).await;
    debug!(lines = count, ?detected, "Translation extracted");

    stages.advance(Stage::Completed);

    Ok(TranslationResult {
        text: join_lines(&lines),
        detected,
    })
}

/// Pick both languages in the page dropdowns and type the script in.
async fn submit_through_form(
    page: &dyn TranslatorPage,
    request: &TranslationRequest,
) -> Result<(), DeeplError> {
    // The banners cover the language buttons when present.
    if let Err(e) = page.click(scripts::COOKIE_BANNER_CLOSE).await {
        debug!("Cookie banner not closed: {}", e);
    }
    match page
        .wait_for_function(scripts::TOAST_PRESENT, Some(TOAST_WAIT.min(request.timeout)))
        .await
    {
        Ok(()) => {
            if let Err(e) = page.evaluate(scripts::TOAST_CLOSE).await {
                debug!("Extension toast not closed: {}", e);
            }
        }
        Err(e) => debug!("No extension toast: {}", e),
    }

    let steps = [
        scripts::SOURCE_LANG_BUTTON.to_string(),
        scripts::lang_option(scripts::SOURCE_LANG_LIST, request.pair.source()),
        scripts::TARGET_LANG_BUTTON.to_string(),
        scripts::lang_option(scripts::TARGET_LANG_LIST, request.pair.target()),
    ];
    for selector in &steps {
        page.click(selector)
            .await
            .map_err(|e| request.fail("Unable to select the translation languages", e))?;
    }

    page.fill(scripts::SOURCE_INPUT, &request.text)
        .await
        .map_err(|e| request.fail("Unable to fill in the source text", e))?;

    Ok(())
}

/// Languages the page settled on. Missing or unreadable values become `None`.
async fn detect_languages(page: &dyn TranslatorPage) -> DetectedLanguages {
    DetectedLanguages {
        source: region_lang(page, scripts::SOURCE_REGION).await,
        target: region_lang(page, scripts::TARGET_REGION).await,
    }
}

async fn region_lang(page: &dyn TranslatorPage, region: &str) -> Option<String> {
    match page.evaluate(&scripts::region_lang(region)).await {
        Ok(Value::String(lang)) if !lang.trim().is_empty() => Some(primary_subtag(&lang)),
        Ok(_) => None,
        Err(e) => {
            warn!("Unable to read the language of {:?}: {}", region, e);
            None
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
