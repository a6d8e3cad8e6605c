//! The public translator.

use std::future::Future;

use deepl_cdp::{install_browser, Browser, BrowserError};
use tokio::runtime::{Builder, Handle};
use tracing::{info, warn};

use crate::error::DeeplError;
use crate::filter::should_block;
use crate::languages::LanguagePair;
use crate::options::TranslatorOptions;
use crate::result::TranslationResult;
use crate::workflow::{drive, Stage, StageTracker, TranslationRequest};

/// Translator for one language pair.
///
/// Construction validates the pair. Each [`translate`](DeepL::translate) or
/// [`translate_async`](DeepL::translate_async) call launches a fresh browser,
/// so one `DeepL` can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct DeepL {
    pair: LanguagePair,
    options: TranslatorOptions,
}

impl DeepL {
    pub fn new(source: &str, target: &str, options: TranslatorOptions) -> Result<Self, DeeplError> {
        let pair = LanguagePair::new(source, target)?;
        Ok(Self { pair, options })
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Translate on the calling thread.
    ///
    /// Builds a current-thread runtime for the call, so it must not be used
    /// from inside an async context; that returns
    /// [`DeeplError::BlockingInAsyncContext`].
    pub fn translate(&self, text: &str) -> Result<TranslationResult, DeeplError> {
        let request = self.request(text)?;

        if Handle::try_current().is_ok() {
            return Err(DeeplError::BlockingInAsyncContext);
        }

        let runtime = Builder::new_current_thread().enable_all().build().map_err(|e| {
            DeeplError::page_load("Unable to start the async runtime", self.options.timeout_ms(), e)
        })?;
        runtime.block_on(self.run(request))
    }

    /// Translate as a future.
    ///
    /// Input errors are returned before any future is created. Dropping the
    /// future kills the browser it launched.
    pub fn translate_async(
        &self,
        text: &str,
    ) -> Result<impl Future<Output = Result<TranslationResult, DeeplError>> + Send + '_, DeeplError>
    {
        let request = self.request(text)?;
        Ok(self.run(request))
    }

    fn request(&self, text: &str) -> Result<TranslationRequest, DeeplError> {
        TranslationRequest::new(self.pair.clone(), text, &self.options)
    }

    async fn run(&self, request: TranslationRequest) -> Result<TranslationResult, DeeplError> {
        let timeout_ms = self.options.timeout_ms();
        let mut stages = StageTracker::new();

        stages.advance(Stage::BrowserAcquiring);
        let install_command = &self.options.install_command;
        let install = self
            .options
            .auto_install
            .then_some(move || install_browser(install_command));
        let browser = match acquire_with_install(|| Browser::launch(&self.options.launch), install).await {
            Ok(browser) => browser,
            Err(e) => {
                let err = DeeplError::page_load("Unable to launch the browser", timeout_ms, e);
                stages.advance(Stage::Failed(err.kind()));
                return Err(err);
            }
        };

        let outcome = async {
            let page = browser
                .new_page()
                .await
                .map_err(|e| DeeplError::page_load("Unable to open a page", timeout_ms, e))?;
            page.set_default_timeout(self.options.timeout);
            page.enable_request_filter(should_block).await.map_err(|e| {
                DeeplError::page_load("Unable to install the request filter", timeout_ms, e)
            })?;

            drive(&page, &request, &mut stages).await
        }
        .await;

        if let Err(e) = &outcome {
            stages.advance(Stage::Failed(e.kind()));
        }

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {}", e);
        }

        outcome
    }
}

/// Launch, and when the executable is missing, install once and launch again.
pub(crate) async fn acquire_with_install<T, L, LF, I, IF>(
    mut launch: L,
    install: Option<I>,
) -> Result<T, BrowserError>
where
    L: FnMut() -> LF,
    LF: Future<Output = Result<T, BrowserError>>,
    I: FnOnce() -> IF,
    IF: Future<Output = Result<(), BrowserError>>,
{
    match launch().await {
        Err(BrowserError::ChromeNotFound) => match install {
            Some(install) => {
                info!("Browser executable not found, installing");
                install().await?;
                launch().await
            }
            None => Err(BrowserError::ChromeNotFound),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_acquire_without_install_needed() {
        let launches = AtomicUsize::new(0);
        let installs = AtomicUsize::new(0);

        let result = acquire_with_install(
            || {
                launches.fetch_add(1, Ordering::SeqCst);
                ready(Ok::<_, BrowserError>(7))
            },
            Some(|| {
                installs.fetch_add(1, Ordering::SeqCst);
                ready(Ok(()))
            }),
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(launches.load(Ordering::SeqCst), 1);
        assert_eq!(installs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_acquire_installs_once_then_retries() {
        let launches = AtomicUsize::new(0);
        let installs = AtomicUsize::new(0);

        let result = acquire_with_install(
            || {
                let n = launches.fetch_add(1, Ordering::SeqCst);
                ready(if n == 0 {
                    Err(BrowserError::ChromeNotFound)
                } else {
                    Ok(n)
                })
            },
            Some(|| {
                installs.fetch_add(1, Ordering::SeqCst);
                ready(Ok(()))
            }),
        )
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(launches.load(Ordering::SeqCst), 2);
        assert_eq!(installs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_acquire_second_failure_propagates() {
        let launches = AtomicUsize::new(0);

        let result = acquire_with_install(
            || {
                launches.fetch_add(1, Ordering::SeqCst);
                ready(Err::<(), _>(BrowserError::ChromeNotFound))
            },
            Some(|| ready(Ok(()))),
        )
        .await;

        assert!(matches!(result, Err(BrowserError::ChromeNotFound)));
        assert_eq!(launches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_acquire_other_errors_skip_install() {
        let installs = AtomicUsize::new(0);

        let result = acquire_with_install(
            || ready(Err::<(), _>(BrowserError::LaunchFailed("boom".to_string()))),
            Some(|| {
                installs.fetch_add(1, Ordering::SeqCst);
                ready(Ok(()))
            }),
        )
        .await;

        assert!(matches!(result, Err(BrowserError::LaunchFailed(_))));
        assert_eq!(installs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_acquire_install_failure_propagates() {
        let launches = AtomicUsize::new(0);

        let result = acquire_with_install(
            || {
                launches.fetch_add(1, Ordering::SeqCst);
                ready(Err::<(), _>(BrowserError::ChromeNotFound))
            },
            Some(|| ready(Err(BrowserError::InstallFailed("npx missing".to_string())))),
        )
        .await;

        assert!(matches!(result, Err(BrowserError::InstallFailed(_))));
        assert_eq!(launches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_acquire_without_installer() {
        let result = acquire_with_install(
            || ready(Err::<(), _>(BrowserError::ChromeNotFound)),
            None::<fn() -> std::future::Ready<Result<(), BrowserError>>>,
        )
        .await;

        assert!(matches!(result, Err(BrowserError::ChromeNotFound)));
    }

    #[test]
    fn test_new_rejects_invalid_pair() {
        let err = DeepL::new("en", "jaa", TranslatorOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = DeepL::new("enn", "ja", TranslatorOptions::default()).unwrap_err();
        assert!(err.to_string().contains("\"enn\""));
    }

    #[test]
    fn test_input_errors_come_before_io() {
        let deepl = DeepL::new("en", "ja", TranslatorOptions::default()).unwrap();
        assert!(matches!(deepl.translate("\n"), Err(DeeplError::EmptyInput)));
        assert!(matches!(
            deepl.translate_async(&"test".repeat(10000)),
            Err(DeeplError::InputTooLong { limit: 5000, actual: 40000 })
        ));
    }

    #[tokio::test]
    async fn test_blocking_translate_inside_runtime() {
        let deepl = DeepL::new("en", "ja", TranslatorOptions::default()).unwrap();
        assert!(matches!(
            deepl.translate("hello."),
            Err(DeeplError::BlockingInAsyncContext)
        ));
    }
}
