//! CLI definitions for deepl.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use deepl_config::Config;
use deepl_translator::{DeeplError, LanguageSide, SOURCE_LANGS, TARGET_LANGS};

/// Bytes inspected when deciding whether a file is text.
const SNIFF_LEN: usize = 1024;

/// DeepL Translator CLI without API key.
#[derive(Parser, Debug)]
#[command(name = "deepl")]
#[command(about = "DeepL Translator CLI without API Key")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "stdin"])))]
pub(crate) struct Cli {
    /// Source text file to translate
    #[arg(short, long, value_name = "PATH", value_parser = parse_text_file)]
    pub file: Option<PathBuf>,

    /// Read source text from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Input language
    #[arg(short = 'F', long, value_name = "LANG", value_parser = parse_source_lang)]
    pub fr: String,

    /// Output language
    #[arg(short = 'T', long, value_name = "LANG", value_parser = parse_target_lang)]
    pub to: String,

    /// Timeout for each wait on the page
    #[arg(short, long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum number of characters to translate
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Select languages and type the text in the page instead of using the URL
    #[arg(long)]
    pub dom_submit: bool,

    /// Print the result with detected languages as JSON
    #[arg(long)]
    pub json: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Make output verbose
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.translator.timeout_ms = timeout;
        }
        if let Some(max_length) = self.max_length {
            config.translator.max_length = max_length;
        }
        if self.dom_submit {
            config.translator.use_dom_submit = true;
        }
    }
}

fn parse_source_lang(value: &str) -> Result<String, String> {
    parse_lang(LanguageSide::Source, SOURCE_LANGS, value)
}

fn parse_target_lang(value: &str) -> Result<String, String> {
    parse_lang(LanguageSide::Target, TARGET_LANGS, value)
}

fn parse_lang(
    side: LanguageSide,
    valid: &'static [&'static str],
    value: &str,
) -> Result<String, String> {
    if valid.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(DeeplError::InvalidLanguage {
            side,
            value: value.to_string(),
            valid,
        }
        .to_string())
    }
}

fn parse_text_file(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);
    if !path.is_file() {
        return Err(format!("{:?} is not file.", value));
    }

    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head))
        .map_err(|e| format!("{:?}: {}", value, e))?;

    if looks_binary(&head) {
        return Err(format!("{:?} is not text file.", value));
    }
    Ok(path.to_path_buf())
}

/// Whether `bytes` contains anything outside printable text and common
/// control characters (BEL, BS, TAB, LF, FF, CR, ESC).
fn looks_binary(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .any(|&b| !(matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27) || (b >= 0x20 && b != 0x7f)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("deepl").chain(args.iter().copied()))
    }

    #[test]
    fn test_stdin_with_languages() {
        let cli = parse(&["-s", "-F", "en", "-T", "ja"]).unwrap();
        assert!(cli.stdin);
        assert_eq!(cli.fr, "en");
        assert_eq!(cli.to, "ja");
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_input_is_required() {
        let err = parse(&["-F", "en", "-T", "ja"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_file_and_stdin_conflict() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hello.").unwrap();
        let path = file.path().to_str().unwrap();

        let err = parse(&["-s", "-f", path, "-F", "en", "-T", "ja"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_languages() {
        let err = parse(&["-s", "-F", "enn", "-T", "ja"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("\"enn\""));

        let err = parse(&["-s", "-F", "en", "-T", "jaa"]).unwrap_err();
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_text_file_accepted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "今日は2022/2/22です。").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = parse(&["-f", path, "-F", "ja", "-T", "en"]).unwrap();
        assert_eq!(cli.file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_binary_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0x01, 0x02, 0xff]).unwrap();
        let path = file.path().to_str().unwrap();

        let err = parse(&["-f", path, "-F", "ja", "-T", "en"]).unwrap_err();
        assert!(err.to_string().contains("is not text file."));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = parse(&["-f", "/nonexistent/deepl.txt", "-F", "ja", "-T", "en"]).unwrap_err();
        assert!(err.to_string().contains("is not file."));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse(&["-s", "-F", "en", "-T", "ja", "-t", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = parse(&[
            "-s", "-F", "en", "-T", "ja", "-t", "100000", "--max-length", "1500", "--dom-submit",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.translator.timeout_ms, 100000);
        assert_eq!(config.translator.max_length, 1500);
        assert!(config.translator.use_dom_submit);
    }

    #[test]
    fn test_looks_binary() {
        assert!(!looks_binary(b"plain text\r\n\tand tabs\x1b[0m"));
        assert!(!looks_binary("日本語".as_bytes()));
        assert!(looks_binary(b"\x00ELF"));
        assert!(looks_binary(b"del\x7f"));
    }
}
