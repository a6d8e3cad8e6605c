//! JavaScript run against the translator page.

use serde_json::Value;

const OUTPUT_TEXTAREA: &str = "d-textarea[aria-labelledby=translation-target-heading]";

pub(crate) const SOURCE_INPUT: &str = "div[aria-labelledby=translation-source-heading]";
pub(crate) const COOKIE_BANNER_CLOSE: &str = "button[data-testid=cookie-banner-lax-close-button]";
pub(crate) const SOURCE_LANG_BUTTON: &str = "button[data-testid=translator-source-lang-btn]";
pub(crate) const TARGET_LANG_BUTTON: &str = "button[data-testid=translator-target-lang-btn]";
pub(crate) const SOURCE_LANG_LIST: &str = "[data-testid=translator-source-lang-list]";
pub(crate) const TARGET_LANG_LIST: &str = "[data-testid=translator-target-lang-list]";

pub(crate) const SOURCE_REGION: &str = "Source text";
pub(crate) const TARGET_REGION: &str = "Translation results";

/// Shown by the site while a line is still being produced.
pub(crate) const PLACEHOLDER: &str = "[...]";

pub(crate) const MAIN_READY: &str = "() => document.querySelector('main, [role=main]') !== null";

pub(crate) const TOAST_PRESENT: &str =
    r#"() => document.querySelector('div[data-testid="chrome-extension-toast"]') !== null"#;

pub(crate) const TOAST_CLOSE: &str = r#"(() => {
    const toast = document.querySelector('div[data-testid="chrome-extension-toast"]');
    const button = toast && toast.querySelector('button');
    if (!button) return false;
    button.click();
    return true;
})()"#;

pub(crate) fn output_ready() -> String {
    format!(
        "() => document.querySelector({})?.value?.length > 0",
        quote(OUTPUT_TEXTAREA)
    )
}

pub(crate) fn line_count() -> String {
    format!(
        "document.querySelector({}).children[0].children.length",
        quote(OUTPUT_TEXTAREA)
    )
}

pub(crate) fn line_ready(index: usize) -> String {
    format!(
        r#"() => {{
    const t = document.querySelector({})?.children[0]?.children[{index}]?.innerText ?? '';
    return t.length > 0 && !t.includes({});
}}"#,
        quote(OUTPUT_TEXTAREA),
        quote(PLACEHOLDER)
    )
}

pub(crate) fn line_text(index: usize) -> String {
    format!(
        "document.querySelector({}).children[0].children[{index}].innerText",
        quote(OUTPUT_TEXTAREA)
    )
}

/// Selector for a language option inside `list`. The `i` flag lets
/// `en-us` match the site's `en-US`.
pub(crate) fn lang_option(list: &str, code: &str) -> String {
    format!("{list} [data-testid=\"translator-lang-option-{code}\" i]")
}

/// `lang` attribute of the `d-textarea` inside the region named `name`,
/// matched by `aria-label` or by the text of its `aria-labelledby` element.
pub(crate) fn region_lang(name: &str) -> String {
    format!(
        r#"(() => {{
    const name = {};
    const label = (el) => {{
        const direct = el.getAttribute('aria-label');
        if (direct) return direct.trim();
        const ids = (el.getAttribute('aria-labelledby') || '').split(/\s+/).filter(Boolean);
        return ids.map((id) => document.getElementById(id)?.textContent?.trim() ?? '').join(' ');
    }};
    const region = Array.from(document.querySelectorAll('[role=region], section'))
        .find((el) => label(el) === name);
    return region?.querySelector('d-textarea')?.getAttribute('lang') ?? null;
}})()"#,
        quote(name)
    )
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scripts_index_the_output() {
        let ready = line_ready(3);
        assert!(ready.contains("children[3]"));
        assert!(ready.contains("\"[...]\""));
        assert!(line_text(0).contains("children[0].children[0].innerText"));
    }

    #[test]
    fn test_output_selector_is_quoted() {
        assert!(output_ready()
            .contains("\"d-textarea[aria-labelledby=translation-target-heading]\""));
        assert!(line_count().ends_with("children.length"));
    }

    #[test]
    fn test_lang_option_is_case_insensitive() {
        assert_eq!(
            lang_option(TARGET_LANG_LIST, "en-us"),
            "[data-testid=translator-target-lang-list] [data-testid=\"translator-lang-option-en-us\" i]"
        );
    }

    #[test]
    fn test_region_lang_embeds_name() {
        let script = region_lang(SOURCE_REGION);
        assert!(script.contains("const name = \"Source text\";"));
        assert!(script.contains("getAttribute('lang')"));
    }
}
