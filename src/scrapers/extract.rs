//! Field extraction from problem page markup.
//!
//! The document strategy runs these selectors over static HTML; the browser
//! strategy runs the same selectors in the live DOM through
//! [`extraction_script`]. Both produce [`RawFields`], normalized by
//! [`normalize`].

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::models::{Difficulty, ProblemDetails};

/// Title candidates, most specific first.
pub const TITLE_SELECTORS: &[&str] = &["[data-cy=\"question-title\"]", ".question-title"];

/// Difficulty candidates, most specific first.
pub const DIFFICULTY_SELECTORS: &[&str] = &[
    ".text-difficulty-medium, .text-difficulty-easy, .text-difficulty-hard",
    "[data-cy=\"question-difficulty\"]",
    ".difficulty-label",
];

/// Description candidates across page layouts, newest first.
pub const DESCRIPTION_SELECTORS: &[&str] = &[
    ".elfjS",
    "[data-track-load=\"description_content\"]",
    ".question-content",
    "[data-cy=\"question-content\"]",
    ".content__u3I1",
    ".description__24sA",
];

/// Topic tag elements.
pub const TAG_SELECTOR: &str =
    ".tag__2PqS, [data-cy=\"question-tags\"] .tag, .flex.gap-2 .bg-fill-secondary";

/// Suffix the site appends to `<title>`.
pub const TITLE_SUFFIX: &str = " - LeetCode";

static TITLE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.").expect("valid title number regex"));

/// Unnormalized field candidates pulled from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFields {
    pub title: Option<String>,
    pub document_title: Option<String>,
    pub difficulty_text: Option<String>,
    pub difficulty_classes: Vec<String>,
    pub description_html: Option<String>,
    pub tags: Vec<String>,
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!(selector, error = ?e, "Skipping unparseable selector");
            None
        }
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First element matched by a selector list.
fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| parse_selector(s))
        .find_map(|s| document.select(&s).next())
}

/// Pull raw field candidates out of static HTML.
pub fn extract_raw(html: &str) -> RawFields {
    let document = Html::parse_document(html);

    let title = TITLE_SELECTORS
        .iter()
        .filter_map(|s| parse_selector(s))
        .flat_map(|s| document.select(&s).map(|el| element_text(&el)).collect::<Vec<_>>())
        .find(|t| !t.is_empty());

    let document_title = parse_selector("title")
        .and_then(|s| document.select(&s).next().map(|el| element_text(&el)));

    let (difficulty_text, difficulty_classes) = match first_match(&document, DIFFICULTY_SELECTORS)
    {
        Some(el) => (
            Some(element_text(&el)),
            el.value().classes().map(|c| c.to_string()).collect(),
        ),
        None => (None, Vec::new()),
    };

    let description_html = DESCRIPTION_SELECTORS
        .iter()
        .filter_map(|s| parse_selector(s))
        .find_map(|s| {
            document
                .select(&s)
                .next()
                .map(|el| el.inner_html())
                .filter(|h| !h.trim().is_empty())
        });

    let tags = parse_selector(TAG_SELECTOR)
        .map(|s| document.select(&s).map(|el| element_text(&el)).collect())
        .unwrap_or_default();

    RawFields {
        title,
        document_title,
        difficulty_text,
        difficulty_classes,
        description_html,
        tags,
    }
}

/// Derive the numeric id from a `"<digits>. Title"` prefix.
pub fn numeric_id_from_title(title: &str) -> Option<String> {
    TITLE_NUMBER_RE
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn difficulty_rank(d: &Difficulty) -> u8 {
    match d {
        Difficulty::Unknown => 0,
        Difficulty::Easy => 1,
        Difficulty::Medium => 2,
        Difficulty::Hard => 3,
    }
}

/// Text labels and class hints both count; the hardest one found wins.
fn classify_difficulty(text: Option<&str>, classes: &[String]) -> Difficulty {
    text.map(Difficulty::from_text)
        .into_iter()
        .chain(classes.iter().filter_map(|c| Difficulty::from_css_class(c)))
        .max_by_key(difficulty_rank)
        .unwrap_or_default()
}

fn is_difficulty_label(tag: &str) -> bool {
    ["Easy", "Medium", "Hard"].iter().any(|d| tag.contains(d))
}

/// Normalize raw candidates into details.
///
/// Returns `None` when no title could be found, which the strategies treat
/// as failure.
pub fn normalize(raw: RawFields) -> Option<ProblemDetails> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            raw.document_title
                .map(|t| t.replace(TITLE_SUFFIX, "").trim().to_string())
                .filter(|t| !t.is_empty())
        })?;

    let difficulty = classify_difficulty(raw.difficulty_text.as_deref(), &raw.difficulty_classes);

    let tags = raw
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && !is_difficulty_label(t))
        .collect();

    Some(ProblemDetails {
        numeric_id: numeric_id_from_title(&title),
        title,
        difficulty,
        description_html: raw
            .description_html
            .map(|d| d.trim().to_string())
            .unwrap_or_default(),
        tags,
    })
}

/// Extract and normalize in one step.
pub fn parse_problem_html(html: &str) -> Option<ProblemDetails> {
    normalize(extract_raw(html))
}

fn js_array(items: &[&str]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// In-page script collecting the same [`RawFields`] from the live DOM.
pub fn extraction_script() -> String {
    format!(
        r#"(() => {{
    const titleSelectors = {title};
    const difficultySelectors = {difficulty};
    const descriptionSelectors = {description};
    const text = (el) => (el && el.textContent ? el.textContent.trim() : '');

    let title = null;
    for (const s of titleSelectors) {{
        const t = text(document.querySelector(s));
        if (t) {{ title = t; break; }}
    }}

    let difficultyText = null;
    let difficultyClasses = [];
    for (const s of difficultySelectors) {{
        const el = document.querySelector(s);
        if (el) {{
            difficultyText = text(el);
            difficultyClasses = Array.from(el.classList);
            break;
        }}
    }}

    let descriptionHtml = null;
    for (const s of descriptionSelectors) {{
        const el = document.querySelector(s);
        if (el && el.innerHTML.trim()) {{ descriptionHtml = el.innerHTML; break; }}
    }}

    const tags = Array.from(document.querySelectorAll({tags})).map(text);

    return {{
        title,
        documentTitle: document.title || null,
        difficultyText,
        difficultyClasses,
        descriptionHtml,
        tags,
    }};
}})()"#,
        title = js_array(TITLE_SELECTORS),
        difficulty = js_array(DIFFICULTY_SELECTORS),
        description = js_array(DESCRIPTION_SELECTORS),
        tags = serde_json::to_string(TAG_SELECTOR).unwrap_or_else(|_| "''".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERN_PAGE: &str = r#"
        <html><head><title>Two Sum - LeetCode</title></head>
        <body>
          <div data-cy="question-title">1. Two Sum</div>
          <div class="text-difficulty-easy">Easy</div>
          <div class="elfjS"><p>Given an array of integers <code>nums</code>...</p></div>
          <div class="flex gap-2">
            <a class="bg-fill-secondary">Array</a>
            <a class="bg-fill-secondary">Easy</a>
            <a class="bg-fill-secondary">Hash Table</a>
          </div>
        </body></html>"#;

    #[test]
    fn test_parse_modern_layout() {
        let details = parse_problem_html(MODERN_PAGE).unwrap();
        assert_eq!(details.title, "1. Two Sum");
        assert_eq!(details.numeric_id.as_deref(), Some("1"));
        assert_eq!(details.difficulty, Difficulty::Easy);
        assert!(details.description_html.starts_with("<p>Given an array"));
        assert_eq!(details.tags, vec!["Array", "Hash Table"]);
    }

    #[test]
    fn test_falls_back_to_document_title() {
        let html = r#"<html><head><title>Valid Parentheses - LeetCode</title></head>
            <body><div class="question-content"><p>Brackets</p></div></body></html>"#;
        let details = parse_problem_html(html).unwrap();
        assert_eq!(details.title, "Valid Parentheses");
        assert_eq!(details.numeric_id, None);
        assert_eq!(details.difficulty, Difficulty::Unknown);
        assert_eq!(details.description_html, "<p>Brackets</p>");
        assert!(details.tags.is_empty());
    }

    #[test]
    fn test_first_description_selector_with_content_wins() {
        let html = r#"<html><head><title>X</title></head><body>
            <div class="elfjS">   </div>
            <div data-track-load="description_content"><p>Second</p></div>
            <div class="question-content"><p>Third</p></div>
            </body></html>"#;
        let details = parse_problem_html(html).unwrap();
        assert_eq!(details.description_html, "<p>Second</p>");
    }

    #[test]
    fn test_difficulty_from_class_hint_only() {
        let html = r#"<html><head><title>X</title></head><body>
            <span class="text-difficulty-hard"></span></body></html>"#;
        assert_eq!(
            parse_problem_html(html).unwrap().difficulty,
            Difficulty::Hard
        );
    }

    #[test]
    fn test_difficulty_from_data_attribute_text() {
        let html = r#"<html><head><title>X</title></head><body>
            <div data-cy="question-difficulty">MEDIUM</div></body></html>"#;
        assert_eq!(
            parse_problem_html(html).unwrap().difficulty,
            Difficulty::Medium
        );
    }

    #[test]
    fn test_class_hint_outranks_easier_text() {
        let html = r#"<html><head><title>X</title></head><body>
            <div class="text-difficulty-hard">Medium</div></body></html>"#;
        assert_eq!(
            parse_problem_html(html).unwrap().difficulty,
            Difficulty::Hard
        );
    }

    #[test]
    fn test_text_outranks_easier_class_hint() {
        assert_eq!(
            classify_difficulty(Some("Hard"), &["text-difficulty-easy".to_string()]),
            Difficulty::Hard
        );
        assert_eq!(
            classify_difficulty(Some("Premium"), &["text-difficulty-medium".to_string()]),
            Difficulty::Medium
        );
        assert_eq!(classify_difficulty(None, &[]), Difficulty::Unknown);
    }

    #[test]
    fn test_missing_title_is_failure() {
        let html = "<html><head></head><body><div class=\"elfjS\">x</div></body></html>";
        assert_eq!(parse_problem_html(html), None);
    }

    #[test]
    fn test_normalize_browser_payload() {
        let raw: RawFields = serde_json::from_value(serde_json::json!({
            "title": null,
            "documentTitle": "42. Trapping Rain Water - LeetCode",
            "difficultyText": "",
            "difficultyClasses": ["text-difficulty-hard", "ml-2"],
            "descriptionHtml": " <p>rain</p> ",
            "tags": ["Array", " Two Pointers ", "", "Hard"]
        }))
        .unwrap();

        let details = normalize(raw).unwrap();
        assert_eq!(details.title, "42. Trapping Rain Water");
        assert_eq!(details.numeric_id.as_deref(), Some("42"));
        assert_eq!(details.difficulty, Difficulty::Hard);
        assert_eq!(details.description_html, "<p>rain</p>");
        assert_eq!(details.tags, vec!["Array", "Two Pointers"]);
    }

    #[test]
    fn test_extraction_script_embeds_selectors() {
        let script = extraction_script();
        assert!(script.contains(r#""[data-cy=\"question-title\"]""#));
        assert!(script.contains(".elfjS"));
        assert!(script.contains("documentTitle"));
    }
}
