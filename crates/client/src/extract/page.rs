//! Page-level probes: main container, title, and quiz questions.

use std::sync::LazyLock;

use lessonkit_core::model::UNKNOWN_TITLE;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::normalize::{normalized_text, trimmed_text};

/// Decorative marker in front of a question label, e.g. `+ 2 🟦`.
static QUESTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\+\s*\d*\s*[^\w\s]*\s*").expect("question prefix pattern is valid"));

/// First element matching the candidate selectors, probed in order.
///
/// Logs a warning when the preferred (first) selector misses and a fallback is used.
pub fn find_main_container<'a>(document: &'a Html, candidates: &[(String, Selector)]) -> Option<ElementRef<'a>> {
    for (index, (source, selector)) in candidates.iter().enumerate() {
        if let Some(container) = document.select(selector).next() {
            if index > 0 {
                tracing::warn!(
                    preferred = %candidates[0].0,
                    fallback = %source,
                    "main content container not found, using fallback"
                );
            }
            return Some(container);
        }
    }
    None
}

/// Title from the first candidate with non-empty normalized text.
pub fn extract_title(document: &Html, candidates: &[Selector]) -> String {
    candidates
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(normalized_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Question labels inside the questions container, in document order.
///
/// Returns an empty list when the container is absent. A label holding only the
/// decorative prefix yields an empty string, which is kept.
pub fn extract_questions(document: &Html, container: &Selector, label: &Selector) -> Vec<String> {
    let Some(questions) = document.select(container).next() else {
        return Vec::new();
    };
    questions
        .select(label)
        .map(|element| strip_question_prefix(&trimmed_text(element)))
        .collect()
}

/// Remove a leading `+ <digits> <symbols>` marker and trim.
pub fn strip_question_prefix(text: &str) -> String {
    QUESTION_PREFIX.replace(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(list: &[&str]) -> Vec<(String, Selector)> {
        list.iter().map(|s| (s.to_string(), Selector::parse(s).unwrap())).collect()
    }

    fn default_containers() -> Vec<(String, Selector)> {
        selectors(&["div.training-module", "div.page-content", "div.content", "article", "main", "body"])
    }

    fn title_selectors() -> Vec<Selector> {
        ["h4.page-title", "h1.page-title", "h1", "title"].iter().map(|s| Selector::parse(s).unwrap()).collect()
    }

    fn question_selectors() -> (Selector, Selector) {
        (Selector::parse(r#"div[id="questionsDiv"]"#).unwrap(), Selector::parse("label.module-question").unwrap())
    }

    #[test]
    fn test_find_main_container_training_module() {
        let doc = Html::parse_document(
            r#"<html><body><div class="training-module"><p>Main content here</p></div></body></html>"#,
        );
        let container = find_main_container(&doc, &default_containers()).unwrap();
        assert_eq!(container.value().name(), "div");
        assert!(container.value().classes().any(|c| c == "training-module"));
    }

    #[test]
    fn test_find_main_container_fallbacks() {
        let doc = Html::parse_document(r#"<html><body><div class="page-content"><p>Alt</p></div></body></html>"#);
        let container = find_main_container(&doc, &default_containers()).unwrap();
        assert!(container.value().classes().any(|c| c == "page-content"));

        let doc = Html::parse_document("<html><body><main><p>Main tag</p></main></body></html>");
        let container = find_main_container(&doc, &default_containers()).unwrap();
        assert_eq!(container.value().name(), "main");
    }

    #[test]
    fn test_find_main_container_falls_back_to_body() {
        let doc = Html::parse_document(r#"<html><body><div class="other-content"><p>Some</p></div></body></html>"#);
        let container = find_main_container(&doc, &default_containers()).unwrap();
        assert_eq!(container.value().name(), "body");
    }

    #[test]
    fn test_find_main_container_none() {
        let doc = Html::parse_document("<html><body><p>Nothing matches</p></body></html>");
        let container = find_main_container(&doc, &selectors(&["div.training-module", "article"]));
        assert!(container.is_none());
    }

    #[test]
    fn test_title_precedence() {
        let doc = Html::parse_document(
            r#"<html><head><title>Doc</title></head><body>
                <h1>H1</h1>
                <h1 class="page-title">Page H1</h1>
                <h4 class="page-title">Target</h4>
            </body></html>"#,
        );
        assert_eq!(extract_title(&doc, &title_selectors()), "Target");
    }

    #[test]
    fn test_title_fallback_order() {
        let doc = Html::parse_document(
            r#"<html><head><title>Doc</title></head><body><h1>H1</h1><h1 class="page-title">Page H1</h1></body></html>"#,
        );
        assert_eq!(extract_title(&doc, &title_selectors()), "Page H1");

        let doc = Html::parse_document("<html><head><title>Doc</title></head><body><h1>First</h1><h1>Second</h1></body></html>");
        assert_eq!(extract_title(&doc, &title_selectors()), "First");

        let doc = Html::parse_document("<html><head><title>  Doc  Title </title></head><body></body></html>");
        assert_eq!(extract_title(&doc, &title_selectors()), "Doc Title");
    }

    #[test]
    fn test_title_skips_empty_candidates() {
        let doc = Html::parse_document(
            r#"<html><head><title>Doc</title></head><body><h4 class="page-title">   </h4></body></html>"#,
        );
        assert_eq!(extract_title(&doc, &title_selectors()), "Doc");
    }

    #[test]
    fn test_title_unknown() {
        let doc = Html::parse_document("<html><body><p>No title</p></body></html>");
        assert_eq!(extract_title(&doc, &title_selectors()), "Unknown Title");
    }

    #[test]
    fn test_extract_questions() {
        let doc = Html::parse_document(
            r#"<div id="questionsDiv">
                <label class="module-question">+ 2 🟦 What is the first question?</label>
                <label class="module-question">+ 1 🟦  Second question here</label>
                <label class="module-question">+3🟦Third question without spaces</label>
                <label class="module-question">Regular question without cube indicator</label>
            </div>"#,
        );
        let (container, label) = question_selectors();
        let questions = extract_questions(&doc, &container, &label);
        assert_eq!(
            questions,
            vec![
                "What is the first question?",
                "Second question here",
                "Third question without spaces",
                "Regular question without cube indicator",
            ]
        );
    }

    #[test]
    fn test_extract_questions_missing_container() {
        let doc = Html::parse_document("<div>Some other content</div>");
        let (container, label) = question_selectors();
        assert!(extract_questions(&doc, &container, &label).is_empty());
    }

    #[test]
    fn test_extract_questions_empty_container() {
        let doc = Html::parse_document(r#"<div id="questionsDiv"></div>"#);
        let (container, label) = question_selectors();
        assert!(extract_questions(&doc, &container, &label).is_empty());
    }

    #[test]
    fn test_extract_questions_degenerate_labels_are_kept() {
        let doc = Html::parse_document(
            r#"<div id="questionsDiv">
                <label class="module-question">+ ⬛ Malformed cube</label>
                <label class="module-question">+</label>
                <label class="module-question">    </label>
                <label class="other">Not a question</label>
            </div>"#,
        );
        let (container, label) = question_selectors();
        let questions = extract_questions(&doc, &container, &label);
        assert_eq!(questions, vec!["Malformed cube", "", ""]);
    }

    #[test]
    fn test_strip_question_prefix() {
        assert_eq!(strip_question_prefix("+ 2 🟦 What is X?"), "What is X?");
        assert_eq!(strip_question_prefix("+ 10 🟦"), "");
        assert_eq!(strip_question_prefix("What is 2 + 2?"), "What is 2 + 2?");
    }
}
