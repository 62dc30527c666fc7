//! Element classification.
//!
//! Maps a single element to its content block by tag name (and, for alerts, a
//! marker class) without looking at siblings. `None` means "skip": the element
//! carries nothing on its own, although the walker may still descend into it.

use std::sync::LazyLock;

use lessonkit_core::{ContentBlock, ImageBlock, ListBlock, ListItems, ListType, TableBlock};
use regex::Regex;
use scraper::ElementRef;
use scraper::node::Element;

use super::normalize::{normalized_text, trimmed_text};

static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"language-(\w+)").expect("language class pattern is valid"));

/// Tags the walker treats specially or classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading(u8),
    Paragraph,
    Code,
    List(ListType),
    Image,
    Table,
    ListItem,
    TableCell,
    Other,
}

impl ElementKind {
    pub fn of(element: &Element) -> Self {
        match element.name() {
            "h1" => ElementKind::Heading(1),
            "h2" => ElementKind::Heading(2),
            "h3" => ElementKind::Heading(3),
            "h4" => ElementKind::Heading(4),
            "h5" => ElementKind::Heading(5),
            "h6" => ElementKind::Heading(6),
            "p" => ElementKind::Paragraph,
            "pre" => ElementKind::Code,
            "ol" => ElementKind::List(ListType::Ordered),
            "ul" => ElementKind::List(ListType::Unordered),
            "img" => ElementKind::Image,
            "table" => ElementKind::Table,
            "li" => ElementKind::ListItem,
            "td" | "th" => ElementKind::TableCell,
            _ => ElementKind::Other,
        }
    }
}

/// Whether the walker descends into an element of this tag.
///
/// `thead`/`tbody`/`tfoot` are included because the HTML parser wraps table
/// rows in them even when the markup does not.
pub fn is_container(tag: &str) -> bool {
    matches!(
        tag,
        "div" | "article" | "section" | "figure" | "p" | "table" | "thead" | "tbody" | "tfoot" | "tr" | "ul" | "ol"
    )
}

/// Classify one element, or `None` to skip it.
pub fn classify(element: ElementRef<'_>, alert_class: &str) -> Option<ContentBlock> {
    match ElementKind::of(element.value()) {
        ElementKind::Heading(level) => Some(heading(element, level)),
        ElementKind::Paragraph => paragraph(element),
        ElementKind::Code => Some(code_block(element)),
        ElementKind::List(list_type) => Some(flat_list(element, list_type)),
        ElementKind::Image => Some(ContentBlock::Image(image(element))),
        ElementKind::Table => Some(ContentBlock::Table(TableBlock::summary())),
        ElementKind::Other if is_alert(element.value(), alert_class) => alert(element),
        _ => None,
    }
}

pub fn heading(element: ElementRef<'_>, level: u8) -> ContentBlock {
    ContentBlock::Heading { level, text: normalized_text(element) }
}

/// Paragraph text, or `None` when the paragraph holds only whitespace.
pub fn paragraph(element: ElementRef<'_>) -> Option<ContentBlock> {
    let text = normalized_text(element);
    if text.is_empty() { None } else { Some(ContentBlock::Paragraph { text }) }
}

/// Code keeps its internal whitespace; only the ends are trimmed.
pub fn code_block(element: ElementRef<'_>) -> ContentBlock {
    let language = element.value().attr("class").map(language_of).unwrap_or_default();
    ContentBlock::Code { language, text: trimmed_text(element) }
}

/// Language token from a `language-<token>` class, or empty.
pub fn language_of(class_attr: &str) -> String {
    LANGUAGE_CLASS
        .captures(class_attr)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Flat list: the trimmed text of each direct `li`, empty items included.
pub fn flat_list(element: ElementRef<'_>, list_type: ListType) -> ContentBlock {
    let items = element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(trimmed_text)
        .collect();
    ContentBlock::List(ListBlock { list_type, items: ListItems::Flat(items) })
}

pub fn image(element: ElementRef<'_>) -> ImageBlock {
    let el = element.value();
    ImageBlock::new(el.attr("src").unwrap_or_default(), el.attr("alt"))
}

pub fn is_alert(element: &Element, alert_class: &str) -> bool {
    element.name() == "div" && element.classes().any(|class| class == alert_class)
}

/// Alert text, or `None` when the box is empty.
pub fn alert(element: ElementRef<'_>) -> Option<ContentBlock> {
    let text = normalized_text(element);
    if text.is_empty() { None } else { Some(ContentBlock::Alert { text }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn classify_fragment(html: &str, selector: &str) -> Option<ContentBlock> {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        let element = doc.select(&selector).next().unwrap();
        classify(element, "card")
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let html = format!("<h{level}>Heading {level}</h{level}>");
            let block = classify_fragment(&html, &format!("h{level}"));
            assert_eq!(block, Some(ContentBlock::Heading { level, text: format!("Heading {level}") }));
        }
    }

    #[test]
    fn test_heading_with_nested_elements() {
        let block = classify_fragment("<h2>Title with <b>bold</b> and <i>italic</i> text</h2>", "h2");
        assert_eq!(block, Some(ContentBlock::Heading { level: 2, text: "Title with bold and italic text".into() }));
    }

    #[test]
    fn test_paragraph_normalizes_whitespace() {
        let block = classify_fragment("<p>\n  Multiple\n  lines with    spaces\n</p>", "p");
        assert_eq!(block, Some(ContentBlock::Paragraph { text: "Multiple lines with spaces".into() }));
    }

    #[test]
    fn test_empty_paragraph_is_skipped() {
        assert_eq!(classify_fragment("<p>    </p>", "p"), None);
    }

    #[test]
    fn test_code_block_with_language() {
        let block = classify_fragment(r#"<pre class="language-python">def test(): pass</pre>"#, "pre");
        assert_eq!(block, Some(ContentBlock::Code { language: "python".into(), text: "def test(): pass".into() }));
    }

    #[test]
    fn test_code_block_without_language() {
        let block = classify_fragment(r#"<pre>print("hello")</pre>"#, "pre");
        assert_eq!(block, Some(ContentBlock::Code { language: String::new(), text: r#"print("hello")"#.into() }));
    }

    #[test]
    fn test_code_block_multiple_classes() {
        let block = classify_fragment(r#"<pre class="code-block language-javascript highlight">const x = 1;</pre>"#, "pre");
        assert_eq!(block, Some(ContentBlock::Code { language: "javascript".into(), text: "const x = 1;".into() }));
    }

    #[test]
    fn test_empty_code_block_keeps_language() {
        let block = classify_fragment(r#"<pre class="language-ruby">    </pre>"#, "pre");
        assert_eq!(block, Some(ContentBlock::Code { language: "ruby".into(), text: String::new() }));
    }

    #[test]
    fn test_code_block_preserves_internal_whitespace() {
        let block = classify_fragment("<pre>fn main() {\n    let  x = 1;\n}</pre>", "pre");
        assert_eq!(block, Some(ContentBlock::Code { language: String::new(), text: "fn main() {\n    let  x = 1;\n}".into() }));
    }

    #[test]
    fn test_ordered_list() {
        let block = classify_fragment("<ol><li>First</li><li>Second</li></ol>", "ol");
        assert_eq!(
            block,
            Some(ContentBlock::List(ListBlock {
                list_type: ListType::Ordered,
                items: ListItems::Flat(vec!["First".into(), "Second".into()]),
            }))
        );
    }

    #[test]
    fn test_unordered_list_with_nested_elements() {
        let block = classify_fragment("<ul><li>Item with <b>bold</b></li><li><a href='#'>Link</a> item</li></ul>", "ul");
        assert_eq!(
            block,
            Some(ContentBlock::List(ListBlock {
                list_type: ListType::Unordered,
                items: ListItems::Flat(vec!["Item with bold".into(), "Link item".into()]),
            }))
        );
    }

    #[test]
    fn test_list_keeps_empty_items() {
        let block = classify_fragment("<ol><li>  </li><li></li></ol>", "ol");
        assert_eq!(
            block,
            Some(ContentBlock::List(ListBlock {
                list_type: ListType::Ordered,
                items: ListItems::Flat(vec![String::new(), String::new()]),
            }))
        );
    }

    #[test]
    fn test_image_alt_fallback() {
        let with_alt = classify_fragment(r#"<img src="test.jpg" alt="Test Image">"#, "img");
        assert_eq!(with_alt, Some(ContentBlock::Image(ImageBlock::new("test.jpg", Some("Test Image")))));

        let Some(ContentBlock::Image(no_alt)) = classify_fragment(r#"<img src="x.jpg">"#, "img") else {
            panic!("expected image");
        };
        assert_eq!(no_alt.alt, "Image");

        let Some(ContentBlock::Image(empty_alt)) = classify_fragment(r#"<img src="x.jpg" alt="">"#, "img") else {
            panic!("expected image");
        };
        assert_eq!(empty_alt.alt, "Image");
    }

    #[test]
    fn test_image_without_src_defaults_to_empty() {
        let Some(ContentBlock::Image(image)) = classify_fragment(r#"<img src="" alt="">"#, "img") else {
            panic!("expected image");
        };
        assert_eq!(image.src, "");
        assert_eq!(image.alt, "Image");
        assert!(image.local_path.is_none());
    }

    #[test]
    fn test_table_summary() {
        let block = classify_fragment("<table><tr><td>A</td></tr></table>", "table");
        assert_eq!(block, Some(ContentBlock::Table(TableBlock::summary())));
    }

    #[test]
    fn test_alert() {
        let block = classify_fragment(r#"<div class="card">  Warning: <b>Important</b>   alert message </div>"#, "div");
        assert_eq!(block, Some(ContentBlock::Alert { text: "Warning: Important alert message".into() }));
    }

    #[test]
    fn test_empty_alert_is_skipped() {
        assert_eq!(classify_fragment(r#"<div class="card">    </div>"#, "div"), None);
    }

    #[test]
    fn test_alert_requires_marker_class() {
        assert_eq!(classify_fragment(r#"<div class="cardinal">Text</div>"#, "div"), None);
        assert_eq!(classify_fragment(r#"<section class="card">Text</section>"#, "section"), None);
    }

    #[test]
    fn test_unclassified_element() {
        assert_eq!(classify_fragment("<span>Ignored</span>", "span"), None);
    }

    #[test]
    fn test_language_of() {
        assert_eq!(language_of("language-rust"), "rust");
        assert_eq!(language_of("hljs language-c_sharp"), "c_sharp");
        assert_eq!(language_of("lang-rust"), "");
    }

    #[test]
    fn test_is_container() {
        for tag in ["div", "article", "section", "figure", "p", "table", "tbody", "tr", "ul", "ol"] {
            assert!(is_container(tag), "{tag} should be a container");
        }
        for tag in ["span", "li", "td", "img", "pre", "h1"] {
            assert!(!is_container(tag), "{tag} should not be a container");
        }
    }
}
