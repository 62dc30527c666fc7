//! Structured content extraction from course pages.
//!
//! ### Algorithm
//! - Probe an ordered list of candidate selectors for the main content container.
//! - Walk that container in document order with a depth bound, classifying each
//!   element into a content block (see [`walker`]).
//! - Extract the title (ordered title selectors) and quiz questions.
//!
//! ### Layouts
//! - [`Layout::Flat`]: list/table text and their images become sibling blocks.
//! - [`Layout::Structured`]: list items and table cells keep their text/image grouping.
//!
//! Extraction performs no I/O. Images are left unresolved; see [`crate::images`].

pub mod classify;
pub mod normalize;
pub mod page;
pub mod walker;

pub use classify::{ElementKind, classify};
pub use normalize::normalize_whitespace;
pub use page::{extract_questions, extract_title, find_main_container, strip_question_prefix};
pub use walker::{WalkOptions, Walker};

use lessonkit_core::{AppConfig, Error, ExtractionResult, Layout};
use scraper::{Html, Selector};

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Flat or structured list/table output (default: structured)
    pub layout: Layout,

    /// Deepest container nesting visited (default: 5)
    pub max_depth: usize,

    /// Candidate main-container selectors, probed in order
    pub content_selectors: Vec<String>,

    /// Candidate title selectors, probed in order
    pub title_selectors: Vec<String>,

    /// `id` of the questions container (default: "questionsDiv")
    pub questions_container_id: String,

    /// Question label selector within the container (default: "label.module-question")
    pub question_selector: String,

    /// Class marking a `div` as an alert (default: "card")
    pub alert_class: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            layout: config.layout,
            max_depth: config.max_depth,
            content_selectors: config.content_selectors.clone(),
            title_selectors: config.title_selectors.clone(),
            questions_container_id: config.questions_container_id.clone(),
            question_selector: config.question_selector.clone(),
            alert_class: config.alert_class.clone(),
        }
    }
}

fn parse_selector(source: &str) -> Result<Selector, Error> {
    Selector::parse(source).map_err(|e| Error::InvalidInput(format!("invalid selector `{source}`: {e}")))
}

/// Extractor with its selectors compiled once.
#[derive(Debug)]
pub struct PageExtractor {
    config: ExtractConfig,
    containers: Vec<(String, Selector)>,
    titles: Vec<Selector>,
    questions_container: Selector,
    question_label: Selector,
}

impl PageExtractor {
    /// Compile the configured selectors.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if any selector does not parse.
    pub fn new(config: ExtractConfig) -> Result<Self, Error> {
        let containers = config
            .content_selectors
            .iter()
            .map(|s| parse_selector(s).map(|sel| (s.clone(), sel)))
            .collect::<Result<Vec<_>, _>>()?;
        let titles = config
            .title_selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;
        let questions_container = parse_selector(&format!(r#"[id="{}"]"#, config.questions_container_id))?;
        let question_label = parse_selector(&config.question_selector)?;

        Ok(Self { config, containers, titles, questions_container, question_label })
    }

    /// Extract title, blocks, and questions from an HTML document.
    ///
    /// Never fails for parseable HTML: when no container candidate matches,
    /// the error placeholder result is returned instead.
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let document = Html::parse_document(html);

        let Some(container) = find_main_container(&document, &self.containers) else {
            tracing::warn!("no content container matched; returning placeholder");
            return ExtractionResult::placeholder();
        };

        let title = extract_title(&document, &self.titles);

        let options = WalkOptions {
            layout: self.config.layout,
            max_depth: self.config.max_depth,
            alert_class: &self.config.alert_class,
        };
        let blocks = Walker::new(options).run(container);

        let questions = extract_questions(&document, &self.questions_container, &self.question_label);

        tracing::debug!(
            title = %title,
            blocks = blocks.len(),
            questions = questions.len(),
            "extracted page"
        );

        ExtractionResult::new(title, blocks, questions)
    }
}

/// Extract a page with the default configuration.
pub fn extract_page(html: &str) -> Result<ExtractionResult, Error> {
    let extractor = PageExtractor::new(ExtractConfig::default())?;
    Ok(extractor.extract(html))
}
