//! Extracted page structure.
//!
//! The serialized form keeps stable key names (`title`, `content`, `questions`)
//! and tags every block with a `type` field, so the JSON dump can be read back
//! or consumed by other tools without knowing the Rust types.

use serde::{Deserialize, Serialize};

/// Title used when no title-bearing element is found.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Alt text used when an image has no (or an empty) `alt` attribute.
pub const DEFAULT_ALT: &str = "Image";

/// Note carried by a flat-layout table block.
pub const TABLE_SUMMARY: &str = "Table content (summarized for brevity)";

/// One classified unit of page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Code {
        language: String,
        text: String,
    },
    List(ListBlock),
    Image(ImageBlock),
    Table(TableBlock),
    Alert {
        text: String,
    },
}

impl ContentBlock {
    /// Name of the block kind as it appears in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Code { .. } => "code",
            ContentBlock::List(_) => "list",
            ContentBlock::Image(_) => "image",
            ContentBlock::Table(_) => "table",
            ContentBlock::Alert { .. } => "alert",
        }
    }
}

/// Ordered (`ol`) or unordered (`ul`) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ordered,
    Unordered,
}

impl ListType {
    pub fn is_ordered(self) -> bool {
        matches!(self, ListType::Ordered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    pub list_type: ListType,
    pub items: ListItems,
}

/// List items in one of the two layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItems {
    /// Each item is the trimmed text of its `li`.
    Flat(Vec<String>),
    /// Each item is its text followed by the images it contains.
    Structured(Vec<Vec<SubBlock>>),
}

impl ListItems {
    pub fn len(&self) -> usize {
        match self {
            ListItems::Flat(items) => items.len(),
            ListItems::Structured(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An image reference, with the local copy when one was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub local_path: Option<String>,
}

impl ImageBlock {
    /// Build an unresolved image block, applying the default alt text.
    pub fn new(src: impl Into<String>, alt: Option<&str>) -> Self {
        let alt = match alt {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => DEFAULT_ALT.to_string(),
        };
        Self { src: src.into(), alt, local_path: None }
    }

    /// Last path segment of the source reference.
    pub fn file_name(&self) -> &str {
        self.src.rsplit('/').next().unwrap_or(&self.src)
    }
}

/// Table in one of the two layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableBlock {
    /// Rows → cells → cell content.
    Rows { rows: Vec<Vec<Vec<SubBlock>>> },
    /// Fixed placeholder note.
    Summary { text: String },
}

impl TableBlock {
    pub fn summary() -> Self {
        TableBlock::Summary { text: TABLE_SUMMARY.to_string() }
    }
}

/// Content nested in a structured list item or table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubBlock {
    Text { content: String },
    Image(ImageBlock),
}

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    #[serde(rename = "content")]
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
}

impl ExtractionResult {
    /// Build a result; an empty question list is dropped rather than kept as `[]`.
    pub fn new(title: impl Into<String>, blocks: Vec<ContentBlock>, questions: Vec<String>) -> Self {
        let questions = if questions.is_empty() { None } else { Some(questions) };
        Self { title: title.into(), blocks, questions }
    }

    /// Placeholder returned when no content container could be found.
    pub fn placeholder() -> Self {
        Self {
            title: "Error".to_string(),
            blocks: vec![ContentBlock::Paragraph { text: "Could not extract content".to_string() }],
            questions: None,
        }
    }

    /// Every image in document order, including those nested in lists and tables.
    pub fn images(&self) -> Vec<&ImageBlock> {
        let mut images = Vec::new();
        for block in &self.blocks {
            match block {
                ContentBlock::Image(image) => images.push(image),
                ContentBlock::List(ListBlock { items: ListItems::Structured(items), .. }) => {
                    images.extend(items.iter().flatten().filter_map(SubBlock::as_image));
                }
                ContentBlock::Table(TableBlock::Rows { rows }) => {
                    images.extend(rows.iter().flatten().flatten().filter_map(SubBlock::as_image));
                }
                _ => {}
            }
        }
        images
    }

    /// Mutable counterpart of [`ExtractionResult::images`], same order.
    pub fn images_mut(&mut self) -> Vec<&mut ImageBlock> {
        let mut images = Vec::new();
        for block in &mut self.blocks {
            match block {
                ContentBlock::Image(image) => images.push(image),
                ContentBlock::List(ListBlock { items: ListItems::Structured(items), .. }) => {
                    images.extend(items.iter_mut().flatten().filter_map(SubBlock::as_image_mut));
                }
                ContentBlock::Table(TableBlock::Rows { rows }) => {
                    images.extend(rows.iter_mut().flatten().flatten().filter_map(SubBlock::as_image_mut));
                }
                _ => {}
            }
        }
        images
    }
}

/// Image accessors, used to collect nested images in document order.
impl SubBlock {
    pub fn as_image(&self) -> Option<&ImageBlock> {
        match self {
            SubBlock::Image(image) => Some(image),
            SubBlock::Text { .. } => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageBlock> {
        match self {
            SubBlock::Image(image) => Some(image),
            SubBlock::Text { .. } => None,
        }
    }
}
