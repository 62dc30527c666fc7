//! Depth-bounded, document-order walk over the main content container.
//!
//! The walker visits the direct children of a container, dispatches each one on
//! its [`ElementKind`], and descends into recognized container elements with
//! `depth + 1`. Blocks are appended to an owned, append-only buffer so every
//! sub-case (list item, table cell, generic container) can be exercised on its
//! own.
//!
//! In [`Layout::Structured`], `ul`/`ol`/`table` children are consumed whole by
//! the structured sub-routines and never descended into again.

use lessonkit_core::{ContentBlock, Layout, ListBlock, ListItems, ListType, SubBlock, TableBlock};
use scraper::ElementRef;

use super::classify::{self, ElementKind, is_container};
use super::normalize::{normalized_text, trimmed_text};

/// Walker settings taken from the extraction configuration.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions<'c> {
    pub layout: Layout,
    pub max_depth: usize,
    pub alert_class: &'c str,
}

/// Append-only block buffer filled by one walk.
pub struct Walker<'c> {
    options: WalkOptions<'c>,
    blocks: Vec<ContentBlock>,
}

impl<'c> Walker<'c> {
    pub fn new(options: WalkOptions<'c>) -> Self {
        Self { options, blocks: Vec::new() }
    }

    /// Walk `container` starting at depth 0 and return the collected blocks.
    pub fn run(mut self, container: ElementRef<'_>) -> Vec<ContentBlock> {
        self.walk(container, 0);
        self.blocks
    }

    /// Blocks collected so far.
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }

    /// Visit the direct children of `container`; nothing is emitted past `max_depth`.
    pub fn walk(&mut self, container: ElementRef<'_>, depth: usize) {
        if depth > self.options.max_depth {
            return;
        }

        for child in container.children().filter_map(ElementRef::wrap) {
            let consumed = self.dispatch(child);
            if !consumed && is_container(child.value().name()) {
                self.walk(child, depth + 1);
            }
        }
    }

    /// Handle one element. Returns `true` when its subtree was fully consumed.
    fn dispatch(&mut self, element: ElementRef<'_>) -> bool {
        let structured = self.options.layout == Layout::Structured;
        match ElementKind::of(element.value()) {
            ElementKind::Image => {
                self.image(element);
                false
            }
            ElementKind::ListItem => {
                self.list_item(element);
                false
            }
            ElementKind::TableCell => {
                self.table_cell(element);
                false
            }
            ElementKind::List(list_type) if structured => {
                self.structured_list(element, list_type);
                true
            }
            ElementKind::Table if structured => {
                self.structured_table(element);
                true
            }
            _ => {
                self.push(classify::classify(element, self.options.alert_class));
                false
            }
        }
    }

    fn push(&mut self, block: Option<ContentBlock>) {
        if let Some(block) = block {
            tracing::trace!(kind = block.kind(), "classified block");
            self.blocks.push(block);
        }
    }

    /// A standalone image. A missing `src` yields an empty reference.
    pub fn image(&mut self, element: ElementRef<'_>) {
        let image = classify::image(element);
        tracing::debug!(src = %image.src, alt = %image.alt, "processed image");
        self.blocks.push(ContentBlock::Image(image));
    }

    /// Flat list item: its text as a paragraph, then every image inside it.
    pub fn list_item(&mut self, element: ElementRef<'_>) {
        self.text_then_images(element);
    }

    /// Flat table cell: its text as a paragraph, then every image inside it.
    pub fn table_cell(&mut self, element: ElementRef<'_>) {
        self.text_then_images(element);
    }

    fn text_then_images(&mut self, element: ElementRef<'_>) {
        let text = normalized_text(element);
        if !text.is_empty() {
            self.blocks.push(ContentBlock::Paragraph { text });
        }
        for image in descendant_images(element) {
            self.image(image);
        }
    }

    /// Structured list: each non-empty `li` becomes a text/image group.
    pub fn structured_list(&mut self, element: ElementRef<'_>, list_type: ListType) {
        let items: Vec<Vec<SubBlock>> = child_elements(element, &["li"])
            .map(grouped_content)
            .filter(|item| !item.is_empty())
            .collect();

        if !items.is_empty() {
            self.blocks.push(ContentBlock::List(ListBlock { list_type, items: ListItems::Structured(items) }));
        }
    }

    /// Structured table: rows of non-empty cells, each a text/image group.
    pub fn structured_table(&mut self, element: ElementRef<'_>) {
        let rows: Vec<Vec<Vec<SubBlock>>> = table_rows(element)
            .into_iter()
            .map(|row| {
                child_elements(row, &["td", "th"])
                    .map(grouped_content)
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();

        if !rows.is_empty() {
            self.blocks.push(ContentBlock::Table(TableBlock::Rows { rows }));
        }
    }
}

/// Text of an item or cell (trimmed, if any) followed by each image it contains.
fn grouped_content(element: ElementRef<'_>) -> Vec<SubBlock> {
    let mut content = Vec::new();

    let text = trimmed_text(element);
    if !text.is_empty() {
        content.push(SubBlock::Text { content: text });
    }

    for image in descendant_images(element) {
        let image = classify::image(image);
        tracing::debug!(src = %image.src, alt = %image.alt, "processed nested image");
        content.push(SubBlock::Image(image));
    }

    content
}

/// All `img` elements below `element`, in document order.
fn descendant_images<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "img")
}

/// Direct element children whose tag is one of `tags`.
fn child_elements<'a>(element: ElementRef<'a>, tags: &'static [&'static str]) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| tags.contains(&child.value().name()))
}

/// Rows of a table: direct `tr` children, or those of its `thead`/`tbody`/`tfoot` sections.
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(child_elements(child, &["tr"])),
            _ => {}
        }
    }
    rows
}
