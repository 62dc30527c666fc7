//! Rendering an extraction result as LLM-readable text or a JSON dump.
//!
//! Text output is line-oriented: a `# title` line, each block followed by a
//! blank line, then a `## Questions` section when questions were found.

use lessonkit_core::{ContentBlock, Error, ExtractionResult, ImageBlock, ListBlock, ListItems, SubBlock, TableBlock};

/// Placeholder line for a summarized (flat-layout) table.
pub const TABLE_PLACEHOLDER: &str = "[Table content summarized]";

/// Output representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render `result` in the requested format.
pub fn render(result: &ExtractionResult, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => render_json(result),
    }
}

/// Pretty-printed JSON (2-space indent).
pub fn render_json(result: &ExtractionResult) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Plain-text rendering for language models.
pub fn render_text(result: &ExtractionResult) -> String {
    let mut lines = vec![format!("# {}", result.title), String::new()];

    for block in &result.blocks {
        render_block(block, &mut lines);
    }

    if let Some(questions) = &result.questions {
        lines.push("## Questions".to_string());
        lines.push(String::new());
        for (i, question) in questions.iter().enumerate() {
            lines.push(format!("Question {}: {}", i + 1, question));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn render_block(block: &ContentBlock, lines: &mut Vec<String>) {
    match block {
        ContentBlock::Heading { level, text } => {
            lines.push(format!("{} {}", "#".repeat(usize::from(*level)), text));
        }
        ContentBlock::Paragraph { text } => lines.push(text.clone()),
        ContentBlock::Code { language, text } => {
            lines.push(format!("```{language}"));
            lines.push(text.clone());
            lines.push("```".to_string());
        }
        ContentBlock::List(list) => render_list(list, lines),
        ContentBlock::Image(image) => lines.push(image_reference(image)),
        ContentBlock::Table(TableBlock::Summary { .. }) => lines.push(TABLE_PLACEHOLDER.to_string()),
        ContentBlock::Table(TableBlock::Rows { rows }) => {
            lines.push(String::new());
            lines.push("| Table Content |".to_string());
            lines.push("| ------------- |".to_string());
            for row in rows {
                let cells: Vec<String> = row.iter().map(|cell| render_cell(cell)).collect();
                lines.push(format!("| {} |", cells.join(" | ")));
            }
        }
        ContentBlock::Alert { text } => {
            lines.push("---".to_string());
            lines.push("Note:".to_string());
            lines.push(text.clone());
            lines.push("---".to_string());
        }
    }
    lines.push(String::new());
}

fn render_list(list: &ListBlock, lines: &mut Vec<String>) {
    let prefix = |i: usize| if list.list_type.is_ordered() { format!("{}.", i + 1) } else { "-".to_string() };

    match &list.items {
        ListItems::Flat(items) => {
            for (i, item) in items.iter().enumerate() {
                lines.push(format!("{} {}", prefix(i), item));
            }
        }
        ListItems::Structured(items) => {
            for (i, item) in items.iter().enumerate() {
                let text = match item.first() {
                    Some(SubBlock::Text { content }) => content.as_str(),
                    _ => "",
                };
                lines.push(format!("{} {}", prefix(i), text));
                for image in item.iter().filter_map(SubBlock::as_image) {
                    lines.push(format!("  {}", image_reference(image)));
                }
            }
        }
    }
}

fn render_cell(cell: &[SubBlock]) -> String {
    cell.iter()
        .map(|sub| match sub {
            SubBlock::Text { content } => content.clone(),
            SubBlock::Image(image) => image_reference(image),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `![alt](local)` for a resolved image, `[Image: alt (file)]` otherwise.
fn image_reference(image: &ImageBlock) -> String {
    match image.local_path.as_deref().filter(|p| !p.is_empty()) {
        Some(local) => format!("![{}]({})", image.alt, local),
        None => format!("[Image: {} ({})]", image.alt, image.file_name()),
    }
}
