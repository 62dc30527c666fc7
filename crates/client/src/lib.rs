//! Client code for lessonkit.
//!
//! This crate provides page loading, content extraction, image resolution,
//! and rendering used by the CLI.

pub mod extract;
pub mod fetch;
pub mod images;
pub mod render;

pub use extract::{ExtractConfig, PageExtractor, extract_page};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, LoadedPage, Source, load_source, validate_url};
pub use images::{ImageOptions, ImageResolver, ResolvedImage};
pub use render::{OutputFormat, render, render_json, render_text};
