//! Core types and shared functionality for lessonkit.
//!
//! This crate provides:
//! - The extracted page model (content blocks, extraction result)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;

pub use config::{AppConfig, ConfigError, Layout};
pub use error::Error;
pub use model::{ContentBlock, ExtractionResult, ImageBlock, ListBlock, ListItems, ListType, SubBlock, TableBlock};
