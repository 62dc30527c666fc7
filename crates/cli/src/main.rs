//! lessonkit entry point.
//!
//! Converts a course page (local file or URL) into structured JSON or
//! LLM-readable text. Logging goes to stderr so stdout carries only the output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use lessonkit_client::{
    ExtractConfig, FetchClient, FetchConfig, ImageOptions, ImageResolver, OutputFormat, PageExtractor, Source,
    load_source, render,
};
use lessonkit_core::{AppConfig, Error, Layout};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lessonkit", about = "Extract course page content for language models")]
#[command(group(ArgGroup::new("source").required(true).args(["file", "url"])))]
struct Cli {
    /// Local HTML file to extract
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// URL of the page to fetch and extract
    #[arg(short, long)]
    url: Option<String>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'm', long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Copy or download referenced images
    #[arg(short, long)]
    download_images: bool,

    /// Directory for copied and downloaded images
    #[arg(short, long)]
    image_dir: Option<PathBuf>,

    /// List/table representation (overrides config)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Deepest container nesting visited (overrides config)
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Flat,
    Structured,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => Layout::Flat,
            LayoutArg::Structured => Layout::Structured,
        }
    }
}

impl Cli {
    fn source(&self) -> Option<Source> {
        match (&self.file, &self.url) {
            (Some(path), _) => Some(Source::File(path.clone())),
            (None, Some(url)) => Some(Source::Url(url.clone())),
            (None, None) => None,
        }
    }

    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if self.download_images {
            config.download_images = true;
        }
        if let Some(dir) = &self.image_dir {
            config.image_dir = dir.clone();
        }
        if let Some(layout) = self.layout {
            config.layout = layout.into();
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid command-line options")?;

    let source = cli.source().context("either --file or --url is required")?;

    let client = FetchClient::new(FetchConfig::from(&config))?;
    let page = load_source(&source, &client).await?;

    let extractor = PageExtractor::new(ExtractConfig::from(&config))?;
    let mut result = extractor.extract(&page.html);
    tracing::info!(
        title = %result.title,
        blocks = result.blocks.len(),
        questions = result.questions.as_ref().map_or(0, Vec::len),
        "extracted content"
    );

    if config.download_images {
        let resolver = ImageResolver::new(ImageOptions::from(&config), Some(page.base_context.clone()))?;
        result = resolver.resolve_images(result).await;
    }

    let rendered = render(&result, cli.format.into())?;

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .map_err(|source| Error::WriteFailed { path: path.display().to_string(), source })?;
            tracing::info!(path = %path.display(), "content saved");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
