//! CLI application logic.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use deckgen_ingest::{ingest_path, ingest_url};
use deckgen_pdf::export_pdf;
use deckgen_pptx::DeckWriter;
use deckgen_render::{rasterize, render};
use deckgen_schema::{
    Complexity, GenerationConfig, SlideRecord, SynthesisMode, ThemeConfig,
};
use deckgen_synthesis::{
    CompletionRequest, DeckSession, HttpModelClient, ModelClient, SynthesisError,
};

/// Synthesis mode flag.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ModeArg {
    /// Deterministic partition of the table, no model calls
    Split,
    /// Model-backed outline synthesis
    #[default]
    Expand,
}

impl From<ModeArg> for SynthesisMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Split => SynthesisMode::Split,
            ModeArg::Expand => SynthesisMode::Expand,
        }
    }
}

/// Visual complexity flag.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ComplexityArg {
    Simple,
    #[default]
    Standard,
    Rich,
}

impl From<ComplexityArg> for Complexity {
    fn from(c: ComplexityArg) -> Self {
        match c {
            ComplexityArg::Simple => Complexity::Simple,
            ComplexityArg::Standard => Complexity::Standard,
            ComplexityArg::Rich => Complexity::Rich,
        }
    }
}

/// Export container format.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Pptx,
    Pdf,
    Png,
}

/// Theme selection shared by rendering subcommands.
#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Preset theme name
    #[arg(long, default_value = "modern")]
    theme: String,

    /// Visual complexity tier
    #[arg(long, value_enum, default_value_t = ComplexityArg::Standard)]
    complexity: ComplexityArg,

    /// Custom palette TOML; overrides --theme
    #[arg(long)]
    theme_file: Option<PathBuf>,
}

impl ThemeArgs {
    fn resolve(&self) -> Result<ThemeConfig> {
        let complexity: Complexity = self.complexity.into();
        let theme = if let Some(path) = &self.theme_file {
            let toml = fs::read_to_string(path)
                .with_context(|| format!("Failed to read theme file: {}", path.display()))?;
            ThemeConfig::from_toml_str(&toml, complexity)
                .with_context(|| format!("Invalid theme file: {}", path.display()))?
        } else {
            ThemeConfig::preset(&self.theme, complexity)
        };
        log::debug!("Resolved theme '{}' at {:?} complexity", theme.name, theme.complexity);
        Ok(theme)
    }
}

/// Model access shared by synthesis subcommands.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// Chat-completions endpoint base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Model identifier
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
}

impl ModelArgs {
    fn client(&self) -> Result<HttpModelClient> {
        let key = match &self.api_key {
            Some(k) => k.clone(),
            None => std::env::var("OPENAI_API_KEY")
                .context("No API key: pass --api-key or set OPENAI_API_KEY")?,
        };
        let client = match &self.api_url {
            Some(url) => HttpModelClient::with_url(url, key),
            None => HttpModelClient::new(key),
        };
        client.context("Failed to build model client")
    }
}

/// Stand-in client for paths that must never reach the network.
struct OfflineClient;

impl ModelClient for OfflineClient {
    fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> deckgen_synthesis::Result<String> {
        Err(SynthesisError::MalformedResponse(
            "no model client configured".to_string(),
        ))
    }
}

#[derive(Parser)]
#[command(name = "deckgen")]
#[command(author, version, about = "Data in, presentation out", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a slide deck from a data source
    Generate {
        /// Input file (xlsx/csv/tsv/text) or http(s) URL
        input: String,

        /// Output deck file
        #[arg(short, long, default_value = "deck.json")]
        output: PathBuf,

        /// Synthesis mode
        #[arg(long, value_enum, default_value_t = ModeArg::Expand)]
        mode: ModeArg,

        /// Target slide count
        #[arg(long, default_value_t = 8)]
        pages: usize,

        /// Extra natural-language instructions for the model
        #[arg(long)]
        instructions: Option<String>,

        /// Restrict synthesis to these slide types (repeatable)
        #[arg(long = "template")]
        templates: Vec<String>,

        #[command(flatten)]
        theme: ThemeArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Render a deck to per-slide SVG files
    Render {
        /// Deck file produced by `generate`
        deck: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "slides")]
        output: PathBuf,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Export a deck to PPTX, PDF, or PNG
    Export {
        /// Deck file produced by `generate`
        deck: PathBuf,

        /// Output file (pptx/pdf) or directory (png)
        #[arg(short, long)]
        output: PathBuf,

        /// Container format
        #[arg(long, value_enum)]
        format: ExportFormat,

        /// Presentation title for document metadata
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Regenerate a single slide in place
    Regen {
        /// Deck file to update
        deck: PathBuf,

        /// Zero-based slide index
        index: usize,

        /// The original data source the deck was generated from
        input: String,

        #[command(flatten)]
        theme: ThemeArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Apply a free-text instruction to the whole deck
    Modify {
        /// Deck file to update
        deck: PathBuf,

        /// Instruction, e.g. "merge the last two slides"
        instruction: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// List available theme presets
    Themes,
}

/// CLI entry point.
pub fn run_cli() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            mode,
            pages,
            instructions,
            templates,
            theme,
            model,
        } => generate_command(&input, &output, mode, pages, instructions, templates, &theme, &model),
        Commands::Render { deck, output, theme } => render_command(&deck, &output, &theme),
        Commands::Export {
            deck,
            output,
            format,
            title,
            theme,
        } => export_command(&deck, &output, format, title.as_deref(), &theme),
        Commands::Regen {
            deck,
            index,
            input,
            theme,
            model,
        } => regen_command(&deck, index, &input, &theme, &model),
        Commands::Modify {
            deck,
            instruction,
            model,
        } => modify_command(&deck, &instruction, &model),
        Commands::Themes => {
            for name in ThemeConfig::preset_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn ingest_source(input: &str) -> Result<deckgen_schema::ParsedTable> {
    if input.starts_with("http://") || input.starts_with("https://") {
        ingest_url(input).with_context(|| format!("Failed to fetch: {}", input))
    } else {
        ingest_path(input).with_context(|| format!("Failed to read: {}", input))
    }
}

fn load_deck(path: &Path) -> Result<Vec<SlideRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Deck file is not valid JSON: {}", path.display()))
}

fn save_deck(path: &Path, deck: &[SlideRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(deck).context("Failed to serialize deck")?;
    fs::write(path, json).with_context(|| format!("Failed to write deck: {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
fn generate_command(
    input: &str,
    output: &Path,
    mode: ModeArg,
    pages: usize,
    instructions: Option<String>,
    templates: Vec<String>,
    theme: &ThemeArgs,
    model: &ModelArgs,
) -> Result<()> {
    let table = ingest_source(input)?;
    println!(
        "Ingested {} ({} sheets, {} rows)",
        table.label,
        table.sheets.len(),
        table.total_rows(),
    );

    let theme_config = theme.resolve()?;
    let config = GenerationConfig {
        mode: mode.into(),
        page_count: pages,
        complexity: theme_config.complexity,
        theme: theme_config.name.clone(),
        instructions,
        templates,
        model: model.model.clone(),
    };

    let session = DeckSession::new();
    let deck = match config.mode {
        SynthesisMode::Split => session.synthesize(&OfflineClient, &table, &config, &[])?,
        SynthesisMode::Expand => {
            let client = model.client()?;
            session.synthesize(&client, &table, &config, &[])?
        }
    };

    save_deck(output, &deck)?;
    println!("Wrote {} slides to {}", deck.len(), output.display());
    Ok(())
}

fn render_command(deck_path: &Path, output: &Path, theme: &ThemeArgs) -> Result<()> {
    let deck = load_deck(deck_path)?;
    let theme_config = theme.resolve()?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    for slide in &deck {
        let svg = render(slide, &theme_config, deck.len());
        let path = output.join(format!("slide{}.svg", slide.index + 1));
        fs::write(&path, svg)
            .with_context(|| format!("Failed to write slide: {}", path.display()))?;
    }

    println!("Rendered {} slides into {}", deck.len(), output.display());
    Ok(())
}

fn export_command(
    deck_path: &Path,
    output: &Path,
    format: ExportFormat,
    title: Option<&str>,
    theme: &ThemeArgs,
) -> Result<()> {
    let deck = load_deck(deck_path)?;
    let theme_config = theme.resolve()?;

    match format {
        ExportFormat::Pptx => {
            let mut writer = DeckWriter::new(theme_config);
            if let Some(t) = title {
                writer = writer.with_title(t);
            }
            writer.add_slides(deck);
            let bytes = writer.generate().context("PPTX generation failed")?;
            fs::write(output, bytes)
                .with_context(|| format!("Failed to write: {}", output.display()))?;
        }
        ExportFormat::Pdf => {
            let bytes =
                export_pdf(&deck, &theme_config, title).context("PDF generation failed")?;
            fs::write(output, bytes)
                .with_context(|| format!("Failed to write: {}", output.display()))?;
        }
        ExportFormat::Png => {
            fs::create_dir_all(output).with_context(|| {
                format!("Failed to create output directory: {}", output.display())
            })?;
            for slide in &deck {
                let svg = render(slide, &theme_config, deck.len());
                let png = rasterize(&svg)
                    .with_context(|| format!("Failed to rasterize slide {}", slide.index + 1))?;
                let path = output.join(format!("slide{}.png", slide.index + 1));
                fs::write(&path, png)
                    .with_context(|| format!("Failed to write slide: {}", path.display()))?;
            }
        }
    }

    println!("Exported to {}", output.display());
    Ok(())
}

fn regen_command(
    deck_path: &Path,
    index: usize,
    input: &str,
    theme: &ThemeArgs,
    model: &ModelArgs,
) -> Result<()> {
    let deck = load_deck(deck_path)?;
    let table = ingest_source(input)?;
    let theme_config = theme.resolve()?;

    let config = GenerationConfig {
        complexity: theme_config.complexity,
        theme: theme_config.name.clone(),
        model: model.model.clone(),
        ..Default::default()
    };

    let client = model.client()?;
    let session = DeckSession::with_deck(deck);
    let slide = session.regenerate_slide(&client, index, &table, &config)?;

    save_deck(deck_path, &session.snapshot())?;
    println!("Regenerated slide {}: {}", index + 1, slide.title);
    Ok(())
}

fn modify_command(deck_path: &Path, instruction: &str, model: &ModelArgs) -> Result<()> {
    let deck = load_deck(deck_path)?;
    let client = model.client()?;

    let session = DeckSession::with_deck(deck);
    let summary = session.modify(&client, instruction, &GenerationConfig::default())?;

    save_deck(deck_path, &session.snapshot())?;
    println!("{}", summary);
    Ok(())
}
