//! pdfnotes CLI - turn PDF annotation dumps into Markdown notes

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfnotes::{
    ColorClassifier, JsonFormat, Layout, Level, LoadedDocuments, Notes, NotesConfig, NotesResult,
    PageRange, Rgb,
};

#[derive(Parser)]
#[command(name = "pdfnotes")]
#[command(version)]
#[command(about = "Turn PDF highlights and notes into structured Markdown notes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render annotations as a Markdown document
    #[command(alias = "md")]
    Notes {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document layout
        #[arg(long, value_enum)]
        layout: Option<LayoutMode>,

        /// Render only titles, summaries and important entries
        #[arg(long)]
        essentials: bool,

        /// Leave out low-importance entries
        #[arg(long)]
        no_low: bool,

        /// Group entries under topic headers
        #[arg(long)]
        topics: bool,

        /// Group documents by containing folder
        #[arg(long)]
        by_folder: bool,
    },

    /// Export annotations as JSON
    Json {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the level a color is classified as
    Classify {
        /// Color as #RRGGBB, #RGB or r,g,b
        #[arg(value_name = "COLOR")]
        color: String,

        /// Configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the default configuration
    Config {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Options shared by commands that read documents.
#[derive(Args)]
struct InputArgs {
    /// Page dump files written by a PDF parser
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page range (e.g., "3", "2-10", "all")
    #[arg(long)]
    pages: Option<String>,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayoutMode {
    /// Note document with condensed and detailed sections
    Notes,
    /// Mindmap note
    Mindmap,
    /// Tab-indented outline for external mindmap tools
    External,
}

impl From<LayoutMode> for Layout {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Notes => Layout::Notes,
            LayoutMode::Mindmap => Layout::Mindmap,
            LayoutMode::External => Layout::ExternalMindmap,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Notes {
            input,
            output,
            layout,
            essentials,
            no_low,
            topics,
            by_folder,
        }) => cmd_notes(
            &input,
            output.as_deref(),
            layout,
            essentials,
            no_low,
            topics,
            by_folder,
        ),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Classify { color, config }) => cmd_classify(&color, config.as_deref()),
        Some(Commands::Config { output }) => cmd_config(output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: pdfnotes notes <FILES>...".yellow());
            println!("       pdfnotes --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> CliResult<NotesConfig> {
    match path {
        Some(path) => Ok(NotesConfig::from_file(path)?),
        None => Ok(NotesConfig::default()),
    }
}

fn load_inputs(files: &[PathBuf]) -> CliResult<LoadedDocuments> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut loaded = LoadedDocuments::default();
    for file in files {
        pb.set_message(file.display().to_string());
        loaded.push(file);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(loaded)
}

/// Load config and documents, then collect every annotation.
///
/// Dumps that fail to load or collect are reported and skipped.
fn collect(input: &InputArgs, configure: impl FnOnce(Notes) -> Notes) -> CliResult<NotesResult> {
    let config = load_config(input.config.as_deref())?;
    let mut notes = configure(Notes::from_config(config));
    if let Some(pages) = input.pages.as_deref() {
        notes = notes.with_pages(PageRange::parse(pages)?);
    }
    if input.sequential {
        notes = notes.sequential();
    }

    let loaded = load_inputs(&input.files)?;

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(notes.collect_loaded(loaded));
    log::debug!(
        "Collected {} annotation(s) from {} document(s)",
        result.annotations().len(),
        result.stats().documents
    );

    for failure in result.failures() {
        eprintln!(
            "{} {}: {}",
            "Skipped".yellow(),
            failure.provenance.document,
            failure.error
        );
    }
    Ok(result)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_notes(
    input: &InputArgs,
    output: Option<&Path>,
    layout: Option<LayoutMode>,
    essentials: bool,
    no_low: bool,
    topics: bool,
    by_folder: bool,
) -> CliResult<()> {
    let result = collect(input, |mut notes| {
        if let Some(layout) = layout {
            notes = notes.with_layout(layout.into());
        }
        if essentials {
            notes = notes.essentials();
        }
        if topics {
            notes = notes.with_topics();
        }
        if by_folder {
            notes = notes.by_folder();
        }
        if no_low {
            notes = notes.without_low();
        }
        notes
    })?;

    let rendered = result.render();
    write_output(output, &rendered.content)?;

    if output.is_some() {
        let stats = result.stats();
        println!(
            "{} {} document(s), {} page(s), {} entr(ies), {} skipped, {} unresolved highlight(s)",
            "Done!".green().bold(),
            stats.documents,
            stats.pages_scanned,
            rendered.stats.total_entries(),
            rendered.stats.skipped,
            stats.geometry_misses
        );
    }
    Ok(())
}

fn cmd_json(input: &InputArgs, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let result = collect(input, |notes| notes)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = result.to_json(format)?;
    write_output(output, &json)
}

fn cmd_classify(color: &str, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let rgb: Rgb = color.parse()?;
    let hsl = rgb.to_hsl();
    let level = ColorClassifier::new(&config.render.classifier).classify(Some(rgb));

    println!("{}: {}", "Color".bold(), rgb);
    println!(
        "{}: {:.1}° {:.1}% {:.1}% ({})",
        "HSL".bold(),
        hsl.hue,
        hsl.saturation,
        hsl.luminance,
        rgb.name()
    );
    let label = if level == Level::Unknown {
        level.label().red()
    } else {
        level.label().green()
    };
    println!("{}: {}", "Level".bold(), label);
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> CliResult<()> {
    let json = NotesConfig::default().to_json_string()?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "pdfnotes".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF annotation notes tool");
    println!();
    println!("License: MIT");
}
