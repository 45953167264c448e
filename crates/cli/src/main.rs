//! CLI tool for turning summarized report content into a themed slide deck.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deck_core::config::{DEFAULT_BACKGROUNDS_DIR, DEFAULT_IMAGES_DIR};
use deck_core::{
    theme, ContentNormalizer, DetailLevel, Error, PresentationRequest, RenderConfig,
    SourceFormat, ThemeSelection, ThemeType,
};
use deck_pptx::{DeckSummary, LayoutEngine, RenderReport, RenderedDeck};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Render summarized PDF content into a themed PowerPoint deck.
#[derive(Parser, Debug)]
#[command(name = "pdf2deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding images extracted from the source PDF
    #[arg(long, global = true, env = "PDF2DECK_IMAGES_DIR", default_value = DEFAULT_IMAGES_DIR)]
    images_dir: PathBuf,

    /// Directory holding theme background pictures
    #[arg(long, global = true, env = "PDF2DECK_BACKGROUNDS_DIR", default_value = DEFAULT_BACKGROUNDS_DIR)]
    backgrounds_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a file is an acceptable source document
    Check {
        /// Document to check
        input: PathBuf,

        /// Declared content type, as an upload would send it
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Validate a saved summarization reply and print the slide list
    Normalize {
        /// File holding the raw reply
        input: PathBuf,

        /// Detail level (0-4) stamped on slides that lack one
        #[arg(short, long)]
        detail_level: Option<u8>,

        /// Write the slide list here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a slide list into a .pptx file
    Render {
        /// JSON array of slides
        input: PathBuf,

        /// Theme family: color or background
        #[arg(long, default_value = "color")]
        theme_type: String,

        /// Theme name from the registry
        #[arg(long, default_value = "corporate_blue")]
        theme_name: String,

        /// Output file (default: presentation.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available themes
    Themes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a previously extracted image to stdout or a file
    Image {
        /// Image file name
        filename: String,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize the slides of a .pptx file
    Inspect {
        /// Presentation to read
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = RenderConfig::new()
        .with_images_dir(&args.images_dir)
        .with_backgrounds_dir(&args.backgrounds_dir);

    match &args.command {
        Command::Check {
            input,
            content_type,
        } => check_source(input, content_type.as_deref()),
        Command::Normalize {
            input,
            detail_level,
            output,
        } => normalize(input, *detail_level, output.as_deref()),
        Command::Render {
            input,
            theme_type,
            theme_name,
            output,
        } => render(config, input, theme_type, theme_name, output.as_deref()),
        Command::Themes { json } => list_themes(*json),
        Command::Image { filename, output } => export_image(&config, filename, output.as_deref()),
        Command::Inspect { input } => inspect(input),
    }
}

/// Validate a source document the way an upload is validated.
fn check_source(input: &Path, content_type: Option<&str>) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let format = SourceFormat::detect(content_type, &bytes)
        .with_context(|| format!("Rejected {}", input.display()))?;
    println!("{}: {:?}, {} bytes", input.display(), format, bytes.len());
    Ok(())
}

/// Run the content normalizer over a saved reply.
fn normalize(input: &Path, detail_level: Option<u8>, output: Option<&Path>) -> Result<()> {
    let reply = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut normalizer = ContentNormalizer::new();
    if let Some(level) = detail_level {
        let level = DetailLevel::new(level)?;
        log::debug!("Detail level {} ({})", level.value(), level.label());
        normalizer = normalizer.with_detail_level(level);
    }

    let slides = normalizer
        .parse_reply(&reply)
        .with_context(|| format!("Rejected reply in {}", input.display()))?;
    let json = serde_json::to_string_pretty(&slides)?;

    match output {
        Some(path) => {
            write_output(path, format!("{}\n", json).as_bytes())?;
            log::info!("Wrote {} slides to {}", slides.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Render a slide list with the selected theme.
fn render(
    config: RenderConfig,
    input: &Path,
    theme_type: &str,
    theme_name: &str,
    output: Option<&Path>,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let slides = ContentNormalizer::new()
        .parse_reply(&text)
        .with_context(|| format!("Invalid slide list in {}", input.display()))?;

    let theme_type: ThemeType = theme_type.parse()?;
    let request = PresentationRequest::new(slides, ThemeSelection::new(theme_type, theme_name));

    let deck = LayoutEngine::new(config).render(&request)?;
    log_report(&deck.report);

    let path = output.map_or_else(|| PathBuf::from(RenderedDeck::FILENAME), Path::to_path_buf);
    write_output(&path, &deck.bytes)?;
    eprintln!(
        "Wrote {} ({} slides, {})",
        path.display(),
        deck.report.slides.len(),
        deck.mime_type
    );
    Ok(())
}

fn log_report(report: &RenderReport) {
    if report.theme.is_applied() {
        log::info!("{}", report.theme);
    } else {
        log::warn!("{}", report.theme);
    }
    for (i, slide) in report.slides.iter().enumerate() {
        log::info!(
            "  slide {}: {:?}, font {:?}, image {:?}",
            i + 1,
            slide.layout,
            slide.font_size_pt,
            slide.image
        );
    }
}

fn list_themes(json: bool) -> Result<()> {
    let summaries: Vec<_> = theme::themes().iter().map(|t| t.summary()).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in summaries {
        println!(
            "{:<12} {:<20} {}",
            summary.theme_type.as_str(),
            summary.name,
            summary.display_name
        );
    }
    Ok(())
}

/// Serve an extracted image by name.
fn export_image(config: &RenderConfig, filename: &str, output: Option<&Path>) -> Result<()> {
    let (bytes, mime) = match config.image_store().load_with_mime(filename) {
        Ok(found) => found,
        Err(Error::ImageNotFound(name)) => bail!("image not found: {}", name),
        Err(e) => return Err(e.into()),
    };
    log::debug!("{}: {} bytes, {}", filename, bytes.len(), mime);

    match output {
        Some(path) => write_output(path, &bytes),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn inspect(input: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let summary = deck_pptx::inspect(&bytes)
        .with_context(|| format!("Failed to inspect {}", input.display()))?;
    print!("{}", format_summary(&summary));
    Ok(())
}

fn format_summary(summary: &DeckSummary) -> String {
    let mut out = format!(
        "{} slides, {}x{} EMU, {} images\n",
        summary.slides.len(),
        summary.slide_width,
        summary.slide_height,
        summary.media_count
    );
    for slide in &summary.slides {
        out.push_str(&format!(
            "{}. {}\n",
            slide.number,
            slide.title.as_deref().unwrap_or("(untitled)")
        ));
        if let Some(color) = slide.background {
            out.push_str(&format!("   background {}\n", color));
        }
        if slide.backdrop_first {
            out.push_str("   background picture\n");
        }
        for paragraph in &slide.paragraphs {
            let size = paragraph
                .size_pt
                .map_or_else(|| "-".to_string(), |pt| format!("{}pt", pt));
            out.push_str(&format!("   - [{}] {}\n", size, paragraph.text));
        }
        if !slide.pictures.is_empty() {
            out.push_str(&format!("   {} picture(s)\n", slide.pictures.len()));
        }
    }
    out
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
