//! quire CLI
//!
//! Lays out a JSON box-tree document into pages and prints the positioned
//! boxes.

mod document;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use owo_colors::{OwoColorize, Style};

use quire_common::warning::clear_warnings;
use quire_layout::layout::{BoxDump, LayoutContext, PageSettings, layout_document};
use quire_layout::text::{ApproximateShaper, ApproximateShaperConfig};

use document::{build_box_tree, parse_document};

/// quire - paginated CSS box layout
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the positioned box tree of every page
    quire document.json

    # Letter-sized pages with 1in margins
    quire --page-width 816 --page-height 1056 --margin 96 document.json

    # Machine-readable output
    quire --format json document.json

    # Show layout warnings and per-page progress
    RUST_LOG=quire=debug quire document.json
"#)]
struct Cli {
    /// Path to the JSON box-tree document
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Page width in CSS pixels (default: the document's, else A4)
    #[arg(long, value_name = "PX")]
    page_width: Option<f32>,

    /// Page height in CSS pixels
    #[arg(long, value_name = "PX")]
    page_height: Option<f32>,

    /// Page margin on all four sides, in CSS pixels
    #[arg(long, value_name = "PX")]
    margin: Option<f32>,

    /// JSON file with the text shaper's font-size ratios
    #[arg(long, value_name = "FILE")]
    shaper_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented, human-readable box tree
    Tree,
    /// One JSON array of page trees
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    clear_warnings();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;
    let document =
        parse_document(&source).with_context(|| format!("cannot load {}", cli.input.display()))?;
    let settings = page_settings(&cli, document.page);
    let shaper_config = match &cli.shaper_config {
        Some(path) => load_shaper_config(path)?,
        None => ApproximateShaperConfig::default(),
    };

    let root = build_box_tree(&document.root)?;
    let shaper = ApproximateShaper::new(shaper_config);
    let mut context = LayoutContext::new(&shaper);
    let pages = layout_document(&mut context, &root, &settings);
    log::info!(target: "quire", "{} laid out on {} page(s)", cli.input.display(), pages.len());

    let dumps: Vec<BoxDump> = pages.iter().map(BoxDump::from).collect();
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dumps)?),
        OutputFormat::Tree => {
            let color = !cli.no_color && std::io::stdout().is_terminal();
            print_pages(&dumps, &settings, color);
        }
    }
    Ok(())
}

/// Command-line flags win over the document's settings.
fn page_settings(cli: &Cli, document_settings: Option<PageSettings>) -> PageSettings {
    let settings = document_settings.unwrap_or_default();
    PageSettings {
        width: cli.page_width.unwrap_or(settings.width),
        height: cli.page_height.unwrap_or(settings.height),
        margin: cli.margin.unwrap_or(settings.margin),
    }
}

fn load_shaper_config(path: &Path) -> anyhow::Result<ApproximateShaperConfig> {
    let source =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("invalid shaper configuration in {}", path.display()))
}

fn paint(text: &str, style: Style, color: bool) -> String {
    if color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn print_pages(pages: &[BoxDump], settings: &PageSettings, color: bool) {
    for (index, page) in pages.iter().enumerate() {
        let title = format!(
            "=== Page {} ({}x{}) ===",
            index + 1,
            settings.width,
            settings.height
        );
        println!("{}", paint(&title, Style::new().bold(), color));
        print_box(page, 0, color);
        println!();
    }
}

/// Recursively print a box with its geometry
fn print_box(layout_box: &BoxDump, depth: usize, color: bool) {
    let indent = "  ".repeat(depth);
    let name = paint(layout_box.kind, Style::new().cyan().bold(), color);
    match &layout_box.text {
        Some(text) => {
            let preview: String = text.chars().take(30).collect();
            let suffix = if text.chars().count() > 30 { "..." } else { "" };
            let quoted = format!("\"{}{}\"", preview.replace('\n', "\\n"), suffix);
            println!("{indent}[{name}] {}", paint(&quoted, Style::new().green(), color));
        }
        None => println!("{indent}[{name}] <{}>", layout_box.tag),
    }

    let content = &layout_box.content_box;
    let geometry = format!(
        "content: x={:.1} y={:.1} w={:.1} h={:.1}",
        content.x, content.y, content.width, content.height
    );
    println!("{indent}  {}", paint(&geometry, Style::new().dimmed(), color));

    let margin = &layout_box.margin;
    if margin.top != 0.0 || margin.right != 0.0 || margin.bottom != 0.0 || margin.left != 0.0 {
        let margins = format!(
            "margin: t={:.1} r={:.1} b={:.1} l={:.1}",
            margin.top, margin.right, margin.bottom, margin.left
        );
        println!("{indent}  {}", paint(&margins, Style::new().dimmed(), color));
    }
    if let Some(baseline) = layout_box.baseline {
        let baseline = format!("baseline: {baseline:.1}");
        println!("{indent}  {}", paint(&baseline, Style::new().dimmed(), color));
    }

    for child in &layout_box.children {
        print_box(child, depth + 1, color);
    }
}
