//! docmerge CLI - document mail merge tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docmerge::render::{to_markdown, to_text};
use docmerge::{
    open_data_set, open_template, template, FileDocumentStore, JsonFormat, MailMerge,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "docmerge")]
#[command(version)]
#[command(about = "Merge a template document with spreadsheet rows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a template with every row of a sheet
    Merge {
        /// Template document (.json, .txt or .md)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Sheet to read rows from (.csv, .xlsx, .xls, .ods or .json)
        #[arg(long, env = "SHEET_ID", value_name = "SHEET")]
        sheet_id: PathBuf,

        /// Directory for the merged document (default: template directory)
        #[arg(short, long, env = "DOCMERGE_OUTPUT_DIR", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Separator between template name and sheet name in the output name
        #[arg(long, default_value = " - ")]
        separator: String,

        /// Also write a rendering of the merged document
        #[arg(long, value_enum)]
        format: Option<OutputKind>,

        /// Fail if the template uses placeholders no column provides
        #[arg(long)]
        strict: bool,
    },

    /// Show template layout and placeholders
    Inspect {
        /// Template document (.json, .txt or .md)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Check placeholders against the columns of this sheet
        #[arg(long, env = "SHEET_ID", value_name = "SHEET")]
        sheet_id: Option<PathBuf>,
    },

    /// Render a merged document to text or Markdown
    Render {
        /// Merged document (.json)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputKind,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// Document model as JSON
    Json,
    /// Plain text, form feed between pages
    Text,
    /// Markdown
    Markdown,
}

impl OutputKind {
    fn extension(self) -> &'static str {
        match self {
            OutputKind::Json => "json",
            OutputKind::Text => "txt",
            OutputKind::Markdown => "md",
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Merge {
            template,
            sheet_id,
            output_dir,
            separator,
            format,
            strict,
        }) => cmd_merge(
            &template,
            &sheet_id,
            output_dir.as_deref(),
            &separator,
            format,
            strict,
        ),
        Some(Commands::Inspect { template, sheet_id }) => {
            cmd_inspect(&template, sheet_id.as_deref())
        }
        Some(Commands::Render {
            document,
            format,
            output,
        }) => cmd_render(&document, format, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!(
                "{}",
                "Usage: docmerge merge <TEMPLATE> --sheet-id <SHEET>".yellow()
            );
            println!("       docmerge --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_merge(
    template: &Path,
    sheet: &Path,
    output_dir: Option<&Path>,
    separator: &str,
    format: Option<OutputKind>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(template));

    let mut merge = MailMerge::new()
        .with_separator(separator)
        .with_output_dir(&output_dir);
    if strict {
        merge = merge.strict();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Merging records...");

    let outcome = merge.run_with_progress(template, sheet, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_with_message("Done!");

    let store = FileDocumentStore::new(&output_dir);
    let id = outcome.document.id.as_deref().unwrap_or_default();
    let saved = store.path_of(id);

    let report = &outcome.report;
    println!("\n{} {}", "Merged into".green().bold(), saved.display());
    println!("  {} records: {}", "├─".dimmed(), report.record_count);
    println!("  {} paragraphs: {}", "├─".dimmed(), report.paragraph_count);
    println!("  {} page breaks: {}", "├─".dimmed(), report.page_break_count);
    println!(
        "  {} replacements: {}",
        "└─".dimmed(),
        report.replacement_count
    );

    if !report.unmatched_placeholders.is_empty() {
        println!(
            "{} no column for {}",
            "Warning:".yellow().bold(),
            format_placeholders(&report.unmatched_placeholders)
        );
    }

    if let Some(kind) = format.filter(|k| *k != OutputKind::Json) {
        let rendered = render(&outcome.document, kind)?;
        let path = saved.with_extension(kind.extension());
        fs::write(&path, rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    }

    Ok(())
}

fn cmd_inspect(template: &Path, sheet: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_template(template)?;
    let geometry = doc.geometry;
    let names = template::paragraph_placeholders(doc.paragraphs());

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Name".bold(), doc.name());
    println!(
        "{}: {} x {} pt",
        "Page".bold(),
        geometry.page_width,
        geometry.page_height
    );
    println!(
        "{}: top {}, right {}, bottom {}, left {} pt",
        "Margins".bold(),
        geometry.margin_top,
        geometry.margin_right,
        geometry.margin_bottom,
        geometry.margin_left
    );
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Placeholders".bold(), format_placeholders(&names));

    if let Some(sheet) = sheet {
        let (data, name) = open_data_set(sheet)?;
        println!();
        println!("{}", "Sheet Information".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}: {}", "Name".bold(), name);
        println!("{}: {}", "Records".bold(), data.len());
        println!("{}: {}", "Columns".bold(), format_placeholders(&data.headers));

        for placeholder in &names {
            if data.has_column(placeholder) {
                println!("  {} {}", "✓".green(), placeholder);
            } else {
                println!("  {} {} (no column)", "✗".red(), placeholder);
            }
        }
    }

    Ok(())
}

fn cmd_render(
    document: &Path,
    kind: OutputKind,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = open_template(document)?;
    let rendered = render(&doc, kind)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docmerge".cyan().bold(), env!("CARGO_PKG_VERSION"));
}

fn render(doc: &docmerge::Document, kind: OutputKind) -> docmerge::Result<String> {
    let options = RenderOptions::default();
    match kind {
        OutputKind::Json => docmerge::render::to_json(doc, JsonFormat::Pretty),
        OutputKind::Text => to_text(doc, &options),
        OutputKind::Markdown => to_markdown(doc, &options),
    }
}

fn default_output_dir(template: &Path) -> PathBuf {
    template
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn format_placeholders(names: &[String]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(|n| format!("{{{{{}}}}}", n))
        .collect::<Vec<_>>()
        .join(", ")
}
