//! pdf-outline CLI - title and heading outline inference for PDF files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{collect_inputs, process_directory_with_progress};
use pdf_outline::render::to_json;
use pdf_outline::{
    has_pdf_extension, DocumentResult, FragmentDecision, FragmentDocument, JsonFormat,
    LopdfReader, OutlineExtractor, OutlineOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Infer titles and H1-H4 outlines from PDF documents", long_about = None)]
struct Cli {
    /// Directory containing PDF files
    #[arg(value_name = "INPUT_DIR", default_value = "input")]
    input: PathBuf,

    /// Directory receiving one JSON file per PDF
    #[arg(value_name = "OUTPUT_DIR", default_value = "output")]
    output: PathBuf,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON options file (any subset of the option fields)
    #[arg(long, global = true, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit trimmed texts instead of the trailing-space form
    #[arg(long, global = true)]
    no_padding: bool,

    /// Process batch documents one at a time
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Infer the outline from a captured fragment dump
    Fragments {
        /// Fragment dump (JSON)
        #[arg(value_name = "JSON")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the heading decision for every fragment
    Explain {
        /// Input PDF file or fragment dump
        #[arg(value_name = "PDF|JSON")]
        input: PathBuf,

        /// Print decisions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match build_extractor(&cli.global) {
        Ok(extractor) => match cli.command {
            Some(Commands::File {
                input,
                output,
                compact,
            }) => cmd_file(&extractor, &input, output.as_deref(), compact),
            Some(Commands::Fragments {
                input,
                output,
                compact,
            }) => cmd_fragments(&extractor, &input, output.as_deref(), compact),
            Some(Commands::Explain { input, json }) => cmd_explain(&extractor, &input, json),
            Some(Commands::Version) => {
                cmd_version();
                Ok(())
            }
            None => cmd_batch(&extractor, &cli.input, &cli.output),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_extractor(args: &GlobalArgs) -> CliResult<OutlineExtractor> {
    let mut options = match &args.config {
        Some(path) => OutlineOptions::from_json_file(path)?,
        None => OutlineOptions::default(),
    };
    if args.no_padding {
        options = options.trimmed();
    }
    if args.sequential {
        options = options.sequential();
    }
    Ok(OutlineExtractor::with_options(options)?)
}

fn cmd_batch(extractor: &OutlineExtractor, input: &Path, output: &Path) -> CliResult<()> {
    let count = collect_inputs(input)?.len();
    if count == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_directory_with_progress(input, output, extractor, |path| {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        pb.set_message(name.into_owned());
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files -> {}",
        "Processed".green().bold(),
        report.processed.len(),
        report.total(),
        output.display()
    );
    for (path, reason) in &report.failed {
        println!("  {} {}: {}", "✗".red(), path.display(), reason.dimmed());
    }

    Ok(())
}

fn cmd_file(
    extractor: &OutlineExtractor,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let result = extractor.extract_file(input).unwrap_or_else(|e| {
        log::error!("Error processing {}: {}", input.display(), e);
        eprintln!("{} {}: {}", "Warning".yellow().bold(), input.display(), e);
        DocumentResult::empty()
    });
    emit(&result, output, compact)
}

fn cmd_fragments(
    extractor: &OutlineExtractor,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let document = FragmentDocument::from_json_file(input)?;
    let result = extractor.extract(&document)?;
    emit(&result, output, compact)
}

fn cmd_explain(extractor: &OutlineExtractor, input: &Path, json: bool) -> CliResult<()> {
    let document = if has_pdf_extension(input) {
        FragmentDocument::capture(&LopdfReader::open(input)?)?
    } else {
        FragmentDocument::from_json_file(input)?
    };
    let fragments: Vec<_> = document.pages.into_iter().flatten().collect();
    let decisions = extractor.explain(&fragments);

    if json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
        return Ok(());
    }

    println!("{}", "Heading Decisions".cyan().bold());
    println!("{}", "─".repeat(72).dimmed());
    for decision in &decisions {
        print_decision(decision);
    }
    let accepted = decisions
        .iter()
        .filter(|d| d.decision.is_accepted())
        .count();
    println!("{}", "─".repeat(72).dimmed());
    println!(
        "{}: {} of {} fragments",
        "Accepted".bold(),
        accepted,
        decisions.len()
    );

    Ok(())
}

fn print_decision(decision: &FragmentDecision) {
    let verdict = if decision.decision.is_accepted() {
        format!("+ {:<22}", decision.decision.rule()).green()
    } else {
        format!("- {:<22}", decision.decision.rule()).dimmed()
    };
    println!(
        "p{:<3} {:>5.1}{} {} {}",
        decision.page,
        decision.font_size,
        if decision.bold { "b" } else { " " },
        verdict,
        decision.text
    );
}

fn emit(result: &DocumentResult, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(result, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Title and heading outline inference for PDF documents");
    println!();
    println!("License: MIT");
}
