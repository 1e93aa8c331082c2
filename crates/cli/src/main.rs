//! CLI tool for preprocessing remark.js slide sources.

use anyhow::{Context, Result};
use clap::Parser;
use remark_classes_core::source::DEFAULT_SOURCE_ID;
use remark_classes_core::{
    Preprocessor, SourceDocument, SourceFormat, TransformReport, UnterminatedFence,
    DEFAULT_LANGUAGE_MARKER,
};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Input name that reads from stdin.
const STDIN_INPUT: &str = "-";

/// Rewrite Pandoc-style fence and image classes into remark content classes.
#[derive(Parser, Debug)]
#[command(name = "remark-classes")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input slide source(s) (.md, .Rmd or .html); "-" reads stdin
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long, conflicts_with = "in_place")]
    print: bool,

    /// Overwrite each input file with its rewritten source
    #[arg(short, long)]
    in_place: bool,

    /// Input format, detected from extension and content if omitted
    #[arg(short, long)]
    format: Option<SourceFormat>,

    /// Id of the HTML element holding the slide markdown
    #[arg(long, default_value = DEFAULT_SOURCE_ID)]
    element_id: String,

    /// What to do with an annotated fence that never closes (extend or skip)
    #[arg(long, default_value = "extend")]
    unterminated: UnterminatedFence,

    /// Class that switches a fence to language highlighting
    #[arg(long, default_value = DEFAULT_LANGUAGE_MARKER)]
    language_marker: String,

    /// Print a JSON report of the rewrites for each input to stderr
    #[arg(long)]
    report: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let preprocessor = Preprocessor::new()
        .with_unterminated(args.unterminated)
        .with_language_marker(args.language_marker.as_str());

    let mut failures = 0;

    for input_path in &args.input {
        log::info!("Processing: {}", input_path.display());

        if let Err(e) = process_input(input_path, &args, &preprocessor) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} input(s) failed", failures, args.input.len());
    }

    Ok(())
}

/// Rewrite one input and send it where the arguments say.
fn process_input(input_path: &Path, args: &Args, preprocessor: &Preprocessor) -> Result<()> {
    let from_stdin = is_stdin(input_path);

    let mut document = if from_stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        let format = args
            .format
            .unwrap_or_else(|| SourceFormat::from_content_with_id(&text, &args.element_id));
        SourceDocument::parse_with_element_id(text, format, &args.element_id)?
    } else {
        SourceDocument::load(input_path, args.format, &args.element_id)
            .with_context(|| format!("Failed to load {}", input_path.display()))?
    };

    let report = preprocessor.process(&mut document)?;
    if report.has_rewrites() {
        log::info!(
            "  {} fence(s), {} image(s) rewritten",
            report.fenced_blocks,
            report.images
        );
    } else {
        log::info!("  No class annotations found");
    }

    if args.report {
        print_report(input_path, &report)?;
    }

    if args.print || from_stdin {
        print!("{}", document.into_text());
        std::io::stdout().flush()?;
        return Ok(());
    }

    let output_path = if args.in_place {
        input_path.to_path_buf()
    } else {
        get_output_path(input_path, args.output.as_ref())?
    };

    document
        .save(&output_path)
        .with_context(|| format!("Failed to write to {}", output_path.display()))?;
    log::info!("Written to: {}", output_path.display());

    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_INPUT
}

/// Write a report as one JSON line on stderr.
fn print_report(input_path: &Path, report: &TransformReport) -> Result<()> {
    let json = serde_json::json!({
        "input": input_path.display().to_string(),
        "report": report,
    });
    eprintln!("{}", serde_json::to_string(&json)?);
    Ok(())
}

/// Determine the output path for a processed file.
///
/// `deck.md` becomes `deck.remark.md`, `deck.html` becomes `deck.remark.html`.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = match input_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.remark.{}", stem, ext),
        None => format!("{}.remark", stem),
    };

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_beside_input() {
        let path = get_output_path(Path::new("slides/deck.md"), None).unwrap();
        assert_eq!(path, PathBuf::from("slides/deck.remark.md"));
    }

    #[test]
    fn test_output_path_keeps_html_extension() {
        let path = get_output_path(Path::new("deck.html"), None).unwrap();
        assert_eq!(path, PathBuf::from("deck.remark.html"));
    }

    #[test]
    fn test_output_path_without_extension() {
        let path = get_output_path(Path::new("deck"), None).unwrap();
        assert_eq!(path, PathBuf::from("deck.remark"));
    }

    #[test]
    fn test_output_path_in_output_dir() {
        let dir = std::env::temp_dir().join("remark-classes-cli-test-out");
        let path = get_output_path(Path::new("slides/deck.Rmd"), Some(&dir)).unwrap();
        assert_eq!(path, dir.join("deck.remark.Rmd"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("-.md")));
        assert!(!is_stdin(Path::new("deck.md")));
    }

    #[test]
    fn test_args_parse_options() {
        let args = Args::try_parse_from([
            "remark-classes",
            "--unterminated",
            "skip",
            "--format",
            "html",
            "--language-marker",
            "python",
            "deck.html",
        ])
        .unwrap();

        assert_eq!(args.unterminated, UnterminatedFence::Skip);
        assert_eq!(args.format, Some(SourceFormat::Html));
        assert_eq!(args.language_marker, "python");
        assert_eq!(args.input, vec![PathBuf::from("deck.html")]);
        assert_eq!(args.element_id, DEFAULT_SOURCE_ID);
    }

    #[test]
    fn test_args_parse_element_id() {
        let args =
            Args::try_parse_from(["remark-classes", "--element-id", "deck", "deck.html"]).unwrap();
        assert_eq!(args.element_id, "deck");
    }

    #[test]
    fn test_args_reject_bad_policy() {
        let result = Args::try_parse_from(["remark-classes", "--unterminated", "close", "x.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_in_place_conflicts_with_print() {
        let result = Args::try_parse_from(["remark-classes", "-i", "-p", "x.md"]);
        assert!(result.is_err());
    }
}
