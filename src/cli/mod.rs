// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Five commands are supported:
//   1. `score`          — scores resumes, optionally highlights
//   2. `highlight`      — annotates terms into a PDF copy
//   3. `inspect`        — metadata, links, e-mail addresses
//   4. `render`         — prints the text the scorer sees
//   5. `tokenizer-init` — writes a default tokenizer.json
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::{bail, Context, Result};
use clap::Parser;
use commands::{Commands, HighlightArgs, InspectArgs, RenderArgs, ScoreArgs, TokenizerInitArgs};

use crate::domain::report::ScoreReport;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "resume-scorer",
    version,
    about = "Score resume PDFs against a keyword taxonomy and highlight what matched."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Score(args)         => run_score(args),
            Commands::Highlight(args)     => run_highlight(args),
            Commands::Inspect(args)       => run_inspect(args),
            Commands::Render(args)        => run_render(args),
            Commands::TokenizerInit(args) => run_tokenizer_init(args),
        }
    }
}

/// Handles the `score` subcommand.
fn run_score(args: ScoreArgs) -> Result<()> {
    use crate::application::highlight_use_case::HighlightUseCase;
    use crate::application::score_use_case::{ScoreConfig, ScoreUseCase};
    use crate::infra::run_paths::RunPaths;

    let config = ScoreConfig::from(&args);
    let scorer = ScoreUseCase::new(&config).context("Cannot set up scoring")?;

    tracing::info!("Scoring {} documents", args.files.len());
    let results = scorer.score_documents(&args.files);

    let run_paths   = RunPaths::new(&config.out_dir);
    let highlighter = HighlightUseCase::new();
    let mut reports = Vec::new();
    let mut failed  = 0;

    for (path, result) in results {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                eprintln!("❌ {e}");
                failed += 1;
                continue;
            }
        };

        if config.highlight {
            let destination = run_paths.highlighted(&path);
            let terms: Vec<String> = report.matched_terms.iter().cloned().collect();
            match highlighter.highlight_and_save(&path, &terms, &destination) {
                Ok(summary) => tracing::info!(
                    "{} highlights saved to '{}'",
                    summary.total(),
                    destination.display()
                ),
                Err(e) => {
                    eprintln!("❌ {e}");
                    failed += 1;
                }
            }
        }

        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if failed > 0 {
        bail!("{failed} of {} documents failed", args.files.len());
    }
    Ok(())
}

fn print_report(report: &ScoreReport) {
    let join = |terms: &std::collections::BTreeSet<String>| {
        if terms.is_empty() {
            "—".to_string()
        } else {
            terms.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };

    println!("\n📄 {}", report.source);
    println!(
        "   Score:   {:.1} / {:.1}  ({:.0}%, {})",
        report.score,
        report.max_score,
        report.percentage(),
        report.band()
    );
    println!("   Found:   {}", join(&report.matched_terms));
    println!("   Missing: {}", join(&report.missing_terms));
}

/// Handles the `highlight` subcommand.
fn run_highlight(args: HighlightArgs) -> Result<()> {
    use crate::application::highlight_use_case::HighlightUseCase;
    use crate::application::score_use_case::{ScoreConfig, ScoreUseCase};

    let terms = match &args.taxonomy {
        Some(taxonomy) => {
            let config = ScoreConfig {
                taxonomy_path:  taxonomy.clone(),
                lenient:        false,
                tokenizer_path: args.tokenizer.clone(),
                ..Default::default()
            };
            let report = ScoreUseCase::new(&config)?.score_document(&args.input)?;
            report.matched_terms.into_iter().collect()
        }
        None => args.terms.clone(),
    };

    let summary = HighlightUseCase::new()
        .highlight_and_save(&args.input, &terms, &args.output)
        .with_context(|| format!("Cannot highlight '{}'", args.input.display()))?;

    for (term, count) in &summary.highlights {
        println!("   {term}: {count}");
    }
    for term in &summary.not_found {
        println!("   {term}: not found on any page");
    }
    println!("✅ Saved {} highlights to '{}'", summary.total(), args.output.display());
    Ok(())
}

/// Handles the `inspect` subcommand.
fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let inspection = InspectUseCase::new().inspect(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("Loaded document with {} pages", inspection.page_count);
    for (key, value) in &inspection.metadata {
        println!("{key}: {value}");
    }
    println!("Links:");
    for link in &inspection.links {
        println!("  {link}");
    }
    println!("E-mail addresses:");
    for email in &inspection.emails {
        println!("  {email}");
    }
    Ok(())
}

/// Handles the `render` subcommand.
fn run_render(args: RenderArgs) -> Result<()> {
    use crate::application::render_use_case::RenderUseCase;

    let text = RenderUseCase::new().render(&args.file, args.normalized)?;
    println!("{text}");
    Ok(())
}

/// Handles the `tokenizer-init` subcommand.
fn run_tokenizer_init(args: TokenizerInitArgs) -> Result<()> {
    use crate::infra::tokenizer_store::TokenizerStore;

    TokenizerStore::write_default(&args.out)
        .with_context(|| format!("Cannot write tokenizer to '{}'", args.out.display()))?;
    println!("✅ Tokenizer written to '{}'", args.out.display());
    Ok(())
}
