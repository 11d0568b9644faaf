// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `score`, `highlight`, `inspect`,
// `render` and `tokenizer-init`, and all their flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → PathBuf, bool, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::score_use_case::ScoreConfig;
use crate::infra::taxonomy_store::DEFAULT_TAXONOMY_FILE;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one or more resume PDFs against the keyword taxonomy
    Score(ScoreArgs),

    /// Highlight terms in a PDF and save the annotated copy
    Highlight(HighlightArgs),

    /// Show page count, metadata, links and e-mail addresses
    Inspect(InspectArgs),

    /// Print the text the scorer sees
    Render(RenderArgs),

    /// Write a default tokenizer definition for --tokenizer
    TokenizerInit(TokenizerInitArgs),
}

/// All arguments for the `score` command.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Resume PDFs to score
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Keyword taxonomy JSON (required_keywords / optional_keywords).
    /// When omitted, ./config.json is used if present and an empty
    /// taxonomy otherwise
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// tokenizer.json to split text with, instead of the built-in model
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Also save a highlighted copy of every scored PDF
    #[arg(long)]
    pub highlight: bool,

    /// Directory for highlighted copies
    #[arg(long, default_value = "highlighted")]
    pub out_dir: PathBuf,
}

/// Convert CLI ScoreArgs into the application-layer ScoreConfig.
/// The application layer never sees clap types.
impl From<&ScoreArgs> for ScoreConfig {
    fn from(a: &ScoreArgs) -> Self {
        ScoreConfig {
            taxonomy_path:  a.taxonomy.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_TAXONOMY_FILE)),
            lenient:        a.taxonomy.is_none(),
            tokenizer_path: a.tokenizer.clone(),
            out_dir:        a.out_dir.clone(),
            highlight:      a.highlight,
        }
    }
}

/// All arguments for the `highlight` command
#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// PDF to annotate (left unchanged)
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the annotated copy
    #[arg(long)]
    pub output: PathBuf,

    /// Term to highlight; repeat for several
    #[arg(long = "term", required_unless_present = "taxonomy", conflicts_with = "taxonomy")]
    pub terms: Vec<String>,

    /// Score against this taxonomy and highlight whatever matched
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// tokenizer.json used when scoring with --taxonomy
    #[arg(long, requires = "taxonomy")]
    pub tokenizer: Option<PathBuf>,
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,

    /// Print the inspection as JSON
    #[arg(long)]
    pub json: bool,
}

/// All arguments for the `render` command
#[derive(Args, Debug)]
pub struct RenderArgs {
    pub file: PathBuf,

    /// Print the normalized text instead of the markdown rendering
    #[arg(long)]
    pub normalized: bool,
}

/// All arguments for the `tokenizer-init` command
#[derive(Args, Debug)]
pub struct TokenizerInitArgs {
    /// Path of the tokenizer.json to write
    #[arg(long, default_value = "tokenizer.json")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(std::iter::once("resume-scorer").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_args_to_config() {
        let Commands::Score(args) = parse(&["score", "a.pdf", "b.pdf", "--highlight"]) else {
            panic!("expected score");
        };
        let config = ScoreConfig::from(&args);

        assert_eq!(args.files.len(), 2);
        assert_eq!(config.taxonomy_path, PathBuf::from(DEFAULT_TAXONOMY_FILE));
        assert!(config.lenient);
        assert!(config.highlight);
        assert_eq!(config.out_dir, PathBuf::from("highlighted"));
    }

    #[test]
    fn test_explicit_taxonomy_is_strict() {
        let Commands::Score(args) = parse(&["score", "a.pdf", "--taxonomy", "t.json"]) else {
            panic!("expected score");
        };
        let config = ScoreConfig::from(&args);
        assert_eq!(config.taxonomy_path, PathBuf::from("t.json"));
        assert!(!config.lenient);
    }

    #[test]
    fn test_highlight_needs_terms_or_taxonomy() {
        let result = Cli::try_parse_from(["resume-scorer", "highlight", "--input", "a.pdf", "--output", "b.pdf"]);
        assert!(result.is_err());

        let Commands::Highlight(args) =
            parse(&["highlight", "--input", "a.pdf", "--output", "b.pdf", "--term", "Rust", "--term", "Go"])
        else {
            panic!("expected highlight");
        };
        assert_eq!(args.terms, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_tokenizer_init_default_path() {
        let Commands::TokenizerInit(args) = parse(&["tokenizer-init"]) else {
            panic!("expected tokenizer-init");
        };
        assert_eq!(args.out, PathBuf::from("tokenizer.json"));
    }
}
