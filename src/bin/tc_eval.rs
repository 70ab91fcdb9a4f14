//! tc-eval CLI
//!
//! Evaluates outcome logs and merges cross-validation folds.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tc_evaluation::config::{ConfigManager, DEFAULT_CONFIG_FILE};
use tc_evaluation::{
    render_reports, write_outcomes_file, EvaluationConfig, Evaluator, LearningMode,
    OutcomeCollection, OutcomeParser, OutputFormat,
};

#[derive(Parser)]
#[command(name = "tc-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate outcome logs
    Evaluate(EvaluateArgs),

    /// Merge outcome logs and write them with one shared label header
    Homogenize {
        /// Outcome log files (`.gz` accepted)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Learning mode: singleLabel, multiLabel or regression
        #[arg(long, value_parser = parse_mode)]
        mode: LearningMode,

        /// Output file
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct EvaluateArgs {
    /// Outcome log files (`.gz` accepted)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Learning mode: singleLabel, multiLabel or regression
    #[arg(long, value_parser = parse_mode)]
    mode: Option<LearningMode>,

    /// Merge all files (folds) and evaluate the combined result
    #[arg(long)]
    combine: bool,

    /// Also compute supplementary measures
    #[arg(long)]
    extended: bool,

    /// Also report per-label precision, recall and F1
    #[arg(long)]
    per_label: bool,

    /// Output format: json, csv or text
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Configuration file (.json or .toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads, 0 for all cores
    #[arg(long)]
    threads: Option<usize>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl EvaluateArgs {
    /// Config file, then `TC_EVAL_*` variables from `lookup`, then flags.
    fn resolve_config<F>(&self, lookup: F) -> Result<EvaluationConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        });
        let mut manager = ConfigManager::resolve_with(config_path.as_deref(), lookup)
            .context("Failed to load configuration")?;

        let settings = manager.config_mut();
        if let Some(mode) = self.mode {
            settings.learning_mode = mode;
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(threads) = self.threads {
            settings.num_threads = threads;
        }
        settings.extended_measures |= self.extended;
        settings.per_label_measures |= self.per_label;
        Ok(manager.into_config())
    }
}

fn parse_mode(value: &str) -> std::result::Result<LearningMode, String> {
    value.parse().map_err(|e: tc_evaluation::EvaluationError| e.to_string())
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    value.parse().map_err(|e: tc_evaluation::EvaluationError| e.to_string())
}

fn init_logging(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or(match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    });
    env_logger::Builder::from_env(env).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli.command)
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Evaluate(args) => {
            let config = args.resolve_config(|key| std::env::var(key).ok())?;
            let (format, precision) = (config.output_format, config.precision);
            let evaluator = Evaluator::new(config);

            let reports = if args.combine {
                vec![evaluator
                    .evaluate_folds(args.files.as_slice())
                    .context("Failed to evaluate combined folds")?]
            } else {
                evaluator
                    .evaluate_files(args.files.as_slice())
                    .context("Failed to evaluate outcome logs")?
            };

            let rendered = render_reports(&reports, format, precision)?;
            emit(&rendered, args.output.as_deref())?;
        }

        Commands::Homogenize {
            files,
            mode,
            output,
        } => {
            let parser = OutcomeParser::new(mode);
            let mut combined = OutcomeCollection::empty();
            for file in &files {
                let fold = parser
                    .parse_file(file)
                    .with_context(|| format!("Failed to parse {}", file.display()))?;
                combined.add(&fold)?;
            }
            write_outcomes_file(&combined, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
    }

    Ok(())
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FOLD0: &str = "#labels 0=X 1=Y\nr1=1,0;1,0;0.5\n";
    const FOLD1: &str = "#labels 0=Y 1=Z\nr2=0.9,0.1;1,0;0.5\n";

    fn evaluate_args(argv: &[&str]) -> EvaluateArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).unwrap();
        match cli.command {
            Commands::Evaluate(args) => args,
            Commands::Homogenize { .. } => panic!("expected the evaluate subcommand"),
        }
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = evaluate_args(&[
            "tc-eval", "evaluate", "a.txt", "b.txt", "--mode", "multiLabel", "--combine",
            "--extended", "--per-label", "--format", "csv", "--threads", "3",
        ]);
        assert_eq!(args.files.len(), 2);
        assert!(args.combine);

        let config = args.resolve_config(|_| None).unwrap();
        assert_eq!(config.learning_mode, LearningMode::MultiLabel);
        assert!(config.extended_measures);
        assert!(config.per_label_measures);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.num_threads, 3);
    }

    #[test]
    fn test_flags_override_environment_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eval.toml");
        fs::write(&path, "learning_mode = \"regression\"\nnum_threads = 1\nprecision = 6\n").unwrap();
        let config_arg = path.to_string_lossy().to_string();

        let env = |key: &str| match key {
            "TC_EVAL_NUM_THREADS" => Some("4".to_string()),
            "TC_EVAL_OUTPUT_FORMAT" => Some("json".to_string()),
            _ => None,
        };

        let args = evaluate_args(&["tc-eval", "evaluate", "a.txt", "--config", &config_arg]);
        let config = args.resolve_config(env).unwrap();
        assert_eq!(config.learning_mode, LearningMode::Regression);
        assert_eq!(config.precision, 6);
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.output_format, OutputFormat::Json);

        let args = evaluate_args(&[
            "tc-eval", "evaluate", "a.txt", "--config", &config_arg, "--threads", "2", "--format",
            "text", "--mode", "singleLabel",
        ]);
        let config = args.resolve_config(env).unwrap();
        assert_eq!(config.learning_mode, LearningMode::SingleLabel);
        assert_eq!(config.num_threads, 2);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["tc-eval", "evaluate"]).is_err());
        assert!(Cli::try_parse_from(["tc-eval", "evaluate", "a.txt", "--mode", "ranking"]).is_err());
        assert!(Cli::try_parse_from(["tc-eval", "evaluate", "a.txt", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["tc-eval", "homogenize", "a.txt", "--mode", "multiLabel"]).is_err());
    }

    #[test]
    fn test_evaluate_combined_folds_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let fold0 = temp_dir.path().join("fold0.txt");
        let fold1 = temp_dir.path().join("fold1.txt");
        let report = temp_dir.path().join("report.csv");
        fs::write(&fold0, FOLD0).unwrap();
        fs::write(&fold1, FOLD1).unwrap();

        let cli = Cli::try_parse_from([
            "tc-eval",
            "evaluate",
            fold0.to_str().unwrap(),
            fold1.to_str().unwrap(),
            "--mode",
            "multiLabel",
            "--combine",
            "--format",
            "csv",
            "--output",
            report.to_str().unwrap(),
        ])
        .unwrap();
        run(cli.command).unwrap();

        let csv = fs::read_to_string(&report).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("source,metric,value"));
        // one combined report, not one per fold
        let source = format!("{} + {}", fold0.display(), fold1.display());
        assert!(lines.all(|line| line.starts_with(&source)));
        // both records match exactly once the label sets are reconciled
        assert!(csv.contains(",Subset Accuracy,1\n"));
    }

    #[test]
    fn test_homogenize_writes_shared_header() {
        let temp_dir = TempDir::new().unwrap();
        let fold0 = temp_dir.path().join("fold0.txt");
        let fold1 = temp_dir.path().join("fold1.txt");
        let output = temp_dir.path().join("combined.txt");
        fs::write(&fold0, FOLD0).unwrap();
        fs::write(&fold1, FOLD1).unwrap();

        let cli = Cli::try_parse_from([
            "tc-eval",
            "homogenize",
            fold0.to_str().unwrap(),
            fold1.to_str().unwrap(),
            "--mode",
            "multiLabel",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(cli.command).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("#labels 0=X 1=Y 2=Z\n"));
        assert!(text.contains("r1=1.000,0.000,0.000;1.000,0.000,0.000;0.5\n"));
        assert!(text.contains("r2=0.000,0.900,0.100;0.000,1.000,0.000;0.5\n"));
    }
}
