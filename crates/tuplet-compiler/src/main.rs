//! Tuplet Language Toolchain
//!
//! Command-line interface for checking and running Tuplet programs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tuplet_ast::unparse_program;
use tuplet_compiler::{check_source, run_source, typeof_source_with, CompileError, CompileOptions};
use tuplet_diagnostics::render::render_short;
use tuplet_diagnostics::span::LabelStyle;
use tuplet_diagnostics::{DiagnosticSeverity, ErrorCodeRegistry};
use tuplet_interpreter::{Interpreter, Value};
use tuplet_types::{CheckerConfig, DefinePolicy};

#[derive(Parser)]
#[command(name = "tuplet")]
#[command(version)]
#[command(about = "Type checker and evaluator for the Tuplet language", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Type `define` initializers and check them against their declared types
    #[arg(long, global = true)]
    strict_define: bool,

    /// Disable coloured diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// How diagnostics are printed
    #[arg(long, value_enum, default_value_t = MessageFormat::Human, global = true)]
    message_format: MessageFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// Source excerpts with labels
    Human,
    /// One line per error
    Short,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check a source file and print the type of the program
    Check {
        /// Source file to check
        file: PathBuf,
    },
    /// Print the type of an expression given on the command line
    Typeof {
        /// Source text of one expression, form or program
        source: String,
    },
    /// Type-check and evaluate a source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Evaluate without type checking first
        #[arg(long)]
        unchecked: bool,
    },
    /// Parse a source file and print it back
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Lex a source file and display tokens
    Lex {
        /// Source file to lex
        file: PathBuf,
    },
    /// Describe an error code
    Explain {
        /// Error code such as E0005
        code: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CheckerConfig {
        define_policy: if cli.strict_define {
            DefinePolicy::Checked
        } else {
            DefinePolicy::Permissive
        },
    };
    let reporter = Reporter {
        format: cli.message_format,
        color: !cli.no_color,
    };

    match cli.command {
        Commands::Check { file } => check_file(&file, &config, &reporter),
        Commands::Typeof { source } => typeof_inline(&source, &config, &reporter),
        Commands::Run { file, unchecked } => {
            let options = CompileOptions {
                checker: config,
                type_check: !unchecked,
            };
            run_file(&file, &options, &reporter)
        }
        Commands::Parse { file } => parse_file(&file, &reporter),
        Commands::Lex { file } => lex_file(&file),
        Commands::Explain { code } => explain(&code),
    }
}

/// `RUST_LOG` wins; otherwise the level follows the `-v` count.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            None
        }
    }
}

/// Type-check a source file and print its type
fn check_file(path: &Path, config: &CheckerConfig, reporter: &Reporter) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let filename = path.display().to_string();

    match check_source(&source, config) {
        Ok(te) => {
            println!("{}", te);
            ExitCode::SUCCESS
        }
        Err(error) => {
            reporter.report(&filename, &source, &error);
            ExitCode::FAILURE
        }
    }
}

fn typeof_inline(source: &str, config: &CheckerConfig, reporter: &Reporter) -> ExitCode {
    match typeof_source_with(source, config) {
        Ok(te) => {
            println!("{}", te);
            ExitCode::SUCCESS
        }
        Err(error) => {
            reporter.report("<input>", source, &error);
            ExitCode::FAILURE
        }
    }
}

/// Run a program with the tree-walking evaluator
fn run_file(path: &Path, options: &CompileOptions, reporter: &Reporter) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let filename = path.display().to_string();

    let mut interpreter = Interpreter::new();
    let result = run_source(&source, options, &mut interpreter);

    let output = interpreter.take_output();
    print!("{}", output);
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }

    match result {
        Ok(Value::Void) => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(error) => {
            reporter.report(&filename, &source, &error);
            ExitCode::FAILURE
        }
    }
}

/// Parse a source file and print the un-parsed program
fn parse_file(path: &Path, reporter: &Reporter) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let filename = path.display().to_string();

    match tuplet_parser::parse_program(&source) {
        Ok(program) => {
            println!("{}", unparse_program(&program));
            ExitCode::SUCCESS
        }
        Err(error) => {
            reporter.report(&filename, &source, &CompileError::from(error));
            ExitCode::FAILURE
        }
    }
}

/// Lex a source file and display tokens
fn lex_file(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };

    let lexer = tuplet_lexer::Lexer::new(&source);
    let (tokens, lex_errors) = lexer.tokenize_filtered();

    println!("Tokens ({}):", tokens.len());
    for token in &tokens {
        println!("  {:?} @ {:?}", token.kind, token.span);
    }

    if !lex_errors.is_empty() {
        println!("\nLexer errors ({}):", lex_errors.len());
        for error in &lex_errors {
            println!("  {}", error);
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn explain(code: &str) -> ExitCode {
    let registry = ErrorCodeRegistry::with_standard_codes();
    match registry.explain(code) {
        Ok(info) => {
            println!("{}: {}", info.code, info.description);
            println!("category: {}", info.category.name());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Error reporting
// ============================================================================

struct Reporter {
    format: MessageFormat,
    color: bool,
}

impl Reporter {
    fn report(&self, filename: &str, source: &str, error: &CompileError) {
        match self.format {
            MessageFormat::Short => {
                let diag = error.to_diagnostic().in_file(filename);
                eprintln!("{}", render_short(&diag, source));
            }
            MessageFormat::Human => self.report_human(filename, source, error),
        }
    }

    /// Render with ariadne: one label per diagnostic span, notes and help
    /// messages folded into the report footer.
    fn report_human(&self, filename: &str, source: &str, error: &CompileError) {
        let diag = error.to_diagnostic();
        let offset = diag
            .primary_span()
            .map(|span| span.start)
            .unwrap_or(source.len());

        let mut report = Report::build(ReportKind::Error, filename, offset)
            .with_config(Config::default().with_color(self.color))
            .with_code(error.code())
            .with_message(&diag.message);

        for label in diag.spans.labels() {
            let color = match label.style {
                LabelStyle::Primary => Color::Red,
                LabelStyle::Secondary => Color::Blue,
            };
            report = report.with_label(
                Label::new((filename, label.span.start..label.span.end))
                    .with_message(&label.message)
                    .with_color(color),
            );
        }

        let notes = child_messages(&diag.children, DiagnosticSeverity::Note);
        if !notes.is_empty() {
            report = report.with_note(notes);
        }
        let helps = child_messages(&diag.children, DiagnosticSeverity::Help);
        if !helps.is_empty() {
            report = report.with_help(helps);
        }

        if let Err(e) = report.finish().eprint((filename, Source::from(source))) {
            eprintln!("{}: {}", filename, error);
            tracing::warn!("failed to render diagnostic: {}", e);
        }
    }
}

fn child_messages(children: &[tuplet_diagnostics::Diagnostic], severity: DiagnosticSeverity) -> String {
    children
        .iter()
        .filter(|child| child.severity == severity)
        .map(|child| child.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
