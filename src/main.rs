use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mjsema::config::{self, AnalyzerConfig};
use mjsema::diagnostics::{self, CompileError};

#[derive(Parser)]
#[command(name = "mjsema", version, about = "Semantic analyzer for MiniJava")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check a MiniJava source file
    Check {
        /// Source file path
        file: PathBuf,
        /// Output format for diagnostics
        #[arg(long, value_enum, default_value_t = Format::Human)]
        format: Format,
        /// Worker threads for checking class bodies (overrides mjsema.toml)
        #[arg(long)]
        jobs: Option<usize>,
        /// Stop reporting after this many diagnostics (overrides mjsema.toml)
        #[arg(long)]
        max_diagnostics: Option<usize>,
        /// Config file (defaults to mjsema.toml next to the source file)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the token stream of a source file
    Tokens {
        file: PathBuf,
    },
    /// Print the parsed AST of a source file
    Ast {
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Human,
    Plain,
    Json,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MJSEMA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn read_source(file: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(file)
        .map_err(|e| CompileError::io(format!("could not read file: {e}"), file.to_path_buf()))
}

fn resolve_config(
    file: &Path,
    explicit: Option<&Path>,
    jobs: Option<usize>,
    max_diagnostics: Option<usize>,
) -> Result<AnalyzerConfig, CompileError> {
    let path = explicit.map(Path::to_path_buf).or_else(|| config::find_config(file));
    let mut config = match path {
        Some(path) => config::load_config(&path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(jobs) = jobs {
        config.jobs = jobs.max(1);
    }
    if max_diagnostics.is_some() {
        config.max_diagnostics = max_diagnostics;
    }
    Ok(config)
}

fn report_fatal(source: Option<&str>, file: &Path, err: &CompileError) -> ExitCode {
    match (source, err) {
        (Some(source), CompileError::Syntax { .. }) => diagnostics::render_error(source, err),
        _ => eprintln!("error [{}]: {err}", file.display()),
    }
    ExitCode::from(2)
}

fn run_check(
    file: &Path,
    format: Format,
    jobs: Option<usize>,
    max_diagnostics: Option<usize>,
    config_path: Option<&Path>,
) -> ExitCode {
    let config = match resolve_config(file, config_path, jobs, max_diagnostics) {
        Ok(config) => config,
        Err(err) => return report_fatal(None, file, &err),
    };
    let source = match read_source(file) {
        Ok(source) => source,
        Err(err) => return report_fatal(None, file, &err),
    };
    let mut found = match mjsema::analyze_source(&source, &config) {
        Ok(found) => found,
        Err(err) => return report_fatal(Some(&source), file, &err),
    };
    let total = found.len();
    if let Some(max) = config.max_diagnostics {
        found.truncate(max);
    }

    let filename = file.display().to_string();
    match format {
        Format::Human => {
            diagnostics::render_diagnostics(&source, &found);
            if total > 0 {
                let noun = if total == 1 { "error" } else { "errors" };
                eprintln!("{filename}: {total} {noun}");
            }
        }
        Format::Plain => print!("{}", diagnostics::format_plain(&filename, &source, &found)),
        Format::Json => match diagnostics::format_json(&source, &found) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize diagnostics: {e}");
                return ExitCode::from(2);
            }
        },
    }

    if total == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, format, jobs, max_diagnostics, config } => {
            run_check(&file, format, jobs, max_diagnostics, config.as_deref())
        }
        Commands::Tokens { file } => {
            let source = match read_source(&file) {
                Ok(source) => source,
                Err(err) => return report_fatal(None, &file, &err),
            };
            match mjsema::lexer::lex(&source) {
                Ok(tokens) => {
                    for tok in tokens {
                        let text = &source[tok.span.start..tok.span.end];
                        println!("{}..{}\t{:?}\t{text}", tok.span.start, tok.span.end, tok.node);
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => report_fatal(Some(&source), &file, &err),
            }
        }
        Commands::Ast { file } => {
            let source = match read_source(&file) {
                Ok(source) => source,
                Err(err) => return report_fatal(None, &file, &err),
            };
            match mjsema::parser::parse_source(&source) {
                Ok(program) => {
                    println!("{program:#?}");
                    ExitCode::SUCCESS
                }
                Err(err) => report_fatal(Some(&source), &file, &err),
            }
        }
    }
}
