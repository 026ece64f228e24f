use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use clap::{Parser, Subcommand};
use http::StatusCode;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use rating_calc::config::{self, Config, OutputConfig};
use rating_calc::{output, rating, service};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the final rating and print it as JSON
    Calculate {
        /// Request file (reads stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Print every pipeline stage as a table instead of JSON
        #[arg(long)]
        breakdown: bool,
    },
    /// Compute a rounded rating and save it as a result file
    Upload {
        /// Request file to rate
        input: PathBuf,

        /// Where to write the result (defaults to <results_dir>/result.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decimal places to round the rating to (defaults to config, then 2)
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Validate a request without printing a rating
    Check {
        /// Request file (reads stdin when omitted or "-")
        input: Option<PathBuf>,
    },
    /// Write a starter config file
    Init {
        #[arg(long)]
        precision: Option<u32>,

        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "rating-calc")]
#[command(about = "Weighted multi-criteria rating calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rating-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    rating_calc::logging::init(cli.verbose);

    let code = match run(cli.command, cli.config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_IO
        }
    };
    std::process::exit(code);
}

/// Load the config and reject it if any value is out of bounds.
fn load_valid_config(path: Option<PathBuf>) -> Result<Config> {
    let config = config::load_config(path)?;
    if let Err(errors) = config::validate_config(&config) {
        anyhow::bail!("{}", errors.join("; "));
    }
    debug!(?config, "config loaded");
    Ok(config)
}

fn run(command: Commands, config_path: Option<PathBuf>) -> Result<i32> {
    match command {
        Commands::Calculate { input, breakdown } => {
            let body = read_input(input.as_deref())?;

            if breakdown {
                return match service::evaluate(&body) {
                    Ok(evaluation) => {
                        let use_colors = output::should_use_colors();
                        println!(
                            "{}",
                            output::format_breakdown(
                                &evaluation.request,
                                &evaluation.result,
                                use_colors
                            )
                        );
                        Ok(EXIT_SUCCESS)
                    }
                    Err(e) => {
                        println!("{}", service::error_response(&e).body());
                        Ok(EXIT_INVALID_INPUT)
                    }
                };
            }

            let response = service::calculate(&body);
            println!("{}", response.body());
            Ok(exit_code_for(response.status()))
        }
        Commands::Upload {
            input,
            output,
            precision,
        } => {
            let config = match load_valid_config(config_path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    return Ok(EXIT_CONFIG);
                }
            };

            let precision = precision.unwrap_or_else(|| config.output.effective_precision());
            if precision > config::MAX_PRECISION {
                eprintln!(
                    "Config error: precision must be at most {}, got {}",
                    config::MAX_PRECISION,
                    precision
                );
                return Ok(EXIT_CONFIG);
            }

            let body = read_input(Some(input.as_path()))?;
            let response = service::upload(&body, precision);
            if response.status() != StatusCode::OK {
                eprintln!("Rating failed: {}", response.body());
                return Ok(exit_code_for(response.status()));
            }

            let path = output.unwrap_or_else(|| {
                config
                    .output
                    .effective_results_dir()
                    .join(service::RESULT_FILENAME)
            });
            save_result(&path, response.body())?;
            println!("Result written to {}", path.display());
            Ok(EXIT_SUCCESS)
        }
        Commands::Check { input } => {
            let body = read_input(input.as_deref())?;
            match rating::parse_request(&body) {
                Ok(request) => {
                    println!(
                        "ok: {} entries, {} criteria",
                        request.data().len(),
                        request.criteria().count()
                    );
                    Ok(EXIT_SUCCESS)
                }
                Err(e) => {
                    eprintln!("Invalid request ({}): {}", e.kind(), e);
                    Ok(EXIT_INVALID_INPUT)
                }
            }
        }
        Commands::Init {
            precision,
            results_dir,
            force,
        } => {
            let output = OutputConfig {
                precision,
                results_dir,
            };
            match config::init::run_init(config_path, output, force) {
                Ok(Some(path)) => println!("Config written to {}", path.display()),
                Ok(None) => println!("Aborted."),
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    return Ok(EXIT_CONFIG);
                }
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

fn exit_code_for(status: StatusCode) -> i32 {
    if status.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_INVALID_INPUT
    }
}

/// Read a request body from a file, or from stdin for `None` / "-".
fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("Failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

/// Write the result file atomically, creating its directory if needed.
fn save_result(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write result to {}", path.display()))?;
    file.commit().context("Failed to save result")?;

    Ok(())
}
