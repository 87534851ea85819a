use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use uricanon_core::ip::{self, base85};
use uricanon_core::{dedup_key, Error, HexCase, Normalizer, NormalizerConfig};

/// uricanon: URI canonicalization for web archiving
///
/// Canonicalize URIs, compute dedup keys, and normalize IP literals.
#[derive(Parser)]
#[command(name = "uricanon", version, about, long_about = None)]
struct Cli {
    /// Normalizer configuration (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress all output; report through the exit code only
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize one or more URIs
    Normalize {
        /// URIs to canonicalize
        #[arg(required = true)]
        uris: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the dedup key (SHA-256) of a URI's canonical form
    Hash {
        /// URI to hash
        uri: String,
    },

    /// Canonicalize an IPv4 or IPv6 literal
    Ip {
        /// IP literal, brackets optional for IPv6
        literal: String,
        /// Print IPv6 in the RFC 1924 base-85 form
        #[arg(long)]
        base85: bool,
    },

    /// List the rules of the configured pipeline
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

// ── Exit codes ────────────────────────────────────────────

const EXIT_OK: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        if !cli.quiet {
            eprintln!("{} cannot install logger: {}", "error:".red().bold(), e);
        }
        process::exit(EXIT_ERROR);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            if !cli.quiet {
                eprintln!("{} {}", "error:".red().bold(), e);
            }
            process::exit(EXIT_ERROR);
        }
    };
    let normalizer = Normalizer::default_pipeline(&config);

    let exit_code = match cli.command {
        Commands::Normalize { uris, json } => cmd_normalize(&normalizer, &uris, json, cli.quiet),
        Commands::Hash { uri } => cmd_hash(&normalizer, &uri, cli.quiet),
        Commands::Ip { literal, base85: dense } => {
            cmd_ip(&literal, dense, config.hex_case, cli.quiet)
        }
        Commands::Rules { json } => cmd_rules(&normalizer, json, cli.quiet),
        Commands::Version => {
            if !cli.quiet {
                println!(
                    "uricanon {} (uricanon-core {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("CARGO_PKG_VERSION")
                );
            }
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

fn load_config(path: Option<&Path>) -> uricanon_core::Result<NormalizerConfig> {
    let Some(path) = path else {
        return Ok(NormalizerConfig::default());
    };
    let config = NormalizerConfig::from_path(path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded normalizer config");
    Ok(config)
}

fn report(quiet: bool, input: &str, error: &Error) {
    if !quiet {
        eprintln!("{} {}: {}", "rejected".red().bold(), input, error);
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_normalize(normalizer: &Normalizer, uris: &[String], json: bool, quiet: bool) -> i32 {
    let mut exit_code = EXIT_OK;
    let mut results = Vec::with_capacity(uris.len());

    for uri in uris {
        match normalizer.canonicalize(uri) {
            Ok(canonical) => {
                if json {
                    results.push(serde_json::json!({
                        "input": uri,
                        "canonical": canonical,
                        "dedup_key": dedup_key(&canonical),
                    }));
                } else if !quiet {
                    println!("{}", canonical);
                }
            }
            Err(e) => {
                exit_code = EXIT_REJECTED;
                if json {
                    results.push(serde_json::json!({
                        "input": uri,
                        "error": e.to_string(),
                        "rule": e.rule(),
                    }));
                } else {
                    report(quiet, uri, &e);
                }
            }
        }
    }

    if json && !quiet {
        print_json(&serde_json::Value::Array(results));
    }
    exit_code
}

fn cmd_hash(normalizer: &Normalizer, uri: &str, quiet: bool) -> i32 {
    match normalizer.canonicalize(uri) {
        Ok(canonical) => {
            if !quiet {
                println!("{}", dedup_key(&canonical));
            }
            EXIT_OK
        }
        Err(e) => {
            report(quiet, uri, &e);
            EXIT_REJECTED
        }
    }
}

fn cmd_ip(literal: &str, dense: bool, hex_case: HexCase, quiet: bool) -> i32 {
    let text = literal.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text);

    let looks_v6 = inner.contains(':') || base85::looks_like_base85(inner);
    let result = if looks_v6 {
        ip::parse_ipv6(inner).map(|value| {
            Some(if dense {
                ip::serialize_ipv6_base85(value)
            } else {
                ip::serialize_ipv6(value, hex_case)
            })
        })
    } else if dense {
        if !quiet {
            eprintln!("{} --base85 applies to IPv6 literals only", "error:".red().bold());
        }
        return EXIT_ERROR;
    } else {
        ip::check_and_normalize_ipv4(inner)
    };

    match result {
        Ok(Some(canonical)) => {
            if !quiet {
                println!("{}", canonical);
            }
            EXIT_OK
        }
        Ok(None) => {
            if !quiet {
                eprintln!("{} {}: not an IP literal", "rejected".red().bold(), literal);
            }
            EXIT_REJECTED
        }
        Err(e) => {
            report(quiet, literal, &e);
            EXIT_REJECTED
        }
    }
}

fn cmd_rules(normalizer: &Normalizer, json: bool, quiet: bool) -> i32 {
    if quiet {
        return EXIT_OK;
    }
    let descriptions = normalizer.describe();
    if json {
        return match serde_json::to_value(&descriptions) {
            Ok(value) => {
                print_json(&value);
                EXIT_OK
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                EXIT_ERROR
            }
        };
    }

    for rule in &descriptions {
        let schemes = if rule.schemes.is_empty() {
            "*".to_string()
        } else {
            rule.schemes.join(",")
        };
        println!(
            "{} {} {:<12} {}",
            format!("{:<28}", rule.name).bold(),
            format!("{:<18}", rule.stage).cyan(),
            schemes,
            rule.description
        );
    }
    EXIT_OK
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
    }
}
