//! Content Model CLI
//!
//! Usage:
//!   content-model [OPTIONS] <TEMPLATE> [DOCUMENT]
//!
//! Options:
//!   -c, --check                Validate the template definition only
//!       --metadata-key <KEY>   Key of the metadata component [default: __metadata]
//!       --no-metadata          Skip unmatched bare keys instead of using metadata
//!   -v, --verbose              Log population details to stderr
//!   -h, --help                 Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use content_model::{check, format_entries, load_with_config, ContentConfig, PopulatorConfig};

#[derive(Parser)]
#[command(name = "content-model")]
#[command(about = "Populate and validate content templates")]
struct Cli {
    /// Template definition file (TOML)
    template: PathBuf,

    /// Document file (TOML); an empty document is used if not provided
    document: Option<PathBuf>,

    /// Validate the template definition only
    #[arg(short, long)]
    check: bool,

    /// Key of the metadata component that receives unmatched bare keys
    #[arg(long, default_value = "__metadata")]
    metadata_key: String,

    /// Skip unmatched bare keys instead of routing them to metadata
    #[arg(long)]
    no_metadata: bool,

    /// Log population details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

fn read(path: &Path) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading file '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error initializing logging: {}", e);
    }

    let config = ContentConfig::new().with_populator(
        PopulatorConfig::new()
            .with_metadata_key(cli.metadata_key)
            .with_metadata_fallback(!cli.no_metadata),
    );

    let template_source = match read(&cli.template) {
        Ok(source) => source,
        Err(code) => return code,
    };

    if cli.check {
        return match check(&template_source, &config) {
            Ok(template) => {
                println!("{}: ok", template.key());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let document_source = match &cli.document {
        Some(path) => match read(path) {
            Ok(source) => source,
            Err(code) => return code,
        },
        None => String::new(),
    };

    let template = match load_with_config(&template_source, &document_source, &config) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", format_entries(&template));

    let errors = template.validate();
    if errors.is_empty() {
        return ExitCode::SUCCESS;
    }
    for error in &errors {
        eprintln!("invalid: {}", error);
    }
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_logging_init_reports_error() {
        let _ = init_logging(false);
        assert!(init_logging(true).is_err());
    }
}
