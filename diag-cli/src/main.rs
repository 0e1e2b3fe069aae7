use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

mod convert;
mod info;
mod validate;

use convert::ConvertOptions;

#[derive(Parser)]
#[command(
    name = "cdd-converter",
    about = "Convert CANdela CDD diagnostic descriptions to ODX-D, JSON or YAML"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one CDD file, or many with --output-dir
    Convert {
        /// Input CDD file(s)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (.odx/.odx-d, .json, .yml/.yaml)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Batch mode: write one output per input into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Output format; overrides the output extension
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// ECU name written into the ODX header
        #[arg(long)]
        ecu_name: Option<String>,

        /// Document version written into the ODX header
        #[arg(long)]
        version: Option<String>,

        /// Parse and validate without writing output
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a CDD file
    Validate {
        /// Input CDD file
        input: PathBuf,

        /// Suppress individual error output
        #[arg(short, long)]
        quiet: bool,

        /// Print summary count only
        #[arg(short, long)]
        summary: bool,
    },

    /// Display information about a CDD file
    Info {
        /// Input CDD file
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Odx,
    Json,
    Yaml,
}

impl Format {
    /// Extension used for batch output files.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Odx => "odx",
            Format::Json => "json",
            Format::Yaml => "yml",
        }
    }
}

pub fn detect_format(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("odx" | "odx-d") => Ok(Format::Odx),
        Some("json") => Ok(Format::Json),
        Some("yml" | "yaml") => Ok(Format::Yaml),
        Some(ext) => bail!("Unknown output extension: .{ext}. Use .odx, .json or .yml"),
        None => bail!("Cannot detect format: file has no extension"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Convert {
            inputs,
            output,
            output_dir,
            format,
            ecu_name,
            version,
            dry_run,
        } => {
            let options = ConvertOptions {
                ecu_name,
                version,
                dry_run,
            };
            if let Some(dir) = output_dir {
                return convert::run_batch_convert(
                    &inputs,
                    &dir,
                    format.unwrap_or(Format::Odx),
                    &options,
                );
            }
            let Some(output) = output else {
                bail!("Missing output. Use -o <output> or --output-dir <dir>");
            };
            let [input] = inputs.as_slice() else {
                bail!(
                    "{} inputs given with a single output. Use --output-dir for batch conversion",
                    inputs.len()
                );
            };
            let format = match format {
                Some(f) => f,
                None => detect_format(&output)?,
            };
            convert::run_convert(input, &output, format, &options).map(|_| ())
        }

        Command::Validate {
            input,
            quiet,
            summary,
        } => validate::run_validate(&input, quiet, summary),

        Command::Info { input } => info::run_info(&input),
    }
}
