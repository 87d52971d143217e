//! Command-line interface for catgit.
//!
//! This binary resolves flags into [`CatgitOptions`], runs a single walk and
//! writes the tree plus concatenated file contents to stdout or a file.

use catgit::output::{self, OutputFormat as Format};
use catgit::{BinaryDetection, CatgitBuilder, CatgitError, CatgitOptions, catgit, vcs};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::exit;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Name of the secondary ignore file picked up from the root when present.
const DEFAULT_IGNORE_FILE: &str = ".catgitignore";

/// catgit: flatten a git project into one text snapshot
#[derive(Parser)]
#[command(name = "catgit", version, about, long_about = None)]
struct Cli {
    /// Root directory (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Secondary ignore pattern file (default: <root>/.catgitignore when present)
    #[arg(long)]
    ignore_file: Option<PathBuf>,

    /// Only include files matching the patterns in this file
    #[arg(long, value_name = "FILE")]
    include_only: Option<PathBuf>,

    /// Do not consult git's ignore rules
    #[arg(long)]
    no_vcs: bool,

    /// Extra directory names to prune (can be repeated)
    #[arg(short = 'x', long = "exclude-dir")]
    exclude_dirs: Vec<String>,

    /// Leave ignored entries out of the tree entirely
    #[arg(long)]
    hide_ignored: bool,

    /// List ignored entries without the ignored marker
    #[arg(long)]
    no_markup: bool,

    /// Leave the tree out of the output
    #[arg(long)]
    no_tree: bool,

    /// Fence placed around each file's content (empty disables)
    #[arg(long, default_value = catgit::DEFAULT_DELIMITER)]
    delimiter: String,

    /// Binary detection strategy
    #[arg(long, default_value = "ratio", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// File reader threads (0 = one per core)
    #[arg(short = 'j', long = "jobs", default_value_t = 0)]
    jobs: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write to this file instead of stdout (extension added when missing)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log filtering decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "ratio" => Ok(BinaryDetection::Ratio),
        "inspector" => Ok(BinaryDetection::Inspector),
        "none" => Ok(BinaryDetection::Disabled),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

impl Cli {
    fn to_options(&self) -> Result<CatgitOptions, CatgitError> {
        let mut builder = CatgitBuilder::new(&self.root)
            .respect_vcs_ignore(!self.no_vcs)
            .display_ignored(!self.hide_ignored)
            .markup_ignored(!self.no_markup)
            .include_tree(!self.no_tree)
            .delimiter(self.delimiter.clone())
            .binary_detection(self.binary_detection)
            .workers(self.jobs);

        for name in &self.exclude_dirs {
            builder = builder.exclude_dir(name.clone());
        }

        let default_ignore = self.root.join(DEFAULT_IGNORE_FILE);
        builder = match &self.ignore_file {
            Some(path) => builder.ignore_file(path)?,
            None if default_ignore.is_file() => builder.ignore_file(default_ignore)?,
            None => builder,
        };

        if let Some(path) = &self.include_only {
            builder = builder.include_only_file(path)?;
        }

        Ok(builder.build())
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("catgit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CatgitError> {
    let options = cli.to_options()?;
    let url = if vcs::is_repository(&cli.root) {
        vcs::remote_url(&cli.root)
    } else {
        warn!(root = %cli.root.display(), "not a git work tree, git ignore rules do not apply");
        None
    };
    let header = output::project_header(url.as_deref());

    let result = catgit(options)?;
    let format = Format::from(cli.format);
    match &cli.output {
        Some(path) => {
            let mut path = path.clone();
            if path.extension().is_none() {
                path.set_extension(format.extension());
            }
            output::write_result_to_file(&result, format, Some(&header), path)
        }
        None => {
            let out = output::format_result(&result, format, Some(&header))?;
            print!("{}", out);
            if !out.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
