//! tstore - scratch storage tool
//!
//! Copy and flush directory trees with exclusions, and create scratch
//! entries, powered by tempstore.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempstore::{
    CopyStats, Error as StoreError, ErrorCode, FlushStats, Storage, StorageConfig, TreeOptions,
    copy_tree, flush_tree,
};
use thiserror::Error;

/// tstore - scratch storage tool
///
/// Copy or empty directory trees while leaving excluded paths alone, and
/// create uniquely named scratch files and directories.
#[derive(Parser, Debug)]
#[command(name = "tstore", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    output: OutputMode,

    /// Disable the spinner
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print one line per processed entry
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the contents of FROM into TO
    Copy {
        /// Source root (must be readable and writable)
        from: PathBuf,

        /// Destination root (must exist, readable and writable)
        to: PathBuf,

        /// Relative path to skip, together with everything below it
        #[arg(short = 'x', long = "exclude", value_name = "FRAGMENT")]
        exclusions: Vec<String>,

        /// Sync every copied file to disk
        #[arg(long)]
        fsync: bool,

        /// Keep source modification and access times
        #[arg(long)]
        preserve_times: bool,
    },

    /// Delete everything below ROOT except excluded paths
    Flush {
        /// Root to empty (kept itself)
        root: PathBuf,

        /// Relative path to keep, together with everything below it
        #[arg(short = 'x', long = "exclude", value_name = "FRAGMENT")]
        exclusions: Vec<String>,
    },

    /// Create an empty scratch file and print its path
    Mkfile(StorageArgs),

    /// Create an empty scratch directory and print its path
    Mkdir(StorageArgs),
}

#[derive(clap::Args, Debug)]
struct StorageArgs {
    /// Storage root (falls back to the system temp dir when unusable)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Name prefix
    #[arg(long, default_value = tempstore::DEFAULT_PREFIX)]
    prefix: String,
}

impl StorageArgs {
    fn config(&self) -> StorageConfig {
        let config = StorageConfig::default().with_prefix(&self.prefix);
        match &self.root {
            Some(root) => config.with_root(root),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Human-readable summary
    Human,
    /// One JSON document on stdout
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid exclusion fragment '{fragment}': {reason}")]
    InvalidExclusion {
        fragment: String,
        reason: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidExclusion { .. } => ErrorCode::InvalidInput,
            Self::Store(source) => source.code(),
            Self::JsonSerialize { .. } => ErrorCode::Internal,
        }
    }
}

fn exit_code_for(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::InvalidInput => 2,
        _ => 1,
    }
}

fn main() {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        if args.output == OutputMode::Json {
            let record = json!({
                "status": "failed",
                "error_code": error.code().as_str(),
                "error_message": error.to_string(),
            });
            // best effort: the human line below still reports the error
            let _ = print_json_value(&record);
        }
        eprintln!("error[{}]: {}", error.code(), error);
        std::process::exit(exit_code_for(error.code()));
    }
}

fn run(args: &Args) -> CliResult<()> {
    match &args.command {
        Command::Copy {
            from,
            to,
            exclusions,
            fsync,
            preserve_times,
        } => {
            let mut options = tree_options(exclusions, args.verbose)?;
            options.fsync = *fsync;
            options.preserve_timestamps = *preserve_times;

            let pb = spinner(args, format!("Copying {}...", from.display()));
            let result = copy_tree(from, to, &options);
            finish(pb);

            let stats = result?;
            match args.output {
                OutputMode::Human => print_copy_stats(&stats),
                OutputMode::Json => print_json_value(&copy_stats_json(from, to, &stats))?,
            }
            Ok(())
        }
        Command::Flush { root, exclusions } => {
            let options = tree_options(exclusions, args.verbose)?;

            let pb = spinner(args, format!("Flushing {}...", root.display()));
            let result = flush_tree(root, &options);
            finish(pb);

            let stats = result?;
            match args.output {
                OutputMode::Human => print_flush_stats(&stats),
                OutputMode::Json => print_json_value(&flush_stats_json(root, &stats))?,
            }
            Ok(())
        }
        Command::Mkfile(storage_args) => {
            let file = Storage::new(storage_args.config()).create_file()?;
            print_created("file", file.path(), args.output)
        }
        Command::Mkdir(storage_args) => {
            let dir = Storage::new(storage_args.config()).create_directory()?;
            print_created("directory", dir.path(), args.output)
        }
    }
}

fn tree_options(exclusions: &[String], verbose: bool) -> CliResult<TreeOptions> {
    for fragment in exclusions {
        validate_fragment(fragment)?;
    }

    let mut options = TreeOptions::default()
        .with_exclusions(exclusions.iter().cloned())
        .with_warn_handler(|msg| eprintln!("warning: {msg}"));
    if verbose {
        options = options.with_verbose_handler(|msg| eprintln!("{msg}"));
    }
    Ok(options)
}

/// Fragments are matched against paths relative to the root, so absolute
/// or empty fragments can never match anything.
fn validate_fragment(fragment: &str) -> CliResult<()> {
    let reason = if fragment.is_empty() {
        "must not be empty"
    } else if Path::new(fragment).is_absolute() {
        "must be relative to the root"
    } else {
        return Ok(());
    };

    Err(CliError::InvalidExclusion {
        fragment: fragment.to_owned(),
        reason,
    })
}

fn spinner(args: &Args, message: String) -> Option<ProgressBar> {
    if args.quiet || args.verbose || args.output != OutputMode::Human {
        return None;
    }

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .ok()?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Some(pb)
}

fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

fn print_copy_stats(stats: &CopyStats) {
    println!(
        "Copied {} files ({}), created {} directories, excluded {} entries in {:.2?}",
        stats.files_copied,
        format_bytes(stats.bytes_copied),
        stats.dirs_created,
        stats.entries_excluded,
        stats.duration
    );
}

fn print_flush_stats(stats: &FlushStats) {
    println!(
        "Removed {} files and {} directories, kept {} excluded entries in {:.2?}",
        stats.files_removed, stats.dirs_removed, stats.entries_excluded, stats.duration
    );
}

fn copy_stats_json(from: &Path, to: &Path, stats: &CopyStats) -> Value {
    json!({
        "status": "ok",
        "operation": "copy",
        "from": display_path(from),
        "to": display_path(to),
        "files_copied": stats.files_copied,
        "dirs_created": stats.dirs_created,
        "bytes_copied": stats.bytes_copied,
        "entries_excluded": stats.entries_excluded,
        "duration_ms": stats.duration.as_millis() as u64,
    })
}

fn flush_stats_json(root: &Path, stats: &FlushStats) -> Value {
    json!({
        "status": "ok",
        "operation": "flush",
        "root": display_path(root),
        "files_removed": stats.files_removed,
        "dirs_removed": stats.dirs_removed,
        "entries_excluded": stats.entries_excluded,
        "duration_ms": stats.duration.as_millis() as u64,
    })
}

fn print_created(kind: &str, path: &Path, output: OutputMode) -> CliResult<()> {
    match output {
        OutputMode::Human => {
            println!("{}", display_path(path));
            Ok(())
        }
        OutputMode::Json => print_json_value(&json!({
            "status": "ok",
            "operation": "create",
            "kind": kind,
            "path": display_path(path),
        })),
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
