use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use doxsearch::commands::{
    check_command, export_command, files_command, import_command, init_workspace_command,
    list_snapshots_command, remove_snapshot_command, search_command, show_command,
    workspace_info_command, IndexSource,
};

/// Inspect, validate and query Doxygen search-index tables.
///
/// This CLI is a thin wrapper around `doxsearch-core` (exposed in code as `doxsearch_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "doxsearch",
    version,
    about = "Inspect, validate and query Doxygen search-index tables",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Where read-only commands load indexes from.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Workspace root directory. Defaults to the current working directory.
    #[arg(long, default_value = ".")]
    root: String,

    /// Read an index file or generated `search/` directory instead of the workspace.
    #[arg(long)]
    index: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> IndexSource {
        IndexSource::from_args(&self.root, self.index)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tool version.
    Version,

    /// Initialize a new workspace at the given root.
    ///
    /// This will:
    /// - Create a `.doxsearch` metadata directory and a `reports` directory.
    /// - Write a `.doxsearch/workspace.json` config file.
    /// - Create the symbol database.
    Init {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional workspace name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Default index path used by `import` when `--path` is omitted.
        #[arg(long)]
        index_dir: Option<String>,
    },

    /// Show basic information about an existing workspace.
    Info {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Parse and validate an index file or `search/` directory.
    ///
    /// Exits non-zero when errors are found (or warnings, with `--strict`).
    Check {
        /// Index file or directory to check.
        #[arg(long)]
        path: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Treat warnings as failures.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Import index files into the workspace database.
    Import {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Index file or directory. Defaults to the workspace's `index_dir`.
        #[arg(long)]
        path: Option<String>,

        /// Re-import files whose content was already imported.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List imported snapshots.
    Snapshots {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Delete a snapshot and its symbols.
    RemoveSnapshot {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Snapshot id (see `snapshots`).
        #[arg(long)]
        id: i64,
    },

    /// Search symbols the way the browser search box does.
    Search {
        /// Query text; trimmed and key-encoded before matching.
        query: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Match mode: prefix, exact or substring.
        #[arg(long, default_value = "prefix")]
        mode: String,

        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show every documented occurrence of a symbol.
    Show {
        /// Symbol name (or key).
        name: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List symbols grouped by defining file.
    Files {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Export indexes as JSON, YAML or the generator's script form.
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format: json, yaml or js.
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file. Defaults to `reports/snapshots.<format>` for a workspace and to
        /// stdout for `--index`.
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Default to the Version command if none is provided.
    match cli.command.unwrap_or(Command::Version) {
        Command::Version => version_command(),
        Command::Init { root, name, index_dir } => init_workspace_command(&root, name, index_dir)?,
        Command::Info { root, json } => workspace_info_command(&root, json)?,
        Command::Check { path, json, strict } => check_command(&path, json, strict)?,
        Command::Import { root, path, force, json } => import_command(&root, path, force, json)?,
        Command::Snapshots { root, json } => list_snapshots_command(&root, json)?,
        Command::RemoveSnapshot { root, id } => remove_snapshot_command(&root, id)?,
        Command::Search { query, source, mode, limit, json } => {
            search_command(&source.into_source(), &query, &mode, limit, json)?
        }
        Command::Show { name, source, json } => show_command(&source.into_source(), &name, json)?,
        Command::Files { source, json } => files_command(&source.into_source(), json)?,
        Command::Export { source, format, output } => {
            export_command(&source.into_source(), &format, output)?
        }
    }

    Ok(())
}

fn version_command() {
    println!("doxsearch v{}", doxsearch_core::version());
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
