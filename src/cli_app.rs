//! Top-level CLI definition and dispatch.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use crate::core::config::Config;
use crate::core::errors::WsError;
use crate::logger::{Journal, JournalEntry};
use crate::monitor::{AnalysisPoller, SnapshotStore};
use crate::workspace::cleanup::{CleanupCategory, CleanupRequest, cleanup, format_cleanup_report};
use crate::workspace::organize::{OrganizeStrategy, format_organize_report, organize};
use crate::workspace::stats::{analyze, format_analysis_report};
use crate::workspace::tree::{NodeKind, TreeNode, build_tree};

/// Workspace sweeper: analyze, clean, and reorganize a workspace tree.
#[derive(Parser)]
#[command(name = "wsw", version, about)]
pub struct Cli {
    /// Workspace root (defaults to $WSW_ROOT, then the current directory).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Walk the workspace and report statistics and duplicates.
    Analyze,
    /// Delete temporary files, logs, and caches.
    Cleanup {
        /// Delete .tmp/.temp/.bak files.
        #[arg(long)]
        temp: bool,
        /// Delete .log files.
        #[arg(long)]
        logs: bool,
        /// Delete cache files and cache directories.
        #[arg(long)]
        cache: bool,
        /// Report what would be deleted without deleting.
        #[arg(long)]
        dry_run: bool,
    },
    /// Move files into per-type folders.
    Organize {
        /// Organization strategy.
        #[arg(long, default_value = "by-type")]
        strategy: String,
    },
    /// Print a depth-bounded file tree.
    Tree {
        /// Maximum depth below the root.
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Re-analyze on an interval until interrupted.
    Poll {
        /// Seconds between analyses.
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn resolve_root(cli: &Cli) -> Result<PathBuf, WsError> {
    if let Some(root) = &cli.root {
        return Ok(root.clone());
    }
    if let Some(root) = std::env::var_os("WSW_ROOT") {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().map_err(|err| WsError::io(".", err))
}

fn emit_json<T: Serialize>(command: &str, result: &T) -> Result<(), WsError> {
    let payload = json!({ "command": command, "result": result });
    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}

fn journal(config: &Config) -> Option<Journal> {
    config.paths.journal.as_ref().map(Journal::new)
}

fn print_tree(node: &TreeNode, indent: usize, out: &mut String) {
    use std::fmt::Write as _;
    let label = match node.kind {
        NodeKind::Directory => format!("{}/", node.name).blue().bold().to_string(),
        NodeKind::File => node.name.clone(),
    };
    let _ = writeln!(out, "{}{label}", "  ".repeat(indent));
    for child in node.children.iter().flatten() {
        print_tree(child, indent + 1, out);
    }
}

/// Dispatch CLI commands.
///
/// # Errors
/// Returns an error if the subcommand fails.
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Completions { shell } = &cli.command {
        let mut command = Cli::command();
        clap_complete::generate(*shell, &mut command, "wsw", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load_or_default(cli.config.as_deref())?;
    let root = resolve_root(cli)?;

    match &cli.command {
        Command::Analyze => {
            let analysis = analyze(&root, &config.analysis)?;
            if cli.json {
                emit_json("analyze", &analysis)?;
            } else {
                println!("{}", "Workspace analysis".bold());
                print!("{}", format_analysis_report(&analysis));
            }
        }
        Command::Cleanup {
            temp,
            logs,
            cache,
            dry_run,
        } => {
            let selected = [
                (*temp, CleanupCategory::Temp),
                (*logs, CleanupCategory::Logs),
                (*cache, CleanupCategory::Cache),
            ];
            let request = CleanupRequest::new(
                selected
                    .into_iter()
                    .filter_map(|(wanted, category)| wanted.then_some(category)),
            )
            .with_dry_run(*dry_run || config.cleanup.dry_run);
            if request.categories.is_empty() {
                return Err("select at least one of --temp, --logs, --cache".into());
            }
            let result = cleanup(&root, &request, &config)?;
            if let Some(journal) = journal(&config) {
                journal.record(&JournalEntry::from_cleanup(&root, &result));
            }
            if cli.json {
                emit_json("cleanup", &result)?;
            } else {
                let report = format_cleanup_report(&result);
                if result.errors.is_empty() {
                    print!("{report}");
                } else {
                    print!("{}", report.yellow());
                }
            }
        }
        Command::Organize { strategy } => {
            let strategy: OrganizeStrategy = strategy.parse()?;
            let result = organize(&root, strategy, &config.analysis)?;
            if let Some(journal) = journal(&config) {
                journal.record(&JournalEntry::from_organize(&root, &result));
            }
            if cli.json {
                emit_json("organize", &result)?;
            } else {
                print!("{}", format_organize_report(&result));
            }
        }
        Command::Tree { depth } => {
            let depth = depth.unwrap_or(config.tree.default_depth);
            let tree = build_tree(&root, depth, &config.analysis)?;
            if cli.json {
                emit_json("tree", &tree)?;
            } else {
                let mut out = String::new();
                print_tree(&tree, 0, &mut out);
                print!("{out}");
            }
        }
        Command::Poll { interval } => {
            let interval = interval.map_or_else(|| config.monitor.poll_interval(), Duration::from_secs);
            poll(&root, &config, interval, cli.json)?;
        }
        Command::Completions { .. } => unreachable!("handled above"),
    }
    Ok(())
}

fn poll(
    root: &std::path::Path,
    config: &Config,
    interval: Duration,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))?;

    let store = Arc::new(SnapshotStore::new());
    let handle =
        AnalysisPoller::new(root, config.analysis.clone(), interval).spawn(Arc::clone(&store))?;

    let mut seen = 0;
    while !stop.load(Ordering::Relaxed) {
        if store.generation() != seen {
            seen = store.generation();
            if let Some(snapshot) = store.latest() {
                if json {
                    emit_json("poll", snapshot.as_ref())?;
                } else {
                    println!(
                        "[{}] {} files, {:.2} MB, {} duplicate group(s)",
                        snapshot.analyzed_at.format("%Y-%m-%d %H:%M:%S"),
                        snapshot.total_files,
                        snapshot.total_size_mb,
                        snapshot.duplicate_files.len()
                    );
                }
                std::io::stdout().flush()?;
            }
        }
        std::thread::sleep(Duration::from_millis(200));
    }
    handle.stop()?;
    Ok(())
}
