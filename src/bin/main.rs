use clap::{Parser, Subcommand};
use scopetrack::config::{TrackerConfig, load_settings};
use scopetrack::reconcile::NodeMatch;
use scopetrack::{CompareStatus, ScopeTree, Tracker, TrackerError, TrackerResult};
use std::path::{Path, PathBuf};
use url::Url;

/// Track lexical scopes of Rust source files across edits
#[derive(Parser)]
#[command(name = "scopetrack")]
#[command(version)]
#[command(about = "Track lexical scopes of Rust source files across edits")]
struct Cli {
    /// Settings file applied on top of user and project configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scope tree of a file
    Tree {
        file: PathBuf,

        /// Print the persisted (level-order) form instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Reconcile the scopes of NEW against a snapshot of OLD
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> TrackerResult<()> {
    let root = std::env::current_dir().ok();
    let outcome = load_settings(root.as_deref(), cli.config.as_deref());
    outcome.log_events();
    let config = TrackerConfig::resolve(&outcome.settings)?;
    let mut tracker = Tracker::rust(config);

    match cli.command {
        Commands::Tree { file, json } => {
            let uri = open(&mut tracker, &file)?;
            let tree = tracker
                .tree(&uri)
                .ok_or_else(|| TrackerError::document_not_found(uri.as_str()))?;
            if json {
                println!("{}", tree.to_json()?);
            } else {
                print_outline(tree);
            }
        }
        Commands::Diff { old, new, json } => {
            let old_uri = open(&mut tracker, &old)?;
            let snapshot = tracker.snapshot(&old_uri)?;
            tracker.close(&old_uri);
            let (historical, report) = tracker.restore(snapshot)?;
            if !report.is_clean() {
                log::warn!("{} scopes of {} lost their parent", report.orphaned.len(), old.display());
            }

            let new_uri = open(&mut tracker, &new)?;
            let report = tracker.reconcile(&new_uri, &historical)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.entries().for_each(print_match);
            }
        }
    }

    Ok(())
}

fn open(tracker: &mut Tracker, path: &Path) -> TrackerResult<Url> {
    let text = std::fs::read_to_string(path)?;
    let absolute = std::fs::canonicalize(path)?;
    let uri = Url::from_file_path(&absolute)
        .map_err(|_| TrackerError::document_not_found(absolute.display().to_string()))?;
    tracker.open(uri.clone(), text)?;
    Ok(uri)
}

fn print_outline(tree: &ScopeTree) {
    for node in tree.pre_order() {
        let data = node.data();
        println!(
            "{}{} {} {}",
            "  ".repeat(node.depth()),
            data.kind(),
            data.name(),
            data.range()
        );
    }
}

fn print_match(entry: &NodeMatch) {
    let status = entry.result.status;
    match status {
        CompareStatus::Modified => println!(
            "{:<8} {} {} ({:.2}, {:+} lines)",
            status.as_str(),
            entry.kind,
            entry.name,
            entry.result.score,
            entry.result.delta.start_line
        ),
        _ => println!("{:<8} {} {}", status.as_str(), entry.kind, entry.name),
    }
}
