use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sqlbundle::bundle::write_bundle;
use sqlbundle::cli::{read_file_list, run_bundle_workflow, BundleWorkflowArgs};
use sqlbundle::config::load_config;
use sqlbundle::git::Git2Repository;
use sqlbundle::store::RecordedStateStore;
use sqlbundle::{ui, BundleError};

#[derive(clap::Parser)]
#[command(
    name = "sqlbundle",
    version,
    about = "Bundle the SQL files changed since a database's last release into one stamped release script"
)]
struct Args {
    #[arg(
        long,
        default_value = ".",
        help = "Root of a working copy of the repository"
    )]
    repo_dirpath: PathBuf,

    #[arg(
        long,
        help = "Label for the bundle name, typically a release version; may contain {timestamp} [default: {timestamp}]"
    )]
    release_tag: Option<String>,

    #[arg(
        long,
        help = "Target database as server/database, optionally with scheme and credentials (mssql://user:pw@server/db)"
    )]
    dburi: Option<String>,

    #[arg(
        long,
        help = "First commit boundary (exclusive). Default: the database's last release, else the repository root"
    )]
    from_commit: Option<String>,

    #[arg(long, help = "Last commit to include. Default: HEAD")]
    to_commit: Option<String>,

    #[arg(long, help = "Glob selecting files relative to the repository root [default: *.sql]")]
    code_pattern: Option<String>,

    #[arg(
        long,
        help = "File listing the paths to bundle, one per line; skips commit range scanning"
    )]
    files: Option<PathBuf>,

    #[arg(long, help = "Directory, relative to the repository, for bundles [default: releases]")]
    releases_relpath: Option<String>,

    #[arg(long, help = "Key for release metadata on the database [default: gplan-cas]")]
    release_type: Option<String>,

    #[arg(long, help = "Bundle name last applied to the database, if already known")]
    applied_bundle: Option<String>,

    #[arg(long, help = "Follow first parents through merge commits instead of rejecting them")]
    first_parent: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Print the bundle to stdout instead of writing a file")]
    stdout: bool,

    #[arg(long, help = "Preview the selection without writing a bundle")]
    dry_run: bool,

    #[arg(short, long, help = "Overwrite an existing bundle file")]
    force: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v info, -vv debug)")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        let code = e
            .downcast_ref::<BundleError>()
            .map_or(1, BundleError::exit_code);
        std::process::exit(code);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.repo_dirpath)?;
    let repo = Git2Repository::open(&args.repo_dirpath)?;
    let store = RecordedStateStore::from_entries(&config.databases);

    let files = args.files.as_deref().map(read_file_list).transpose()?;

    let workflow_args = BundleWorkflowArgs {
        release_tag: args.release_tag,
        dburi: args.dburi,
        from_commit: args.from_commit,
        to_commit: args.to_commit,
        code_pattern: args.code_pattern,
        files,
        release_type: args.release_type,
        applied_bundle: args.applied_bundle,
        first_parent: args.first_parent,
    };

    ui::display_status("Resolving release range...");
    let result = run_bundle_workflow(&repo, &store, &workflow_args, &config, Utc::now())?;

    for warning in &result.warnings {
        ui::display_selection_warning(warning);
    }
    ui::display_bundle_summary(&result.bundle, result.commits_scanned);

    if args.dry_run {
        ui::display_status("Dry run: no bundle written");
        return Ok(());
    }

    if args.stdout {
        print!("{}", result.bundle.render());
        return Ok(());
    }

    let releases_relpath = args
        .releases_relpath
        .unwrap_or_else(|| config.releases_relpath.clone());
    let releases_dir = args.repo_dirpath.join(releases_relpath);
    let path = write_bundle(&result.bundle, &releases_dir, args.force)?;

    ui::display_success(&format!("Wrote release bundle {}", path.display()));
    Ok(())
}
