//! CLI for the C-aware program reducer.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use shrinkc_core::methods::{AllBlanks, Blanks, Brackets, Crc, DelArgs, Indent, MoveFunc, Parens, ReplaceRegex, ShortenInts, Ternary};
use shrinkc_core::{Buffer, Method, MethodId, Registry};
use shrinkc_oracle::{BackupManager, IndentRunner, OracleHarness, ReducerConfig, Report};

/// `shrinkc <oracle_script> <cfile> (--all | --<method>)+`.
#[derive(Parser, Debug)]
#[command(name = "shrinkc")]
#[command(version)]
#[command(about = "Shrink a C source file while an oracle script still calls it interesting", long_about = None)]
struct Cli {
    /// Executable script invoked (as `./<oracle_script>`) to test interestingness.
    oracle_script: PathBuf,

    /// The C source file to reduce, modified in place.
    cfile: PathBuf,

    /// Enable every reduction method.
    #[arg(long)]
    all: bool,

    /// Delete a balanced `( … )` run, or just the parens.
    #[arg(long)]
    parens: bool,

    /// Delete a balanced `{ … }` run, or just the braces.
    #[arg(long)]
    brackets: bool,

    /// Run the bulk reduction rule catalogue.
    #[arg(long = "replace_regex")]
    replace_regex: bool,

    /// Collapse a single run of 2+ whitespace bytes to one space.
    #[arg(long)]
    blanks: bool,

    /// One-shot global whitespace normalization plus comma/colon reflow.
    #[arg(long = "all_blanks")]
    all_blanks: bool,

    /// Rewrite `a ? b : c` to `b`, then (independently) to `c`.
    #[arg(long)]
    ternary: bool,

    /// Successively shorten an integer literal's digits/prefix/suffix.
    #[arg(long = "shorten_ints")]
    shorten_ints: bool,

    /// Rewrite `transparent_crc(args)` calls to a plain `printf`.
    #[arg(long)]
    crc: bool,

    /// Move a function definition up to replace its standalone prototype.
    #[arg(long = "move_func")]
    move_func: bool,

    /// Record function names seen at prototypes (arg-stripping not yet wired up).
    #[arg(long = "del_args")]
    del_args: bool,

    /// Invoke the external pretty-printer and test its output.
    #[arg(long)]
    indent: bool,

    /// Raise the log level from info to debug.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress progress output and non-fatal logs.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load a `ReducerConfig` from this TOML file before applying env/flags.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep `delta_backup_<pass>.c` snapshots after the run instead of deleting them.
    #[arg(long)]
    no_backup_cleanup: bool,

    /// Print the final report as JSON instead of a human-readable table.
    #[arg(long)]
    stats_json: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();
}

fn resolve_methods(cli: &Cli) -> Result<Vec<MethodId>> {
    let mut chosen = Vec::new();
    if cli.all {
        chosen.extend(MethodId::all());
    }
    let flags: [(MethodId, bool); 11] = [
        (MethodId::Parens, cli.parens),
        (MethodId::Brackets, cli.brackets),
        (MethodId::ReplaceRegex, cli.replace_regex),
        (MethodId::Blanks, cli.blanks),
        (MethodId::AllBlanks, cli.all_blanks),
        (MethodId::Ternary, cli.ternary),
        (MethodId::ShortenInts, cli.shorten_ints),
        (MethodId::Crc, cli.crc),
        (MethodId::MoveFunc, cli.move_func),
        (MethodId::DelArgs, cli.del_args),
        (MethodId::Indent, cli.indent),
    ];
    for (id, enabled) in flags {
        if enabled && !chosen.contains(&id) {
            chosen.push(id);
        }
    }
    if chosen.is_empty() {
        bail!("no methods enabled: pass --all or one or more of --parens, --brackets, --replace_regex, --blanks, --all_blanks, --ternary, --shorten_ints, --crc, --move_func, --del_args, --indent");
    }
    Ok(chosen)
}

fn build_registry(enabled: &[MethodId], pretty: IndentRunner) -> Registry {
    let mut methods: Vec<Box<dyn Method>> = Vec::new();
    for id in enabled {
        let boxed: Box<dyn Method> = match id {
            MethodId::Parens => Box::new(Parens),
            MethodId::Brackets => Box::new(Brackets),
            MethodId::ReplaceRegex => Box::new(ReplaceRegex::new()),
            MethodId::Blanks => Box::new(Blanks),
            MethodId::AllBlanks => Box::new(AllBlanks),
            MethodId::Ternary => Box::new(Ternary),
            MethodId::ShortenInts => Box::new(ShortenInts),
            MethodId::Crc => Box::new(Crc),
            MethodId::MoveFunc => Box::new(MoveFunc),
            MethodId::DelArgs => Box::new(DelArgs::new()),
            MethodId::Indent => {
                // `pretty` is consumed once; only meaningful if `indent` is enabled,
                // which the caller guarantees by construction below.
                continue;
            }
        };
        methods.push(boxed);
    }
    if enabled.contains(&MethodId::Indent) {
        methods.push(Box::new(Indent::new(pretty)));
    }
    Registry::new(methods)
}

fn check_oracle_executable(path: &std::path::Path) -> Result<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("oracle script not found: {}", path.display()))?;
    if meta.permissions().mode() & 0o111 == 0 {
        bail!("oracle script is not executable: {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let enabled = resolve_methods(&cli)?;
    check_oracle_executable(&cli.oracle_script)
        .with_context(|| "invalid oracle script".to_string())?;

    let mut config = match &cli.config {
        Some(path) => ReducerConfig::from_file(path).with_context(|| format!("reading config {}", path.display()))?,
        None => ReducerConfig::from_env(),
    };
    config.keep_pass_backups = cli.no_backup_cleanup;

    let mut buffer = Buffer::load(&cli.cfile).with_context(|| format!("reading {}", cli.cfile.display()))?;
    let starting_length = buffer.len();

    let backups = BackupManager::init(&cli.cfile, &config)
        .with_context(|| format!("initializing backups for {}", cli.cfile.display()))?;
    let mut harness = OracleHarness::new(cli.oracle_script.clone(), backups, starting_length)
        .with_context(|| "starting oracle harness".to_string())?;

    let pretty = IndentRunner::new(&config);
    let mut registry = build_registry(&enabled, pretty);

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} pass {msg}")
                .unwrap(),
        );
        pb
    };

    // Driven manually (rather than via `Registry::run_to_fixpoint`) so a
    // `delta_backup_<pass>.c` snapshot can be taken at the start of every
    // outer pass without a second mutable borrow of `harness`.
    let mut rounds: u32 = 0;
    loop {
        rounds += 1;
        harness.begin_pass().context("snapshotting pass backup")?;
        progress.set_message(format!("{rounds}"));
        progress.tick();
        if !registry.run_round(&mut buffer, &mut harness)? {
            break;
        }
    }
    progress.finish_and_clear();
    harness.cleanup().ok();

    let empty_rule_stats: std::collections::HashMap<&'static str, shrinkc_core::MethodStats> =
        std::collections::HashMap::new();
    let rule_stats = registry
        .method_as::<ReplaceRegex>(MethodId::ReplaceRegex)
        .map(ReplaceRegex::rule_stats)
        .unwrap_or(&empty_rule_stats);

    let report = Report::new(
        registry.stats(),
        rule_stats,
        harness.cache_hits(),
        starting_length,
        harness.current_length(),
        rounds,
    );

    if cli.stats_json {
        println!("{}", report.to_json().context("serializing report")?);
    } else if !cli.quiet {
        print!("{report}");
    }

    Ok(())
}
