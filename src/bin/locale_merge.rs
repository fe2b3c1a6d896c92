//! Command-line front end for the locale catalog tooling.
//!
//! Usage:
//!   locale-merge apply netbsd_prereqs all
//!   locale-merge fill-missing fr --prefix server_docs
//!   locale-merge analyze --output assets/locales/missing_keys_analysis.json
//!   locale-merge flatten assets/locales/en.json
//!   locale-merge check

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use locale_merge::batch::locale_path;
use locale_merge::logging::init_tracing;
use locale_merge::{
    BatchOptions, BatchReport, ConfigOverrides, ConflictPolicy, GlossaryStore, KeyPath, Outcome,
    OverrideStore, Settings, TargetSelector, analyze, apply_overrides, fill_missing, flatten, load,
    resolve_targets, run_batch, store,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "locale-merge")]
#[command(about = "Merge override sets into locale catalogs and audit translation coverage")]
struct Cli {
    /// Site root containing assets/locales (or set LOCALE_MERGE_ROOT).
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Locale catalog directory (or set LOCALE_MERGE_LOCALES_DIR).
    #[arg(long, global = true)]
    locales_dir: Option<PathBuf>,
    /// Override set directory (or set LOCALE_MERGE_OVERRIDES_DIR).
    #[arg(long, global = true)]
    overrides_dir: Option<PathBuf>,
    /// Per-language glossary directory (or set LOCALE_MERGE_GLOSSARY_DIR).
    #[arg(long, global = true)]
    glossary_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply an override set to one locale, or to `all`.
    Apply {
        set: String,
        target: String,
        /// What to do when an override collides with existing structure.
        #[arg(long, default_value = "fail", value_parser = ["fail", "overwrite"])]
        on_conflict: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Fill keys a locale is missing from its glossary, else the reference text.
    FillMissing {
        target: String,
        /// Reference locale; defaults to the fallback language.
        #[arg(long)]
        reference: Option<String>,
        /// Only fill keys under this dotted namespace.
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value = "fail", value_parser = ["fail", "overwrite"])]
        on_conflict: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Report missing and extra keys for every locale against a reference.
    Analyze {
        #[arg(long)]
        reference: Option<String>,
        /// Write the full report as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Missing keys listed per locale.
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
    /// Print a catalog as dotted path -> text JSON.
    Flatten { file: PathBuf },
    /// Validate override set files against the bundled schema.
    Check { set: Option<String> },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let flags = ConfigOverrides {
        root: cli.root,
        locales_dir: cli.locales_dir,
        overrides_dir: cli.overrides_dir,
        glossary_dir: cli.glossary_dir,
    };

    match cli.command {
        Command::Apply {
            set,
            target,
            on_conflict,
            dry_run,
        } => run_apply(&resolve_settings(&flags)?, &set, &target, policy(&on_conflict)?, dry_run),
        Command::FillMissing {
            target,
            reference,
            prefix,
            on_conflict,
            dry_run,
        } => run_fill(
            &resolve_settings(&flags)?,
            &target,
            reference,
            prefix,
            policy(&on_conflict)?,
            dry_run,
        ),
        Command::Analyze {
            reference,
            output,
            show,
        } => run_analyze(&resolve_settings(&flags)?, reference, output, show),
        Command::Flatten { file } => run_flatten(&file),
        Command::Check { set } => run_check(&resolve_settings(&flags)?, set),
    }
}

fn resolve_settings(flags: &ConfigOverrides) -> Result<Settings> {
    Settings::resolve(flags).context("resolving locale directories")
}

fn policy(value: &str) -> Result<ConflictPolicy> {
    ConflictPolicy::try_from(value).map_err(anyhow::Error::msg)
}

fn targets_for(settings: &Settings, target: &str) -> Result<Vec<String>> {
    let targets = resolve_targets(
        &TargetSelector::from(target),
        &settings.locales_dir,
        settings.languages.as_deref(),
    )
    .with_context(|| format!("listing locales in {}", settings.locales_dir.display()))?;
    if targets.is_empty() {
        bail!("no locale files found in {}", settings.locales_dir.display());
    }
    Ok(targets)
}

fn run_apply(
    settings: &Settings,
    set: &str,
    target: &str,
    policy: ConflictPolicy,
    dry_run: bool,
) -> Result<()> {
    let store = OverrideStore::open(&settings.overrides_dir, &settings.fallback_language)
        .context("opening override store")?;
    let targets = targets_for(settings, target)?;
    info!(
        set,
        targets = targets.len(),
        on_conflict = policy.as_str(),
        dry_run,
        "applying override set"
    );

    let report = run_batch(
        &settings.locales_dir,
        &targets,
        BatchOptions { dry_run },
        |locale, catalog| {
            let resolved = store.resolve(set, locale)?;
            apply_overrides(catalog, &resolved.overrides, policy)
        },
    );
    print_report("apply", &report)
}

fn run_fill(
    settings: &Settings,
    target: &str,
    reference: Option<String>,
    prefix: Option<String>,
    policy: ConflictPolicy,
    dry_run: bool,
) -> Result<()> {
    let reference = reference.unwrap_or_else(|| settings.fallback_language.clone());
    let reference_path = locale_path(&settings.locales_dir, &reference);
    let reference_flat = flatten(
        &load(&reference_path)
            .with_context(|| format!("loading reference locale {}", reference_path.display()))?,
    );
    let prefix = prefix.map(|p| KeyPath::parse(&p));
    let targets: Vec<String> = targets_for(settings, target)?
        .into_iter()
        .filter(|code| *code != reference)
        .collect();
    let glossaries = GlossaryStore::open(&settings.glossary_dir).context("opening glossaries")?;
    let scope = prefix.as_ref().map(ToString::to_string).unwrap_or_default();
    info!(
        reference = %reference,
        targets = targets.len(),
        prefix = %scope,
        glossary_dir = %glossaries.root().display(),
        "filling missing keys"
    );

    let report = run_batch(
        &settings.locales_dir,
        &targets,
        BatchOptions { dry_run },
        |locale, catalog| {
            let glossary = glossaries.load(locale)?;
            fill_missing(
                &reference_flat,
                catalog,
                prefix.as_ref(),
                glossary.as_ref(),
                policy,
            )
        },
    );
    print_report("fill-missing", &report)
}

fn run_analyze(
    settings: &Settings,
    reference: Option<String>,
    output: Option<PathBuf>,
    show: usize,
) -> Result<()> {
    let reference = reference.unwrap_or_else(|| settings.fallback_language.clone());
    let targets = targets_for(settings, "all")?;
    let report = analyze(&settings.locales_dir, &reference, &targets)
        .with_context(|| format!("analyzing against {reference}"))?;

    println!("{reference} reference has {} keys", report.reference_keys);
    for (locale, coverage) in &report.locales {
        println!(
            "{locale}: {} keys, {} missing, {} extra, {:.1}% complete",
            coverage.total_keys,
            coverage.missing_count,
            coverage.extra_count,
            coverage.completion_rate
        );
        for key in coverage.missing_keys.iter().take(show) {
            println!("    - {key}");
        }
        if coverage.missing_count > show {
            println!("    ... and {} more", coverage.missing_count - show);
        }
    }
    for (locale, reason) in &report.failures {
        println!("{locale}: failed: {reason}");
    }

    if let Some(path) = output {
        store::write_json(&report, &path)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Detailed analysis saved to: {}", path.display());
    }

    if !report.failures.is_empty() {
        bail!("analyze: {} locale(s) could not be loaded", report.failures.len());
    }
    Ok(())
}

fn run_flatten(file: &Path) -> Result<()> {
    let catalog = load(file).with_context(|| format!("loading {}", file.display()))?;
    print!("{}", store::render(&flatten(&catalog))?);
    Ok(())
}

fn run_check(settings: &Settings, set: Option<String>) -> Result<()> {
    let store = OverrideStore::open(&settings.overrides_dir, &settings.fallback_language)
        .context("opening override store")?;
    let sets = match set {
        Some(name) => vec![name],
        None => store
            .set_names()
            .with_context(|| format!("listing {}", settings.overrides_dir.display()))?,
    };

    let mut checked = 0usize;
    let mut invalid = 0usize;
    for set in &sets {
        for (path, result) in store.check_set(set)? {
            checked += 1;
            match result {
                Ok(overrides) => {
                    println!("[ok] {} ({} writes)", path.display(), overrides.write_count())
                }
                Err(err) => {
                    invalid += 1;
                    println!("[invalid] {err}");
                }
            }
        }
    }

    if invalid > 0 {
        bail!("check: {invalid} of {checked} override file(s) invalid");
    }
    println!("check: PASS ({checked} files in {} sets)", sets.len());
    Ok(())
}

fn print_report(command: &str, report: &BatchReport) -> Result<()> {
    for target in &report.targets {
        let label = target.outcome.label();
        match &target.outcome {
            Outcome::Failed { error } => println!("[{label}] {}: {error}", target.target),
            Outcome::Skipped { reason } => println!("[{label}] {}: {reason}", target.target),
            Outcome::Succeeded { .. } => println!("[{label}] {}", target.target),
        }
    }
    let summary = report.summary;
    println!(
        "{command}: {} succeeded, {} failed, {} skipped ({} unreadable)",
        summary.succeeded, summary.failed, summary.skipped, summary.unreadable
    );
    if !summary.is_success() {
        bail!(
            "{command}: {} target(s) failed, {} could not be loaded",
            summary.failed,
            summary.unreadable
        );
    }
    Ok(())
}
