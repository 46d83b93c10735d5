//! `license-scout` — classify the license of every vendored dependency.
//!
//! # Flow
//! 1. Parse CLI arguments ([`Cli`]) and install the log subscriber.
//! 2. Load policy config ([`load_config`]).
//! 3. Auto-detect vendoring layouts ([`detect_ecosystems`]).
//! 4. Enumerate each layout's dependencies ([`analyzer`]).
//! 5. Classify every dependency in parallel ([`Classifier`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0` (clean) or `1` (any banned, unknown or unlicensed dependency).

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use license_scout::analyzer::{self, Analyzer};
use license_scout::cli::{Cli, ReportFormat};
use license_scout::config::load_config;
use license_scout::detector::detect_ecosystems;
use license_scout::license::classifier::Classifier;
use license_scout::license::detect::FsLicenseDetector;
use license_scout::models::{Dependency, Ecosystem};
use license_scout::paths::absolutize;
use license_scout::report;
use license_scout::roots::{EnvRoots, RootSet, StaticRoots};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| absolutize(&cwd, &cli.path));

    let config = load_config(&path, cli.config.as_deref())?;

    let excluded: Vec<Ecosystem> = cli.exclude_lang.iter().map(Into::into).collect();
    let ecosystems: Vec<Ecosystem> = detect_ecosystems(&path)
        .into_iter()
        .filter(|e| !excluded.contains(e))
        .collect();

    if ecosystems.is_empty() {
        eprintln!(
            "No vendored dependencies found in {}",
            path.display()
        );
        std::process::exit(1);
    }

    let show_progress = !cli.quiet && matches!(cli.report, ReportFormat::Terminal);

    let mut all_deps = Vec::new();
    for ecosystem in &ecosystems {
        let deps = match ecosystem {
            Ecosystem::Go => analyzer::go::GoAnalyzer::new().analyze(&path)?,
            Ecosystem::Rust => analyzer::rust::RustAnalyzer::new().analyze(&path)?,
            Ecosystem::Node => analyzer::node::NodeAnalyzer::new().analyze(&path)?,
        };

        if show_progress {
            eprintln!(
                "  {} {} {} dependencies",
                "→".cyan(),
                ecosystem,
                deps.len()
            );
        }

        all_deps.extend(deps);
    }

    // The project itself bounds every search, so its own LICENSE never
    // speaks for a dependency. Config roots are already absolute; `--root`
    // values are relative to where the tool was started.
    let mut static_roots = vec![path.clone()];
    static_roots.extend(config.roots.iter().cloned());
    static_roots.extend(cli.roots.iter().map(|r| absolutize(&cwd, r)));
    debug!(roots = ?static_roots, "static workspace roots");

    let roots = RootSet::new()
        .with(StaticRoots(static_roots))
        .with(EnvRoots::default())
        .with(EnvRoots::gopath());
    let classifier = Classifier::new(config.policy, FsLicenseDetector::new(), &roots);

    classify_all(&classifier, &mut all_deps, show_progress)?;

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&all_deps, &path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&all_deps)?);
        }
    }

    if all_deps.iter().any(|d| d.status.is_failure()) {
        std::process::exit(1);
    }

    Ok(())
}

fn classify_all(
    classifier: &Classifier<FsLicenseDetector>,
    deps: &mut [Dependency],
    show_progress: bool,
) -> Result<()> {
    let pb = if show_progress {
        let pb = ProgressBar::new(deps.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    deps.par_iter_mut().for_each(|dep| {
        let classification = classifier.classify(&dep.dir, &dep.name);
        dep.apply(classification);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(())
}
