use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{Dependency, LicenseStatus};

/// Render a colored terminal report.
pub fn render(deps: &[Dependency], path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let count = |status: LicenseStatus| deps.iter().filter(|d| d.status == status).count();
    let total = deps.len();
    let allowed = count(LicenseStatus::Allowed);
    let marginal = count(LicenseStatus::Marginal);
    let banned = count(LicenseStatus::Banned);
    let unknown = count(LicenseStatus::Unknown);
    let missing = count(LicenseStatus::NoLicense);

    if quiet {
        println!(
            "Total: {}  Allowed: {}  Marginal: {}  Banned: {}  Unknown: {}  No license: {}",
            total,
            allowed.to_string().green(),
            marginal.to_string().yellow(),
            banned.to_string().red(),
            unknown.to_string().red(),
            missing.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-scout".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total dependencies : {}", total));
    let rows = [
        ("✓".green(), "Allowed", allowed, LicenseStatus::Allowed),
        ("⚠".yellow(), "Marginal", marginal, LicenseStatus::Marginal),
        ("✗".red(), "Banned", banned, LicenseStatus::Banned),
        ("?".red(), "Unknown", unknown, LicenseStatus::Unknown),
        ("∅".red(), "No license", missing, LicenseStatus::NoLicense),
    ];
    for (mark, label, n, status) in rows {
        println!(
            " │  {:<48} │",
            format!(
                "{}  {:<15} : {:>4}  {}",
                mark,
                label,
                n,
                summarize_licenses(deps, status)
            )
        );
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    let failing: Vec<&Dependency> = deps.iter().filter(|d| d.status.is_failure()).collect();
    if !failing.is_empty() {
        println!(" {} Dependencies requiring attention:\n", "[ERROR]".red().bold());
        render_table(&failing);
        println!();
    }

    let marginal_deps: Vec<&Dependency> = deps
        .iter()
        .filter(|d| d.status == LicenseStatus::Marginal)
        .collect();
    if !marginal_deps.is_empty() {
        println!(
            " {} Licenses not covered by the policy:\n",
            "[REVIEW]".yellow().bold()
        );
        render_table(&marginal_deps);
        println!();
    }

    if verbose && allowed > 0 {
        let allowed_deps: Vec<&Dependency> = deps
            .iter()
            .filter(|d| d.status == LicenseStatus::Allowed)
            .collect();
        println!(" {} All allowed dependencies:\n", "[PASS]".green().bold());
        render_table(&allowed_deps);
        println!();
    }

    Ok(())
}

fn render_table(deps: &[&Dependency]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Ecosystem").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Found in").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for dep in deps {
        let status_color = match dep.status {
            LicenseStatus::Allowed => Color::Green,
            LicenseStatus::Marginal => Color::Yellow,
            LicenseStatus::Banned | LicenseStatus::Unknown | LicenseStatus::NoLicense => {
                Color::Red
            }
        };

        let mut status = dep.status.to_string();
        if let Some(err) = &dep.error {
            status = format!("{status}\n{err}");
        }

        table.add_row(vec![
            Cell::new(&dep.name),
            Cell::new(dep.version.as_deref().unwrap_or("-")),
            Cell::new(dep.ecosystem.to_string()),
            Cell::new(&dep.license_type),
            Cell::new(
                dep.license_dir
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(status)
                .fg(status_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

/// Top three license types among dependencies with `status`, e.g. `[MIT (4), ISC (1)]`.
fn summarize_licenses(deps: &[Dependency], status: LicenseStatus) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for dep in deps.iter().filter(|d| d.status == status) {
        *counts.entry(dep.license_type.as_str()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
