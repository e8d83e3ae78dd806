use console::style;

use super::view::ViewState;
use crate::catalog::{CatalogEntry, SkippedFile};
use crate::git::CommitInfo;

/// Branch tabs on one line, the active one marked
pub fn render_tabs(view: &ViewState) -> String {
    view.branches
        .iter()
        .map(|branch| {
            let label = view.tab_label(branch);
            if *branch == view.branch {
                format!("{}", style(format!("[● {label}]")).green().bold())
            } else {
                format!("{}", style(format!("  {label} ")).dim())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One product card
pub fn render_card(entry: &CatalogEntry) -> String {
    let record = &entry.record;
    let mut lines = vec![
        format!(
            "{} {}",
            style(&record.name).cyan().bold(),
            style(format!("({})", entry.file)).dim()
        ),
        format!("  {} {}", style("ID:").bold(), record.id),
    ];
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("  {description}"));
    }
    lines.push(format!("  {}", style(&record.lifecycle_status).italic()));
    lines.join("\n")
}

fn render_skipped(skipped: &SkippedFile) -> String {
    format!(
        "{} {} {}",
        style("⚠").yellow(),
        style(&skipped.file).yellow().bold(),
        style(format!("could not be read: {}", skipped.reason)).dim()
    )
}

/// Whole screen: title, tabs, cards. Renders nothing while loading.
pub fn display_view(view: &ViewState) {
    if view.loading {
        return;
    }

    println!();
    println!("{}", style("TMF Catalog · Git = DB").bold());

    if !view.connected {
        println!(
            "{} {}",
            style("⚠").yellow().bold(),
            style("No catalog loaded").yellow()
        );
        println!();
        return;
    }

    println!("{}", render_tabs(view));
    println!();

    if view.catalog.is_empty() {
        println!("{} No products yet", style("📭").dim());
    }

    for entry in view.catalog.iter() {
        println!("{}", render_card(entry));
        println!();
    }

    for skipped in &view.catalog.skipped {
        println!("{}", render_skipped(skipped));
    }
}

/// Recent commits, newest first
pub fn display_history(branch: &str, commits: &[CommitInfo]) {
    println!(
        "{} History of {}",
        style("📝").blue().bold(),
        style(branch).cyan().bold()
    );
    println!();

    if commits.is_empty() {
        println!("{} No commits", style("⚠").yellow());
        return;
    }

    for commit in commits {
        println!(
            "  {} {}",
            style(commit.short_hash()).yellow(),
            commit.summary()
        );
    }
}
