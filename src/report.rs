use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::aggregate::{DashboardView, GroupMeans};
use crate::filter::FilterPredicate;
use crate::schema::Metric;

fn write_group_means(output: &mut String, title: &str, groups: &[GroupMeans]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");

    if groups.is_empty() {
        let _ = writeln!(output, "No groups in the loaded data.");
        return;
    }

    for group in groups {
        let values: Vec<String> = group
            .means
            .iter()
            .map(|(metric, mean)| format!("{} {:.2}", metric.column(), mean))
            .collect();
        let _ = writeln!(output, "- {}: {}", group.group, values.join(", "));
    }
}

pub fn build_report(
    predicate: &FilterPredicate,
    active: usize,
    total: usize,
    view: &DashboardView,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# School Performance Dashboard");
    let _ = writeln!(
        output,
        "Generated {} for zone {}, school type {}, gender {} ({} of {} records)",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        predicate.zone,
        predicate.school_type,
        predicate.gender,
        active,
        total
    );

    write_group_means(&mut output, "School Type Performance", &view.school_type);
    write_group_means(&mut output, "Zone Performance", &view.zone);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Score Correlations");
    if active == 0 {
        let _ = writeln!(output, "No records match the current filters.");
    } else {
        let header: Vec<&str> = view.correlation.metrics.iter().map(|m| m.column()).collect();
        let _ = writeln!(output, "| | {} |", header.join(" | "));
        let _ = writeln!(output, "|---|{}", "---|".repeat(header.len()));
        for (metric, row) in view.correlation.metrics.iter().zip(&view.correlation.values) {
            let cells: Vec<String> = row.iter().map(|value| format!("{value:.2}")).collect();
            let _ = writeln!(output, "| {} | {} |", metric.column(), cells.join(" | "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Resource Share by Zone");
    if view.resources.is_empty() {
        let _ = writeln!(output, "No zones in the loaded data.");
    } else {
        for zone in &view.resources {
            let shares: Vec<String> = zone
                .shares
                .iter()
                .map(|(resource, share)| format!("{} {:.1}%", resource.column(), share * 100.0))
                .collect();
            let _ = writeln!(output, "- {}: {}", zone.zone, shares.join(", "));
        }
    }

    write_group_means(&mut output, "Public vs Private Profile", &view.radar);

    let _ = writeln!(output);
    let _ = writeln!(output, "## School Type to Zone Flow");
    if view.flow.links.is_empty() {
        let _ = writeln!(output, "No records match the current filters.");
    } else {
        for link in &view.flow.links {
            let _ = writeln!(
                output,
                "- {} -> {}: {} records",
                view.flow.nodes[link.source], view.flow.nodes[link.target], link.value
            );
        }
    }

    output
}

/// Short plain-text line used by the CLI after writing a report.
pub fn headline(view: &DashboardView) -> String {
    let best = view
        .zone
        .iter()
        .filter(|group| group.means.get(&Metric::Primary).is_some_and(|v| v.is_finite()))
        .max_by(|a, b| {
            a.means[&Metric::Primary]
                .partial_cmp(&b.means[&Metric::Primary])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match best {
        Some(group) => format!(
            "Highest primary score: zone {} ({:.2})",
            group.group, group.means[&Metric::Primary]
        ),
        None => "No zone has a finite primary score.".to_string(),
    }
}
