use chrono::{Duration, NaiveDateTime};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{Width, terminal_size};

use crate::fetch::Scored;
use crate::priority::{Priority, PriorityCounts, PriorityResult};
use crate::records::{Customer, Lead};
use crate::reprioritize::{ApplyReport, PriorityChange};
use crate::stats::{DashboardStats, Kpi, MonthlyPoint, RecentInquiry, Trend};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn paint_priority(label: &str, priority: Option<Priority>, use_colors: bool) -> String {
    if !use_colors {
        return label.to_string();
    }
    match priority {
        Some(Priority::High) => label.red().bold().to_string(),
        Some(Priority::Medium) => label.yellow().to_string(),
        Some(Priority::Low) => label.green().to_string(),
        None => label.dimmed().to_string(),
    }
}

fn format_kpi_line(label: &str, kpi: &Kpi, use_colors: bool) -> String {
    let arrow = match kpi.trend {
        Trend::Up => "↑",
        Trend::Down => "↓",
    };
    let change = format!("{:+} {}", kpi.change, arrow);
    let label = format!("{:<20}", label);
    let value = format!("{:>6}", kpi.value);

    if use_colors {
        let change = match kpi.trend {
            Trend::Up => change.green().to_string(),
            Trend::Down => change.red().to_string(),
        };
        format!("{}{}  {}", label, value.bold(), change)
    } else {
        format!("{}{}  {}", label, value, change)
    }
}

/// Headline counters, one per line, with period-over-period change.
pub fn format_kpis(stats: &DashboardStats, use_colors: bool) -> String {
    [
        format_kpi_line("New inquiries", &stats.new_inquiries, use_colors),
        format_kpi_line("Active clients", &stats.active_clients, use_colors),
        format_kpi_line("Services completed", &stats.services_completed, use_colors),
    ]
    .join("\n")
}

/// Dashboard block listing the latest inquiries: id, status, priority, age, customer, service.
pub fn format_recent_inquiries(
    recent: &[RecentInquiry],
    now: NaiveDateTime,
    use_colors: bool,
) -> String {
    let header = if use_colors {
        "Recent inquiries".bold().to_string()
    } else {
        "Recent inquiries".to_string()
    };
    if recent.is_empty() {
        return format!("{}
  none", header);
    }

    std::iter::once(header)
        .chain(recent.iter().map(|r| {
            let age = r
                .date
                .map(|d| format_age(now - d))
                .unwrap_or_else(|| "-".to_string());
            let priority = paint_priority(&format!("{:<6}", r.priority), Some(r.priority), use_colors);
            format!(
                "  {:>8}  {:<9}  {}  {:>4}  {}  {}",
                r.inquiry_id.to_string(),
                r.status,
                priority,
                age,
                truncate(&r.customer, 30),
                truncate(&r.service, 30)
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Monthly series as a fixed-width table with a header row.
pub fn format_chart_table(points: &[MonthlyPoint], use_colors: bool) -> String {
    let header = format!(
        "{:<5}{:>11}{:>9}{:>11}",
        "Month", "Inquiries", "Clients", "Completed"
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    std::iter::once(header)
        .chain(points.iter().map(|p| {
            format!(
                "{:<5}{:>11}{:>9}{:>11}",
                p.month, p.inquiries, p.clients, p.completed
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One ranked lead or customer prepared for display
pub struct RankedRow<'a> {
    pub name: &'a str,
    pub service: &'a str,
    pub date: Option<NaiveDateTime>,
    pub stored: Option<Priority>,
    pub result: &'a PriorityResult,
}

pub fn lead_rows(ranked: &[Scored<Lead>]) -> Vec<RankedRow<'_>> {
    ranked
        .iter()
        .map(|s| RankedRow {
            name: &s.record.name,
            service: &s.record.service,
            date: s.record.date,
            stored: s.record.priority,
            result: &s.result,
        })
        .collect()
}

pub fn customer_rows(ranked: &[Scored<Customer>]) -> Vec<RankedRow<'_>> {
    ranked
        .iter()
        .map(|s| RankedRow {
            name: &s.record.name,
            service: s.record.primary_service().unwrap_or_default(),
            date: s.record.activity_date(),
            stored: s.record.priority,
            result: &s.result,
        })
        .collect()
}

/// Ranked table: index, score, computed priority, age, name, service.
/// No headers. A `*` after the priority marks a stored tag that disagrees.
pub fn format_ranked_table(rows: &[RankedRow], now: NaiveDateTime, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No records found.".to_string();
    }

    let term_width = get_terminal_width();

    // " 1." + score(3) + priority(7) + age(4), separated by two spaces
    let fixed_width = 3 + 1 + 3 + 2 + 7 + 2 + 4 + 2;
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>3}", row.result.score);
            let stale = row.stored.is_some_and(|p| p != row.result.priority);
            let priority_str = format!(
                "{:<7}",
                format!("{}{}", row.result.priority, if stale { "*" } else { "" })
            );
            let age_str = format!(
                "{:>4}",
                row.date
                    .map(|d| format_age(now - d))
                    .unwrap_or_else(|| "-".to_string())
            );

            let text = if row.service.is_empty() {
                row.name.to_string()
            } else {
                format!("{}{}{}", row.name, separator, row.service)
            };
            let text = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&text, width - fixed_width),
                Some(_) => truncate(&text, 20),
                None => text,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    paint_priority(&priority_str, Some(row.result.priority), true),
                    separator,
                    age_str.dimmed(),
                    separator,
                    text
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, priority_str, separator, age_str, separator, text
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated values for scripting
/// Columns: score, priority, name, service, date (no headers, no colors)
pub fn format_ranked_tsv(rows: &[RankedRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.result.score,
                row.result.priority,
                row.name,
                row.service,
                row.date
                    .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                    .unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-factor points followed by the total and resulting priority.
pub fn format_breakdown(result: &PriorityResult, use_colors: bool) -> String {
    let mut lines: Vec<String> = result
        .breakdown
        .iter()
        .map(|(key, points)| format!("{:<20}{:>3} / {}", key.label(), points, key.max()))
        .collect();

    let total = format!("{:<20}{:>3} / 100", "Total", result.score);
    let priority = paint_priority(result.priority.as_str(), Some(result.priority), use_colors);
    if use_colors {
        lines.push(format!("{}  {}", total.bold(), priority));
    } else {
        lines.push(format!("{}  {}", total, priority));
    }
    lines.join("\n")
}

/// Planned tag changes, one per line: id, name, old -> new, score.
pub fn format_changes(changes: &[PriorityChange], use_colors: bool) -> String {
    if changes.is_empty() {
        return "All priorities are up to date.".to_string();
    }

    changes
        .iter()
        .map(|c| {
            let current = c.current.map(|p| p.as_str()).unwrap_or("unset");
            let current = paint_priority(&format!("{:<6}", current), c.current, use_colors);
            let computed = paint_priority(&format!("{:<6}", c.computed.as_str()), Some(c.computed), use_colors);
            format!(
                "{:>8}  {}  {} -> {}  ({})",
                c.id.to_string(),
                truncate(&c.name, 30),
                current,
                computed,
                c.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// "high 3 · medium 5 · low 2 · unset 1 (11 total)"
pub fn format_distribution(counts: &PriorityCounts, use_colors: bool) -> String {
    format!(
        "{} {} · {} {} · {} {} · {} {} ({} total)",
        paint_priority("high", Some(Priority::High), use_colors),
        counts.high,
        paint_priority("medium", Some(Priority::Medium), use_colors),
        counts.medium,
        paint_priority("low", Some(Priority::Low), use_colors),
        counts.low,
        paint_priority("unset", None, use_colors),
        counts.unset,
        counts.total()
    )
}

pub fn format_apply_report(report: &ApplyReport) -> String {
    let mut lines = vec![format!(
        "Updated {} record(s), {} failed.",
        report.updated.len(),
        report.failed.len()
    )];
    for (id, error) in &report.failed {
        lines.push(format!("  {}: {}", id, error));
    }
    lines.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
