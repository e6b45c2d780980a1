pub mod formatter;

pub use formatter::{
    customer_rows, format_age, format_apply_report, format_breakdown, format_changes,
    format_chart_table, format_distribution, format_kpis, format_ranked_table, format_ranked_tsv,
    format_recent_inquiries, lead_rows, should_use_colors, RankedRow,
};
