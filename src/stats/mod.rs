pub mod chart;
pub mod dashboard;
pub mod recent;
pub mod windows;

pub use chart::{apply_jitter, generate_chart_data, raw_chart_data, MonthlyPoint, MONTHS};
pub use dashboard::{calculate_dashboard_stats, DashboardStats, Kpi, Trend};
pub use recent::{recent_inquiries, RecentInquiry, RECENT_INQUIRY_COUNT};
pub use windows::Windows;
