use serde::Serialize;

use super::windows::Windows;
use crate::clock::Clock;
use crate::records::Dataset;

pub const STATUS_NEW: &str = "new";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn from_change(change: i64) -> Self {
        if change >= 0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// One headline counter: all-time total plus period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub value: usize,
    pub change: i64,
    pub trend: Trend,
}

impl Kpi {
    fn new(value: usize, current: usize, previous: usize) -> Self {
        let change = current as i64 - previous as i64;
        Self {
            value,
            change,
            trend: Trend::from_change(change),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub new_inquiries: Kpi,
    pub active_clients: Kpi,
    pub services_completed: Kpi,
}

pub fn calculate_dashboard_stats(data: &Dataset, clock: &dyn Clock) -> DashboardStats {
    let w = Windows::at(clock.now());

    // New inquiries: today vs yesterday.
    let new_leads = || data.leads.iter().filter(|l| l.status == STATUS_NEW);
    let new_inquiries = Kpi::new(
        new_leads().count(),
        new_leads().filter(|l| w.is_today(l.date)).count(),
        new_leads().filter(|l| w.is_yesterday(l.date)).count(),
    );

    // Active clients: trailing month vs the month before it.
    let active = || data.customers.iter().filter(|c| c.status == STATUS_ACTIVE);
    let active_clients = Kpi::new(
        active().count(),
        active().filter(|c| w.in_this_month(c.activity_date())).count(),
        active().filter(|c| w.in_last_month(c.activity_date())).count(),
    );

    // Services completed: trailing week vs the week before it.
    let completed = || data.services.iter().filter(|s| s.status == STATUS_COMPLETED);
    let services_completed = Kpi::new(
        completed().count(),
        completed().filter(|s| w.in_this_week(s.effective_date())).count(),
        completed().filter(|s| w.in_last_week(s.effective_date())).count(),
    );

    DashboardStats {
        new_inquiries,
        active_clients,
        services_completed,
    }
}
