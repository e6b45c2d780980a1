use chrono::{Datelike, NaiveDateTime};
use rand::Rng;
use serde::Serialize;
use std::ops::RangeInclusive;

use super::dashboard::STATUS_COMPLETED;
use crate::clock::Clock;
use crate::records::Dataset;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const INQUIRY_JITTER: RangeInclusive<u32> = 10..=29;
pub const CLIENT_JITTER: RangeInclusive<u32> = 5..=19;
pub const COMPLETED_JITTER: RangeInclusive<u32> = 8..=19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub inquiries: u32,
    pub clients: u32,
    pub completed: u32,
}

/// Per-month-of-year counts, Jan..Dec, ignoring the year.
///
/// Leads count as inquiries, customers as clients, and services with status
/// "completed" as completed (bucketed by creation date).
pub fn raw_chart_data(data: &Dataset) -> Vec<MonthlyPoint> {
    let mut points: Vec<MonthlyPoint> = MONTHS
        .iter()
        .map(|&month| MonthlyPoint {
            month,
            inquiries: 0,
            clients: 0,
            completed: 0,
        })
        .collect();

    for month0 in data.leads.iter().filter_map(|l| month_index(l.date)) {
        points[month0].inquiries += 1;
    }
    for month0 in data.customers.iter().filter_map(|c| month_index(c.activity_date())) {
        points[month0].clients += 1;
    }
    for month0 in data
        .services
        .iter()
        .filter(|s| s.status == STATUS_COMPLETED)
        .filter_map(|s| month_index(s.created_date()))
    {
        points[month0].completed += 1;
    }

    points
}

/// Add presentation noise to every month up to and including `current_month0`
/// (0 = January). Later months are left as-is.
///
/// The output is decorative. Anything that needs real numbers should use
/// `raw_chart_data`.
pub fn apply_jitter<R: Rng>(points: &mut [MonthlyPoint], current_month0: u32, rng: &mut R) {
    for (index, point) in points.iter_mut().enumerate() {
        if index as u32 > current_month0 {
            continue;
        }
        point.inquiries += rng.gen_range(INQUIRY_JITTER);
        point.clients += rng.gen_range(CLIENT_JITTER);
        point.completed += rng.gen_range(COMPLETED_JITTER);
    }
}

/// Twelve-month series for the dashboard chart, jittered up to the current month.
pub fn generate_chart_data<R: Rng>(
    data: &Dataset,
    clock: &dyn Clock,
    rng: &mut R,
) -> Vec<MonthlyPoint> {
    let mut points = raw_chart_data(data);
    apply_jitter(&mut points, clock.now().month0(), rng);
    points
}

fn month_index(date: Option<NaiveDateTime>) -> Option<usize> {
    date.map(|d| d.month0() as usize)
}
