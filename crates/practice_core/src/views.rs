//! crates/practice_core/src/views.rs
//!
//! Pure helpers over store snapshots. Nothing here is cached; callers recompute
//! on every read. Every function accepts an empty slice.

use crate::domain::{Client, Material, MaterialAssignment, Session, SessionStatus};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// How many sessions the dashboard lists under "recent".
pub const RECENT_SESSION_LIMIT: usize = 5;

/// Rounded percentage of completed sessions. Zero when there are no sessions.
pub fn completion_rate(sessions: &[Session]) -> u32 {
    if sessions.is_empty() {
        return 0;
    }
    let completed = count_status(sessions, SessionStatus::Completed);
    ((completed as f64 / sessions.len() as f64) * 100.0).round() as u32
}

pub fn count_status(sessions: &[Session], status: SessionStatus) -> usize {
    sessions.iter().filter(|s| s.status == status).count()
}

/// Sessions still on the calendar.
pub fn upcoming_count(sessions: &[Session]) -> usize {
    count_status(sessions, SessionStatus::Scheduled)
}

/// Sessions grouped by calendar day, days ascending, members in store order.
pub fn group_by_date(sessions: &[Session]) -> Vec<(NaiveDate, Vec<&Session>)> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        groups.entry(session.session_date.date()).or_default().push(session);
    }
    groups.into_iter().collect()
}

/// Per-month status counts for the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySessionStats {
    pub year: i32,
    pub month: u32,
    /// Short month name, e.g. "Mar".
    pub label: String,
    pub completed: usize,
    pub scheduled: usize,
    pub cancelled: usize,
}

impl MonthlySessionStats {
    pub fn total(&self) -> usize {
        self.completed + self.scheduled + self.cancelled
    }
}

/// Status counts per (year, month), oldest first.
pub fn group_by_month(sessions: &[Session]) -> Vec<MonthlySessionStats> {
    let mut months: BTreeMap<(i32, u32), MonthlySessionStats> = BTreeMap::new();
    for session in sessions {
        let date = session.session_date;
        let entry = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlySessionStats {
                year: date.year(),
                month: date.month(),
                label: date.format("%b").to_string(),
                completed: 0,
                scheduled: 0,
                cancelled: 0,
            });
        match session.status {
            SessionStatus::Completed => entry.completed += 1,
            SessionStatus::Scheduled => entry.scheduled += 1,
            SessionStatus::Cancelled => entry.cancelled += 1,
        }
    }
    months.into_values().collect()
}

/// The `limit` latest sessions, newest first. The input is left untouched.
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<Session> {
    let mut sorted: Vec<&Session> = sessions.iter().collect();
    sorted.sort_by(|a, b| b.session_date.cmp(&a.session_date));
    sorted.into_iter().take(limit).cloned().collect()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive match on name or email. An empty term matches everything.
pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let term = term.trim().to_lowercase();
    clients
        .iter()
        .filter(|c| contains_ci(&c.name, &term) || contains_ci(&c.email, &term))
        .collect()
}

/// Material category selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) or an empty string selects every category.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(raw.to_string())
        }
    }

    fn matches(&self, material: &Material) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => material.category.as_deref() == Some(category.as_str()),
        }
    }
}

/// Distinct, non-empty categories in first-appearance order.
pub fn material_categories(materials: &[Material]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in materials.iter().filter_map(|m| m.category.as_deref()) {
        if !category.is_empty() && !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}

/// Category match plus case-insensitive search over title and content.
pub fn filter_materials<'a>(
    materials: &'a [Material],
    term: &str,
    category: &CategoryFilter,
) -> Vec<&'a Material> {
    let term = term.trim().to_lowercase();
    materials
        .iter()
        .filter(|m| category.matches(m))
        .filter(|m| contains_ci(&m.title, &term) || contains_ci(&m.content, &term))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentProgress {
    pub completed: usize,
    pub in_progress: usize,
}

pub fn assignment_progress(assignments: &[MaterialAssignment]) -> AssignmentProgress {
    let completed = assignments.iter().filter(|a| a.is_completed()).count();
    AssignmentProgress {
        completed,
        in_progress: assignments.len() - completed,
    }
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_clients: usize,
    pub upcoming_sessions: usize,
    pub total_materials: usize,
    pub completion_rate: u32,
    pub monthly: Vec<MonthlySessionStats>,
    pub recent: Vec<Session>,
}

pub fn dashboard_summary(clients: &[Client], sessions: &[Session], materials: &[Material]) -> DashboardSummary {
    DashboardSummary {
        total_clients: clients.len(),
        upcoming_sessions: upcoming_count(sessions),
        total_materials: materials.len(),
        completion_rate: completion_rate(sessions),
        monthly: group_by_month(sessions),
        recent: recent_sessions(sessions, RECENT_SESSION_LIMIT),
    }
}
