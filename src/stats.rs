use crate::models::SessionRecord;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Number of newest records the history chip looks at.
const RECENT_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub recent_count: usize,
    pub checked_in_today: bool,
    pub last_note: Option<String>,
}

pub fn build_history_summary(sessions: &[SessionRecord]) -> HistorySummary {
    build_history_summary_at(Local::now().date_naive(), sessions)
}

pub fn build_history_summary_at(today: NaiveDate, sessions: &[SessionRecord]) -> HistorySummary {
    let today = date_key(today);
    let recent = &sessions[..sessions.len().min(RECENT_WINDOW)];

    HistorySummary {
        recent_count: recent.len(),
        checked_in_today: recent.iter().any(|session| session.date == today),
        last_note: sessions.first().and_then(|session| session.notes.clone()),
    }
}

/// Notes of up to three newest records that carry one, newest first.
pub fn recent_notes(sessions: &[SessionRecord]) -> Vec<String> {
    sessions
        .iter()
        .filter_map(|session| session.notes.as_ref())
        .filter(|notes| !notes.is_empty())
        .take(3)
        .cloned()
        .collect()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
