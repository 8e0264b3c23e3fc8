use crate::errors::StorageError;
use crate::models::{AppData, GeneratedSession, MAX_SESSIONS, MoodScore, Profile, SessionRecord};
use crate::stats::date_key;
use crate::storage::persist_data;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owns the durable aggregate. Every operation writes the blob before
/// returning.
pub struct Store {
    data_path: PathBuf,
    data: AppData,
}

impl Store {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self { data_path, data }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub async fn set_profile(&mut self, profile: Profile) -> Result<(), StorageError> {
        self.data.profile = Some(profile);
        self.persist().await
    }

    pub async fn set_onboarding_complete(&mut self, complete: bool) -> Result<(), StorageError> {
        self.data.onboarding_complete = complete;
        self.persist().await
    }

    pub async fn set_current_mood(&mut self, mood: MoodScore) -> Result<(), StorageError> {
        self.data.current_mood = mood;
        self.persist().await
    }

    pub async fn set_today_session(
        &mut self,
        session: Option<GeneratedSession>,
    ) -> Result<(), StorageError> {
        self.data.today_session = session;
        self.persist().await
    }

    pub async fn set_severe_mood_count(&mut self, count: u32) -> Result<(), StorageError> {
        self.data.severe_mood_count = count;
        self.persist().await
    }

    /// Records a session start: the escalation counter and the generated
    /// bundle are applied together and written once.
    pub async fn begin_session(
        &mut self,
        severe_mood_count: u32,
        session: GeneratedSession,
    ) -> Result<(), StorageError> {
        self.data.severe_mood_count = severe_mood_count;
        self.data.today_session = Some(session);
        self.persist().await
    }

    pub async fn log_session(&mut self, record: SessionRecord) -> Result<(), StorageError> {
        self.log_session_at(record, Local::now().date_naive()).await
    }

    /// Commits a record as of `today`. The streak advances unless the newest
    /// existing record is already dated `today`.
    pub async fn log_session_at(
        &mut self,
        record: SessionRecord,
        today: NaiveDate,
    ) -> Result<(), StorageError> {
        let today = date_key(today);
        let same_day = self
            .data
            .sessions
            .first()
            .is_some_and(|last| last.date == today);
        if !same_day {
            self.data.streak = self.data.streak.saturating_add(1);
        }

        self.data.current_mood = record.mood_after;
        self.data.sessions.insert(0, record);
        self.data.sessions.truncate(MAX_SESSIONS);
        debug!(streak = self.data.streak, history = self.data.sessions.len(), "session logged");

        self.persist().await
    }

    async fn persist(&self) -> Result<(), StorageError> {
        persist_data(&self.data_path, &self.data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, SessionLength};
    use crate::storage::load_data;
    use chrono::Duration;

    fn record(id: usize, date: NaiveDate, mood_after: i64) -> SessionRecord {
        SessionRecord {
            id: id.to_string(),
            date: date_key(date),
            goal: Goal::Focus,
            length: SessionLength::Five,
            mood_before: MoodScore::new(2),
            mood_after: MoodScore::new(mood_after),
            notes: None,
            script: "script".to_string(),
            reflection: "reflection".to_string(),
            micro_tip: "tip".to_string(),
        }
    }

    fn temp_store(dir: &tempfile::TempDir) -> Store {
        Store::new(dir.path().join("state.json"), AppData::default())
    }

    #[tokio::test]
    async fn same_day_commits_count_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = temp_store(&dir);
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        store.log_session_at(record(1, today, 4), today).await.unwrap();
        store.log_session_at(record(2, today, 5), today).await.unwrap();

        assert_eq!(store.data().streak, 1);
        assert_eq!(store.data().sessions.len(), 2);
        assert_eq!(store.data().current_mood, MoodScore::new(5));
    }

    #[tokio::test]
    async fn different_days_count_twice() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = temp_store(&dir);
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let tuesday = monday + Duration::days(1);

        store.log_session_at(record(1, monday, 3), monday).await.unwrap();
        store.log_session_at(record(2, tuesday, 3), tuesday).await.unwrap();

        assert_eq!(store.data().streak, 2);
    }

    #[tokio::test]
    async fn history_keeps_newest_ten() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = temp_store(&dir);
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        for id in 0..11 {
            let day = start + Duration::days(id as i64);
            store.log_session_at(record(id, day, 3), day).await.unwrap();
        }

        let sessions = &store.data().sessions;
        assert_eq!(sessions.len(), MAX_SESSIONS);
        assert_eq!(sessions[0].id, "10");
        assert!(sessions.iter().all(|session| session.id != "0"));
        assert_eq!(store.data().streak, 11);
    }

    #[tokio::test]
    async fn every_mutation_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = temp_store(&dir);

        store
            .set_profile(Profile::new("Ana", Goal::Sleep, SessionLength::Ten, "21:00"))
            .await
            .unwrap();
        assert_eq!(load_data(store.data_path()).await.profile, store.data().profile);

        store.set_severe_mood_count(2).await.unwrap();
        store.set_onboarding_complete(true).await.unwrap();
        store.set_current_mood(MoodScore::new(1)).await.unwrap();
        store
            .set_today_session(Some(crate::generator::offline_fallback(Goal::Sleep)))
            .await
            .unwrap();

        assert_eq!(&load_data(store.data_path()).await, store.data());
    }

    #[tokio::test]
    async fn session_start_writes_counter_and_bundle_together() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = temp_store(&dir);
        let bundle = crate::generator::offline_fallback(Goal::Relax);

        store.begin_session(2, bundle.clone()).await.unwrap();

        let reloaded = load_data(store.data_path()).await;
        assert_eq!(reloaded.severe_mood_count, 2);
        assert_eq!(reloaded.today_session, Some(bundle));
    }

    #[tokio::test]
    async fn failed_write_keeps_the_applied_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(dir.path().join("missing").join("state.json"), AppData::default());
        let bundle = crate::generator::offline_fallback(Goal::Focus);

        assert!(store.begin_session(1, bundle.clone()).await.is_err());
        assert_eq!(store.data().severe_mood_count, 1);
        assert_eq!(store.data().today_session, Some(bundle));
    }
}
