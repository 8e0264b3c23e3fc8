use crate::errors::StorageError;
use crate::models::{AppData, PersistedBlob, STORE_NAME};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("VOID_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data").join(format!("{STORE_NAME}.json")))
}

/// Reads the stored blob. A missing or unreadable blob yields defaults.
pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<PersistedBlob>(&bytes) {
            Ok(blob) => blob.state,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StorageError> {
    let blob = PersistedBlob {
        state: data.clone(),
        version: 0,
    };
    let payload = serde_json::to_vec_pretty(&blob)?;
    fs::write(path, payload)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Goal, MoodScore, Profile, SessionLength, SessionRecord};

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_data(&dir.path().join("absent.json")).await;
        assert_eq!(data, AppData::default());
    }

    #[tokio::test]
    async fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{not json").await.unwrap();
        assert_eq!(load_data(&path).await, AppData::default());
    }

    #[tokio::test]
    async fn persisted_state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let data = AppData {
            profile: Some(Profile::new("Ana", Goal::Focus, SessionLength::Five, "08:00")),
            onboarding_complete: true,
            current_mood: MoodScore::new(2),
            streak: 3,
            severe_mood_count: 1,
            today_session: Some(crate::generator::offline_fallback(Goal::Focus)),
            sessions: vec![
                SessionRecord {
                    id: "b".to_string(),
                    date: "2026-02-03".to_string(),
                    goal: Goal::Focus,
                    length: SessionLength::Five,
                    mood_before: MoodScore::new(2),
                    mood_after: MoodScore::new(4),
                    notes: Some("felt clearer".to_string()),
                    script: "script b".to_string(),
                    reflection: "reflection b".to_string(),
                    micro_tip: "tip b".to_string(),
                },
                SessionRecord {
                    id: "a".to_string(),
                    date: "2026-02-02".to_string(),
                    goal: Goal::Sleep,
                    length: SessionLength::Ten,
                    mood_before: MoodScore::MIN,
                    mood_after: MoodScore::MAX,
                    notes: None,
                    script: "script a".to_string(),
                    reflection: "reflection a".to_string(),
                    micro_tip: "tip a".to_string(),
                },
            ],
        };

        persist_data(&path, &data).await.unwrap();
        let raw = fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw.matches("\"notes\"").count(), 1);
        assert_eq!(load_data(&path).await, data);
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let err = persist_data(&path, &AppData::default()).await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }
}
