use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::HistorySummary;

/// Name the durable blob is stored under.
pub const STORE_NAME: &str = "void-mindfulness-store";

/// History keeps only the newest records.
pub const MAX_SESSIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Goal {
    Relax,
    Focus,
    Sleep,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Relax, Goal::Focus, Goal::Sleep];

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Relax => "Relax",
            Goal::Focus => "Focus",
            Goal::Sleep => "Sleep",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session length in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SessionLength {
    Three,
    #[default]
    Five,
    Ten,
}

impl SessionLength {
    pub fn minutes(self) -> u8 {
        match self {
            SessionLength::Three => 3,
            SessionLength::Five => 5,
            SessionLength::Ten => 10,
        }
    }
}

impl TryFrom<u8> for SessionLength {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(SessionLength::Three),
            5 => Ok(SessionLength::Five),
            10 => Ok(SessionLength::Ten),
            other => Err(format!("session length must be 3, 5 or 10 minutes, got {other}")),
        }
    }
}

impl From<SessionLength> for u8 {
    fn from(length: SessionLength) -> Self {
        length.minutes()
    }
}

/// Subjective mood on a 1..=5 scale. Out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    pub const MIN: MoodScore = MoodScore(1);
    pub const MAX: MoodScore = MoodScore(5);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(1, 5) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_min(self) -> bool {
        self == Self::MIN
    }
}

impl Default for MoodScore {
    fn default() -> Self {
        Self(3)
    }
}

impl From<i64> for MoodScore {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(mood: MoodScore) -> Self {
        mood.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub goal: Goal,
    pub length: SessionLength,
    pub reminder: String,
}

impl Profile {
    /// Builds a profile the way onboarding submits it: the name is trimmed
    /// and falls back to a friendly default.
    pub fn new(name: &str, goal: Goal, length: SessionLength, reminder: &str) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() { "Friend".to_string() } else { name.to_string() },
            goal,
            length,
            reminder: reminder.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSession {
    pub script: String,
    pub reflection: String,
    pub micro_tip: String,
    pub audio_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub date: String,
    pub goal: Goal,
    pub length: SessionLength,
    pub mood_before: MoodScore,
    pub mood_after: MoodScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub script: String,
    pub reflection: String,
    pub micro_tip: String,
}

/// The durable aggregate. Mutated only through `Store`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppData {
    pub profile: Option<Profile>,
    pub onboarding_complete: bool,
    pub current_mood: MoodScore,
    pub streak: u32,
    pub sessions: Vec<SessionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_session: Option<GeneratedSession>,
    pub severe_mood_count: u32,
}

/// On-disk envelope around `AppData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersistedBlob {
    #[serde(default)]
    pub state: AppData,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Session,
    Checkout,
    Complete,
}

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub name: String,
    pub goal: Goal,
    #[serde(default)]
    pub length: SessionLength,
    #[serde(default = "default_reminder")]
    pub reminder: String,
    #[serde(default)]
    pub mood: MoodScore,
}

fn default_reminder() -> String {
    "08:00".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub mood_after: MoodScore,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct ControllerSnapshot {
    pub view: View,
    pub profile: Option<Profile>,
    pub onboarding_complete: bool,
    pub show_onboarding: bool,
    pub current_mood: MoodScore,
    pub streak: u32,
    pub sessions: Vec<SessionRecord>,
    pub severe_mood_count: u32,
    pub banner: Option<&'static str>,
    /// Generation runs inside `start_session` while the controller is locked,
    /// so snapshots taken between actions always read false.
    pub generating: bool,
    pub playing: bool,
    pub speech_supported: bool,
    pub active_session: Option<GeneratedSession>,
    pub recent_notes: Vec<String>,
    pub last_notes: String,
    pub history: HistorySummary,
}
