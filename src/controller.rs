//! Session lifecycle: home -> session -> checkout -> complete -> home.
//!
//! The controller is the only writer of the `Store`. Each public operation is
//! one user action; actions that have no transition from the current view are
//! ignored and return the view unchanged.

use crate::errors::StorageError;
use crate::generator::{GenerateRequest, SessionGenerator, offline_fallback};
use crate::models::{
    AppData, ControllerSnapshot, GeneratedSession, MoodScore, Profile, SessionRecord, View,
};
use crate::speech::Speech;
use crate::stats::{build_history_summary, date_key, recent_notes};
use crate::store::Store;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Consecutive minimum-mood starts that raise the advisory.
pub const SEVERE_MOOD_THRESHOLD: u32 = 3;

pub const SEVERE_MOOD_ADVISORY: &str = "We've noticed a few very low moods. If you're in crisis, please reach out to a local helpline or trusted person.";

pub struct Controller {
    store: Store,
    generator: Box<dyn SessionGenerator + Send>,
    speech: Box<dyn Speech + Send>,
    view: View,
    show_onboarding: bool,
    generating: bool,
    playing: bool,
    active_session: Option<GeneratedSession>,
    last_notes: String,
}

impl Controller {
    pub fn new(
        store: Store,
        generator: Box<dyn SessionGenerator + Send>,
        speech: Box<dyn Speech + Send>,
    ) -> Self {
        let data = store.data();
        let show_onboarding = !data.onboarding_complete;
        let active_session = data.today_session.clone();
        Self {
            store,
            generator,
            speech,
            view: View::Home,
            show_onboarding,
            generating: false,
            playing: false,
            active_session,
            last_notes: String::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn data(&self) -> &AppData {
        self.store.data()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn show_onboarding(&self) -> bool {
        self.show_onboarding
    }

    pub fn active_session(&self) -> Option<&GeneratedSession> {
        self.active_session.as_ref()
    }

    /// Advisory text while the severe-mood counter is at or over threshold.
    pub fn banner(&self) -> Option<&'static str> {
        (self.store.data().severe_mood_count >= SEVERE_MOOD_THRESHOLD).then_some(SEVERE_MOOD_ADVISORY)
    }

    pub fn recent_notes(&self) -> Vec<String> {
        recent_notes(&self.store.data().sessions)
    }

    pub fn open_onboarding(&mut self) {
        self.show_onboarding = true;
    }

    pub fn close_onboarding(&mut self) {
        self.show_onboarding = false;
    }

    pub async fn complete_onboarding(
        &mut self,
        profile: Profile,
        mood: MoodScore,
    ) -> Result<View, StorageError> {
        info!(goal = %profile.goal, length = profile.length.minutes(), "onboarding complete");
        self.store.set_profile(profile).await?;
        self.store.set_current_mood(mood).await?;
        self.store.set_onboarding_complete(true).await?;
        self.show_onboarding = false;
        self.change_view(View::Home);
        Ok(self.view)
    }

    /// Always lands in `session` once a profile exists. A failed save is
    /// logged and the in-memory transition stands, so a retry cannot count
    /// the same start twice.
    pub async fn start_session(&mut self) -> View {
        if self.view != View::Home {
            return self.ignore("start_session");
        }
        let Some(profile) = self.store.data().profile.clone() else {
            debug!("no profile, asking for onboarding");
            self.show_onboarding = true;
            return self.view;
        };

        self.last_notes.clear();
        self.stop_playback();

        let mood = self.store.data().current_mood;
        let severe_count = if mood.is_min() {
            self.store.data().severe_mood_count.saturating_add(1)
        } else {
            0
        };
        if severe_count >= SEVERE_MOOD_THRESHOLD {
            warn!(severe_count, "repeated minimum mood at session start");
        }

        self.generating = true;
        let notes = self.recent_notes();
        let request = GenerateRequest {
            name: &profile.name,
            goal: profile.goal,
            mood,
            length: profile.length,
            recent_notes: &notes,
        };
        let session = match self.generator.generate(&request) {
            Ok(session) => session,
            Err(err) => {
                warn!("session generation failed, using offline fallback: {err}");
                offline_fallback(profile.goal)
            }
        };
        self.generating = false;

        self.active_session = Some(session.clone());
        self.change_view(View::Session);
        if let Err(err) = self.store.begin_session(severe_count, session).await {
            warn!("failed to save session start: {err}");
        }
        self.view
    }

    /// Starts or stops spoken playback. Returns false when refused or when
    /// the backend could not start speaking.
    pub fn toggle_playback(&mut self) -> bool {
        if !self.speech.supported() || self.view != View::Session {
            return false;
        }
        let Some(session) = &self.active_session else {
            return false;
        };

        self.speech.cancel();
        if self.playing {
            self.playing = false;
            return true;
        }
        self.playing = self.speech.speak(&session.audio_text);
        self.playing
    }

    pub fn playback_ended(&mut self) {
        self.playing = false;
    }

    /// Forwards a finished utterance from the speech backend.
    pub fn sync_playback(&mut self) {
        if self.playing && self.speech.finished() {
            self.playback_ended();
        }
    }

    pub fn finish_session(&mut self) -> View {
        if self.view != View::Session {
            return self.ignore("finish_session");
        }
        self.stop_playback();
        self.change_view(View::Checkout);
        self.view
    }

    pub fn back(&mut self) -> View {
        if self.view != View::Checkout {
            return self.ignore("back");
        }
        self.change_view(View::Session);
        self.view
    }

    pub async fn submit_checkout(
        &mut self,
        mood_after: MoodScore,
        notes: &str,
    ) -> Result<View, StorageError> {
        self.submit_checkout_at(mood_after, notes, Local::now().date_naive())
            .await
    }

    pub async fn submit_checkout_at(
        &mut self,
        mood_after: MoodScore,
        notes: &str,
        today: NaiveDate,
    ) -> Result<View, StorageError> {
        if self.view != View::Checkout {
            return Ok(self.ignore("submit_checkout"));
        }
        let (Some(profile), Some(session)) = (&self.store.data().profile, &self.active_session)
        else {
            debug!("checkout without profile or session ignored");
            return Ok(self.view);
        };

        let notes = notes.trim();
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            date: date_key(today),
            goal: profile.goal,
            length: profile.length,
            mood_before: self.store.data().current_mood,
            mood_after,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            script: session.script.clone(),
            reflection: session.reflection.clone(),
            micro_tip: session.micro_tip.clone(),
        };

        self.store.log_session_at(record, today).await?;
        self.store.set_current_mood(mood_after).await?;
        self.last_notes = notes.to_string();
        info!(streak = self.store.data().streak, "check-in saved");
        self.change_view(View::Complete);
        Ok(self.view)
    }

    pub fn do_another(&mut self) -> View {
        if self.view != View::Complete {
            return self.ignore("do_another");
        }
        self.change_view(View::Home);
        self.view
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let data = self.store.data();
        ControllerSnapshot {
            view: self.view,
            profile: data.profile.clone(),
            onboarding_complete: data.onboarding_complete,
            show_onboarding: self.show_onboarding,
            current_mood: data.current_mood,
            streak: data.streak,
            sessions: data.sessions.clone(),
            severe_mood_count: data.severe_mood_count,
            banner: self.banner(),
            generating: self.generating,
            playing: self.playing,
            speech_supported: self.speech.supported(),
            active_session: self.active_session.clone(),
            recent_notes: self.recent_notes(),
            last_notes: self.last_notes.clone(),
            history: build_history_summary(&data.sessions),
        }
    }

    fn stop_playback(&mut self) {
        self.playing = false;
        self.speech.cancel();
    }

    fn change_view(&mut self, next: View) {
        if self.view == View::Session && next != View::Session {
            self.stop_playback();
        }
        debug!(from = ?self.view, to = ?next, "view change");
        self.view = next;
    }

    fn ignore(&self, action: &str) -> View {
        debug!(action, view = ?self.view, "action ignored in current view");
        self.view
    }
}
