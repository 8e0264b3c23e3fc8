//! Spoken playback of session scripts.

use std::env;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

const SPEECH_PROGRAMS: [&str; 3] = ["espeak-ng", "espeak", "say"];

pub trait Speech {
    fn supported(&self) -> bool;
    /// Returns false when nothing could be spoken.
    fn speak(&mut self, text: &str) -> bool;
    fn cancel(&mut self);
    /// Reports once that the last utterance ended on its own.
    fn finished(&mut self) -> bool {
        false
    }
}

/// Capability for hosts without any speech backend.
#[derive(Debug, Default)]
pub struct SilentSpeech;

impl Speech for SilentSpeech {
    fn supported(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str) -> bool {
        false
    }

    fn cancel(&mut self) {}
}

/// Speaks through a text-to-speech program found on `PATH`.
#[derive(Debug, Default)]
pub struct SystemSpeech {
    program: Option<PathBuf>,
    child: Option<Child>,
}

impl SystemSpeech {
    pub fn with_program(program: PathBuf) -> Self {
        Self {
            program: Some(program),
            child: None,
        }
    }

    /// Looks the backend up once. `VOID_SPEECH=off` disables it.
    pub fn detect() -> Self {
        if env::var("VOID_SPEECH").is_ok_and(|value| value.eq_ignore_ascii_case("off")) {
            return Self::default();
        }
        let program = env::var_os("PATH").and_then(|paths| {
            env::split_paths(&paths).find_map(|dir| {
                SPEECH_PROGRAMS
                    .iter()
                    .map(|name| dir.join(name))
                    .find(|candidate| candidate.is_file())
            })
        });
        Self {
            program,
            child: None,
        }
    }

    pub fn program(&self) -> Option<&PathBuf> {
        self.program.as_ref()
    }
}

impl Speech for SystemSpeech {
    fn supported(&self) -> bool {
        self.program.is_some()
    }

    fn speak(&mut self, text: &str) -> bool {
        let Some(program) = &self.program else {
            return false;
        };
        match Command::new(program)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!(pid = child.id(), "speech started");
                self.child = Some(child);
                true
            }
            Err(err) => {
                warn!("failed to start speech program {}: {err}", program.display());
                false
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn finished(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(Some(_)) => {
                self.child = None;
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!("failed to poll speech program: {err}");
                self.child = None;
                true
            }
        }
    }
}

impl Drop for SystemSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}
