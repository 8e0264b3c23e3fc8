//! Guided-session script generation.
//!
//! Scripts are assembled from per-goal template tables. Body passages and
//! reflection prompts are picked through an injectable index function so
//! callers can pin the selection; everything else is fixed per goal.

use crate::errors::GenerationError;
use crate::models::{GeneratedSession, Goal, MoodScore, SessionLength};
use rand::Rng;
use std::collections::BTreeMap;

pub const SETTLE_LINE: &str = "For twenty seconds, settle in. Sit tall yet soft. Breathe in through the nose for four, hold, and breathe out slowly for six.";
pub const BREATH_COUNT_LINE: &str =
    "Stay with the count: in for four, hold for four, out for six. Repeat gently.";

const LOW_MOOD_LINE: &str =
    "Notice any heaviness with kindness. You do not need to change it; simply offer it space.";
const STEADY_MOOD_LINE: &str =
    "Let your breath mirror how you would like to feel. Balanced, present, and steady.";

const FALLBACK_REFLECTION: &str = "What is one kind thing you can offer yourself right now?";
const FALLBACK_TIP: &str = "Place a hand on your chest to feel your breath rise.";

/// Fixed templates for one goal.
#[derive(Debug, Clone)]
pub struct GoalTemplates {
    pub intro: &'static str,
    pub bodies: &'static [&'static str],
    pub closing: &'static str,
    pub prompts: &'static [&'static str],
    pub tip: &'static str,
}

#[derive(Debug, Clone)]
pub struct TemplateTables {
    goals: BTreeMap<Goal, GoalTemplates>,
}

impl TemplateTables {
    pub fn empty() -> Self {
        Self { goals: BTreeMap::new() }
    }

    pub fn insert(&mut self, goal: Goal, templates: GoalTemplates) {
        self.goals.insert(goal, templates);
    }

    pub fn remove(&mut self, goal: Goal) -> Option<GoalTemplates> {
        self.goals.remove(&goal)
    }

    pub fn get(&self, goal: Goal) -> Option<&GoalTemplates> {
        self.goals.get(&goal)
    }
}

impl Default for TemplateTables {
    fn default() -> Self {
        let mut tables = Self::empty();
        tables.insert(
            Goal::Relax,
            GoalTemplates {
                intro: "We will soften your day and invite calm.",
                bodies: &[
                    "Notice your shoulders, let them drop. Let your breath expand gently, like waves arriving.",
                    "As you breathe in, imagine a cool breeze. As you breathe out, release the weight of the last hour.",
                    "Feel the support beneath you. Each exhale is a soft sigh of relief moving through the body.",
                ],
                closing: "Carry this softness with you as you move onward.",
                prompts: &[
                    "What can you simplify in the next hour?",
                    "Which part of you feels most at ease right now?",
                ],
                tip: "Unclench your jaw and rest your tongue softly.",
            },
        );
        tables.insert(
            Goal::Focus,
            GoalTemplates {
                intro: "We will gather your attention and land in this moment.",
                bodies: &[
                    "Bring your attention to the tip of your nose. Follow the breath in a clean, unbroken line.",
                    "Picture a single task glowing ahead. On each inhale, step closer. On each exhale, clear the path.",
                    "Let thoughts stream past like leaves in water. Anchor gently in the rhythm of your inhale.",
                ],
                closing: "Let the clarity stay with you as you return to your task.",
                prompts: &[
                    "What single action deserves your full attention next?",
                    "Which distraction can you let go of today?",
                ],
                tip: "Relax your brow and feel your feet against the ground.",
            },
        );
        tables.insert(
            Goal::Sleep,
            GoalTemplates {
                intro: "We will slow down and drift toward rest.",
                bodies: &[
                    "Imagine a warm blanket of dusk settling around you. Your breath is the tide, steady and slow.",
                    "Each inhale draws in moonlight. Each exhale melts tension from brow to toes.",
                    "Listen for the quiet between breaths. Allow it to widen, holding you in a cradle of night.",
                ],
                closing: "Allow this stillness to guide you into gentle sleep.",
                prompts: &[
                    "What is one thing you are grateful for before you rest?",
                    "Which thought can you set down until morning?",
                ],
                tip: "Dim the lights and let screens rest at least 15 minutes before bed.",
            },
        );
        tables
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub name: &'a str,
    pub goal: Goal,
    pub mood: MoodScore,
    pub length: SessionLength,
    /// Newest first.
    pub recent_notes: &'a [String],
}

/// Builds a session bundle from `tables`.
///
/// `pick(len)` returns the index to use among `len` candidates; values out of
/// range wrap around. Never fails when `tables` has non-empty entries for the
/// requested goal.
pub fn generate(
    tables: &TemplateTables,
    request: &GenerateRequest<'_>,
    pick: &mut dyn FnMut(usize) -> usize,
) -> Result<GeneratedSession, GenerationError> {
    let templates = tables
        .get(request.goal)
        .filter(|t| !t.bodies.is_empty() && !t.prompts.is_empty())
        .ok_or(GenerationError::MissingTemplates(request.goal))?;

    let greeting = if request.name.is_empty() {
        "Hi there,".to_string()
    } else {
        format!("Hi {},", request.name)
    };
    let intro = format!("{} {greeting} you are safe here.", templates.intro);

    let mood_line = if request.mood.value() <= 2 {
        LOW_MOOD_LINE
    } else {
        STEADY_MOOD_LINE
    };
    let guidance = match request.recent_notes.first().filter(|note| !note.is_empty()) {
        Some(note) => format!("Remember: {note}. {mood_line}"),
        None => mood_line.to_string(),
    };

    let body = templates.bodies[pick(templates.bodies.len()) % templates.bodies.len()];
    let reflection = templates.prompts[pick(templates.prompts.len()) % templates.prompts.len()];

    let script = [
        SETTLE_LINE,
        intro.as_str(),
        guidance.as_str(),
        body,
        BREATH_COUNT_LINE,
        templates.closing,
    ]
    .iter()
    .filter(|segment| !segment.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ");

    Ok(GeneratedSession {
        audio_text: script.clone(),
        script,
        reflection: reflection.to_string(),
        micro_tip: templates.tip.to_string(),
    })
}

/// Static bundle used when generation fails.
pub fn offline_fallback(goal: Goal) -> GeneratedSession {
    let script = match goal {
        Goal::Relax => {
            "Take three slow breaths. Roll your shoulders and scan from head to toe. Thank yourself for pausing."
        }
        Goal::Focus => {
            "Breathe in for four, hold for four, out for six. Choose one task and imagine it already complete."
        }
        Goal::Sleep => {
            "Dim the lights. Breathe slowly and count each exhale from ten to one. With each number, release more tension."
        }
    };
    GeneratedSession {
        script: script.to_string(),
        reflection: FALLBACK_REFLECTION.to_string(),
        micro_tip: FALLBACK_TIP.to_string(),
        audio_text: script.to_string(),
    }
}

pub trait SessionGenerator {
    fn generate(&mut self, request: &GenerateRequest<'_>) -> Result<GeneratedSession, GenerationError>;
}

type IndexPicker = Box<dyn FnMut(usize) -> usize + Send>;

/// Template-backed generator with uniform random selection by default.
pub struct TemplateGenerator {
    tables: TemplateTables,
    pick: IndexPicker,
}

impl TemplateGenerator {
    pub fn new(tables: TemplateTables) -> Self {
        Self::with_picker(tables, |len| rand::thread_rng().gen_range(0..len))
    }

    pub fn with_picker(
        tables: TemplateTables,
        pick: impl FnMut(usize) -> usize + Send + 'static,
    ) -> Self {
        Self {
            tables,
            pick: Box::new(pick),
        }
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(TemplateTables::default())
    }
}

impl SessionGenerator for TemplateGenerator {
    fn generate(&mut self, request: &GenerateRequest<'_>) -> Result<GeneratedSession, GenerationError> {
        generate(&self.tables, request, &mut *self.pick)
    }
}
