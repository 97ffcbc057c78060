use std::mem;

use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::bits::{FlipResult, Verdict};
use crate::error::FlipError;
use crate::source::SourceSelector;

pub const DEFAULT_ONES_LABEL: &str = "ONES";
pub const DEFAULT_ZEROS_LABEL: &str = "ZEROS";
pub const TIE_LABEL: &str = "TIE";

/// Widest label (in terminal columns) that still fits inside a result card
pub const MAX_LABEL_WIDTH: usize = 10;

/// Text shown on cards in place of the ONES/ZEROS verdicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    ones: String,
    zeros: String,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            ones: DEFAULT_ONES_LABEL.to_string(),
            zeros: DEFAULT_ZEROS_LABEL.to_string(),
        }
    }
}

impl LabelSet {
    /// Blank labels fall back to the defaults.
    pub fn new(ones: &str, zeros: &str) -> Self {
        Self {
            ones: normalize_label(ones).unwrap_or_else(|| DEFAULT_ONES_LABEL.to_string()),
            zeros: normalize_label(zeros).unwrap_or_else(|| DEFAULT_ZEROS_LABEL.to_string()),
        }
    }

    pub fn ones(&self) -> &str {
        &self.ones
    }

    pub fn zeros(&self) -> &str {
        &self.zeros
    }

    pub fn label_for(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::Ones => &self.ones,
            Verdict::Zeros => &self.zeros,
            Verdict::Tie => TIE_LABEL,
        }
    }
}

/// Trim and clip to the card width; `None` when nothing is left.
fn normalize_label(raw: &str) -> Option<String> {
    let mut width = 0;
    let clipped: String = raw
        .trim()
        .chars()
        .take_while(|c| {
            width += c.width().unwrap_or(0);
            width <= MAX_LABEL_WIDTH
        })
        .collect();
    let clipped = clipped.trim_end().to_string();

    if clipped.is_empty() {
        None
    } else {
        Some(clipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Ones,
    Zeros,
}

impl LabelField {
    pub fn other(self) -> Self {
        match self {
            Self::Ones => Self::Zeros,
            Self::Zeros => Self::Ones,
        }
    }
}

/// Edit buffers; only exists while labels are being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEditor {
    ones: String,
    zeros: String,
    focus: LabelField,
}

impl LabelEditor {
    pub fn seeded(labels: &LabelSet) -> Self {
        Self {
            ones: labels.ones.clone(),
            zeros: labels.zeros.clone(),
            focus: LabelField::Ones,
        }
    }

    pub fn focus(&self) -> LabelField {
        self.focus
    }

    pub fn buffer(&self, field: LabelField) -> &str {
        match field {
            LabelField::Ones => &self.ones,
            LabelField::Zeros => &self.zeros,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LabelField::Ones => &mut self.ones,
            LabelField::Zeros => &mut self.zeros,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = self.focus.other();
    }

    /// Control characters and input past the card width are dropped.
    pub fn insert(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let buffer = self.focused_mut();
        let width: usize = buffer.chars().filter_map(|ch| ch.width()).sum();
        if width + c.width().unwrap_or(0) <= MAX_LABEL_WIDTH {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Blank buffers keep the label they replace.
    pub fn commit(self, current: &LabelSet) -> LabelSet {
        LabelSet {
            ones: normalize_label(&self.ones).unwrap_or_else(|| current.ones.clone()),
            zeros: normalize_label(&self.zeros).unwrap_or_else(|| current.zeros.clone()),
        }
    }
}

/// Single active mode of the session. Payload-carrying so that edit buffers
/// cannot outlive the editing phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    EditingLabels(LabelEditor),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::EditingLabels(_) => "editing-labels",
        }
    }
}

/// Inputs to the session state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    FlipRequested,
    FlipCompleted(Result<FlipResult, FlipError>),
    ResetRequested,
    SourceToggleRequested,
    LabelEditRequested,
    LabelEditConfirm,
    LabelEditCancel,
    FocusSwitch,
    LabelInput(char),
    LabelBackspace,
    QuitRequested,
}

/// What the loop must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// guard failed; state untouched
    Ignored,
    StartFlip(SourceSelector),
    Quit,
}

/// Everything the interactive session accumulates
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    history: Vec<FlipResult>,
    source: SourceSelector,
    labels: LabelSet,
    phase: Phase,
    last_error: Option<FlipError>,
}

impl SessionState {
    pub fn new(source: SourceSelector, labels: LabelSet) -> Self {
        Self {
            source,
            labels,
            ..Self::default()
        }
    }

    pub fn history(&self) -> &[FlipResult] {
        &self.history
    }

    pub fn source(&self) -> SourceSelector {
        self.source
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn last_error(&self) -> Option<&FlipError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Apply one event. Events whose guard fails leave the state untouched
    /// and return [`Effect::Ignored`].
    pub fn apply(&mut self, event: SessionEvent) -> Effect {
        let phase = mem::take(&mut self.phase);
        let (next, effect) = self.transition(phase, event);
        self.phase = next;
        effect
    }

    fn transition(&mut self, phase: Phase, event: SessionEvent) -> (Phase, Effect) {
        use SessionEvent::*;

        match (phase, event) {
            (phase, QuitRequested) => (phase, Effect::Quit),

            (Phase::Idle, FlipRequested) => {
                self.last_error = None;
                (Phase::Loading, Effect::StartFlip(self.source))
            }
            (Phase::Loading, FlipCompleted(Ok(result))) => {
                self.history.push(result);
                (Phase::Idle, Effect::None)
            }
            (Phase::Loading, FlipCompleted(Err(err))) => {
                self.last_error = Some(err);
                (Phase::Idle, Effect::None)
            }
            (Phase::Idle, ResetRequested) => {
                self.history.clear();
                self.last_error = None;
                (Phase::Idle, Effect::None)
            }
            (Phase::Idle, SourceToggleRequested) => {
                self.source = self.source.toggle();
                (Phase::Idle, Effect::None)
            }
            (Phase::Idle, LabelEditRequested) => (
                Phase::EditingLabels(LabelEditor::seeded(&self.labels)),
                Effect::None,
            ),

            (Phase::EditingLabels(editor), LabelEditConfirm) => {
                self.labels = editor.commit(&self.labels);
                (Phase::Idle, Effect::None)
            }
            (Phase::EditingLabels(_), LabelEditCancel) => (Phase::Idle, Effect::None),
            (Phase::EditingLabels(mut editor), FocusSwitch) => {
                editor.switch_focus();
                (Phase::EditingLabels(editor), Effect::None)
            }
            (Phase::EditingLabels(mut editor), LabelInput(c)) => {
                editor.insert(c);
                (Phase::EditingLabels(editor), Effect::None)
            }
            (Phase::EditingLabels(mut editor), LabelBackspace) => {
                editor.backspace();
                (Phase::EditingLabels(editor), Effect::None)
            }

            (phase, event) => {
                debug!(phase = phase.name(), ?event, "event ignored");
                (phase, Effect::Ignored)
            }
        }
    }
}
