//! Snapshot of a [`SessionState`] as plain strings and flags, ready for any
//! rendering backend.

use crate::bits::{FlipResult, Verdict};
use crate::session::{LabelField, Phase, SessionState};

pub const HEADER: &str = "QCOIN - Quantum Flip";
pub const EMPTY_HISTORY: &str = "No flips yet. Spin the quantum coin!";
pub const LOADING_STATUS: &str = "Extracting entropy...";

/// Columns taken by one card, border and trailing gap included
pub const CARD_WIDTH: u16 = 14;
/// Columns kept free on each side of the carousel
pub const SIDE_PADDING: u16 = 4;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const IDLE_HELP: &str =
    "Press [Enter] to Flip • [r] to Reset • [c] to Change Source • [l] to Edit Labels • [q] to Quit";
const LOADING_HELP: &str = "Flipping... • [q] to Quit";
const EDITING_HELP: &str = "[Tab] Switch Field • [Enter] Save • [Esc] Cancel";

/// Number of cards that fit in `width` columns, never less than one.
pub fn card_capacity(width: u16) -> usize {
    usize::from(width.saturating_sub(SIDE_PADDING * 2) / CARD_WIDTH).max(1)
}

/// The most recent `capacity` results, oldest first.
pub fn visible_history(history: &[FlipResult], capacity: usize) -> &[FlipResult] {
    let start = history.len().saturating_sub(capacity.max(1));
    &history[start..]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    pub verdict: Verdict,
    pub ones: u64,
    pub zeros: u64,
    pub most_recent: bool,
}

impl Card {
    pub fn lines(&self) -> [String; 4] {
        [
            self.label.clone(),
            String::new(),
            format!("1: {}", self.ones),
            format!("0: {}", self.zeros),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardList {
    Placeholder(&'static str),
    Cards(Vec<Card>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Ready { source: String, total: usize },
    Loading { spinner: char },
    Error(String),
}

impl StatusLine {
    pub fn text(&self) -> String {
        match self {
            Self::Ready { source, total } => format!("Source: {source} | Total Flips: {total}"),
            Self::Loading { spinner } => format!("{spinner} {LOADING_STATUS}"),
            Self::Error(message) => format!("Error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub ones: String,
    pub zeros: String,
    pub focus: LabelField,
}

/// Everything a frame shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub header: &'static str,
    pub cards: CardList,
    pub status: StatusLine,
    pub help: &'static str,
    pub editor: Option<EditorView>,
}

impl SessionView {
    /// `tick` only selects the spinner frame.
    pub fn build(state: &SessionState, width: u16, tick: usize) -> Self {
        let visible = visible_history(state.history(), card_capacity(width));
        let cards = if visible.is_empty() {
            CardList::Placeholder(EMPTY_HISTORY)
        } else {
            let last = visible.len() - 1;
            CardList::Cards(
                visible
                    .iter()
                    .enumerate()
                    .map(|(idx, result)| Card {
                        label: state.labels().label_for(result.verdict()).to_string(),
                        verdict: result.verdict(),
                        ones: result.ones(),
                        zeros: result.zeros(),
                        most_recent: idx == last,
                    })
                    .collect(),
            )
        };

        let status = if state.is_loading() {
            StatusLine::Loading {
                spinner: SPINNER[tick % SPINNER.len()],
            }
        } else if let Some(err) = state.last_error() {
            StatusLine::Error(err.to_string())
        } else {
            StatusLine::Ready {
                source: state.source().tag().to_uppercase(),
                total: state.history().len(),
            }
        };

        let (help, editor) = match state.phase() {
            Phase::Idle => (IDLE_HELP, None),
            Phase::Loading => (LOADING_HELP, None),
            Phase::EditingLabels(editor) => (
                EDITING_HELP,
                Some(EditorView {
                    ones: editor.buffer(LabelField::Ones).to_string(),
                    zeros: editor.buffer(LabelField::Zeros).to_string(),
                    focus: editor.focus(),
                }),
            ),
        };

        Self {
            header: HEADER,
            cards,
            status,
            help,
            editor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureCause, FlipError};
    use crate::session::{LabelSet, SessionEvent};
    use crate::source::SourceSelector;

    fn result_with_ones(set_bytes: usize) -> FlipResult {
        let mut block = vec![0u8; 8];
        block[..set_bytes].fill(0xFF);
        FlipResult::from_bytes(&block)
    }

    fn state_with(results: &[FlipResult]) -> SessionState {
        let mut state = SessionState::default();
        for result in results {
            state.apply(SessionEvent::FlipRequested);
            state.apply(SessionEvent::FlipCompleted(Ok(*result)));
        }
        state
    }

    #[test]
    fn test_card_capacity() {
        assert_eq!(card_capacity(0), 1);
        assert_eq!(card_capacity(8), 1);
        assert_eq!(card_capacity(21), 1);
        assert_eq!(card_capacity(36), 2);
        assert_eq!(card_capacity(80), 5);
        assert_eq!(card_capacity(120), 8);
    }

    #[test]
    fn test_visible_history_keeps_latest() {
        let history: Vec<FlipResult> = (0..8).map(result_with_ones).collect();
        let visible = visible_history(&history, 3);
        assert_eq!(visible, &history[5..]);
        assert_eq!(visible_history(&history, 20), &history[..]);
        assert_eq!(visible_history(&history, 0), &history[7..]);
        assert!(visible_history(&[], 4).is_empty());
    }

    #[test]
    fn test_empty_history_placeholder() {
        let view = SessionView::build(&SessionState::default(), 80, 0);
        assert_eq!(view.cards, CardList::Placeholder(EMPTY_HISTORY));
        assert_eq!(view.header, HEADER);
        assert_eq!(view.status.text(), "Source: QR | Total Flips: 0");
        assert!(view.editor.is_none());
    }

    #[test]
    fn test_overflowing_history_shows_last_k_with_latest_marked() {
        let history: Vec<FlipResult> = (0..9).map(result_with_ones).collect();
        let state = state_with(&history);
        let view = SessionView::build(&state, 80, 0);

        let CardList::Cards(cards) = &view.cards else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 5);
        let shown: Vec<u64> = cards.iter().map(|c| c.ones).collect();
        let expected: Vec<u64> = history[4..].iter().map(|r| r.ones()).collect();
        assert_eq!(shown, expected);
        assert_eq!(cards.iter().filter(|c| c.most_recent).count(), 1);
        assert!(cards.last().unwrap().most_recent);
        assert_eq!(view.status.text(), "Source: QR | Total Flips: 9");
    }

    #[test]
    fn test_cards_use_custom_labels() {
        let mut state = SessionState::new(SourceSelector::Anu, LabelSet::new("HEADS", "TAILS"));
        for result in [result_with_ones(8), result_with_ones(0), result_with_ones(4)] {
            state.apply(SessionEvent::FlipRequested);
            state.apply(SessionEvent::FlipCompleted(Ok(result)));
        }
        let view = SessionView::build(&state, 80, 0);
        let CardList::Cards(cards) = view.cards else {
            panic!("expected cards");
        };
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["HEADS", "TAILS", "TIE"]);
        assert_eq!(cards[0].lines()[2], "1: 64");
        assert_eq!(cards[0].lines()[3], "0: 0");
    }

    #[test]
    fn test_loading_status_spins() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::FlipRequested);
        let first = SessionView::build(&state, 80, 0);
        let second = SessionView::build(&state, 80, 1);

        assert_eq!(first.help, LOADING_HELP);
        assert!(first.status.text().ends_with(LOADING_STATUS));
        assert_ne!(first.status, second.status);
    }

    #[test]
    fn test_error_status() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::FlipRequested);
        state.apply(SessionEvent::FlipCompleted(Err(FlipError::protocol(
            "qrandom.io",
            FailureCause::BadStatus,
            "returned status 503",
        ))));
        let view = SessionView::build(&state, 80, 0);
        assert_eq!(
            view.status.text(),
            "Error: qrandom.io bad-status: returned status 503"
        );
        assert_eq!(view.cards, CardList::Placeholder(EMPTY_HISTORY));
    }

    #[test]
    fn test_editor_view() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::LabelEditRequested);
        state.apply(SessionEvent::FocusSwitch);
        state.apply(SessionEvent::LabelInput('!'));

        let view = SessionView::build(&state, 80, 0);
        assert_eq!(view.help, EDITING_HELP);
        assert_eq!(
            view.editor,
            Some(EditorView {
                ones: "ONES".into(),
                zeros: "ZEROS!".into(),
                focus: LabelField::Zeros,
            })
        );
    }
}
