use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{Phase, SessionEvent};

/// Translate a key press into a session event for the current phase.
///
/// Keys are mapped even when the phase will reject the event, so the guards
/// in [`SessionState::apply`](crate::session::SessionState::apply) stay the
/// only place that decides what is accepted.
pub fn map_key(key: KeyEvent, phase: &Phase) -> Option<SessionEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    // ctrl+c to quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(SessionEvent::QuitRequested);
    }

    match phase {
        Phase::Idle | Phase::Loading => match key.code {
            KeyCode::Enter => Some(SessionEvent::FlipRequested),
            KeyCode::Char('r') => Some(SessionEvent::ResetRequested),
            KeyCode::Char('c') => Some(SessionEvent::SourceToggleRequested),
            KeyCode::Char('l') => Some(SessionEvent::LabelEditRequested),
            KeyCode::Char('q') | KeyCode::Esc => Some(SessionEvent::QuitRequested),
            _ => None,
        },
        Phase::EditingLabels(_) => match key.code {
            KeyCode::Enter => Some(SessionEvent::LabelEditConfirm),
            KeyCode::Esc => Some(SessionEvent::LabelEditCancel),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(SessionEvent::FocusSwitch)
            }
            KeyCode::Backspace => Some(SessionEvent::LabelBackspace),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(SessionEvent::LabelInput(c))
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{LabelEditor, LabelSet};
    use assert_matches::assert_matches;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn editing() -> Phase {
        Phase::EditingLabels(LabelEditor::seeded(&LabelSet::default()))
    }

    #[test]
    fn test_idle_bindings() {
        let idle = Phase::Idle;
        assert_matches!(map_key(press(KeyCode::Enter), &idle), Some(SessionEvent::FlipRequested));
        assert_matches!(
            map_key(press(KeyCode::Char('r')), &idle),
            Some(SessionEvent::ResetRequested)
        );
        assert_matches!(
            map_key(press(KeyCode::Char('c')), &idle),
            Some(SessionEvent::SourceToggleRequested)
        );
        assert_matches!(
            map_key(press(KeyCode::Char('l')), &idle),
            Some(SessionEvent::LabelEditRequested)
        );
        assert_matches!(
            map_key(press(KeyCode::Char('q')), &idle),
            Some(SessionEvent::QuitRequested)
        );
        assert_matches!(map_key(press(KeyCode::Esc), &idle), Some(SessionEvent::QuitRequested));
        assert_matches!(map_key(press(KeyCode::Char('x')), &idle), None);
    }

    #[test]
    fn test_loading_still_maps_flip() {
        assert_matches!(
            map_key(press(KeyCode::Enter), &Phase::Loading),
            Some(SessionEvent::FlipRequested)
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for phase in [Phase::Idle, Phase::Loading, editing()] {
            assert_matches!(map_key(ctrl_c, &phase), Some(SessionEvent::QuitRequested));
        }
    }

    #[test]
    fn test_editing_bindings() {
        let phase = editing();
        assert_matches!(
            map_key(press(KeyCode::Enter), &phase),
            Some(SessionEvent::LabelEditConfirm)
        );
        assert_matches!(map_key(press(KeyCode::Esc), &phase), Some(SessionEvent::LabelEditCancel));
        assert_matches!(map_key(press(KeyCode::Tab), &phase), Some(SessionEvent::FocusSwitch));
        assert_matches!(map_key(press(KeyCode::BackTab), &phase), Some(SessionEvent::FocusSwitch));
        assert_matches!(
            map_key(press(KeyCode::Backspace), &phase),
            Some(SessionEvent::LabelBackspace)
        );
        // letters that are bindings elsewhere are plain text here
        assert_matches!(
            map_key(press(KeyCode::Char('q')), &phase),
            Some(SessionEvent::LabelInput('q'))
        );
        assert_matches!(
            map_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT), &phase),
            Some(SessionEvent::LabelInput('H'))
        );
        assert_matches!(
            map_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT), &phase),
            None
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut release = press(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_matches!(map_key(release, &Phase::Idle), None);
    }
}
