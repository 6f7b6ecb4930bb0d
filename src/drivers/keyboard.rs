use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over terminal differences in key reporting before events reach
/// the toplevel.
///
/// Release events are dropped, except for bare modifier keys: the Alt tap
/// that opens the menu bar fires on the release edge, so those must survive.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                let modifier_only = matches!(key.code, KeyCode::Modifier(_));
                if cfg!(windows) {
                    match key.kind {
                        KeyEventKind::Release => {
                            if key.code == KeyCode::Esc {
                                self.esc_down = false;
                            }
                            if !modifier_only {
                                return None;
                            }
                        }
                        KeyEventKind::Repeat => return None,
                        KeyEventKind::Press => {}
                    }
                    if key.code == KeyCode::Esc && key.kind == KeyEventKind::Press {
                        if self.esc_down {
                            return None;
                        }
                        self.esc_down = true;
                    } else if key.kind == KeyEventKind::Press {
                        self.esc_down = false;
                    }
                } else if key.kind == KeyEventKind::Release && !modifier_only {
                    return None;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
