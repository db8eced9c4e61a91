use crate::page::Anchor;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    Mouse { kind: MouseEventKind, col: u16, row: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UiAction {
    ScrollBy(i32),
    /// Whole screens, signed.
    Page(i32),
    Home,
    End,
    Jump(Anchor),
    FocusNext,
    FocusPrev,
    Activate,
    ToggleDetails,
    ShowBooking,
    HelpToggle,
    Back,
    Hover { col: u16, row: u16 },
    Click { col: u16, row: u16 },
    Quit,
}

const WHEEL_ROWS: i32 = 3;

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                });
            }
            Event::Mouse(m) => out.push(InputEvent::Mouse {
                kind: m.kind,
                col: m.column,
                row: m.row,
            }),
            _ => {}
        }
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: InputEvent, help_open: bool) -> Option<UiAction> {
    let (key, mods) = match ev {
        InputEvent::Mouse { kind, col, row } => {
            if help_open {
                return None;
            }
            return match kind {
                MouseEventKind::ScrollDown => Some(UiAction::ScrollBy(WHEEL_ROWS)),
                MouseEventKind::ScrollUp => Some(UiAction::ScrollBy(-WHEEL_ROWS)),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(UiAction::Hover { col, row }),
                MouseEventKind::Down(MouseButton::Left) => Some(UiAction::Click { col, row }),
                _ => None,
            };
        }
        InputEvent::Key { key, mods } => (key, mods),
    };

    // Global
    if matches!(key, KeyCode::Char('c') | KeyCode::Char('C')) && mods.contains(KeyModifiers::CONTROL) {
        return Some(UiAction::Quit);
    }
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(UiAction::Quit),
        KeyCode::Char('?') => return Some(UiAction::HelpToggle),
        KeyCode::Esc => return Some(UiAction::Back),
        _ => {}
    }
    if help_open {
        return None;
    }

    match key {
        KeyCode::Down | KeyCode::Char('j') => Some(UiAction::ScrollBy(1)),
        KeyCode::Up | KeyCode::Char('k') => Some(UiAction::ScrollBy(-1)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(UiAction::Page(1)),
        KeyCode::PageUp => Some(UiAction::Page(-1)),
        KeyCode::Home => Some(UiAction::Home),
        KeyCode::End => Some(UiAction::End),
        KeyCode::Char('t') => Some(UiAction::Jump(Anchor::Top)),
        KeyCode::Char('w') => Some(UiAction::Jump(Anchor::Work)),
        KeyCode::Char('s') => Some(UiAction::Jump(Anchor::Services)),
        KeyCode::Char('a') => Some(UiAction::Jump(Anchor::About)),
        KeyCode::Tab => Some(UiAction::FocusNext),
        KeyCode::BackTab => Some(UiAction::FocusPrev),
        KeyCode::Enter => Some(UiAction::Activate),
        KeyCode::Char('i') => Some(UiAction::ToggleDetails),
        KeyCode::Char('b') => Some(UiAction::ShowBooking),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: KeyCode) -> InputEvent {
        InputEvent::Key {
            key: c,
            mods: KeyModifiers::NONE,
        }
    }

    fn mouse(kind: MouseEventKind) -> InputEvent {
        InputEvent::Mouse { kind, col: 7, row: 9 }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_event(key(KeyCode::Char('q')), false), Some(UiAction::Quit));
        let ctrl_c = InputEvent::Key {
            key: KeyCode::Char('c'),
            mods: KeyModifiers::CONTROL,
        };
        assert_eq!(map_event(ctrl_c, true), Some(UiAction::Quit));
    }

    #[test]
    fn test_section_jumps() {
        assert_eq!(map_event(key(KeyCode::Char('w')), false), Some(UiAction::Jump(Anchor::Work)));
        assert_eq!(map_event(key(KeyCode::Char('s')), false), Some(UiAction::Jump(Anchor::Services)));
        assert_eq!(map_event(key(KeyCode::Char('a')), false), Some(UiAction::Jump(Anchor::About)));
        assert_eq!(map_event(key(KeyCode::Char('t')), false), Some(UiAction::Jump(Anchor::Top)));
    }

    #[test]
    fn test_help_swallows_page_keys() {
        assert_eq!(map_event(key(KeyCode::Down), true), None);
        assert_eq!(map_event(mouse(MouseEventKind::ScrollDown), true), None);
        assert_eq!(map_event(key(KeyCode::Esc), true), Some(UiAction::Back));
        assert_eq!(map_event(key(KeyCode::Char('?')), true), Some(UiAction::HelpToggle));
    }

    #[test]
    fn test_mouse_mapping() {
        assert_eq!(map_event(mouse(MouseEventKind::ScrollDown), false), Some(UiAction::ScrollBy(3)));
        assert_eq!(map_event(mouse(MouseEventKind::ScrollUp), false), Some(UiAction::ScrollBy(-3)));
        assert_eq!(
            map_event(mouse(MouseEventKind::Moved), false),
            Some(UiAction::Hover { col: 7, row: 9 })
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(MouseButton::Left)), false),
            Some(UiAction::Click { col: 7, row: 9 })
        );
        assert_eq!(map_event(mouse(MouseEventKind::Down(MouseButton::Right)), false), None);
    }

    #[test]
    fn test_focus_cycle_keys() {
        assert_eq!(map_event(key(KeyCode::Tab), false), Some(UiAction::FocusNext));
        assert_eq!(map_event(key(KeyCode::BackTab), false), Some(UiAction::FocusPrev));
        assert_eq!(map_event(key(KeyCode::Enter), false), Some(UiAction::Activate));
    }
}
