use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which half of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Panel,
    Canvas,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    NextWidget,
    PrevWidget,
    NextElement,
    PrevElement,
    Activate,
    FocusPanel,
    FocusCanvas,
    ToggleHelp,
    Quit,
    Backspace,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, focus: Focus) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
            _ => Action::Noop,
        };
    }

    match focus {
        Focus::Panel => match key.code {
            KeyCode::Tab | KeyCode::Down => Action::NextWidget,
            KeyCode::BackTab | KeyCode::Up => Action::PrevWidget,
            KeyCode::Enter => Action::Activate,
            KeyCode::Esc => Action::FocusCanvas,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        },
        Focus::Canvas => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => Action::Move(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => Action::Move(Direction::Right),
            KeyCode::Tab => Action::NextElement,
            KeyCode::BackTab => Action::PrevElement,
            KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
            KeyCode::Esc | KeyCode::Char('i') => Action::FocusPanel,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::Noop,
        },
    }
}
