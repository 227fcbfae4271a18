use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.aggregate`(...) for the current route and selections
    Refresh,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Delete, Down, Enter, Esc, F, Left, Right, Tab, Up};

    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts; plain letters are text input
    match key.code {
        Char('c') if control => return Action::Quit,
        Esc => return Action::Quit,
        Char('r') if control => return Action::Refresh,
        F(5) => return Action::Refresh,
        Char('t') if control => {
            app.time_of_day = app.time_of_day.toggled();
            return Action::None;
        }
        Char('p') if control => {
            app.metric = app.metric.next();
            return Action::None;
        }
        _ => {}
    }

    let mut action = Action::None;

    match key.code {
        Tab | Down => app.focus = app.focus.next(),
        BackTab | Up => app.focus = app.focus.previous(),
        Left => app.days = app.days.decrement(),
        Right => app.days = app.days.increment(),
        Delete => app.remove_last_intermediate(),
        Enter => {
            if app.focus == Field::Intermediate {
                if !app.add_intermediate() {
                    app.error_message = Some("Type a place name before adding it".into());
                }
            } else {
                action = Action::Refresh;
            }
        }
        Backspace => {
            app.focused_input_mut().pop();
        }
        Char(character) => {
            if !control && !key.modifiers.contains(KeyModifiers::ALT) {
                app.focused_input_mut().push(character);
            }
        }
        _ => {}
    }
    action
}
