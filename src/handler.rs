use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::tui::AppEvent;

/// Lines moved per mouse wheel notch
const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Resolved { id, outcome } => app.widget.resolve(id, outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit(),

        // Conversation scrolling
        KeyCode::PageUp => {
            let page = app.page();
            app.scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = app.page();
            app.scroll_down(page);
        }

        // Input editing
        KeyCode::Backspace => app.widget.input.backspace(),
        KeyCode::Delete => app.widget.input.delete(),
        KeyCode::Left => app.widget.input.move_left(),
        KeyCode::Right => app.widget.input.move_right(),
        KeyCode::Home => app.widget.input.move_home(),
        KeyCode::End => app.widget.input.move_end(),
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.widget.input.insert(c)
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));
    let on_send = app.send_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if on_send => app.submit(),
        MouseEventKind::ScrollUp if in_chat => app.scroll_up(WHEEL_LINES),
        MouseEventKind::ScrollDown if in_chat => app.scroll_down(WHEEL_LINES),
        _ => {}
    }
}
