use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::focus::PanelId;
use crate::overlay::{Overlay, PromptOutcome};
use crate::tui::AppEvent;

/// Wheel steps per notch in the scripture panel.
const WHEEL_LINES: usize = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        // the next draw picks up the new size
        AppEvent::Resize => {}
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.shutdown();
        return;
    }

    if app.overlays.is_active() {
        handle_overlay_key(app, key);
    } else {
        handle_main_key(app, key);
    }
}

fn handle_main_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.cycle_focus(true),
        KeyCode::BackTab => app.cycle_focus(false),

        KeyCode::Char('s') => app.open_search(),
        KeyCode::Char('b') => app.open_bookmarks(),
        KeyCode::Char('t') => app.open_theme_picker(),
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Char('r') => app.random_verse(),
        KeyCode::Char('a') => app.request_bookmark(),

        _ => match app.focus.focused() {
            Some(PanelId::Chapters) => handle_chapters_key(app, key),
            Some(PanelId::Verses) => handle_verses_key(app, key),
            Some(PanelId::Content) => handle_content_key(app, key),
            None => {}
        },
    }
}

fn handle_chapters_key(app: &mut App, key: KeyEvent) {
    let last = app.library.chapters().len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_chapter_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_chapter_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.chapter_cursor_to(0),
        KeyCode::Char('G') | KeyCode::End => app.chapter_cursor_to(last),
        KeyCode::Enter => app.activate_chapter(),
        _ => {}
    }
}

fn handle_verses_key(app: &mut App, key: KeyEvent) {
    let last = app.selection.verse_items().len().saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_verse_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_verse_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.verse_cursor_to(0),
        KeyCode::Char('G') | KeyCode::End => app.verse_cursor_to(last),
        KeyCode::Enter => app.activate_verse(),
        _ => {}
    }
}

fn handle_content_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    // Text prompts swallow every key, including the list shortcuts.
    if let Some(outcome) = app.overlays.current_mut().prompt_mut().map(|p| p.handle_key(key.code)) {
        match outcome {
            PromptOutcome::Editing => {}
            PromptOutcome::Submit(text) => match app.overlays.current() {
                Overlay::SearchPrompt(_) => app.submit_search(text),
                Overlay::AddBookmark { .. } => app.commit_bookmark(text),
                Overlay::Bookmarks(_) => app.commit_note(text),
                _ => {}
            },
            PromptOutcome::Cancel => match app.overlays.current() {
                Overlay::Bookmarks(_) => app.cancel_note_edit(),
                _ => app.close_overlay(),
            },
        }
        return;
    }

    let in_bookmarks = matches!(app.overlays.current(), Overlay::Bookmarks(_));
    let in_help = matches!(app.overlays.current(), Overlay::Help);

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
        KeyCode::Char('h') if in_help => app.close_overlay(),

        KeyCode::Enter => app.confirm_overlay(),
        KeyCode::Char('j') | KeyCode::Down => app.move_overlay_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_overlay_cursor(-1),
        KeyCode::Home => app.overlay_cursor_to(0),
        KeyCode::End => {
            let last = app.overlays.current().list_len().saturating_sub(1);
            app.overlay_cursor_to(last);
        }

        KeyCode::Char('d') if in_bookmarks => app.delete_bookmark(),
        KeyCode::Char('e') if in_bookmarks => app.begin_note_edit(),
        KeyCode::Char('K') if in_bookmarks => app.move_bookmark(true),
        KeyCode::Char('J') if in_bookmarks => app.move_bookmark(false),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// List row under the pointer for a bordered list drawn in `area`.
fn list_row(area: Option<Rect>, offset: usize, x: u16, y: u16) -> Option<usize> {
    let area = area?;
    if !point_in_rect(x, y, area) || y <= area.y || y + 1 >= area.y + area.height {
        return None;
    }
    Some(offset + (y - area.y - 1) as usize)
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    if app.overlays.is_active() {
        // an open prompt owns the input; the list under it stays put
        if app.overlays.current_mut().prompt_mut().is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let offset = app.overlays.current().list_state().map_or(0, |s| s.offset());
                if let Some(row) = list_row(app.overlay_list_area, offset, x, y) {
                    app.overlay_cursor_to(row);
                }
            }
            MouseEventKind::ScrollDown => app.move_overlay_cursor(1),
            MouseEventKind::ScrollUp => app.move_overlay_cursor(-1),
            _ => {}
        }
        return;
    }

    // Determine which area the mouse is in (position-based scrolling)
    let in_chapters = app.chapters_area.is_some_and(|r| point_in_rect(x, y, r));
    let in_verses = app.verses_area.is_some_and(|r| point_in_rect(x, y, r));
    let in_content = app.content_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if in_chapters {
                app.focus_panel(PanelId::Chapters);
                if let Some(row) = list_row(app.chapters_area, app.chapter_state.offset(), x, y) {
                    if row < app.library.chapters().len() {
                        app.chapter_cursor_to(row);
                        app.activate_chapter();
                    }
                }
            } else if in_verses {
                app.focus_panel(PanelId::Verses);
                if let Some(row) = list_row(app.verses_area, app.verse_state.offset(), x, y) {
                    if row < app.selection.verse_items().len() {
                        app.verse_cursor_to(row);
                        app.activate_verse();
                    }
                }
            } else if in_content {
                app.focus_panel(PanelId::Content);
            }
        }
        MouseEventKind::ScrollDown => {
            if in_content {
                for _ in 0..WHEEL_LINES {
                    app.scroll_down();
                }
            } else if in_chapters {
                app.move_chapter_cursor(1);
            } else if in_verses {
                app.move_verse_cursor(1);
            }
        }
        MouseEventKind::ScrollUp => {
            if in_content {
                for _ in 0..WHEEL_LINES {
                    app.scroll_up();
                }
            } else if in_chapters {
                app.move_chapter_cursor(-1);
            } else if in_verses {
                app.move_verse_cursor(-1);
            }
        }
        _ => {}
    }
}
