use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::path::PathBuf;

use crate::app::{App, FocusPane, InputMode, Tab};
use crate::documents;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(data) => handle_paste(app, data),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::RevealTick => app.step_reveal(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    // The path overlay captures all input while open
    if app.show_file_input {
        handle_file_input(app, key);
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Chat panel open/close
        KeyCode::Char('c') => app.toggle_chat(),

        // Tab cycles focus: Viewer -> Chat -> Input -> Viewer (chat panel only
        // participates while visible)
        KeyCode::Tab => {
            let chat_visible = app.chat_open && !app.slides_fullscreen_active();
            app.focus = match app.focus {
                FocusPane::Viewer if chat_visible => FocusPane::Chat,
                FocusPane::Chat => FocusPane::Input,
                _ => FocusPane::Viewer,
            };

            // Auto-enter editing mode when focusing input
            if app.focus == FocusPane::Input {
                app.input_mode = InputMode::Editing;
                app.question_cursor = app.question_input.chars().count();
            }
        }

        // Viewer tabs
        KeyCode::Char('1') => app.select_tab(Tab::Slides),
        KeyCode::Char('2') => app.select_tab(Tab::Overview),
        KeyCode::Char('3') => app.select_tab(Tab::Documents),
        KeyCode::Char('h') | KeyCode::Left => {
            if app.focus == FocusPane::Viewer {
                app.prev_tab();
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == FocusPane::Viewer {
                app.next_tab();
            }
        }

        // Navigation / scrolling
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Viewer => {
                if app.active_tab == Tab::Documents {
                    app.docs_nav_down();
                }
            }
            FocusPane::Chat => app.chat_scroll_down(1),
            FocusPane::Input => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Viewer => {
                if app.active_tab == Tab::Documents {
                    app.docs_nav_up();
                }
            }
            FocusPane::Chat => app.chat_scroll_up(1),
            FocusPane::Input => {}
        },
        KeyCode::Char('g') => {
            if app.focus == FocusPane::Chat {
                app.chat_scroll = 0;
            }
        }
        KeyCode::Char('G') => {
            if app.focus == FocusPane::Chat {
                app.scroll_chat_to_bottom();
            }
        }

        // Open the selected document (or the deck) externally
        KeyCode::Enter | KeyCode::Char('o') => {
            if app.focus == FocusPane::Viewer {
                match app.active_tab {
                    Tab::Slides => {
                        let _ = documents::open_external(documents::DECK_PATH);
                    }
                    Tab::Documents => {
                        if let Some(doc) = app.selected_document() {
                            let _ = documents::open_external(doc.path);
                        }
                    }
                    Tab::Overview => {}
                }
            }
        }

        // Copy a document path so it can be dropped elsewhere
        KeyCode::Char('y') => {
            if app.focus == FocusPane::Viewer {
                match app.active_tab {
                    Tab::Slides => documents::copy_path_to_clipboard(documents::DECK_PATH),
                    Tab::Documents => {
                        if let Some(doc) = app.selected_document() {
                            documents::copy_path_to_clipboard(doc.path);
                        }
                    }
                    Tab::Overview => {}
                }
            }
        }

        // Fullscreen toggle, slides frame only
        KeyCode::Char('f') => app.toggle_fullscreen(),

        // Upload the pending file
        KeyCode::Char('u') => {
            if app.chat_open {
                start_upload(app);
            }
        }

        // Pick a file by path
        KeyCode::Char('p') => {
            if app.chat_open {
                app.open_file_input();
            }
        }

        // Jump into the question input
        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Char('/') => {
            if app.chat_open && !app.slides_fullscreen_active() {
                app.focus = FocusPane::Input;
                app.input_mode = InputMode::Editing;
                app.question_cursor = app.question_input.chars().count();
            }
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            start_ask(app);
        }
        KeyCode::Backspace => {
            if app.question_cursor > 0 {
                app.question_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.question_input, app.question_cursor);
                app.question_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.question_input.chars().count();
            if app.question_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.question_input, app.question_cursor);
                app.question_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.question_cursor = app.question_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.question_input.chars().count();
            app.question_cursor = (app.question_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.question_cursor = 0;
        }
        KeyCode::End => {
            app.question_cursor = app.question_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.question_input, app.question_cursor);
            app.question_input.insert(byte_pos, c);
            app.question_cursor += 1;
        }
        _ => {}
    }
}

fn handle_file_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_file_input(),
        KeyCode::Enter => app.accept_file_input(),
        KeyCode::Backspace => {
            if app.file_input_cursor > 0 {
                app.file_input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.file_input, app.file_input_cursor);
                app.file_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.file_input.chars().count();
            if app.file_input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.file_input, app.file_input_cursor);
                app.file_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.file_input_cursor = app.file_input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.file_input.chars().count();
            app.file_input_cursor = (app.file_input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.file_input_cursor = 0;
        }
        KeyCode::End => {
            app.file_input_cursor = app.file_input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.file_input, app.file_input_cursor);
            app.file_input.insert(byte_pos, c);
            app.file_input_cursor += 1;
        }
        _ => {}
    }
}

/// Submit the question input: append the user message and spawn the backend
/// request. A blank input or an active composing state is a no-op.
fn start_ask(app: &mut App) {
    let Some(question) = app.take_question() else {
        return;
    };

    let backend = app.backend.clone();
    let top_k = app.top_k;
    app.ask_task = Some(tokio::spawn(async move {
        backend.ask_question(&question, top_k).await
    }));
}

/// Upload the pending file, if any, as a background task.
fn start_upload(app: &mut App) {
    let Some(file) = app.take_upload() else {
        return;
    };

    let backend = app.backend.clone();
    let uploaded_by = app.uploaded_by.clone();
    app.upload_task = Some(tokio::spawn(async move {
        backend.upload_file(&file.path, &file.name, &uploaded_by).await
    }));
}

/// Pasted text routes to whichever input is active; otherwise it is treated
/// as a file dropped onto the terminal (drag-and-drop delivers the path via
/// bracketed paste).
fn handle_paste(app: &mut App, data: String) {
    if app.show_file_input {
        let byte_pos = char_to_byte_index(&app.file_input, app.file_input_cursor);
        app.file_input.insert_str(byte_pos, &data);
        app.file_input_cursor += data.chars().count();
        return;
    }

    if app.input_mode == InputMode::Editing {
        let byte_pos = char_to_byte_index(&app.question_input, app.question_cursor);
        app.question_input.insert_str(byte_pos, &data);
        app.question_cursor += data.chars().count();
        return;
    }

    if !app.chat_open {
        return;
    }

    // Exactly one dropped path arms the pending file; anything else is ignored
    let mut paths = data.lines().map(str::trim).filter(|l| !l.is_empty());
    if let (Some(path), None) = (paths.next(), paths.next()) {
        app.drop_file(PathBuf::from(path));
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_viewer = app.viewer_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_chat = app
        .chat_messages_area
        .map(|r| point_in_rect(x, y, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.chat_scroll_down(3);
            } else if in_viewer && app.active_tab == Tab::Documents {
                app.docs_nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.chat_scroll_up(3);
            } else if in_viewer && app.active_tab == Tab::Documents {
                app.docs_nav_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_to_byte_index_handles_multibyte_text() {
        let s = "naïve café";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 3), 3);
        // 'ï' is two bytes wide
        assert_eq!(char_to_byte_index(s, 4), 5);
        assert_eq!(char_to_byte_index(s, 100), s.len());
    }

    #[test]
    fn paste_with_one_path_arms_the_pending_file() {
        let mut app = App::new(&crate::config::Config::new());
        handle_paste(&mut app, "/home/me/handbook.docx\n".to_string());
        assert_eq!(app.pending_file.as_ref().unwrap().name, "handbook.docx");
    }

    #[test]
    fn paste_with_several_paths_is_ignored() {
        let mut app = App::new(&crate::config::Config::new());
        handle_paste(&mut app, "/a/one.pdf\n/b/two.pdf".to_string());
        assert!(app.pending_file.is_none());
    }

    #[test]
    fn paste_while_editing_inserts_into_the_question() {
        let mut app = App::new(&crate::config::Config::new());
        app.input_mode = InputMode::Editing;
        app.question_input = "leave".to_string();
        app.question_cursor = 0;

        handle_paste(&mut app, "annual ".to_string());
        assert_eq!(app.question_input, "annual leave");
        assert_eq!(app.question_cursor, 7);
    }
}
