use std::path::PathBuf;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::backend::{Answer, BackendClient, BackendError, UploadReceipt};
use crate::config::Config;
use crate::documents::{DocEntry, SAMPLE_DOCUMENTS};
use crate::reveal::Reveal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Slides,
    Overview,
    Documents,
}

impl Tab {
    pub fn all() -> [Tab; 3] {
        [Tab::Slides, Tab::Overview, Tab::Documents]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Slides => "Slides",
            Tab::Overview => "Overview",
            Tab::Documents => "Documents",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Slides => 0,
            Tab::Overview => 1,
            Tab::Documents => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Viewer,
    Chat,
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A user-selected file waiting to be uploaded. At most one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
}

const GREETING: &str = "👋 Hi! I'm your document assistant. Upload your policies, handbooks, \
or manuals, then ask me anything about them.";

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Document viewer state
    pub active_tab: Tab,
    pub slides_fullscreen: bool,
    pub documents_state: ListState,

    // Chat state
    pub chat_open: bool,
    pub messages: Vec<ChatMessage>,
    pub question_input: String,
    pub question_cursor: usize,
    pub composing: bool,
    pub reveal: Option<Reveal>,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Upload state
    pub pending_file: Option<PendingFile>,
    pub upload_status: String,
    pub drop_highlight: bool,

    // File path overlay (explicit "choose a file" affordance)
    pub show_file_input: bool,
    pub file_input: String,
    pub file_input_cursor: usize,

    // In-flight backend tasks
    pub ask_task: Option<JoinHandle<Result<Answer, BackendError>>>,
    pub upload_task: Option<JoinHandle<Result<UploadReceipt, BackendError>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub viewer_area: Option<Rect>,
    pub chat_messages_area: Option<Rect>,

    // Backend
    pub backend: BackendClient,
    pub uploaded_by: String,
    pub top_k: u32,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let backend = BackendClient::new(&config.backend_url());

        let mut documents_state = ListState::default();
        if !SAMPLE_DOCUMENTS.is_empty() {
            documents_state.select(Some(0));
        }

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Viewer,

            active_tab: Tab::Slides,
            slides_fullscreen: false,
            documents_state,

            chat_open: true,
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                text: GREETING.to_string(),
            }],
            question_input: String::new(),
            question_cursor: 0,
            composing: false,
            reveal: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            pending_file: None,
            upload_status: String::new(),
            drop_highlight: false,

            show_file_input: false,
            file_input: String::new(),
            file_input_cursor: 0,

            ask_task: None,
            upload_task: None,

            animation_frame: 0,

            viewer_area: None,
            chat_messages_area: None,

            backend,
            uploaded_by: config.uploaded_by(),
            top_k: config.top_k(),
        }
    }

    // Send flow

    /// Take the trimmed question for submission, appending it as a user
    /// message and entering the composing state. Returns None (and changes
    /// nothing) when the input is blank or an answer is still composing.
    pub fn take_question(&mut self) -> Option<String> {
        if self.composing {
            return None;
        }
        let question = self.question_input.trim().to_string();
        if question.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: question.clone(),
        });
        self.question_input.clear();
        self.question_cursor = 0;
        self.composing = true;
        self.scroll_chat_to_bottom();

        Some(question)
    }

    /// Apply the result of a finished ask request. Success appends an empty
    /// assistant placeholder and starts the reveal; failure appends the error
    /// as an assistant message and leaves composing immediately.
    pub fn settle_ask(&mut self, result: Result<Answer, BackendError>) {
        match result {
            Ok(answer) => {
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    text: String::new(),
                });
                self.reveal = Some(Reveal::new(&answer.answer));
            }
            Err(err) => {
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    text: format!("⚠️ {}", err),
                });
                self.composing = false;
            }
        }
        self.scroll_chat_to_bottom();
    }

    /// Advance the reveal by one word, replacing the text of the trailing
    /// message. Only the last element of the sequence is ever mutated, and
    /// only while composing. Clears the composing state once every word is
    /// shown.
    pub fn step_reveal(&mut self) {
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };

        if let Some(prefix) = reveal.advance() {
            if let Some(last) = self.messages.last_mut() {
                last.text = prefix;
            }
        }

        if self.reveal.as_ref().is_some_and(Reveal::is_done) {
            self.reveal = None;
            self.composing = false;
        }

        self.scroll_chat_to_bottom();
    }

    // Upload flow

    /// Validate the pending file for upload and set the transient status.
    /// Returns the file to send, or None when nothing is selected or an
    /// upload is already in flight.
    pub fn take_upload(&mut self) -> Option<PendingFile> {
        if self.upload_task.is_some() {
            return None;
        }
        let Some(file) = self.pending_file.clone() else {
            self.upload_status = "⚠️ Please select or drop a file".to_string();
            return None;
        };

        self.upload_status = "📤 Uploading...".to_string();
        Some(file)
    }

    /// Apply the result of a finished upload. Success clears the selection;
    /// failure keeps it so the user can retry.
    pub fn settle_upload(&mut self, result: Result<UploadReceipt, BackendError>) {
        match result {
            Ok(receipt) => {
                self.upload_status = format!("✅ Uploaded: {}", receipt.filename);
                self.pending_file = None;
            }
            Err(err) => {
                self.upload_status = format!("❌ Upload failed: {}", err);
            }
        }
    }

    /// Store a file dropped onto the terminal (or accepted from the path
    /// overlay) as the pending upload. No request is made until the upload
    /// action is triggered explicitly.
    pub fn drop_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.upload_status = format!("📥 File ready: {}", name);
        self.pending_file = Some(PendingFile { path, name });
        self.drop_highlight = false;
    }

    // File path overlay

    pub fn open_file_input(&mut self) {
        self.show_file_input = true;
        self.file_input.clear();
        self.file_input_cursor = 0;
        self.drop_highlight = true;
    }

    pub fn close_file_input(&mut self) {
        self.show_file_input = false;
        self.file_input.clear();
        self.file_input_cursor = 0;
        self.drop_highlight = false;
    }

    /// Accept the typed path from the overlay as the pending file.
    pub fn accept_file_input(&mut self) {
        let path = self.file_input.trim().to_string();
        if !path.is_empty() {
            self.drop_file(PathBuf::from(path));
        }
        self.close_file_input();
    }

    // Chat panel

    pub fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
        if !self.chat_open {
            self.focus = FocusPane::Viewer;
            self.input_mode = InputMode::Normal;
        }
    }

    /// Recompute the chat scroll offset so the newest line is visible.
    /// Called whenever the message sequence changes.
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // Role line ("You:" or "AI:")
            for line in msg.text.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.composing && self.reveal.is_none() {
            total_lines += 2; // "AI:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }

    pub fn chat_scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn chat_scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    // Document viewer

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let next = (self.active_tab.index() + 1) % tabs.len();
        self.active_tab = tabs[next];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let prev = (self.active_tab.index() + tabs.len() - 1) % tabs.len();
        self.active_tab = tabs[prev];
    }

    /// Fullscreen applies to the slides frame only. Entering it hides the
    /// chat panel, so focus snaps back to the viewer.
    pub fn toggle_fullscreen(&mut self) {
        if self.active_tab == Tab::Slides {
            self.slides_fullscreen = !self.slides_fullscreen;
            if self.slides_fullscreen {
                self.focus = FocusPane::Viewer;
                self.input_mode = InputMode::Normal;
            }
        }
    }

    pub fn slides_fullscreen_active(&self) -> bool {
        self.slides_fullscreen && self.active_tab == Tab::Slides
    }

    pub fn docs_nav_down(&mut self) {
        let len = SAMPLE_DOCUMENTS.len();
        if len > 0 {
            let i = self.documents_state.selected().unwrap_or(0);
            self.documents_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn docs_nav_up(&mut self) {
        let i = self.documents_state.selected().unwrap_or(0);
        self.documents_state.select(Some(i.saturating_sub(1)));
    }

    pub fn selected_document(&self) -> Option<&'static DocEntry> {
        self.documents_state
            .selected()
            .and_then(|i| SAMPLE_DOCUMENTS.get(i))
    }

    // Animation

    /// Tick animation frame (called by the animation tick event)
    pub fn tick_animation(&mut self) {
        if self.composing {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(&Config::new())
    }

    fn last_message(app: &App) -> &ChatMessage {
        app.messages.last().expect("message list is empty")
    }

    #[test]
    fn starts_with_a_greeting_and_idle_state() {
        let app = test_app();
        assert_eq!(app.messages.len(), 1);
        assert_eq!(last_message(&app).role, ChatRole::Assistant);
        assert!(!app.composing);
        assert!(app.pending_file.is_none());
    }

    #[test]
    fn submit_appends_exactly_one_trimmed_user_message() {
        let mut app = test_app();
        let before = app.messages.len();

        app.question_input = "  What is the leave policy?  ".to_string();
        let question = app.take_question().unwrap();

        assert_eq!(question, "What is the leave policy?");
        assert_eq!(app.messages.len(), before + 1);
        assert_eq!(last_message(&app).role, ChatRole::User);
        assert_eq!(last_message(&app).text, "What is the leave policy?");
        assert!(app.question_input.is_empty());
        assert!(app.composing);
    }

    #[test]
    fn blank_submit_changes_nothing() {
        let mut app = test_app();
        let before = app.messages.clone();

        app.question_input = "   \t ".to_string();
        assert!(app.take_question().is_none());

        assert_eq!(app.messages, before);
        assert!(!app.composing);
    }

    #[test]
    fn submit_is_rejected_while_composing() {
        let mut app = test_app();
        app.question_input = "first".to_string();
        app.take_question().unwrap();

        app.question_input = "second".to_string();
        assert!(app.take_question().is_none());
        // The attempted question stays in the input
        assert_eq!(app.question_input, "second");
    }

    #[test]
    fn successful_answer_is_revealed_word_by_word() {
        let mut app = test_app();
        app.question_input = "What is the leave policy?".to_string();
        app.take_question().unwrap();

        app.settle_ask(Ok(Answer {
            answer: "You get 20 days per year.".to_string(),
        }));

        // Placeholder appended, still composing
        assert_eq!(last_message(&app).role, ChatRole::Assistant);
        assert_eq!(last_message(&app).text, "");
        assert!(app.composing);

        app.step_reveal();
        assert_eq!(last_message(&app).text, "You");
        assert!(app.composing);

        while app.reveal.is_some() {
            app.step_reveal();
        }

        assert_eq!(last_message(&app).text, "You get 20 days per year.");
        assert!(!app.composing);
    }

    #[test]
    fn reveal_only_mutates_the_trailing_message() {
        let mut app = test_app();
        app.question_input = "q".to_string();
        app.take_question().unwrap();
        let frozen: Vec<ChatMessage> = app.messages.clone();

        app.settle_ask(Ok(Answer {
            answer: "a b c".to_string(),
        }));
        while app.reveal.is_some() {
            app.step_reveal();
        }

        assert_eq!(&app.messages[..frozen.len()], &frozen[..]);
    }

    #[test]
    fn failed_question_appends_warning_and_returns_to_idle() {
        let mut app = test_app();
        app.question_input = "anything".to_string();
        app.take_question().unwrap();
        let before = app.messages.len();

        app.settle_ask(Err(BackendError::Query("timeout".to_string())));

        assert_eq!(app.messages.len(), before + 1);
        assert_eq!(last_message(&app).role, ChatRole::Assistant);
        assert_eq!(last_message(&app).text, "⚠️ timeout");
        assert!(!app.composing);
        assert!(app.reveal.is_none());
    }

    #[test]
    fn upload_without_selection_sets_status_and_sends_nothing() {
        let mut app = test_app();
        assert!(app.take_upload().is_none());
        assert_eq!(app.upload_status, "⚠️ Please select or drop a file");
    }

    #[test]
    fn successful_upload_clears_pending_file() {
        let mut app = test_app();
        app.drop_file(PathBuf::from("/tmp/policy.pdf"));

        let file = app.take_upload().unwrap();
        assert_eq!(file.name, "policy.pdf");
        assert_eq!(app.upload_status, "📤 Uploading...");

        app.settle_upload(Ok(UploadReceipt {
            filename: "policy.pdf".to_string(),
        }));
        assert_eq!(app.upload_status, "✅ Uploaded: policy.pdf");
        assert!(app.pending_file.is_none());
    }

    #[test]
    fn failed_upload_keeps_pending_file_for_retry() {
        let mut app = test_app();
        app.drop_file(PathBuf::from("/tmp/policy.pdf"));
        let selected = app.pending_file.clone();

        app.take_upload().unwrap();
        app.settle_upload(Err(BackendError::Upload("too large".to_string())));

        assert_eq!(app.upload_status, "❌ Upload failed: too large");
        assert_eq!(app.pending_file, selected);
    }

    #[test]
    fn dropping_a_file_arms_it_without_a_request() {
        let mut app = test_app();
        app.drop_file(PathBuf::from("/home/me/handbook.docx"));

        let pending = app.pending_file.as_ref().unwrap();
        assert_eq!(pending.name, "handbook.docx");
        assert_eq!(app.upload_status, "📥 File ready: handbook.docx");
        assert!(app.upload_task.is_none());
    }

    #[test]
    fn end_to_end_drop_upload_ask_reveal() {
        let mut app = test_app();

        // Drop and upload
        app.drop_file(PathBuf::from("/home/me/handbook.docx"));
        assert_eq!(app.upload_status, "📥 File ready: handbook.docx");
        app.take_upload().unwrap();
        app.settle_upload(Ok(UploadReceipt {
            filename: "handbook.docx".to_string(),
        }));
        assert_eq!(app.upload_status, "✅ Uploaded: handbook.docx");

        // Ask and reveal
        app.question_input = "What is the leave policy?".to_string();
        app.take_question().unwrap();
        assert_eq!(last_message(&app).text, "What is the leave policy?");

        app.settle_ask(Ok(Answer {
            answer: "You get 20 days per year.".to_string(),
        }));
        while app.reveal.is_some() {
            app.step_reveal();
        }

        assert_eq!(last_message(&app).text, "You get 20 days per year.");
        assert!(!app.composing);
    }

    #[test]
    fn empty_answer_finishes_on_first_step() {
        let mut app = test_app();
        app.question_input = "q".to_string();
        app.take_question().unwrap();
        app.settle_ask(Ok(Answer {
            answer: String::new(),
        }));

        app.step_reveal();
        assert_eq!(last_message(&app).text, "");
        assert!(!app.composing);
    }

    #[test]
    fn fullscreen_is_scoped_to_the_slides_tab() {
        let mut app = test_app();

        app.select_tab(Tab::Overview);
        app.toggle_fullscreen();
        assert!(!app.slides_fullscreen);

        app.select_tab(Tab::Slides);
        app.toggle_fullscreen();
        assert!(app.slides_fullscreen_active());

        // Switching tabs swaps content only; the flag stays but no longer applies
        app.select_tab(Tab::Documents);
        assert!(!app.slides_fullscreen_active());
    }

    #[test]
    fn tab_cycling_wraps_both_ways() {
        let mut app = test_app();
        assert_eq!(app.active_tab, Tab::Slides);
        app.next_tab();
        assert_eq!(app.active_tab, Tab::Overview);
        app.next_tab();
        assert_eq!(app.active_tab, Tab::Documents);
        app.next_tab();
        assert_eq!(app.active_tab, Tab::Slides);
        app.prev_tab();
        assert_eq!(app.active_tab, Tab::Documents);
    }

    #[test]
    fn closing_the_chat_returns_focus_to_the_viewer() {
        let mut app = test_app();
        app.focus = FocusPane::Input;
        app.input_mode = InputMode::Editing;

        app.toggle_chat();
        assert!(!app.chat_open);
        assert_eq!(app.focus, FocusPane::Viewer);
        assert_eq!(app.input_mode, InputMode::Normal);

        app.toggle_chat();
        assert!(app.chat_open);
    }

    #[test]
    fn file_overlay_accept_arms_the_typed_path() {
        let mut app = test_app();
        app.open_file_input();
        assert!(app.drop_highlight);

        app.file_input = " /srv/docs/policy.pdf ".to_string();
        app.accept_file_input();

        assert!(!app.show_file_input);
        assert!(!app.drop_highlight);
        assert_eq!(app.pending_file.as_ref().unwrap().name, "policy.pdf");
    }

    #[test]
    fn animation_only_advances_while_composing() {
        let mut app = test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.question_input = "q".to_string();
        app.take_question().unwrap();
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }
}
