//! Modal overlays and the single-slot manager that owns them.

use crossterm::event::KeyCode;
use geeta_core::{Bookmark, SearchHit, Theme};
use ratatui::widgets::ListState;

use crate::focus::{FocusController, PanelId};

/// Characters of verse text shown per search result.
pub const SNIPPET_LEN: usize = 100;

pub const HELP_TITLE: &str = "Geeta Keyboard Shortcuts";

/// Sections of the help overlay: heading, then `(key, action)` rows.
pub const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Arrow keys / j k", "Navigate lists / scroll scripture"),
            ("Tab", "Switch between panels"),
            ("Shift+Tab", "Switch panels (reverse)"),
            ("Enter", "Select item"),
        ],
    ),
    (
        "Actions",
        &[
            ("r", "Random verse"),
            ("s", "Search (select to navigate)"),
            ("b", "View bookmarks (select to navigate)"),
            ("a", "Add bookmark"),
            ("t", "Change theme"),
        ],
    ),
    (
        "Bookmarks",
        &[
            ("d", "Delete"),
            ("e", "Edit note"),
            ("K / J", "Move up / down"),
        ],
    ),
    (
        "Other",
        &[
            ("h", "Toggle help"),
            ("Esc / q", "Close menus"),
            ("Ctrl+C", "Quit"),
        ],
    ),
];

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Submit(String),
    Cancel,
}

/// Single-line text input with a character cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    input: String,
    cursor: usize,
}

impl Prompt {
    pub fn new(title: &'static str) -> Self {
        Self::with_text(title, "")
    }

    /// Prefilled, cursor at the end.
    pub fn with_text(title: &'static str, text: &str) -> Self {
        Self {
            title,
            input: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PromptOutcome {
        match code {
            KeyCode::Esc => return PromptOutcome::Cancel,
            KeyCode::Enter => return PromptOutcome::Submit(self.input.clone()),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Char(c) => {
                let byte_pos = char_to_byte_index(&self.input, self.cursor);
                self.input.insert(byte_pos, c);
                self.cursor += 1;
            }
            _ => {}
        }
        PromptOutcome::Editing
    }
}

/// `"<title> (<id>):<verse> - <snippet>"`, the snippet cut at 100 characters.
pub fn search_label(hit: &SearchHit) -> String {
    let reference = if hit.chapter_title.is_empty() {
        format!("Chapter {}:{}", hit.chapter, hit.verse)
    } else {
        format!("{} ({}):{}", hit.chapter_title, hit.chapter, hit.verse)
    };

    let snippet = if hit.text.chars().count() > SNIPPET_LEN {
        let cut: String = hit.text.chars().take(SNIPPET_LEN).collect();
        format!("{cut}...")
    } else {
        hit.text.clone()
    };
    format!("{reference} - {snippet}")
}

/// `"<n>. <reference>[ - <note>]"`, numbered from 1.
pub fn bookmark_label(index: usize, bookmark: &Bookmark) -> String {
    let mut label = format!("{}. {}", index + 1, bookmark.reference());
    if !bookmark.note.is_empty() {
        label.push_str(" - ");
        label.push_str(&bookmark.note);
    }
    label
}

fn list_state(selected: usize) -> ListState {
    ListState::default().with_selected(Some(selected))
}

/// Move a list cursor by `delta` rows, clamped to `len`.
pub fn step(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

/// The bookmarks overlay's working copy of the stored list.
#[derive(Debug, Clone)]
pub struct BookmarkList {
    items: Vec<Bookmark>,
    pub state: ListState,
    /// Note editor opened with `e`, pinned to the row it was opened on.
    editing: Option<(usize, Prompt)>,
}

impl BookmarkList {
    pub fn new(items: Vec<Bookmark>) -> Self {
        Self {
            items,
            state: list_state(0),
            editing: None,
        }
    }

    pub fn items(&self) -> &[Bookmark] {
        &self.items
    }

    pub fn labels(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, b)| bookmark_label(i, b))
            .collect()
    }

    pub fn selected(&self) -> Option<&Bookmark> {
        self.items.get(self.state.selected()?)
    }

    /// Remove the selected entry, keeping the cursor on a valid row.
    pub fn delete_selected(&mut self) -> Option<Bookmark> {
        let index = self.state.selected()?;
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        if self.items.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
        Some(removed)
    }

    /// Swap the selected entry with the one above it. No-op on the first row.
    pub fn move_up(&mut self) -> bool {
        match self.state.selected() {
            Some(index) if index > 0 && index < self.items.len() => {
                self.items.swap(index, index - 1);
                self.state.select(Some(index - 1));
                true
            }
            _ => false,
        }
    }

    /// Swap the selected entry with the one below it. No-op on the last row.
    pub fn move_down(&mut self) -> bool {
        match self.state.selected() {
            Some(index) if index + 1 < self.items.len() => {
                self.items.swap(index, index + 1);
                self.state.select(Some(index + 1));
                true
            }
            _ => false,
        }
    }

    pub fn editing(&self) -> Option<&Prompt> {
        self.editing.as_ref().map(|(_, prompt)| prompt)
    }

    pub fn begin_edit(&mut self) -> bool {
        let Some(index) = self.state.selected() else {
            return false;
        };
        let Some(note) = self.items.get(index).map(|b| b.note.clone()) else {
            return false;
        };
        self.editing = Some((index, Prompt::with_text("Edit Note", &note)));
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Finish the open edit, replacing the note of the row it started on.
    /// An empty note is allowed.
    pub fn set_note(&mut self, note: String) -> bool {
        let Some((index, _)) = self.editing.take() else {
            return false;
        };
        match self.items.get_mut(index) {
            Some(bookmark) => {
                bookmark.note = note;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    SearchPrompt(Prompt),
    SearchResults {
        query: String,
        hits: Vec<SearchHit>,
        state: ListState,
    },
    Bookmarks(BookmarkList),
    ThemePicker {
        state: ListState,
    },
    Help,
    /// Note prompt for a new bookmark on the shown verse.
    AddBookmark {
        prompt: Prompt,
        bookmark: Bookmark,
    },
}

impl Overlay {
    pub fn search_prompt() -> Self {
        Overlay::SearchPrompt(Prompt::new("Search"))
    }

    pub fn search_results(query: String, hits: Vec<SearchHit>) -> Self {
        Overlay::SearchResults {
            query,
            hits,
            state: list_state(0),
        }
    }

    pub fn theme_picker(active: Theme) -> Self {
        Overlay::ThemePicker {
            state: list_state(active.index()),
        }
    }

    pub fn add_bookmark(bookmark: Bookmark) -> Self {
        Overlay::AddBookmark {
            prompt: Prompt::new("Add Bookmark Note (optional)"),
            bookmark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Overlay::None => "none",
            Overlay::SearchPrompt(_) => "search prompt",
            Overlay::SearchResults { .. } => "search results",
            Overlay::Bookmarks(_) => "bookmarks",
            Overlay::ThemePicker { .. } => "theme picker",
            Overlay::Help => "help",
            Overlay::AddBookmark { .. } => "add bookmark",
        }
    }

    /// List rows and cursor, for overlays that show a list.
    pub fn list_rows(&self) -> Option<(Vec<String>, Option<usize>)> {
        match self {
            Overlay::SearchResults { hits, state, .. } => {
                Some((hits.iter().map(search_label).collect(), state.selected()))
            }
            Overlay::Bookmarks(list) => Some((list.labels(), list.state.selected())),
            Overlay::ThemePicker { state } => Some((
                Theme::ALL.iter().map(|t| t.display_name().to_string()).collect(),
                state.selected(),
            )),
            _ => None,
        }
    }

    /// The text input currently taking keys, if any.
    pub fn prompt_mut(&mut self) -> Option<&mut Prompt> {
        match self {
            Overlay::SearchPrompt(prompt) | Overlay::AddBookmark { prompt, .. } => Some(prompt),
            Overlay::Bookmarks(list) => list.editing.as_mut().map(|(_, prompt)| prompt),
            _ => None,
        }
    }

    pub fn list_state(&self) -> Option<&ListState> {
        match self {
            Overlay::SearchResults { state, .. } | Overlay::ThemePicker { state } => Some(state),
            Overlay::Bookmarks(list) => Some(&list.state),
            _ => None,
        }
    }

    /// Mutable list cursor, when the overlay has one.
    pub fn list_state_mut(&mut self) -> Option<&mut ListState> {
        match self {
            Overlay::SearchResults { state, .. } | Overlay::ThemePicker { state } => Some(state),
            Overlay::Bookmarks(list) => Some(&mut list.state),
            _ => None,
        }
    }

    pub fn list_len(&self) -> usize {
        match self {
            Overlay::SearchResults { hits, .. } => hits.len(),
            Overlay::Bookmarks(list) => list.items().len(),
            Overlay::ThemePicker { .. } => Theme::ALL.len(),
            _ => 0,
        }
    }
}

/// Holds at most one overlay and the panel to give focus back to.
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlay: Overlay,
    return_panel: Option<PanelId>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Overlay {
        &self.overlay
    }

    pub fn current_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.overlay, Overlay::None)
    }

    pub fn return_panel(&self) -> Option<PanelId> {
        self.return_panel
    }

    /// Show `overlay` and capture input. Refused while another overlay is up.
    pub fn open(&mut self, overlay: Overlay, focus: &mut FocusController) -> bool {
        if self.is_active() || matches!(overlay, Overlay::None) {
            return false;
        }
        log::debug!("opening {} overlay", overlay.name());
        self.return_panel = focus.capture();
        self.overlay = overlay;
        true
    }

    /// Swap the active overlay for the next step of the same flow.
    pub fn replace(&mut self, overlay: Overlay) {
        if self.is_active() {
            self.overlay = overlay;
        }
    }

    /// Dismiss the overlay and hand focus back. Returns the focused panel.
    pub fn close(&mut self, focus: &mut FocusController) -> PanelId {
        let closed = std::mem::take(&mut self.overlay);
        let to = self.return_panel.take().unwrap_or(PanelId::Chapters);
        log::debug!("closed {} overlay, focus back to {}", closed.name(), to.name());
        focus.release(to);
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmarks(n: u32) -> Vec<Bookmark> {
        (1..=n).map(|v| Bookmark::new(2, v, format!("note {v}"), "Contents")).collect()
    }

    fn sorted(mut list: Vec<Bookmark>) -> Vec<Bookmark> {
        list.sort_by_key(|b| (b.chapter, b.verse));
        list
    }

    #[test]
    fn prompt_edits_by_character() {
        let mut prompt = Prompt::new("Search");
        for c in "gīta".chars() {
            prompt.handle_key(KeyCode::Char(c));
        }
        prompt.handle_key(KeyCode::Left);
        prompt.handle_key(KeyCode::Left);
        prompt.handle_key(KeyCode::Backspace);
        assert_eq!(prompt.text(), "gta");
        assert_eq!(prompt.cursor(), 1);

        prompt.handle_key(KeyCode::Home);
        prompt.handle_key(KeyCode::Delete);
        prompt.handle_key(KeyCode::End);
        prompt.handle_key(KeyCode::Char('!'));
        assert_eq!(prompt.handle_key(KeyCode::Enter), PromptOutcome::Submit("ta!".into()));
        assert_eq!(prompt.handle_key(KeyCode::Esc), PromptOutcome::Cancel);
    }

    #[test]
    fn search_label_truncates_long_text() {
        let hit = SearchHit {
            chapter: 2,
            chapter_title: "Contents of the Gītā Summarized".into(),
            verse: 47,
            text: "x".repeat(150),
        };
        let label = search_label(&hit);
        assert!(label.starts_with("Contents of the Gītā Summarized (2):47 - "));
        assert!(label.ends_with(&format!("{}...", "x".repeat(100))));

        let short = SearchHit {
            chapter_title: String::new(),
            text: "You have a right to perform".into(),
            ..hit
        };
        assert_eq!(search_label(&short), "Chapter 2:47 - You have a right to perform");
    }

    #[test]
    fn bookmark_labels_are_numbered() {
        let mut b = Bookmark::new(18, 66, "", "Conclusion");
        assert_eq!(bookmark_label(0, &b), "1. Conclusion (18):66");
        b.note = "surrender".into();
        assert_eq!(bookmark_label(4, &b), "5. Conclusion (18):66 - surrender");
    }

    #[test]
    fn delete_removes_exactly_one_and_clamps() {
        let original = bookmarks(3);
        let mut list = BookmarkList::new(original.clone());
        list.state.select(Some(2));

        let removed = list.delete_selected().unwrap();
        assert_eq!(removed, original[2]);
        assert_eq!(list.items(), &original[..2]);
        assert_eq!(list.state.selected(), Some(1));

        list.delete_selected();
        list.delete_selected();
        assert!(list.items().is_empty());
        assert_eq!(list.state.selected(), None);
        assert!(list.delete_selected().is_none());
    }

    #[test]
    fn moves_are_adjacent_swaps() {
        let original = bookmarks(4);
        let mut list = BookmarkList::new(original.clone());

        assert!(!list.move_up());
        assert!(list.move_down());
        assert_eq!(list.state.selected(), Some(1));
        assert_eq!(list.items()[0], original[1]);
        assert_eq!(list.items()[1], original[0]);
        assert_eq!(&list.items()[2..], &original[2..]);

        list.state.select(Some(3));
        assert!(!list.move_down());
        assert!(list.move_up());
        assert_eq!(list.state.selected(), Some(2));
        assert_eq!(sorted(list.items().to_vec()), sorted(original));
    }

    #[test]
    fn note_edit_changes_only_the_selected_note() {
        let original = bookmarks(2);
        let mut list = BookmarkList::new(original.clone());
        list.state.select(Some(1));
        assert!(list.begin_edit());
        assert_eq!(list.editing().map(Prompt::text), Some("note 2"));

        assert!(list.set_note(String::new()));
        assert!(list.editing().is_none());
        assert_eq!(list.items()[0], original[0]);
        assert_eq!(list.items()[1].note, "");
        assert_eq!(list.items()[1].verse, original[1].verse);
        assert!(!list.set_note("again".into()));
    }

    #[test]
    fn note_edit_stays_on_its_row_when_the_cursor_moves() {
        let original = bookmarks(3);
        let mut list = BookmarkList::new(original.clone());
        assert!(list.begin_edit());
        list.state.select(Some(2));

        assert!(list.set_note("edited".into()));
        assert_eq!(list.items()[0].note, "edited");
        assert_eq!(list.items()[2], original[2]);
    }

    #[test]
    fn one_overlay_at_a_time_and_focus_returns() {
        let mut focus = FocusController::new(PanelId::Verses);
        let mut overlays = OverlayManager::new();

        assert!(overlays.open(Overlay::Help, &mut focus));
        assert_eq!(focus.focused(), None);
        assert!(!overlays.open(Overlay::search_prompt(), &mut focus));
        assert!(matches!(overlays.current(), Overlay::Help));

        assert_eq!(overlays.close(&mut focus), PanelId::Verses);
        assert!(!overlays.is_active());
        assert_eq!(focus.focused(), Some(PanelId::Verses));
    }

    #[test]
    fn close_without_return_panel_focuses_chapters() {
        let mut focus = FocusController::new(PanelId::Content);
        // nothing is focused when the overlay opens
        focus.capture();
        let mut overlays = OverlayManager::new();
        assert!(overlays.open(Overlay::theme_picker(Theme::Bhima), &mut focus));
        assert_eq!(overlays.return_panel(), None);
        assert_eq!(overlays.close(&mut focus), PanelId::Chapters);
    }

    #[test]
    fn theme_picker_starts_on_active_theme() {
        let overlay = Overlay::theme_picker(Theme::Nakula);
        let (rows, selected) = overlay.list_rows().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(selected, Some(Theme::Nakula.index()));
        assert_eq!(rows[Theme::Nakula.index()], Theme::Nakula.display_name());
    }

    #[test]
    fn step_clamps() {
        let mut state = list_state(0);
        step(&mut state, 3, -1);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 3, 10);
        assert_eq!(state.selected(), Some(2));
        step(&mut state, 0, 1);
        assert_eq!(state.selected(), None);
    }
}
