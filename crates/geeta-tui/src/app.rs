use std::time::Instant;

use geeta_core::{load_theme, Bookmark, BookmarkStore, ConfigStore, Library, Theme};
use rand::Rng;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::ListState;

use crate::content::{self, BORDER_ALLOWANCE};
use crate::focus::{FocusController, PanelId};
use crate::overlay::{self, BookmarkList, Overlay, OverlayManager};
use crate::selection::SelectionModel;
use crate::theme::Appearance;
use crate::ticker::AutoScrollTicker;

pub const WELCOME: &str = "Navigate chapters and verses - Press 'h' for help";
pub const NO_CHAPTERS: &str = "No chapters loaded";
pub const NO_RESULTS: &str = "No results found";
pub const NO_BOOKMARKS: &str = "No bookmarks found";
pub const ALL_BOOKMARKS_DELETED: &str = "All bookmarks deleted";
pub const NO_VERSE_SELECTED: &str = "No verse selected. Please select a verse first.";

pub struct App {
    // Core state
    pub should_quit: bool,
    pub library: Library,
    pub focus: FocusController,
    pub selection: SelectionModel,
    pub overlays: OverlayManager,
    pub ticker: AutoScrollTicker,
    pub theme: Theme,
    pub appearance: Appearance,
    pub status: String,

    // Primary content, kept across overlays
    pub content: Text<'static>,
    pub content_scroll: u16,
    pub content_height: u16,
    /// Outer width of the scripture panel.
    pub content_panel_width: u16,

    // List cursors
    pub chapter_state: ListState,
    pub verse_state: ListState,
    /// Columns left for a chapter label after borders and the highlight symbol.
    pub chapter_text_width: u16,

    // Panel areas for mouse hit-testing (updated during render)
    pub chapters_area: Option<Rect>,
    pub verses_area: Option<Rect>,
    pub content_area: Option<Rect>,
    pub overlay_list_area: Option<Rect>,

    config: Box<dyn ConfigStore>,
    bookmarks: Box<dyn BookmarkStore>,
}

impl App {
    pub fn new(
        library: Library,
        config: Box<dyn ConfigStore>,
        bookmarks: Box<dyn BookmarkStore>,
    ) -> Self {
        let theme = load_theme(config.as_ref());
        let focus = FocusController::new(PanelId::Chapters);
        let appearance = Appearance::new(theme, &focus);

        let mut app = Self {
            should_quit: false,
            library,
            focus,
            selection: SelectionModel::new(),
            overlays: OverlayManager::new(),
            ticker: AutoScrollTicker::new(),
            theme,
            appearance,
            status: WELCOME.to_string(),
            content: Text::default(),
            content_scroll: 0,
            content_height: 0,
            content_panel_width: 0,
            chapter_state: ListState::default(),
            verse_state: ListState::default(),
            chapter_text_width: 0,
            chapters_area: None,
            verses_area: None,
            content_area: None,
            overlay_list_area: None,
            config,
            bookmarks,
        };

        if app.library.is_empty() {
            app.status = NO_CHAPTERS.to_string();
        } else if app.selection.select_chapter(app.library.chapters(), 0) {
            app.chapter_state.select(Some(0));
            app.verse_state.select(Some(0));
            app.refresh_content();
        }
        app
    }

    // Layout, reported by the renderer

    /// Record panel sizes. Re-renders content and re-arms the marquee when
    /// they change.
    pub fn set_layout(
        &mut self,
        chapter_text_width: u16,
        content_panel_width: u16,
        content_height: u16,
    ) {
        self.content_height = content_height;
        if content_panel_width != self.content_panel_width {
            self.content_panel_width = content_panel_width;
            self.refresh_content();
        }
        if chapter_text_width != self.chapter_text_width {
            self.chapter_text_width = chapter_text_width;
            self.restart_ticker(Instant::now());
        }
    }

    fn available_width(&self) -> usize {
        self.content_panel_width.saturating_sub(BORDER_ALLOWANCE) as usize
    }

    /// Re-render the current selection with the active palette.
    pub fn refresh_content(&mut self) {
        self.content = self
            .selection
            .render(&self.library, self.available_width(), &self.appearance.palette);
    }

    /// Rows the content occupies once wrapped to the panel.
    pub fn total_content_lines(&self) -> u16 {
        let width = self.content_panel_width.saturating_sub(2);
        let rows = content::wrapped_height(&self.content, width);
        rows.min(u16::MAX as usize) as u16
    }

    // Focus and marquee

    fn cursor_label(&self) -> Option<String> {
        let index = self.chapter_state.selected()?;
        self.library.chapters().get(index).map(|c| c.label())
    }

    /// The chapter row as drawn, scrolled when it is the cursor row.
    pub fn chapter_row(&self, index: usize) -> String {
        let Some(chapter) = self.library.chapters().get(index) else {
            return String::new();
        };
        let label = chapter.label();
        if self.chapter_state.selected() == Some(index) {
            self.ticker.window(&label, self.chapter_text_width as usize)
        } else {
            label
        }
    }

    fn restart_ticker(&mut self, now: Instant) {
        let focused = self.focus.is_focused(PanelId::Chapters);
        match self.cursor_label() {
            Some(label) => {
                self.ticker
                    .reset_for_selection(now, &label, self.chapter_text_width as usize, focused)
            }
            None => self.ticker.cancel(),
        }
    }

    /// Restyle panels and start or stop the marquee after any focus change.
    fn focus_changed(&mut self) {
        self.appearance = Appearance::new(self.theme, &self.focus);
        self.restart_ticker(Instant::now());
    }

    pub fn focus_panel(&mut self, id: PanelId) {
        if self.focus.focus(id) {
            self.focus_changed();
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let moved = if forward {
            self.focus.cycle_forward()
        } else {
            self.focus.cycle_backward()
        };
        if moved {
            self.focus_changed();
        }
    }

    /// Timer deadline reached. Returns `true` if the frame needs redrawing.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        match self.cursor_label() {
            Some(label) => self.ticker.tick(now, &label, self.chapter_text_width as usize),
            None => {
                self.ticker.cancel();
                false
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.ticker.cancel();
        self.should_quit = true;
    }

    // Chapters panel

    pub fn move_chapter_cursor(&mut self, delta: isize) {
        let before = self.chapter_state.selected();
        overlay::step(&mut self.chapter_state, self.library.chapters().len(), delta);
        if self.chapter_state.selected() != before {
            self.restart_ticker(Instant::now());
        }
    }

    pub fn chapter_cursor_to(&mut self, index: usize) {
        let len = self.library.chapters().len();
        if index < len && self.chapter_state.selected() != Some(index) {
            self.chapter_state.select(Some(index));
            self.restart_ticker(Instant::now());
        }
    }

    /// Show chapter `index` in full.
    pub fn select_chapter(&mut self, index: usize) -> bool {
        if !self.selection.select_chapter(self.library.chapters(), index) {
            return false;
        }
        self.chapter_cursor_to(index);
        self.verse_state.select(Some(0));
        self.content_scroll = 0;
        self.refresh_content();
        if let Some(status) = self.selection.chapter_status(&self.library) {
            self.status = status;
        }
        true
    }

    /// Enter on the chapters panel: select the cursor row and move to verses.
    pub fn activate_chapter(&mut self) {
        let Some(index) = self.chapter_state.selected() else {
            return;
        };
        if self.select_chapter(index) {
            self.focus_panel(PanelId::Verses);
        }
    }

    // Verses panel

    pub fn move_verse_cursor(&mut self, delta: isize) {
        overlay::step(&mut self.verse_state, self.selection.verse_items().len(), delta);
    }

    pub fn verse_cursor_to(&mut self, index: usize) {
        if index < self.selection.verse_items().len() {
            self.verse_state.select(Some(index));
        }
    }

    /// Apply a verse-picker row (0 is the whole chapter).
    pub fn select_verse(&mut self, list_index: usize) -> bool {
        if !self.selection.select_verse(self.library.chapters(), list_index) {
            return false;
        }
        self.verse_state.select(Some(list_index));
        self.content_scroll = 0;
        self.refresh_content();
        if let Some(status) = self.selection.verse_status(self.library.chapters()) {
            self.status = status;
        }
        true
    }

    pub fn activate_verse(&mut self) {
        if let Some(index) = self.verse_state.selected() {
            self.select_verse(index);
        }
    }

    /// Jump to a verse by chapter id and verse number.
    pub fn go_to(&mut self, chapter_id: u32, verse_number: u32) -> bool {
        let Some(chapter_index) = self.library.position_of(chapter_id) else {
            return false;
        };
        if !self.select_chapter(chapter_index) {
            return false;
        }
        let position = self.library.chapters()[chapter_index].verse_position(verse_number);
        match position {
            Some(position) => self.select_verse(position + 1),
            None => true,
        }
    }

    pub fn random_verse(&mut self) {
        let chapters = self.library.chapters();
        if chapters.is_empty() {
            return;
        }
        let mut rng = rand::rng();
        let chapter_index = rng.random_range(0..chapters.len());
        let verse_count = chapters[chapter_index].verses.len();
        if verse_count == 0 {
            return;
        }
        let verse_index = rng.random_range(0..verse_count);

        if self.select_chapter(chapter_index) {
            self.select_verse(verse_index + 1);
        }
    }

    // Scripture panel

    fn max_scroll(&self) -> u16 {
        self.total_content_lines().saturating_sub(self.content_height)
    }

    pub fn scroll_down(&mut self) {
        if self.content_scroll < self.max_scroll() {
            self.content_scroll = self.content_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.content_height / 2;
        self.content_scroll = (self.content_scroll + half_page).min(self.max_scroll());
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.content_height / 2;
        self.content_scroll = self.content_scroll.saturating_sub(half_page);
    }

    pub fn scroll_to_top(&mut self) {
        self.content_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.content_scroll = self.max_scroll();
    }

    // Overlays

    fn open_overlay(&mut self, overlay: Overlay) -> bool {
        if !self.overlays.open(overlay, &mut self.focus) {
            return false;
        }
        self.focus_changed();
        true
    }

    pub fn close_overlay(&mut self) {
        if self.overlays.is_active() {
            self.overlays.close(&mut self.focus);
            self.focus_changed();
        }
    }

    pub fn open_search(&mut self) {
        self.open_overlay(Overlay::search_prompt());
    }

    /// Run the search typed into the prompt, as typed. Empty input dismisses.
    pub fn submit_search(&mut self, query: String) {
        if query.is_empty() {
            self.close_overlay();
            return;
        }

        let hits = self.library.search(&query);
        log::debug!("search {:?}: {} hits", query, hits.len());
        if hits.is_empty() {
            self.close_overlay();
            self.status = NO_RESULTS.to_string();
        } else {
            self.overlays.replace(Overlay::search_results(query, hits));
        }
    }

    pub fn confirm_search_result(&mut self) {
        let target = match self.overlays.current() {
            Overlay::SearchResults { hits, state, .. } => state
                .selected()
                .and_then(|i| hits.get(i))
                .map(|hit| (hit.chapter, hit.verse)),
            _ => None,
        };
        if let Some((chapter, verse)) = target {
            self.close_overlay();
            self.go_to(chapter, verse);
        }
    }

    pub fn open_bookmarks(&mut self) {
        let bookmarks = self.bookmarks.get_all();
        if bookmarks.is_empty() {
            self.status = NO_BOOKMARKS.to_string();
            return;
        }
        self.open_overlay(Overlay::Bookmarks(BookmarkList::new(bookmarks)));
    }

    fn bookmark_list(&mut self) -> Option<&mut BookmarkList> {
        match self.overlays.current_mut() {
            Overlay::Bookmarks(list) => Some(list),
            _ => None,
        }
    }

    pub fn confirm_bookmark(&mut self) {
        let target = self
            .bookmark_list()
            .and_then(|list| list.selected())
            .map(|b| (b.chapter, b.verse));
        if let Some((chapter, verse)) = target {
            self.close_overlay();
            self.go_to(chapter, verse);
        }
    }

    pub fn delete_bookmark(&mut self) {
        let Some(list) = self.bookmark_list() else {
            return;
        };
        if list.delete_selected().is_none() {
            return;
        }
        let remaining = list.items().to_vec();
        if remaining.is_empty() {
            self.close_overlay();
            self.status = ALL_BOOKMARKS_DELETED.to_string();
        }
        self.persist_bookmarks(&remaining);
    }

    pub fn move_bookmark(&mut self, up: bool) {
        let Some(list) = self.bookmark_list() else {
            return;
        };
        let moved = if up { list.move_up() } else { list.move_down() };
        if moved {
            let items = list.items().to_vec();
            self.persist_bookmarks(&items);
        }
    }

    pub fn begin_note_edit(&mut self) {
        if let Some(list) = self.bookmark_list() {
            list.begin_edit();
        }
    }

    pub fn commit_note(&mut self, note: String) {
        let Some(list) = self.bookmark_list() else {
            return;
        };
        if list.set_note(note) {
            let items = list.items().to_vec();
            self.persist_bookmarks(&items);
        }
    }

    pub fn cancel_note_edit(&mut self) {
        if let Some(list) = self.bookmark_list() {
            list.cancel_edit();
        }
    }

    fn persist_bookmarks(&mut self, bookmarks: &[Bookmark]) {
        if let Err(e) = self.bookmarks.persist(bookmarks) {
            log::error!("saving bookmarks failed: {e}");
            self.status = format!("Could not save bookmarks: {e}");
        }
    }

    /// `a`: ask for a note when a single verse is on screen.
    pub fn request_bookmark(&mut self) {
        let chapters = self.library.chapters();
        let target = self
            .selection
            .chapter(chapters)
            .zip(self.selection.verse(chapters));
        match target {
            Some((chapter, verse)) => {
                let bookmark = Bookmark::new(chapter.id, verse.number, "", chapter.title.clone());
                self.open_overlay(Overlay::add_bookmark(bookmark));
            }
            None => self.status = NO_VERSE_SELECTED.to_string(),
        }
    }

    pub fn commit_bookmark(&mut self, note: String) {
        let pending = match self.overlays.current() {
            Overlay::AddBookmark { bookmark, .. } => Some(bookmark.clone()),
            _ => None,
        };
        let Some(mut bookmark) = pending else {
            return;
        };
        self.close_overlay();

        bookmark.note = note;
        let (chapter, verse) = (bookmark.chapter, bookmark.verse);
        match self.bookmarks.add(bookmark) {
            Ok(()) => {
                self.status = format!(
                    "Bookmark added: {} {}:{}",
                    self.library.book_title(),
                    chapter,
                    verse
                );
            }
            Err(e) => {
                log::error!("saving bookmarks failed: {e}");
                self.status = format!("Could not save bookmarks: {e}");
            }
        }
    }

    pub fn open_theme_picker(&mut self) {
        self.open_overlay(Overlay::theme_picker(self.theme));
    }

    pub fn confirm_theme(&mut self) {
        let chosen = match self.overlays.current() {
            Overlay::ThemePicker { state } => {
                state.selected().and_then(|i| Theme::ALL.get(i).copied())
            }
            _ => None,
        };
        let Some(theme) = chosen else {
            return;
        };
        self.close_overlay();

        if let Err(e) = self.config.set(Theme::CONFIG_KEY, theme.as_str()) {
            log::error!("saving theme failed: {e}");
            self.status = format!("Could not save theme: {e}");
        }
        self.apply_theme(theme);
    }

    /// Restyle every surface for `theme` and re-render the primary content.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.appearance = Appearance::new(theme, &self.focus);
        self.refresh_content();
        log::info!("theme applied: {}", theme.as_str());
    }

    /// `h` from the main view opens help; inside help it closes it.
    pub fn toggle_help(&mut self) {
        match self.overlays.current() {
            Overlay::Help => self.close_overlay(),
            Overlay::None => {
                self.open_overlay(Overlay::Help);
            }
            _ => {}
        }
    }

    pub fn move_overlay_cursor(&mut self, delta: isize) {
        let len = self.overlays.current().list_len();
        if let Some(state) = self.overlays.current_mut().list_state_mut() {
            overlay::step(state, len, delta);
        }
    }

    pub fn overlay_cursor_to(&mut self, index: usize) {
        let len = self.overlays.current().list_len();
        if let Some(state) = self.overlays.current_mut().list_state_mut() {
            if index < len {
                state.select(Some(index));
            }
        }
    }

    /// Enter on an overlay list.
    pub fn confirm_overlay(&mut self) {
        match self.overlays.current() {
            Overlay::SearchResults { .. } => self.confirm_search_result(),
            Overlay::Bookmarks(_) => self.confirm_bookmark(),
            Overlay::ThemePicker { .. } => self.confirm_theme(),
            _ => {}
        }
    }
}
