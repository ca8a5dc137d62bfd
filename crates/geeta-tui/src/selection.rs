use std::iter;

use geeta_core::{Chapter, Library, Palette, Verse};
use ratatui::text::Text;

use crate::content;

/// First entry of the verse picker.
pub const WHOLE_CHAPTER: &str = "Whole chapter";

/// What the content panel shows: a chapter and, optionally, one verse of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub chapter_index: usize,
    /// `None` shows the whole chapter.
    pub verse_index: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selection: Selection,
    verse_items: Vec<String>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// `["Whole chapter", <verse numbers>...]` for the selected chapter.
    pub fn verse_items(&self) -> &[String] {
        &self.verse_items
    }

    /// Row of the verse picker matching the current selection.
    pub fn verse_list_index(&self) -> usize {
        self.selection.verse_index.map_or(0, |i| i + 1)
    }

    /// Show the whole of chapter `index`. Out of range is a no-op.
    pub fn select_chapter(&mut self, chapters: &[Chapter], index: usize) -> bool {
        let Some(chapter) = chapters.get(index) else {
            return false;
        };

        self.selection = Selection {
            chapter_index: index,
            verse_index: None,
        };
        self.verse_items = iter::once(WHOLE_CHAPTER.to_string())
            .chain(chapter.verses.iter().map(|v| v.number.to_string()))
            .collect();
        true
    }

    /// Apply a verse-picker row: 0 is the whole chapter, `n` is verse `n - 1`.
    /// Out of range is a no-op.
    pub fn select_verse(&mut self, chapters: &[Chapter], list_index: usize) -> bool {
        let Some(chapter) = chapters.get(self.selection.chapter_index) else {
            return false;
        };

        self.selection.verse_index = match list_index {
            0 => None,
            n if n <= chapter.verses.len() => Some(n - 1),
            _ => return false,
        };
        true
    }

    pub fn chapter<'a>(&self, chapters: &'a [Chapter]) -> Option<&'a Chapter> {
        chapters.get(self.selection.chapter_index)
    }

    pub fn verse<'a>(&self, chapters: &'a [Chapter]) -> Option<&'a Verse> {
        let chapter = self.chapter(chapters)?;
        chapter.verses.get(self.selection.verse_index?)
    }

    /// Verses currently on screen, in order.
    pub fn shown_verses<'a>(&self, chapters: &'a [Chapter]) -> &'a [Verse] {
        let Some(chapter) = self.chapter(chapters) else {
            return &[];
        };
        match self.selection.verse_index {
            None => &chapter.verses,
            Some(i) => chapter.verses.get(i).map(std::slice::from_ref).unwrap_or(&[]),
        }
    }

    /// Run the content renderer over the current selection.
    pub fn render(
        &self,
        library: &Library,
        available_width: usize,
        palette: &Palette,
    ) -> Text<'static> {
        match self.chapter(library.chapters()) {
            Some(chapter) => content::render(
                library.book_title(),
                chapter,
                self.shown_verses(library.chapters()),
                available_width,
                palette,
            ),
            None => Text::default(),
        }
    }

    /// Status line after picking a chapter from the chapters panel.
    pub fn chapter_status(&self, library: &Library) -> Option<String> {
        let chapter = self.chapter(library.chapters())?;
        Some(format!("Reading: {} {}", library.book_title(), chapter.id))
    }

    /// Status line after picking a row of the verse picker.
    pub fn verse_status(&self, chapters: &[Chapter]) -> Option<String> {
        let chapter = self.chapter(chapters)?;
        Some(match self.verse(chapters) {
            Some(verse) => format!("Chapter {}:{} - {}", chapter.id, verse.number, chapter.title),
            None => format!("Reading: Chapter {} - {}", chapter.id, chapter.title),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_chapters;
    use geeta_core::{Theme, BOOK_TITLE};
    use ratatui::text::Line;

    #[test]
    fn verse_items_have_sentinel_plus_every_verse() {
        let chapters = sample_chapters(18, 47);
        let mut model = SelectionModel::new();
        for (i, chapter) in chapters.iter().enumerate() {
            assert!(model.select_chapter(&chapters, i));
            assert_eq!(model.verse_items().len(), chapter.verses.len() + 1);
            assert_eq!(model.verse_items()[0], WHOLE_CHAPTER);
        }
    }

    #[test]
    fn select_chapter_clears_verse() {
        let chapters = sample_chapters(3, 5);
        let mut model = SelectionModel::new();
        model.select_chapter(&chapters, 1);
        model.select_verse(&chapters, 3);
        model.select_chapter(&chapters, 2);
        assert_eq!(
            model.selection(),
            Selection {
                chapter_index: 2,
                verse_index: None
            }
        );
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let chapters = sample_chapters(2, 4);
        let mut model = SelectionModel::new();
        model.select_chapter(&chapters, 1);
        model.select_verse(&chapters, 2);
        let before = model.selection();

        assert!(!model.select_chapter(&chapters, 2));
        assert!(!model.select_verse(&chapters, 5));
        assert_eq!(model.selection(), before);
    }

    #[test]
    fn no_chapters_means_no_selection() {
        let mut model = SelectionModel::new();
        assert!(!model.select_chapter(&[], 0));
        assert!(!model.select_verse(&[], 0));
        assert!(model.shown_verses(&[]).is_empty());
        assert!(model.verse_items().is_empty());
    }

    #[test]
    fn single_verse_follows_position_not_number() {
        let mut chapters = sample_chapters(1, 3);
        // gap in numbering: 1, 2, 5
        chapters[0].verses[2].number = 5;
        let mut model = SelectionModel::new();
        model.select_chapter(&chapters, 0);
        model.select_verse(&chapters, 3);

        let shown = model.shown_verses(&chapters);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].number, 5);
        assert_eq!(model.verse_list_index(), 3);
    }

    #[test]
    fn eighteen_chapters_verse_five_status() {
        let chapters = sample_chapters(18, 47);
        let mut model = SelectionModel::new();
        model.select_chapter(&chapters, 0);
        model.select_verse(&chapters, 5);

        assert_eq!(model.selection().verse_index, Some(4));
        let shown = model.shown_verses(&chapters);
        assert_eq!(shown, &chapters[0].verses[4..5]);
        assert_eq!(
            model.verse_status(&chapters).unwrap(),
            format!("Chapter {}:5 - {}", chapters[0].id, chapters[0].title)
        );
    }

    #[test]
    fn whole_chapter_status() {
        let chapters = sample_chapters(2, 2);
        let mut model = SelectionModel::new();
        model.select_chapter(&chapters, 1);
        model.select_verse(&chapters, 0);
        assert_eq!(
            model.verse_status(&chapters).unwrap(),
            format!("Reading: Chapter 2 - {}", chapters[1].title)
        );
    }

    #[test]
    fn whole_chapter_renders_every_verse_block_in_order() {
        let library = Library::new(BOOK_TITLE, sample_chapters(2, 5));
        let palette = Theme::default().palette();
        let chapter = &library.chapters()[1];
        let mut model = SelectionModel::new();
        model.select_chapter(library.chapters(), 1);
        model.select_verse(library.chapters(), 0);

        let mut expected: Vec<Line> = content::header(BOOK_TITLE, chapter, 60, &palette);
        for verse in &chapter.verses {
            expected.extend(content::verse_block(verse, &palette));
        }
        assert_eq!(model.render(&library, 60, &palette), Text::from(expected));
    }

    #[test]
    fn verse_row_renders_exactly_that_verse() {
        let library = Library::new(BOOK_TITLE, sample_chapters(1, 5));
        let palette = Theme::Nakula.palette();
        let chapter = &library.chapters()[0];
        let mut model = SelectionModel::new();
        model.select_chapter(library.chapters(), 0);

        for k in 1..=chapter.verses.len() {
            model.select_verse(library.chapters(), k);
            let mut expected = content::header(BOOK_TITLE, chapter, 60, &palette);
            expected.extend(content::verse_block(&chapter.verses[k - 1], &palette));
            assert_eq!(model.render(&library, 60, &palette), Text::from(expected));
        }
    }
}
