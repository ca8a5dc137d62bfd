//! Fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use geeta_core::{
    Bookmark, BookmarkStore, Chapter, ConfigStore, Library, StoreError, Verse, BOOK_TITLE,
};
use ratatui::text::Line;

/// `chapters` chapters of `verses` verses each. Ids and verse numbers start
/// at 1; even verses carry a two-paragraph purport.
pub fn sample_chapters(chapters: u32, verses: u32) -> Vec<Chapter> {
    (1..=chapters)
        .map(|c| Chapter {
            id: c,
            title: format!("Title of chapter {c}"),
            description: format!("About chapter {c}"),
            verses: (1..=verses)
                .map(|v| Verse {
                    number: v,
                    text: format!("Text of verse {c}.{v}"),
                    transliteration: format!("śloka {c} {v}"),
                    purport: if v % 2 == 0 {
                        format!("Purport of {c}.{v}\nSecond paragraph.")
                    } else {
                        String::new()
                    },
                })
                .collect(),
        })
        .collect()
}

pub fn sample_library(chapters: u32, verses: u32) -> Library {
    Library::new(BOOK_TITLE, sample_chapters(chapters, verses))
}

/// One chapter per title, three verses each.
pub fn library_with_titles(titles: &[&str]) -> Library {
    let mut chapters = sample_chapters(titles.len() as u32, 3);
    for (chapter, title) in chapters.iter_mut().zip(titles) {
        chapter.title = title.to_string();
    }
    Library::new(BOOK_TITLE, chapters)
}

pub fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[derive(Default)]
struct Memory {
    settings: HashMap<String, String>,
    bookmarks: Vec<Bookmark>,
}

/// In-memory config and bookmark store. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    memory: Rc<RefCell<Memory>>,
    read_only: bool,
}

impl MemoryStore {
    /// Every write fails.
    pub fn failing() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.memory.borrow().bookmarks.clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Io {
                path: PathBuf::from("memory"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"),
            });
        }
        Ok(())
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.memory.borrow().settings.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.memory
            .borrow_mut()
            .settings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl BookmarkStore for MemoryStore {
    fn get_all(&self) -> Vec<Bookmark> {
        self.bookmarks()
    }

    fn persist(&mut self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.memory.borrow_mut().bookmarks = bookmarks.to_vec();
        Ok(())
    }
}
