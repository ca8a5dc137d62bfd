use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::de::{leading_number, number_or_string};
use crate::error::LoadError;

/// Display name of the corpus shipped with the reader.
pub const BOOK_TITLE: &str = "Bhagavad-Gītā";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u32,
    /// Translation, or the transliteration when no translation exists.
    pub text: String,
    pub transliteration: String,
    pub purport: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// List label used by the chapters panel: `"<id>. <title>"`.
    pub fn label(&self) -> String {
        format!("{}. {}", self.id, self.title)
    }

    /// Position of the verse with the given number, if present.
    pub fn verse_position(&self, number: u32) -> Option<usize> {
        self.verses.iter().position(|v| v.number == number)
    }
}

/// One search match, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub chapter: u32,
    pub chapter_title: String,
    pub verse: u32,
    pub text: String,
}

#[derive(Deserialize)]
struct RawChapter {
    #[serde(deserialize_with = "number_or_string")]
    id: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    verses: Vec<RawVerse>,
}

#[derive(Deserialize)]
struct RawVerse {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    transliteration: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    purport: String,
}

impl RawVerse {
    fn into_verse(self, position: usize) -> Verse {
        let number = match &self.id {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            serde_json::Value::String(s) => leading_number(s),
            _ => None,
        }
        .unwrap_or(position as u32 + 1);

        let text = if self.translation.is_empty() {
            self.transliteration.clone()
        } else {
            self.translation
        };

        Verse {
            number,
            text,
            transliteration: self.transliteration,
            purport: self.purport,
        }
    }
}

impl From<RawChapter> for Chapter {
    fn from(raw: RawChapter) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            verses: raw
                .verses
                .into_iter()
                .enumerate()
                .map(|(i, v)| v.into_verse(i))
                .collect(),
        }
    }
}

/// The loaded corpus: ordered chapters plus the substring search over them.
#[derive(Debug, Clone)]
pub struct Library {
    book_title: String,
    chapters: Vec<Chapter>,
}

impl Library {
    pub fn new(book_title: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            book_title: book_title.into(),
            chapters,
        }
    }

    /// Load every `*.json` chapter file in `dir`.
    ///
    /// Files whose chapter has no verses are skipped; the result is sorted by
    /// chapter id. An empty result is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut chapters = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let raw: RawChapter = serde_json::from_str(&content)
                .map_err(|source| LoadError::Json { path: path.clone(), source })?;
            if raw.verses.is_empty() {
                log::debug!("skipping {} (no verses)", path.display());
                continue;
            }
            chapters.push(Chapter::from(raw));
        }

        if chapters.is_empty() {
            return Err(LoadError::Empty(dir.to_path_buf()));
        }
        chapters.sort_by_key(|c| c.id);

        let verse_count: usize = chapters.iter().map(|c| c.verses.len()).sum();
        log::info!(
            "loaded {} chapters ({} verses) from {}",
            chapters.len(),
            verse_count,
            dir.display()
        );

        Ok(Self::new(BOOK_TITLE, chapters))
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Index of the chapter with the given id.
    pub fn position_of(&self, chapter_id: u32) -> Option<usize> {
        self.chapters.iter().position(|c| c.id == chapter_id)
    }

    pub fn chapter_by_id(&self, chapter_id: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    pub fn find_verse(&self, chapter_id: u32, verse_number: u32) -> Option<(&Chapter, &Verse)> {
        let chapter = self.chapter_by_id(chapter_id)?;
        let verse = chapter.verses.iter().find(|v| v.number == verse_number)?;
        Some((chapter, verse))
    }

    /// Case-insensitive substring match over translation and transliteration.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query_lower = query.to_lowercase();

        self.chapters
            .iter()
            .flat_map(|chapter| chapter.verses.iter().map(move |verse| (chapter, verse)))
            .filter(|(_, verse)| {
                verse.text.to_lowercase().contains(&query_lower)
                    || verse.transliteration.to_lowercase().contains(&query_lower)
            })
            .map(|(chapter, verse)| SearchHit {
                chapter: chapter.id,
                chapter_title: chapter.title.clone(),
                verse: verse.number,
                text: verse.text.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(number: u32, text: &str, transliteration: &str) -> Verse {
        Verse {
            number,
            text: text.to_string(),
            transliteration: transliteration.to_string(),
            purport: String::new(),
        }
    }

    fn library() -> Library {
        Library::new(
            BOOK_TITLE,
            vec![
                Chapter {
                    id: 1,
                    title: "Observing the Armies".into(),
                    description: String::new(),
                    verses: vec![
                        verse(
                            1,
                            "Dhṛtarāṣṭra said: O Sañjaya",
                            "dhṛtarāṣṭra uvāca",
                        ),
                        verse(2, "Sañjaya said: O King", "sañjaya uvāca"),
                    ],
                },
                Chapter {
                    id: 2,
                    title: "Contents of the Gītā Summarized".into(),
                    description: String::new(),
                    verses: vec![verse(1, "Sañjaya said: Seeing Arjuna", "sañjaya uvāca")],
                },
            ],
        )
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let hits = library().search("SAÑJAYA SAID");
        let refs: Vec<(u32, u32)> = hits.iter().map(|h| (h.chapter, h.verse)).collect();
        assert_eq!(refs, vec![(1, 2), (2, 1)]);
        assert_eq!(hits[1].chapter_title, "Contents of the Gītā Summarized");
    }

    #[test]
    fn search_matches_transliteration() {
        let hits = library().search("dhṛtarāṣṭra uvāca");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Dhṛtarāṣṭra said: O Sañjaya");
    }

    #[test]
    fn search_without_match_is_empty() {
        assert!(library().search("xyzzy").is_empty());
    }

    #[test]
    fn lookups_by_id() {
        let lib = library();
        assert_eq!(lib.position_of(2), Some(1));
        assert_eq!(lib.position_of(9), None);
        let (chapter, verse) = lib.find_verse(1, 2).unwrap();
        assert_eq!(chapter.label(), "1. Observing the Armies");
        assert_eq!(verse.text, "Sañjaya said: O King");
        assert!(lib.find_verse(1, 3).is_none());
    }

    #[test]
    fn raw_verse_falls_back_to_transliteration_and_position() {
        let raw: RawVerse =
            serde_json::from_str(r#"{"transliteration": "oṁ", "translation": ""}"#).unwrap();
        let v = raw.into_verse(4);
        assert_eq!(v.number, 5);
        assert_eq!(v.text, "oṁ");
    }
}
