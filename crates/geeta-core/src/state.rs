//! UI-agnostic state types
//!
//! Records that outlive a single reader session and are shared between the
//! interactive reader and the one-shot commands.

use serde::{Deserialize, Serialize};

use crate::de::number_or_string;

/// A saved verse reference with an optional note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(deserialize_with = "number_or_string")]
    pub chapter: u32,
    #[serde(deserialize_with = "number_or_string")]
    pub verse: u32,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub chapter_title: String,
}

impl Bookmark {
    pub fn new(
        chapter: u32,
        verse: u32,
        note: impl Into<String>,
        chapter_title: impl Into<String>,
    ) -> Self {
        Self {
            chapter,
            verse,
            note: note.into(),
            chapter_title: chapter_title.into(),
        }
    }

    /// `"<title> (<chapter>):<verse>"`, or `"Chapter <chapter>:<verse>"` without a title.
    pub fn reference(&self) -> String {
        if self.chapter_title.is_empty() {
            format!("Chapter {}:{}", self.chapter, self.verse)
        } else {
            format!("{} ({}):{}", self.chapter_title, self.chapter, self.verse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Bookmark;

    #[test]
    fn reads_string_chapter_ids() {
        let b: Bookmark = serde_json::from_str(
            r#"{"chapter": "2", "verse": 47, "note": "duty",
                "chapterTitle": "Contents of the Gītā Summarized"}"#,
        )
        .unwrap();
        assert_eq!(b, Bookmark::new(2, 47, "duty", "Contents of the Gītā Summarized"));
    }

    #[test]
    fn missing_note_and_title_default_to_empty() {
        let b: Bookmark = serde_json::from_str(r#"{"chapter": 3, "verse": 9}"#).unwrap();
        assert_eq!(b.note, "");
        assert_eq!(b.reference(), "Chapter 3:9");
    }

    #[test]
    fn writes_camel_case() {
        let json = serde_json::to_string(&Bookmark::new(1, 1, "", "Observing the Armies")).unwrap();
        assert!(json.contains("\"chapterTitle\""));
    }
}
