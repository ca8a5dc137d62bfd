use std::fs;

use geeta_core::{Library, LoadError, BOOK_TITLE};

fn write(dir: &std::path::Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn loads_sorted_chapters_and_skips_empty_ones() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "chapter-10.json",
        r#"{"id": "10", "title": "The Opulence of the Absolute", "description": "",
            "verses": [{"id": "VERSE 1", "transliteration": "śrī-bhagavān uvāca",
                        "translation": "The Supreme Personality of Godhead said",
                        "purport": "..."}]}"#,
    );
    write(
        dir.path(),
        "chapter-2.json",
        r#"{"id": 2, "title": "Contents of the Gītā Summarized", "description": "d",
            "verses": [{"id": "VERSE 1", "translation": "Sañjaya said"},
                       {"id": "VERSES 2-3", "translation": "The Lord said"}]}"#,
    );
    write(dir.path(), "intro.json", r#"{"id": "0", "title": "Preface", "verses": []}"#);
    write(dir.path(), "notes.txt", "not a chapter");

    let library = Library::load_dir(dir.path()).unwrap();
    assert_eq!(library.book_title(), BOOK_TITLE);

    let ids: Vec<u32> = library.chapters().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 10]);

    let numbers: Vec<u32> = library.chapters()[0].verses.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(library.chapters()[1].verses[0].purport, "...");
}

#[test]
fn directory_without_chapters_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "intro.json", r#"{"id": "0", "title": "Preface", "verses": []}"#);

    let err = Library::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Empty(_)));
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Library::load_dir(&dir.path().join("geeta")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn malformed_chapter_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.json", "{");

    let err = Library::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
