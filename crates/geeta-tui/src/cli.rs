use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geeta_core::{load_theme, Bookmark, BookmarkStore, ConfigFile, ConfigStore, Library, Theme};
use rand::Rng;

#[derive(Parser, Debug)]
#[command(name = "geeta")]
#[command(version, about = "Read the Bhagavad-Gītā in the terminal")]
pub struct Cli {
    /// Directory holding the chapter JSON files
    #[arg(long, env = "GEETA_DATA", global = true, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Config file with the theme and bookmarks
    #[arg(long, env = "GEETA_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a random verse and exit
    #[arg(short, long)]
    pub random: bool,

    /// Print a random verse from this chapter and exit
    #[arg(short, long, value_name = "N")]
    pub chapter: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive reader (default)
    Read,
    /// Print a single verse
    Verse { chapter: u32, verse: u32 },
    /// Print every verse of a chapter
    Chapter { chapter: u32 },
    /// Search translations and transliterations
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Bookmark a verse
    Bookmark {
        chapter: u32,
        verse: u32,
        /// Optional note
        note: Option<String>,
    },
    /// List saved bookmarks
    Bookmarks,
    /// Show or change the color theme
    Theme { name: Option<String> },
    /// Print a short sample of chapters, a verse and a search
    Demo,
}

impl Cli {
    /// True unless a one-shot command or a random-verse flag was given.
    pub fn wants_reader(&self) -> bool {
        !self.random
            && self.chapter.is_none()
            && matches!(self.command, None | Some(Command::Read))
    }

    pub fn data_dir(&self) -> PathBuf {
        resolve_data_dir(self.data.as_deref())
    }

    pub fn config_file(&self) -> Result<ConfigFile> {
        match &self.config {
            Some(path) => Ok(ConfigFile::at(path)),
            None => ConfigFile::default_location().context("cannot locate the config file"),
        }
    }
}

/// Explicit directory, else the first existing of `./geeta`, `<exe dir>/geeta`
/// and `<config dir>/geeta/data`. Falls back to `./geeta` so load errors name it.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    let local = PathBuf::from("geeta");
    let mut candidates = vec![local.clone()];
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        candidates.push(exe_dir.join("geeta"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("geeta").join("data"));
    }

    candidates.into_iter().find(|dir| dir.is_dir()).unwrap_or(local)
}

/// Run a one-shot invocation, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.config_file()?;

    match &cli.command {
        Some(Command::Bookmarks) => list_bookmarks(&config, out),
        Some(Command::Theme { name }) => theme(&config, name.as_deref(), out),
        command => {
            let data_dir = cli.data_dir();
            let library = Library::load_dir(&data_dir)
                .with_context(|| format!("failed to load chapters from {}", data_dir.display()))?;
            match command {
                Some(Command::Verse { chapter, verse }) => {
                    print_verse(&library, *chapter, *verse, out)
                }
                Some(Command::Chapter { chapter }) => print_chapter(&library, *chapter, out),
                Some(Command::Search { query }) => print_search(&library, &query.join(" "), out),
                Some(Command::Demo) => demo(&library, out),
                Some(Command::Bookmark { chapter, verse, note }) => {
                    let note = note.as_deref().unwrap_or("");
                    add_bookmark(&library, config, *chapter, *verse, note, out)
                }
                _ => print_random(&library, cli.chapter, out),
            }
        }
    }
}

pub fn print_verse(
    library: &Library,
    chapter: u32,
    verse: u32,
    out: &mut impl Write,
) -> Result<()> {
    let Some((_, found)) = library.find_verse(chapter, verse) else {
        bail!("Verse not found: {chapter}:{verse}");
    };
    writeln!(out, "{chapter}:{} - {}", found.number, found.text)?;
    Ok(())
}

pub fn print_chapter(library: &Library, chapter: u32, out: &mut impl Write) -> Result<()> {
    let Some(found) = library.chapter_by_id(chapter) else {
        bail!("Chapter not found: {chapter}");
    };
    writeln!(out, "{} {}", found.id, found.title)?;
    for verse in &found.verses {
        writeln!(out, "{}. {}", verse.number, verse.text)?;
    }
    Ok(())
}

pub fn print_search(library: &Library, query: &str, out: &mut impl Write) -> Result<()> {
    let hits = library.search(query);
    if hits.is_empty() {
        writeln!(out, "No results found for \"{query}\"")?;
        return Ok(());
    }
    writeln!(out, "Found {} results for \"{query}\":", hits.len())?;
    for hit in &hits {
        writeln!(out, "{}:{} - {}", hit.chapter, hit.verse, hit.text)?;
    }
    Ok(())
}

pub fn add_bookmark(
    library: &Library,
    mut store: impl BookmarkStore,
    chapter: u32,
    verse: u32,
    note: &str,
    out: &mut impl Write,
) -> Result<()> {
    let Some((found, _)) = library.find_verse(chapter, verse) else {
        bail!("Verse not found: {chapter}:{verse}");
    };
    store
        .add(Bookmark::new(chapter, verse, note, found.title.clone()))
        .context("failed to save bookmark")?;
    log::info!("bookmarked {chapter}:{verse}");
    writeln!(out, "Bookmark added for Chapter {chapter}:{verse}")?;
    Ok(())
}

pub fn list_bookmarks(store: &impl BookmarkStore, out: &mut impl Write) -> Result<()> {
    let bookmarks = store.get_all();
    if bookmarks.is_empty() {
        writeln!(out, "No bookmarks yet.")?;
        return Ok(());
    }
    writeln!(out, "Bookmarks:")?;
    for (i, bookmark) in bookmarks.iter().enumerate() {
        write!(out, "{}. Chapter {}:{}", i + 1, bookmark.chapter, bookmark.verse)?;
        if bookmark.note.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, " - {}", bookmark.note)?;
        }
    }
    Ok(())
}

/// Without a name, show the active theme; with one, switch to it.
pub fn theme(store: &ConfigFile, name: Option<&str>, out: &mut impl Write) -> Result<()> {
    let current = load_theme(store);
    let Some(name) = name else {
        writeln!(out, "Current theme: {}", current.display_name())?;
        writeln!(out)?;
        list_themes(current, out)?;
        writeln!(out)?;
        writeln!(out, "Usage: geeta theme <name>")?;
        return Ok(());
    };

    match Theme::from_name(name) {
        Some(theme) => {
            store
                .clone()
                .set(Theme::CONFIG_KEY, theme.as_str())
                .context("failed to save theme")?;
            writeln!(out, "✓ Theme changed to: {}", theme.display_name())?;
            Ok(())
        }
        None => {
            writeln!(out, "✗ Invalid theme: {name}")?;
            writeln!(out)?;
            list_themes(current, out)?;
            bail!("unknown theme {name:?}");
        }
    }
}

fn list_themes(current: Theme, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Available themes:")?;
    for theme in Theme::ALL {
        let marker = if theme == current { "✓" } else { " " };
        writeln!(out, "  {marker} {}", theme.as_str())?;
    }
    Ok(())
}

const DEMO_QUERY: &str = "Kṛṣṇa";

/// Chapter list, the first verse and a sample search, without the reader.
pub fn demo(library: &Library, out: &mut impl Write) -> Result<()> {
    let chapters: Vec<String> = library
        .chapters()
        .iter()
        .take(10)
        .map(|c| format!("{} {}", c.id, c.title))
        .collect();
    writeln!(out, "Available chapters: {}", chapters.join(" | "))?;

    if let Some(chapter) = library.chapters().first() {
        if let Some(verse) = chapter.verses.first() {
            writeln!(out, "Sample Verse: {}:{} - {}", chapter.id, verse.number, verse.text)?;
        }
    }

    let hits = library.search(DEMO_QUERY);
    writeln!(
        out,
        "Search sample for \"{DEMO_QUERY}\": {} results (showing up to 5)",
        hits.len()
    )?;
    for hit in hits.iter().take(5) {
        writeln!(out, "{}:{} - {}", hit.chapter, hit.verse, hit.text)?;
    }
    Ok(())
}

/// Random verse from the whole book, or from `chapter` when given.
pub fn print_random(library: &Library, chapter: Option<u32>, out: &mut impl Write) -> Result<()> {
    let mut rng = rand::rng();
    let found = match chapter {
        Some(id) => match library.chapter_by_id(id) {
            Some(found) => found,
            None => bail!("Chapter {id} not found"),
        },
        None => match library.chapters() {
            [] => bail!("no chapters loaded"),
            chapters => &chapters[rng.random_range(0..chapters.len())],
        },
    };
    if found.verses.is_empty() {
        bail!("Chapter {} has no verses", found.id);
    }
    let verse = &found.verses[rng.random_range(0..found.verses.len())];

    writeln!(out, "{} - Chapter {}: {}", library.book_title(), found.id, found.title)?;
    if !found.description.is_empty() {
        writeln!(out, "{}", found.description)?;
    }
    writeln!(out)?;
    writeln!(out, "Verse {}", verse.number)?;
    writeln!(out, "{}", verse.transliteration)?;
    writeln!(out)?;
    writeln!(out, "Translation:")?;
    writeln!(out, "{}", verse.text)?;
    if let Some(first) = verse.purport.split('\n').next().filter(|p| !p.trim().is_empty()) {
        writeln!(out)?;
        writeln!(out, "Purport:")?;
        writeln!(out, "{}...", first.trim_end())?;
    }
    Ok(())
}
