//! Scripture text layout for the content panel.

use geeta_core::{Chapter, Palette, Verse};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Wrap},
};

use crate::theme::color;

/// Columns lost to the panel's border and padding.
pub const BORDER_ALLOWANCE: u16 = 4;

/// Left-pad `text` so it sits centered in `available_width` columns.
pub fn center(text: &str, available_width: usize) -> String {
    let padding = available_width.saturating_sub(text.chars().count()) / 2;
    format!("{}{}", " ".repeat(padding), text)
}

/// The content panel's paragraph. Drawing and scroll bounds both go
/// through here so they wrap identically.
pub fn wrapped(text: Text<'static>) -> Paragraph<'static> {
    Paragraph::new(text).wrap(Wrap { trim: false })
}

/// Rows `text` takes once word-wrapped to `width` columns.
pub fn wrapped_height(text: &Text<'static>, width: u16) -> usize {
    wrapped(text.clone()).line_count(width.max(1))
}

/// Lay out `verses` of `chapter` under a centered book/chapter heading.
pub fn render(
    book: &str,
    chapter: &Chapter,
    verses: &[Verse],
    available_width: usize,
    palette: &Palette,
) -> Text<'static> {
    let mut lines = header(book, chapter, available_width, palette);
    for verse in verses {
        lines.extend(verse_block(verse, palette));
    }
    Text::from(lines)
}

/// Book name, chapter line and a blank separator.
pub fn header(
    book: &str,
    chapter: &Chapter,
    available_width: usize,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let chapter_line = if chapter.title.is_empty() {
        format!("Chapter {}", chapter.id)
    } else {
        format!("Chapter {}: {}", chapter.id, chapter.title)
    };

    vec![
        Line::styled(center(book, available_width), bold(palette.book)),
        Line::styled(center(&chapter_line, available_width), bold(palette.chapter)),
        Line::default(),
    ]
}

/// `Verse K`, the text, and the purport when there is one.
pub fn verse_block(verse: &Verse, palette: &Palette) -> Vec<Line<'static>> {
    let body = Style::default().fg(color(palette.fg));

    let mut lines = vec![Line::styled(format!("Verse {}", verse.number), bold(palette.verse))];
    lines.extend(paragraph(&verse.text, body));
    lines.push(Line::default());

    if !verse.purport.is_empty() {
        lines.push(Line::styled("Purport:", bold(palette.chapter)));
        lines.extend(paragraph(&verse.purport, body));
        lines.push(Line::default());
    }
    lines
}

fn paragraph(text: &str, style: Style) -> impl Iterator<Item = Line<'static>> + '_ {
    text.split('\n')
        .map(move |l| Line::styled(l.trim_end_matches('\r').to_string(), style))
}

fn bold(rgb: geeta_core::Rgb) -> Style {
    Style::default().fg(color(rgb)).add_modifier(Modifier::BOLD)
}
