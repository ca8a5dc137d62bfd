use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
    Frame,
};

use crate::app::App;
use crate::content;
use crate::focus::PanelId;
use crate::overlay::{self, Overlay, Prompt};
use crate::theme::Appearance;

const HIGHLIGHT_SYMBOL: &str = "> ";
const BOOKMARKS_HINT: &str =
    "Enter:Navigate | d:Delete | e:Edit Note | K/J:Move Up/Down | Esc/q:Close";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.appearance.base), area);

    // Main layout: panels, status bar
    let [body_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let [left_area, content_area] =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Min(0)]).areas(body_area);
    let [chapters_area, verses_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(left_area);

    // Store areas for mouse hit-testing
    app.chapters_area = Some(chapters_area);
    app.verses_area = Some(verses_area);
    app.content_area = Some(content_area);
    app.overlay_list_area = None;

    app.set_layout(
        chapters_area.width.saturating_sub(2 + HIGHLIGHT_SYMBOL.len() as u16),
        content_area.width,
        content_area.height.saturating_sub(2),
    );

    render_chapters(app, frame, chapters_area);
    render_verses(app, frame, verses_area);
    render_content(app, frame, content_area);
    render_status(app, frame, status_area);

    match app.overlays.current() {
        Overlay::None => {}
        Overlay::SearchPrompt(prompt) | Overlay::AddBookmark { prompt, .. } => {
            render_prompt(&app.appearance, frame, area, prompt);
        }
        Overlay::Help => render_help(&app.appearance, frame, area),
        Overlay::SearchResults { .. } | Overlay::Bookmarks(_) | Overlay::ThemePicker { .. } => {
            render_overlay_list(app, frame, area);
        }
    }
}

fn panel_block(appearance: &Appearance, id: PanelId) -> Block<'static> {
    let panel = appearance.panel(id);
    Block::default()
        .borders(Borders::ALL)
        .border_style(panel.border)
        .title(Span::styled(format!(" {} ", panel.label), panel.title))
}

fn styled_list<'a>(
    appearance: &Appearance,
    items: Vec<ListItem<'a>>,
    block: Block<'a>,
) -> List<'a> {
    List::new(items)
        .block(block)
        .style(appearance.overlay_item)
        .highlight_style(appearance.list_highlight)
        .highlight_symbol(HIGHLIGHT_SYMBOL)
}

fn render_chapters(app: &mut App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = (0..app.library.chapters().len())
        .map(|i| ListItem::new(app.chapter_row(i)))
        .collect();

    let list = styled_list(&app.appearance, items, panel_block(&app.appearance, PanelId::Chapters));
    frame.render_stateful_widget(list, area, &mut app.chapter_state);
}

fn render_verses(app: &mut App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .selection
        .verse_items()
        .iter()
        .map(|v| ListItem::new(v.clone()))
        .collect();

    let list = styled_list(&app.appearance, items, panel_block(&app.appearance, PanelId::Verses));
    frame.render_stateful_widget(list, area, &mut app.verse_state);
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = panel_block(&app.appearance, PanelId::Content);

    if app.library.is_empty() {
        let placeholder = Paragraph::new(crate::app::NO_CHAPTERS)
            .style(app.appearance.hint)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let paragraph = content::wrapped(app.content.clone())
        .block(block)
        .scroll((app.content_scroll, 0));
    frame.render_widget(paragraph, area);

    // Render scrollbar
    let total_lines = app.total_content_lines();
    if total_lines > app.content_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.content_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(app.status.as_str())
        .style(app.appearance.status)
        .alignment(Alignment::Center);
    frame.render_widget(status, area);
}

/// Centered popup of `percent_x` of the width and a fixed height.
fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let popup_width = (area.width * percent_x / 100).max(20).min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(2));

    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn overlay_block<'a>(appearance: &Appearance, title: String) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(appearance.overlay_border)
        .title(Span::styled(title, appearance.overlay_title))
        .style(appearance.base)
}

fn render_prompt(appearance: &Appearance, frame: &mut Frame, area: Rect, prompt: &Prompt) {
    let popup = popup_area(area, 50, 3);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup);

    let block = overlay_block(appearance, format!(" {} ", prompt.title));
    let inner = block.inner(popup);
    let input = Paragraph::new(prompt.text()).style(appearance.overlay_item).block(block);
    frame.render_widget(input, popup);

    let before_cursor = prompt.text().chars().take(prompt.cursor()).count() as u16;
    frame.set_cursor_position((
        (inner.x + before_cursor).min(inner.right().saturating_sub(1)),
        inner.y,
    ));
}

fn render_help(appearance: &Appearance, frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::styled(overlay::HELP_TITLE, appearance.overlay_title),
        Line::default(),
    ];
    for (section, rows) in overlay::HELP {
        lines.push(Line::styled(*section, appearance.help_text.add_modifier(Modifier::BOLD)));
        for (key, action) in rows.iter() {
            lines.push(Line::styled(format!("  {key}: {action}"), appearance.help_text));
        }
        lines.push(Line::default());
    }

    let popup = popup_area(area, 70, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(appearance.help_border)
                .title(" Help ")
                .style(appearance.base),
        )
        .style(appearance.help_text);
    frame.render_widget(help, popup);
}

fn render_overlay_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some((rows, _)) = app.overlays.current().list_rows() else {
        return;
    };

    let (title, percent_x, hint) = match app.overlays.current() {
        Overlay::SearchResults { query, hits, .. } => {
            (format!(" Search Results: \"{}\" ({}) ", query, hits.len()), 80, None)
        }
        Overlay::Bookmarks(_) => (" Bookmarks ".to_string(), 70, Some(BOOKMARKS_HINT)),
        _ => (" Select Theme ".to_string(), 30, None),
    };
    let editing = match app.overlays.current() {
        Overlay::Bookmarks(list) => list.editing().cloned(),
        _ => None,
    };

    let hint_rows = u16::from(hint.is_some());
    let popup = popup_area(
        area,
        percent_x,
        (rows.len() as u16 + 2 + hint_rows).min(area.height.saturating_sub(4)),
    );
    frame.render_widget(Clear, popup);

    let block = overlay_block(&app.appearance, title);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [list_area, hint_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(hint_rows)]).areas(inner);

    // The list is drawn borderless inside the popup; hit-testing expects a
    // one-cell frame around the rows.
    app.overlay_list_area = Some(Rect::new(
        list_area.x.saturating_sub(1),
        list_area.y.saturating_sub(1),
        list_area.width + 2,
        list_area.height + 2,
    ));

    let items: Vec<ListItem> = rows.into_iter().map(ListItem::new).collect();
    let list = styled_list(&app.appearance, items, Block::default());
    if let Some(state) = app.overlays.current_mut().list_state_mut() {
        frame.render_stateful_widget(list, list_area, state);
    }

    if let Some(hint) = hint {
        let footer = Paragraph::new(hint)
            .style(app.appearance.hint)
            .alignment(Alignment::Center);
        frame.render_widget(footer, hint_area);
    }

    if let Some(prompt) = editing {
        render_prompt(&app.appearance, frame, area, &prompt);
    }
}
