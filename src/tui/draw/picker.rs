//! Fuzzy picker: filter box, candidate list, key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use super::super::app::PickerState;
use super::super::constants::ACCENT;

pub(crate) fn draw_picker(f: &mut Frame, area: Rect, picker: &mut PickerState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", picker.title));

    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
    let filter_area = chunks[0];
    let list_area = chunks[1];
    let hint_area = chunks[2];

    let filter_content = if picker.filter.is_empty() {
        Span::styled("Filter... ", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(picker.filter.as_str())
    };
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let filter_inner = filter_block.inner(filter_area);
    let filter_para = Paragraph::new(Line::from(filter_content))
        .block(filter_block)
        .style(Style::default().fg(Color::White));
    f.render_widget(filter_para, filter_area);
    let cx = filter_inner.x
        + picker
            .filter
            .chars()
            .count()
            .min(filter_inner.width as usize) as u16;
    f.set_cursor_position(ratatui::layout::Position::new(cx, filter_area.y + 1));

    let filtered = picker.filtered();
    let selected = picker.selected_index.min(filtered.len().saturating_sub(1));

    if filtered.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "No match",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
        f.render_widget(para, list_area);
    } else {
        let items: Vec<ListItem> = filtered
            .iter()
            .enumerate()
            .map(|(i, (_, label))| {
                let style = if i == selected {
                    Style::default().fg(Color::Black).bg(ACCENT)
                } else {
                    Style::default()
                };
                ListItem::new(format!(" {} ", label)).style(style)
            })
            .collect();
        let count = items.len();

        let list = List::new(items).highlight_style(Style::default().fg(Color::Black).bg(ACCENT));
        picker.selected_index = selected;
        picker.list_state.select(Some(selected.min(count - 1)));
        f.render_stateful_widget(list, list_area, &mut picker.list_state);
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("↑↓ ", Style::default().fg(Color::DarkGray)),
        Span::raw("select  "),
        Span::styled("Enter ", Style::default().fg(Color::DarkGray)),
        Span::raw("run  "),
        Span::styled("Esc ", Style::default().fg(Color::DarkGray)),
        Span::raw("cancel  "),
        Span::styled("type ", Style::default().fg(Color::DarkGray)),
        Span::raw("filter"),
    ]));
    f.render_widget(hint, hint_area);
}
