use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::bits::Verdict;
use crate::session::LabelField;
use crate::view::{Card, CardList, EditorView, SessionView, StatusLine, CARD_WIDTH, SIDE_PADDING};

const VERTICAL_MARGIN: u16 = 1;
const CARD_HEIGHT: u16 = 6;
const EDITOR_HEIGHT: u16 = 4;

const ONES_COLOR: Color = Color::Rgb(115, 245, 159);
const ZEROS_COLOR: Color = Color::Rgb(125, 86, 244);
const TIE_COLOR: Color = Color::Rgb(119, 119, 119);
const CURRENT_COLOR: Color = Color::Rgb(255, 215, 0);

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Ones => ONES_COLOR,
        Verdict::Zeros => ZEROS_COLOR,
        Verdict::Tie => TIE_COLOR,
    }
}

impl Widget for &SessionView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let editor_height = if self.editor.is_some() {
            EDITOR_HEIGHT
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),             // header
                Constraint::Length(1),             // padding
                Constraint::Length(CARD_HEIGHT),   // carousel
                Constraint::Length(1),             // padding
                Constraint::Length(editor_height), // label editor
                Constraint::Length(1),             // status
                Constraint::Length(1),             // padding
                Constraint::Length(1),             // help
                Constraint::Min(0),
            ])
            .split(area);

        let header = Paragraph::new(Span::styled(
            format!(" {} ", self.header),
            Style::default()
                .fg(Color::Rgb(255, 253, 245))
                .bg(Color::Rgb(37, 160, 101))
                .add_modifier(Modifier::BOLD),
        ));
        header.render(chunks[0], buf);

        match &self.cards {
            CardList::Placeholder(message) => render_placeholder(message, chunks[2], buf),
            CardList::Cards(cards) => render_cards(cards, chunks[2], buf),
        }

        if let Some(editor) = &self.editor {
            render_editor(editor, chunks[4], buf);
        }

        let status_style = match self.status {
            StatusLine::Ready { .. } => Style::default(),
            StatusLine::Loading { .. } => Style::default().fg(CURRENT_COLOR),
            StatusLine::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        Paragraph::new(Span::styled(self.status.text(), status_style)).render(chunks[5], buf);

        Paragraph::new(Span::styled(
            self.help,
            Style::default().fg(Color::DarkGray),
        ))
        .render(chunks[7], buf);
    }
}

fn render_placeholder(message: &str, area: Rect, buf: &mut Buffer) {
    let middle = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(TIE_COLOR),
    ))
    .alignment(Alignment::Center)
    .render(middle, buf);
}

fn render_cards(cards: &[Card], area: Rect, buf: &mut Buffer) {
    let start = area.x.saturating_add(SIDE_PADDING);
    for (idx, card) in cards.iter().enumerate() {
        let x = start.saturating_add(CARD_WIDTH.saturating_mul(idx as u16));
        if x >= area.right() {
            break;
        }
        // last column of each slot is the gap between cards
        let width = (CARD_WIDTH - 1).min(area.right() - x);
        let slot = Rect::new(x, area.y, width, area.height);

        let color = verdict_color(card.verdict);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        if card.most_recent {
            block = block
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(CURRENT_COLOR))
                .title(Line::from("◆").alignment(Alignment::Center));
        }

        let lines: Vec<Line> = card.lines().into_iter().map(Line::from).collect();
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(block)
            .render(slot, buf);
    }
}

fn render_editor(editor: &EditorView, area: Rect, buf: &mut Buffer) {
    let field_line = |field: LabelField, name: &str, value: &str| {
        if editor.focus == field {
            Line::from(vec![
                Span::styled(
                    format!("▸ {name:<6}"),
                    Style::default()
                        .fg(CURRENT_COLOR)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(value.to_string()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else {
            Line::from(vec![
                Span::styled(format!("  {name:<6}"), Style::default().fg(TIE_COLOR)),
                Span::raw(value.to_string()),
            ])
        }
    };

    let area = Rect {
        x: area.x.saturating_add(SIDE_PADDING),
        width: area.width.saturating_sub(SIDE_PADDING * 2),
        ..area
    };
    Paragraph::new(vec![
        field_line(LabelField::Ones, "ONES", &editor.ones),
        field_line(LabelField::Zeros, "ZEROS", &editor.zeros),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Edit Labels "),
    )
    .render(area, buf);
}
