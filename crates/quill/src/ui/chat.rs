use quill_core::markup::{self, ColorCode};
use quill_core::ChatHistory;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// Draws the newest `shown` messages, pinned to the bottom of `area`.
pub fn render(frame: &mut Frame, area: Rect, history: &ChatHistory, shown: usize) {
    let block = Block::default().borders(Borders::ALL).title(" Chat ");
    let inner = block.inner(area);

    let lines: Vec<Line> = history
        .recent(shown)
        .flat_map(|entry| entry.text.lines())
        .map(markup_line)
        .collect();

    let visible_height = inner.height as usize;
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    let total_lines = paragraph.line_count(area.width);
    let scroll = total_lines.saturating_sub(visible_height);
    let paragraph = paragraph.scroll((scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(paragraph, area);

    if total_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_lines).position(scroll);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

/// Colour codes reset at every line break.
fn markup_line(text: &str) -> Line<'static> {
    Line::from(
        markup::parse_markup(text)
            .into_iter()
            .map(|span| Span::styled(span.text, Style::default().fg(terminal_color(span.color))))
            .collect::<Vec<_>>(),
    )
}

fn terminal_color(code: ColorCode) -> Color {
    let (r, g, b) = code.rgb();
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_become_foreground_colours() {
        let line = markup_line("&cError &fdetail");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "Error ");
        assert_eq!(line.spans[0].style.fg, Some(Color::Rgb(255, 85, 85)));
        assert_eq!(line.spans[1].style.fg, Some(Color::Rgb(255, 255, 255)));
    }
}
