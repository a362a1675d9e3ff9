use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::world::World;

pub fn render(frame: &mut Frame, area: Rect, world: &World, prefix: &str) {
    let tile = world.player_tile();

    let mut spans = vec![
        Span::styled(
            " quill ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("tile ({}, {})", tile.x, tile.y),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(last) = world.entities.last() {
        let size = world.tile_size();
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!(
                "{} entities, last {} at ({}, {})",
                world.entities.len(),
                last.kind,
                last.position.x.div_euclid(size),
                last.position.y.div_euclid(size)
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if world.player.god_mode {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "[god mode]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("{prefix} for commands, Ctrl+C to quit"),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
