use euphony_recommend::MatchKind;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::App;

/// Render the seed list with each seed's match.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Seeds
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let title = Paragraph::new(format!("Seeds    {} given", app.seeds.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_seeds(frame, app, chunks[1]);

    let help = Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Tab Recommendations  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}

fn render_seeds(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.seed_list;
    let viewport_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line<'_>> = if app.seeds.is_empty() {
        vec![Line::from(Span::styled(
            "  No seeds given.",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        app.seeds
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(viewport_height)
            .map(|(i, seed)| {
                let (marker, detail, color) = match &seed.matched {
                    Some((name, MatchKind::Exact)) => ("\u{2713}", name.clone(), Color::Green),
                    Some((name, MatchKind::Partial)) => ("~", format!("~ {name}"), Color::Yellow),
                    None => ("\u{2717}", "no match".to_string(), Color::Red),
                };
                let mut line = Line::from(vec![
                    Span::styled(format!("  {marker} "), Style::default().fg(color)),
                    Span::raw(format!("{:<40}", seed.reference)),
                    Span::styled(detail, Style::default().fg(Color::DarkGray)),
                ]);
                if i == state.selected {
                    line = line.style(Style::default().bg(Color::DarkGray).fg(Color::White));
                }
                line
            })
            .collect()
    };

    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Seeds"));
    frame.render_widget(list, area);
}
