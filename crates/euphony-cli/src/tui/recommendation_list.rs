use euphony_core::display::format_duration;
use euphony_recommend::search_link;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the recommendation table.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Recommendation table
            Constraint::Length(3), // Selected link
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    if let Some(message) = app.report.outcome.message() {
        let empty = Paragraph::new(format!("  {message}"))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
    } else {
        render_table(frame, app, chunks[1]);
    }
    render_link(frame, app, chunks[2]);
    render_help(frame, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!(
        "Recommendations    {}/{} seeds matched",
        app.report.matched, app.report.total
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Artist"),
        Cell::from("Duration"),
    ])
    .height(1);

    let records = app.report.outcome.records();
    // area.height - 2 for borders - 1 for header
    let viewport_height = area.height.saturating_sub(3) as usize;
    let state = app.recommendations;

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .skip(state.offset)
        .take(viewport_height)
        .map(|(i, record)| {
            let style = if i == state.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(record.name.clone()),
                Cell::from(record.artists.display()),
                Cell::from(format_duration(record.duration_ms)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Tracks"));

    frame.render_widget(table, area);
}

fn render_link(frame: &mut Frame, app: &App, area: Rect) {
    let link = app
        .report
        .outcome
        .records()
        .get(app.recommendations.selected)
        .map(|r| search_link(&r.name))
        .unwrap_or_default();
    let widget = Paragraph::new(format!("  {link}"))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Listen"));
    frame.render_widget(widget, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Tab Seeds  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
