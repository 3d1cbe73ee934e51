use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use daylens_core::source::CalendarSource;
use daylens_core::table::SortColumn;
use daylens_core::views::{summary::render_summary, timeline::render_timeline};
use daylens_protocol::{Fill, RenderCommand, TextAlign, ThemeToken, Viewport};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout as Split, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

use crate::dashboard::{Dashboard, Tab};

/// Logical pixels per terminal cell. A cell is as tall as one lane at full
/// scale, so neighbouring lanes land on different rows.
const CELL_W: f64 = 8.0;
const CELL_H: f64 = 20.0;

const KEY_HELP: &str = " Tab view | ↑↓ select | Enter notes | s/d/n sort | r refresh | q quit ";

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background | ThemeToken::Surface | ThemeToken::TableRowEven => Color::Black,
        ThemeToken::TableRowOdd => Color::Rgb(20, 20, 20),
        ThemeToken::Border | ThemeToken::BarBorder | ThemeToken::SummaryTrack => Color::DarkGray,
        ThemeToken::TextPrimary | ThemeToken::CategoryLabel => Color::White,
        ThemeToken::TextSecondary | ThemeToken::AxisTick => Color::Gray,
        ThemeToken::TextMuted | ThemeToken::Gridline => Color::DarkGray,
        ThemeToken::CategoryBand => Color::Rgb(24, 24, 28),
        ThemeToken::AxisBackground | ThemeToken::TableHeaderBackground => Color::Rgb(40, 40, 48),
        ThemeToken::ClipMarker => Color::LightYellow,
        ThemeToken::SelectionHighlight => Color::LightBlue,
    }
}

fn fill_to_color(fill: Fill) -> Color {
    match fill {
        Fill::Solid(color) => {
            let (r, g, b) = color.to_rgb8();
            Color::Rgb(r, g, b)
        }
        Fill::Theme(token) => theme_to_color(token),
    }
}

/// Paint render commands into `area`, mapping logical pixels to cells.
///
/// Rects become background color, text is written over whatever is
/// beneath it, and only clip markers among the lines are drawn.
fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    let to_col = |x: f64| (x / CELL_W).floor().max(0.0) as u16;
    let to_row = |y: f64| (y / CELL_H).floor().max(0.0) as u16;
    let mut put = |col: u16, row: u16, ch: Option<char>, fg: Option<Color>, bg: Option<Color>| {
        if col >= area.width || row >= area.height {
            return;
        }
        let cell = &mut buf[(area.x + col, area.y + row)];
        if let Some(ch) = ch {
            cell.set_char(ch);
        }
        if let Some(fg) = fg {
            cell.set_fg(fg);
        }
        if let Some(bg) = bg {
            cell.set_bg(bg);
        }
    };

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect { rect, fill, .. } => {
                let bg = fill_to_color(*fill);
                let first_row = to_row(rect.y);
                let last_row = to_row(rect.bottom() - 0.01).max(first_row);
                let first_col = to_col(rect.x);
                let last_col = to_col(rect.right() - 0.01).max(first_col);
                for row in first_row..=last_row {
                    for col in first_col..=last_col {
                        put(col, row, Some(' '), None, Some(bg));
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as f64 * CELL_W;
                let start_x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - len / 2.0,
                    TextAlign::Right => position.x - len,
                };
                let row = to_row(position.y - 1.0);
                let fg = theme_to_color(*color);
                for (i, ch) in text.chars().enumerate() {
                    let x = start_x + i as f64 * CELL_W;
                    if x < 0.0 {
                        continue;
                    }
                    put(to_col(x), row, Some(ch), Some(fg), None);
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color: ThemeToken::ClipMarker,
                ..
            } => {
                let col = to_col(from.x - 0.01);
                for row in to_row(from.y)..=to_row(to.y - 0.01) {
                    put(col, row, Some('▐'), Some(theme_to_color(ThemeToken::ClipMarker)), None);
                }
            }
            _ => {}
        }
    }
}

fn draw<S: CalendarSource>(frame: &mut Frame, dash: &Dashboard<S>, table_state: &mut TableState) {
    let [header, body, footer] = Split::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let tabs = dash.tabs();
    let selected = tabs.iter().position(|&t| t == dash.tab).unwrap_or(0);
    let titles: Vec<&str> = tabs.iter().map(|t| t.title()).collect();
    frame.render_widget(
        Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        " daylens | {} ({}) | {} events ",
                        dash.range,
                        dash.zone(),
                        dash.events.len()
                    )),
            )
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        header,
    );

    let status = match &dash.error {
        Some(error) => Paragraph::new(format!(" refresh failed: {error} "))
            .style(Style::default().fg(Color::White).bg(Color::Red)),
        None => Paragraph::new(KEY_HELP)
            .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
    };
    frame.render_widget(status, footer);

    if dash.events.is_empty() {
        frame.render_widget(
            Paragraph::new("No events found for the selected period.")
                .block(Block::default().borders(Borders::ALL)),
            body,
        );
        return;
    }

    match dash.tab {
        Tab::Timeline => {
            if let Some(day) = &dash.day {
                let viewport = Viewport::sized(
                    f64::from(body.width) * CELL_W,
                    f64::from(body.height) * CELL_H,
                );
                let cmds = render_timeline(&day.layout, &day.window, &viewport);
                paint(frame.buffer_mut(), body, &cmds);
            }
        }
        Tab::Summary => {
            let viewport =
                Viewport::sized(f64::from(body.width) * CELL_W, f64::from(body.height) * CELL_H);
            let cmds = render_summary(&dash.summary, &viewport);
            let squashed: Vec<RenderCommand> = cmds.into_iter().map(squash_rows).collect();
            paint(frame.buffer_mut(), body, &squashed);
        }
        Tab::Log => draw_log(frame, body, dash, table_state),
    }

    let detail = dash.selected_event().filter(|_| dash.show_detail);
    if let Some(event) = detail {
        let area = centered(body, 70, 60);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} {}", event.emoji, event.category),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{}  {} ({})",
                event.date(),
                event.time_span(),
                event.duration_label()
            )),
            Line::from(""),
        ];
        if event.notes.is_empty() {
            lines.push(Line::from("No detailed notes available for this event."));
        } else {
            lines.extend(event.notes.markdown.lines().map(|l| Line::from(l.to_string())));
        }
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Note Details ")),
            area,
        );
    }
}

/// Summary rows are 24px tall; squeeze them so each lands on one cell row.
fn squash_rows(cmd: RenderCommand) -> RenderCommand {
    const ROW_PX: f64 = 24.0;
    let scale = CELL_H / ROW_PX;
    match cmd {
        RenderCommand::DrawRect {
            mut rect,
            fill,
            border_color,
            label,
            event_id,
        } => {
            rect.y *= scale;
            rect.h *= scale;
            RenderCommand::DrawRect {
                rect,
                fill,
                border_color,
                label,
                event_id,
            }
        }
        RenderCommand::DrawText {
            mut position,
            text,
            color,
            font_size,
            align,
        } => {
            position.y *= scale;
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            }
        }
        other => other,
    }
}

fn draw_log<S: CalendarSource>(
    frame: &mut Frame,
    area: Rect,
    dash: &Dashboard<S>,
    table_state: &mut TableState,
) {
    let arrow = |column: SortColumn| {
        if dash.sort.column != column {
            ""
        } else if dash.sort.ascending {
            " ▲"
        } else {
            " ▼"
        }
    };
    let header = Row::new(vec![
        Cell::from(format!("Date{}", arrow(SortColumn::Date))),
        Cell::from(format!("Activity{}", arrow(SortColumn::Name))),
        Cell::from("Hrs"),
        Cell::from(format!("Time Range{}", arrow(SortColumn::Start))),
        Cell::from("Notes (Preview)"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = dash
        .log_rows()
        .into_iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.date().format("%Y-%m-%d").to_string()),
                Cell::from(format!("{} {}", e.emoji, e.category)),
                Cell::from(e.duration_label()),
                Cell::from(e.time_span()),
                Cell::from(if e.notes.is_empty() {
                    "-".to_string()
                } else {
                    e.notes.short.clone()
                }),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Percentage(25),
            Constraint::Length(7),
            Constraint::Length(13),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Detailed Log "))
    .row_highlight_style(
        Style::default()
            .bg(theme_to_color(ThemeToken::SelectionHighlight))
            .fg(Color::Black),
    );

    table_state.select(Some(dash.selected));
    frame.render_stateful_widget(table, area, table_state);
}

fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let [_, mid, _] = Split::vertical([
        Constraint::Percentage((100 - pct_y) / 2),
        Constraint::Percentage(pct_y),
        Constraint::Percentage((100 - pct_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Split::horizontal([
        Constraint::Percentage((100 - pct_x) / 2),
        Constraint::Percentage(pct_x),
        Constraint::Percentage((100 - pct_x) / 2),
    ])
    .areas(mid);
    center
}

pub fn run_tui<S: CalendarSource>(dash: &mut Dashboard<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut table_state = TableState::default();

    let result = event_loop(&mut terminal, dash, &mut table_state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<S: CalendarSource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    dash: &mut Dashboard<S>,
    table_state: &mut TableState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, dash, table_state))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let TermEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Esc if dash.show_detail => dash.show_detail = false,
            KeyCode::Esc => break,
            KeyCode::Tab => dash.next_tab(),
            KeyCode::Down | KeyCode::Char('j') => dash.select_next(),
            KeyCode::Up | KeyCode::Char('k') => dash.select_prev(),
            KeyCode::Enter if dash.tab == Tab::Log => dash.show_detail = !dash.show_detail,
            KeyCode::Char('s') => dash.toggle_sort(SortColumn::Start),
            KeyCode::Char('d') => dash.toggle_sort(SortColumn::Date),
            KeyCode::Char('n') => dash.toggle_sort(SortColumn::Name),
            KeyCode::Char('r') => dash.reload(),
            _ => {}
        }
    }
    Ok(())
}
