use crate::dashboard::{
    attendance_lines, average_mark_label, homework_lines, leader_lines, mark_lines,
    schedule_lines, Dashboard, HOME_MARKS, NO_DATA,
};
use crate::ui::state::{AppState, Page};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(frame: &mut Frame, state: &AppState) {
    match state {
        AppState::Loading => render_loading(frame, "Loading MyStat data..."),
        AppState::Ready { dashboard, page } => render_dashboard(frame, dashboard, *page),
        AppState::Error { message } => render_error(frame, message),
    }
}

fn render_loading(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let block = Block::default()
        .title("MyStat")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_dashboard(frame: &mut Frame, dashboard: &Dashboard, page: Page) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(18), Constraint::Min(20)])
        .split(rows[0]);

    render_menu(frame, columns[0], page);

    match page {
        Page::Home => render_home(frame, columns[1], dashboard),
        Page::Tasks => render_tasks(frame, columns[1], dashboard),
        Page::Calendar => render_lines(
            frame,
            columns[1],
            "Week Schedule",
            dashboard.week_schedule.as_deref().map(schedule_lines),
        ),
        Page::Grades => render_lines(
            frame,
            columns[1],
            "Marks",
            dashboard
                .marks
                .as_deref()
                .map(|marks| mark_lines(marks, marks.len())),
        ),
        Page::Stats => render_stats(frame, columns[1], dashboard),
    }

    let date = dashboard
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let help = Paragraph::new(format!(
        "{} | [↑↓/Tab: Switch page | r: Reload | q: Quit]",
        date
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);

    frame.render_widget(help, rows[1]);
}

fn render_menu(frame: &mut Frame, area: Rect, current: Page) {
    let items: Vec<ListItem> = Page::ALL
        .iter()
        .map(|page| {
            let selected = *page == current;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, page.title())).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("MyStat")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}

fn render_home(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(40),
            Constraint::Min(5),
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let homework = dashboard.homework_summary();
    render_card(frame, cards[0], "Homework to do", &homework.total.to_string(), Color::Magenta);
    render_card(frame, cards[1], "Overdue", &homework.overdue_label(), Color::Red);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_lines(
        frame,
        top[0],
        "Average mark",
        Some(vec![average_mark_label(dashboard.progress.as_ref())]),
    );
    render_lines(
        frame,
        top[1],
        "Schedule",
        dashboard.week_schedule.as_deref().map(schedule_lines),
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_lines(
        frame,
        bottom[0],
        "Marks",
        dashboard
            .marks
            .as_deref()
            .map(|marks| mark_lines(marks, HOME_MARKS)),
    );
    render_lines(
        frame,
        bottom[1],
        "Attendance",
        dashboard.attendance.as_ref().map(attendance_lines),
    );
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let text = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(title.to_string()),
    ];

    let card = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(card, area);
}

fn render_tasks(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let summary = dashboard.homework_summary();
    let title = format!("Homework ({} overdue)", summary.overdue_label());
    render_lines(
        frame,
        area,
        &title,
        dashboard
            .homeworks
            .as_ref()
            .map(|page| homework_lines(&page.data)),
    );
}

fn render_stats(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut summary = vec![format!(
        "Average mark: {}",
        average_mark_label(dashboard.progress.as_ref())
    )];
    if let Some(attendance) = &dashboard.attendance {
        summary.extend(attendance_lines(attendance));
    }
    render_lines(frame, columns[0], "Progress", Some(summary));
    render_lines(
        frame,
        columns[1],
        "Leaderboard",
        dashboard.leaders.as_deref().map(leader_lines),
    );
}

/// Bordered block of text lines; `None` or nothing to show renders the placeholder.
fn render_lines(frame: &mut Frame, area: Rect, title: &str, lines: Option<Vec<String>>) {
    let lines = lines.filter(|l| !l.is_empty());

    let text: Vec<Line> = match lines {
        Some(lines) => lines.into_iter().map(Line::from).collect(),
        None => vec![Line::from(Span::styled(
            NO_DATA,
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let paragraph = Paragraph::new(message)
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, chunks[0]);

    let help = Paragraph::new("[r: Retry | q: Quit]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(help, chunks[1]);
}
