use crate::model::TaskStatus;
use crate::notice::{Urgency, pending_notices, recent_updates};
use crate::tui::state::{AppState, Focus, FormField, InputMode, Tab};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL).title(" syltrack "))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, v_chunks[0]);

    match state.tab {
        Tab::Subjects => draw_subjects(f, state, v_chunks[1]),
        Tab::Tasks => draw_tasks(f, state, v_chunks[1]),
        Tab::Notices => draw_notices(f, state, v_chunks[1]),
    }

    draw_footer(f, state, v_chunks[2]);

    match state.mode {
        InputMode::Form => draw_form(f, state),
        InputMode::ConfirmDelete => draw_confirm(f, state),
        InputMode::Normal => {}
    }
}

fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

fn draw_subjects(f: &mut Frame, state: &mut AppState, area: Rect) {
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(h_chunks[1]);

    // --- Subject List ---
    let items: Vec<ListItem> = state
        .subjects
        .iter()
        .map(|s| {
            let marker = if state.ongoing.contains_key(&s.title) { " *" } else { "" };
            ListItem::new(Line::from(format!("{}{}", s.title, marker)))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Subjects ({}) ", state.subjects.len()))
                .border_style(focus_style(state.focus == Focus::Subjects)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(list, h_chunks[0], &mut state.subject_state);

    let Some(subject) = state.selected_subject().cloned() else {
        let empty = Paragraph::new("No subjects found in the syllabus.")
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        f.render_widget(empty, h_chunks[1]);
        return;
    };
    let ongoing = state.ongoing.get(&subject.title).cloned();

    // --- Details Pane ---
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(subject.title.clone(), bold.fg(Color::Cyan))),
        Line::from(format!(
            "Course No: {}   Semester: {}   Credit Hrs: {}",
            or_na(&subject.course_no),
            or_na(&subject.semester),
            or_na(&subject.credit_hrs)
        )),
        Line::from(format!(
            "Full Marks: {}   Pass Marks: {}   Nature: {}",
            or_na(&subject.full_marks),
            or_na(&subject.pass_marks),
            or_na(&subject.nature)
        )),
    ];
    if let Some(chapter) = &ongoing {
        lines.push(Line::from(Span::styled(
            format!("Currently Studying: {}", chapter),
            Style::default().fg(Color::Green),
        )));
    }
    let sections = [
        ("Description", &subject.description),
        ("Objectives", &subject.objectives),
        ("Laboratory Works", &subject.laboratory_works),
        ("Text Books", &subject.text_books),
        ("Reference Books", &subject.reference_books),
    ];
    for (heading, body) in sections {
        if body.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(heading, bold)));
        lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    }
    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((state.detail_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, right[0]);

    // --- Chapters ---
    let chapters: Vec<ListItem> = if subject.units.is_empty() {
        vec![ListItem::new("(No Units Found)")]
    } else {
        subject
            .units
            .iter()
            .map(|u| {
                let heading = u.heading();
                let is_ongoing = ongoing.as_deref() == Some(heading.as_str());
                let mark = if is_ongoing { "> " } else { "  " };
                let hours = if u.hours.is_empty() {
                    String::new()
                } else {
                    format!(" ({} Hrs)", u.hours)
                };
                let style = if is_ongoing {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{}{}{}", mark, heading, hours),
                    style,
                )))
            })
            .collect()
    };
    let chapter_list = List::new(chapters)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Chapters ({} Hrs) ", subject.total_hours()))
                .border_style(focus_style(state.focus == Focus::Chapters)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(chapter_list, right[1], &mut state.chapter_state);
}

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::default().fg(Color::White),
        TaskStatus::InProgress => Style::default().fg(Color::Yellow),
        TaskStatus::Completed => Style::default().fg(Color::Green),
        TaskStatus::Cancelled => Style::default().fg(Color::DarkGray),
    }
}

fn draw_tasks(f: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let items: Vec<ListItem> = state
        .tasks
        .iter()
        .map(|t| {
            let row = format!(
                "[{:<11}] {} | {:<12} | {} | {}",
                t.status.as_str(),
                t.submit_by.format("%Y-%m-%d"),
                t.kind.as_str(),
                t.subject,
                t.description
            );
            ListItem::new(Line::from(Span::styled(row, status_style(t.status))))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tasks ({}) ", state.tasks.len()))
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(list, chunks[0], &mut state.task_state);

    let details_text = match state.selected_task() {
        Some(task) => format!(
            "{} ({})\nAssigned: {}   Submit By: {}   Status: {}\n\n{}",
            task.kind,
            task.subject,
            task.date_assigned.format("%Y-%m-%d"),
            task.submit_by.format("%Y-%m-%d"),
            task.status,
            task.description
        ),
        None => "No tasks yet. Press 'a' to add one.".to_string(),
    };
    let details = Paragraph::new(details_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, chunks[1]);
}

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Overdue => Color::Red,
        Urgency::DueSoon => Color::LightYellow,
        Urgency::Upcoming => Color::Green,
    }
}

fn draw_notices(f: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let notices = pending_notices(&state.tasks, state.today, &state.notice_cfg);
    let items: Vec<ListItem> = if notices.is_empty() {
        vec![ListItem::new("(Nothing due)")]
    } else {
        notices
            .iter()
            .map(|n| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<22}", n.label()),
                        Style::default().fg(urgency_color(n.urgency)),
                    ),
                    Span::raw(format!(
                        " {} ({}): {}",
                        n.task.kind, n.task.subject, n.task.description
                    )),
                ]))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Deadlines ({}) ", notices.len())),
    );
    f.render_widget(list, chunks[0]);

    let recent = recent_updates(&state.tasks, state.notice_cfg.recent_limit);
    let lines: Vec<Line> = if recent.is_empty() {
        vec![Line::from("(No tasks added yet)")]
    } else {
        recent
            .iter()
            .map(|t| {
                Line::from(format!(
                    "- {} ({}): {} [Due: {}]",
                    t.kind,
                    t.subject,
                    t.description,
                    t.submit_by.format("%Y-%m-%d")
                ))
            })
            .collect()
    };
    let recent_block = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent Task Updates "),
        );
    f.render_widget(recent_block, chunks[1]);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help_text = match (state.mode, state.tab) {
        (InputMode::Form, _) => "Tab:Next | \u{2190}\u{2192}:Choose | Enter:Save | Esc:Cancel",
        (InputMode::ConfirmDelete, _) => "y:Delete | n:Keep",
        (_, Tab::Subjects) => "Tab:View | h/l:Pane | Enter:Set chapter | x:Clear | J/K:Scroll",
        (_, Tab::Tasks) => "Tab:View | a:Add | e:Edit | s:Status | d:Del | q:Quit",
        (_, Tab::Notices) => "Tab:View | q:Quit",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Width of the right-aligned `"{:>12}: "` field label.
const FORM_LABEL_WIDTH: u16 = 14;

/// Column just after `text` in a form row, kept inside the popup border.
fn form_cursor_x(area: Rect, text: &str) -> u16 {
    let text_len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let right_edge = area.x.saturating_add(area.width.saturating_sub(2));
    area.x
        .saturating_add(1 + FORM_LABEL_WIDTH)
        .saturating_add(text_len)
        .min(right_edge)
}

fn draw_form(f: &mut Frame, state: &AppState) {
    let area = centered(f.area(), 70, 10);
    let form = &state.form;
    let value = |field: FormField| -> String {
        match field {
            FormField::Subject => state
                .subject_options
                .get(form.subject_idx)
                .cloned()
                .unwrap_or_else(|| "-- No Subjects --".to_string()),
            FormField::Kind => state
                .task_kinds
                .get(form.kind_idx)
                .cloned()
                .unwrap_or_default(),
            FormField::Description => form.description.clone(),
            FormField::Assigned => form.assigned.clone(),
            FormField::SubmitBy => form.submit_by.clone(),
            FormField::Status => form.status.to_string(),
        }
    };

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let active = field == form.field;
            let style = if active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let shown = if field.is_text() {
                value(field)
            } else {
                format!("< {} >", value(field))
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.label()), style),
                Span::raw(shown),
            ])
        })
        .collect();

    let title = if form.editing_id.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);

    if form.field.is_text() {
        let row = FormField::ALL
            .iter()
            .position(|&fld| fld == form.field)
            .unwrap_or(0) as u16;
        let cursor_x = form_cursor_x(area, &value(form.field));
        f.set_cursor_position((cursor_x, area.y.saturating_add(1 + row)));
    }
}

fn draw_confirm(f: &mut Frame, state: &AppState) {
    let area = centered(f.area(), 60, 5);
    let desc = state
        .selected_task()
        .map(|t| t.description.clone())
        .unwrap_or_default();
    let popup = Paragraph::new(format!("Delete '{}'?\n(y/n)", desc))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm Delete ")
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
