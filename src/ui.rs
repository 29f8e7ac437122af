use crate::app::{App, GRID_COLUMNS};
use crate::calendar::{month_name, MONTH_NAMES};
use crate::editor::{EditorField, EditorOutcome, EntryEditor};
use crate::entry_store::EntryStore;
use crate::navigator::{MonthPicker, SelectedDate};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use unicode_width::UnicodeWidthChar;

pub enum Action {
    Move(i32, i32),
    OpenDay,
    PickMonth,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    pub fn display(&mut self, app: &App) -> Result<()> {
        self.terminal.draw(|f| {
            render_calendar(f, app);
        })?;
        Ok(())
    }

    pub fn handle_input(&self) -> Result<Option<Action>> {
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Left | KeyCode::Char('h') => Ok(Some(Action::Move(-1, 0))),
                KeyCode::Right | KeyCode::Char('l') => Ok(Some(Action::Move(1, 0))),
                KeyCode::Up | KeyCode::Char('k') => Ok(Some(Action::Move(0, -1))),
                KeyCode::Down | KeyCode::Char('j') => Ok(Some(Action::Move(0, 1))),
                KeyCode::Enter => Ok(Some(Action::OpenDay)),
                KeyCode::Char('m') => Ok(Some(Action::PickMonth)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Modal loop for one day's entry dialog. Returns how the session
    /// ended; the store is only written on save or delete.
    pub fn run_editor(
        &mut self,
        editor: &mut EntryEditor,
        store: &mut EntryStore,
        app: &App,
    ) -> Result<EditorOutcome> {
        loop {
            self.terminal.draw(|f| {
                render_calendar(f, app);
                render_editor_dialog(f, editor);
            })?;

            if let Event::Key(key) = event::read()? {
                match (key.code, key.modifiers) {
                    (KeyCode::Esc, _) => return Ok(EditorOutcome::Cancelled),
                    (KeyCode::Char('s'), modifiers)
                        if modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        if editor.save(store) {
                            return Ok(EditorOutcome::Saved);
                        }
                    }
                    (KeyCode::Char('d'), modifiers)
                        if modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        if editor.delete(store) {
                            return Ok(EditorOutcome::Deleted);
                        }
                    }
                    (KeyCode::Tab, _) => editor.focus_next(),
                    (KeyCode::BackTab, _) => editor.focus_prev(),
                    (KeyCode::Enter, _) => match editor.field {
                        EditorField::Content => editor.newline(),
                        EditorField::Tags => editor.commit_tag(),
                        EditorField::Mood => editor.cycle_mood(1),
                        EditorField::Title => editor.focus_next(),
                    },
                    (KeyCode::Up, _) => match editor.field {
                        EditorField::Mood => editor.cycle_mood(-1),
                        EditorField::Tags => editor.select_tag(-1),
                        _ => editor.focus_prev(),
                    },
                    (KeyCode::Down, _) => match editor.field {
                        EditorField::Mood => editor.cycle_mood(1),
                        EditorField::Tags => editor.select_tag(1),
                        _ => editor.focus_next(),
                    },
                    (KeyCode::Left, _) if editor.field == EditorField::Mood => {
                        editor.cycle_mood(-1)
                    }
                    (KeyCode::Right, _) if editor.field == EditorField::Mood => {
                        editor.cycle_mood(1)
                    }
                    (KeyCode::Delete, _) if editor.field == EditorField::Tags => {
                        editor.remove_selected_tag()
                    }
                    (KeyCode::Backspace, _) => editor.backspace(),
                    (KeyCode::Char(c), modifiers)
                        if !modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        editor.insert_char(c)
                    }
                    _ => {}
                }
            }
        }
    }

    /// Modal loop for the month-picker popup. Returns the chosen month, or
    /// None when dismissed; the calendar is untouched until then.
    pub fn run_picker(
        &mut self,
        picker: &mut MonthPicker,
        app: &App,
    ) -> Result<Option<SelectedDate>> {
        loop {
            self.terminal.draw(|f| {
                render_calendar(f, app);
                render_picker_popup(f, picker, app.selected);
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Enter => return Ok(Some(picker.select(picker.highlighted))),
                    KeyCode::Left => picker.highlight(-1),
                    KeyCode::Right => picker.highlight(1),
                    KeyCode::Up => picker.highlight(-3),
                    KeyCode::Down => picker.highlight(3),
                    KeyCode::Char('[') | KeyCode::PageUp => picker.shift_year(-1),
                    KeyCode::Char(']') | KeyCode::PageDown => picker.shift_year(1),
                    _ => {}
                }
            }
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        disable_raw_mode().unwrap();
        stdout().execute(LeaveAlternateScreen).unwrap();
    }
}

fn render_calendar(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Diary Calendar",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} {}",
            month_name(app.selected.month),
            app.selected.year
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    render_grid(f, chunks[1], app);

    let controls = match &app.status {
        Some(status) => Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red))),
        None => Line::from(vec![
            Span::raw("Arrows: Move, "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": Open day, "),
            Span::styled("m", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": Month picker, "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": Quit"),
        ]),
    };
    let controls_paragraph = Paragraph::new(controls)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(controls_paragraph, chunks[2]);
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let days = app.days();
    let rows = days.div_ceil(GRID_COLUMNS);

    let row_constraints: Vec<Constraint> = (0..rows).map(|_| Constraint::Length(3)).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    let col_constraints: Vec<Constraint> =
        (0..GRID_COLUMNS).map(|_| Constraint::Length(9)).collect();

    for row in 0..rows {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(row_areas[row as usize]);

        for col in 0..GRID_COLUMNS {
            let day = row * GRID_COLUMNS + col + 1;
            if day > days {
                break;
            }

            let mut style = Style::default();
            if app.filled.contains(&day) {
                style = style
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD);
            }
            if day == app.cursor_day {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let cell = Paragraph::new(day.to_string())
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(cell, cells[col as usize]);
        }
    }
}

fn render_editor_dialog(f: &mut Frame, editor: &EntryEditor) {
    let area = centered_rect(70, 90, f.area());
    f.render_widget(Clear, area);

    let dialog = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(
            "{}/{}/{}",
            editor.key.month + 1,
            editor.key.day,
            editor.key.year
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = dialog.inner(area);
    f.render_widget(dialog, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let focused = |field: EditorField| {
        if editor.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };
    let cursor = |field: EditorField| if editor.field == field { "|" } else { "" };

    let width = inner.width.saturating_sub(2);
    let title_text = format!(
        "{}{}",
        fit_tail(&editor.draft.title, width),
        cursor(EditorField::Title)
    );
    let title_input = Paragraph::new(title_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Title")
            .border_style(focused(EditorField::Title)),
    );
    f.render_widget(title_input, chunks[0]);

    let content_text = format!("{}{}", editor.draft.content, cursor(EditorField::Content));
    let content_input = Paragraph::new(content_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Content")
            .border_style(focused(EditorField::Content)),
    );
    f.render_widget(content_input, chunks[1]);

    let mood_line = if editor.draft.mood.is_empty() {
        Line::from(Span::styled(
            "Select your mood",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(editor.draft.mood.clone())
    };
    let mood_input = Paragraph::new(mood_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Mood (↑/↓ to change)")
            .border_style(focused(EditorField::Mood)),
    );
    f.render_widget(mood_input, chunks[2]);

    let mut tag_spans: Vec<Span> = Vec::new();
    for (i, tag) in editor.draft.tags.iter().enumerate() {
        let style = if editor.field == EditorField::Tags && i == editor.selected_tag {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Blue)
        };
        tag_spans.push(Span::styled(format!("[{tag}]"), style));
        tag_spans.push(Span::raw(" "));
    }
    let tags_lines = vec![
        Line::from(format!(
            "{}{}",
            fit_tail(&editor.tag_input, width),
            cursor(EditorField::Tags)
        )),
        Line::from(tag_spans),
    ];
    let tags_input = Paragraph::new(tags_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tags (Enter to add, Del to remove)")
            .border_style(focused(EditorField::Tags)),
    );
    f.render_widget(tags_input, chunks[3]);

    if let Some(notice) = &editor.notice {
        let notice_line = Paragraph::new(notice.clone())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(notice_line, chunks[4]);
    }

    let instructions = Paragraph::new("Tab: Next field, Ctrl-S: Save, Ctrl-D: Clear day, Esc: Cancel")
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[5]);
}

fn render_picker_popup(f: &mut Frame, picker: &MonthPicker, selected: SelectedDate) {
    let area = centered_rect(40, 50, f.area());
    f.render_widget(Clear, area);

    let popup = Block::default()
        .borders(Borders::ALL)
        .title("Pick a month");
    let inner = popup.inner(area);
    f.render_widget(popup, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let year_line = Paragraph::new(Line::from(vec![
        Span::raw("[ "),
        Span::styled(
            picker.browse_year.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ]"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(year_line, chunks[0]);

    let month_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4].as_ref())
        .split(chunks[1]);
    for row in 0..4u32 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3].as_ref())
            .split(month_rows[row as usize]);
        for col in 0..3u32 {
            let month = row * 3 + col;
            let mut style = Style::default();
            if picker.is_current(selected, month) {
                style = style
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }
            if month == picker.highlighted {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let label = Paragraph::new(Span::styled(&MONTH_NAMES[month as usize][..3], style))
                .alignment(Alignment::Center);
            f.render_widget(label, cols[col as usize]);
        }
    }

    let instructions = Paragraph::new("Arrows: Month, [/]: Year, Enter: Select, Esc: Close")
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[2]);
}

/// Centered popup rect taking the given percentages of the frame.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1]);
    horizontal[1]
}

/// Tail of `s` that fits in `max_width` terminal columns, so the end of a
/// long single-line input stays visible while typing. Width-aware because
/// the mood labels and free text may contain double-width characters.
fn fit_tail(s: &str, max_width: u16) -> String {
    let max = max_width as usize;
    let mut width = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in s.chars().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        tail.push(c);
    }
    tail.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_tail_keeps_the_end_of_long_input() {
        assert_eq!(fit_tail("abcdef", 4), "cdef");
        assert_eq!(fit_tail("abc", 10), "abc");
        assert_eq!(fit_tail("", 5), "");
    }

    #[test]
    fn fit_tail_counts_wide_characters_as_two_columns() {
        // the emoji is double-width, so only two fit in five columns with "x"
        assert_eq!(fit_tail("x😊😊😊", 5), "😊😊");
        assert_eq!(fit_tail("😊 Happy", 7), " Happy");
    }
}
