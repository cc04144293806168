use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;
use tokio::runtime::Runtime;

use crate::api::TodoApi;
use crate::models::{FormField, FormState, StatusFilter, StatusLabel, Task};
use crate::shell::Shell;
use crate::store::Store;

pub struct App<'a, A> {
    runtime: &'a Runtime,
    pub shell: Shell<A>,
    pub table_state: TableState,
    pub should_quit: bool,
}

impl<'a, A: TodoApi> App<'a, A> {
    pub fn new(runtime: &'a Runtime, shell: Shell<A>) -> Self {
        App {
            runtime,
            shell,
            table_state: TableState::default(),
            should_quit: false,
        }
    }

    /// Load with the active filter. Failures are already on the error line.
    pub fn refresh(&mut self, filter: StatusFilter) {
        let _ = self.runtime.block_on(self.shell.list(filter));
        self.clamp_cursor();
    }

    pub fn highlighted(&self) -> Option<Task> {
        self.table_state
            .selected()
            .and_then(|i| self.shell.store().tasks().get(i))
            .cloned()
    }

    pub fn next_item(&mut self) {
        let len = self.shell.store().tasks().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.shell.store().tasks().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn clamp_cursor(&mut self) {
        let len = self.shell.store().tasks().len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn press_primary(&mut self) {
        let _ = self.runtime.block_on(self.shell.press_primary());
        self.clamp_cursor();
    }

    pub fn edit_highlighted(&mut self) {
        if let Some(task) = self.highlighted() {
            self.shell.begin_edit(&task);
        }
    }

    /// Flip the highlighted task: send the label opposite to the one shown.
    pub fn toggle_highlighted(&mut self) {
        if let Some(task) = self.highlighted() {
            let label = StatusLabel::from_status(task.status).toggled();
            let _ = self.runtime.block_on(self.shell.toggle_status(&task, label));
            self.clamp_cursor();
        }
    }

    pub fn delete_highlighted(&mut self) {
        if let Some(task) = self.highlighted() {
            let _ = self.runtime.block_on(self.shell.delete(&task));
            self.clamp_cursor();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.shell.store().is_form_open() {
            match key.code {
                KeyCode::Esc => self.shell.cancel(),
                KeyCode::Enter => self.press_primary(),
                KeyCode::Up => self.previous_item(),
                KeyCode::Down => self.next_item(),
                // re-target the open edit at the highlighted row
                KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.edit_highlighted()
                }
                KeyCode::Tab => self.shell.store_mut().next_field(),
                KeyCode::Backspace => self.shell.store_mut().pop_char(),
                KeyCode::Char(c) => self.shell.store_mut().push_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Down => {
                self.next_item();
            }
            KeyCode::Up => {
                self.previous_item();
            }
            KeyCode::Char('n') | KeyCode::Enter => {
                self.press_primary();
            }
            KeyCode::Char('e') => {
                self.edit_highlighted();
            }
            KeyCode::Char(' ') | KeyCode::Char('s') => {
                self.toggle_highlighted();
            }
            KeyCode::Char('d') => {
                self.delete_highlighted();
            }
            KeyCode::Char('a') => self.refresh(StatusFilter::All),
            KeyCode::Char('c') => self.refresh(StatusFilter::Completed),
            KeyCode::Char('p') => self.refresh(StatusFilter::Pending),
            KeyCode::Char('r') => {
                let filter = self.shell.store().filter();
                self.refresh(filter);
            }
            _ => {}
        }
    }
}

pub fn run_tui<A: TodoApi>(runtime: &Runtime, shell: Shell<A>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(runtime, shell);
    app.refresh(StatusFilter::All);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, A: TodoApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, A>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app.shell.store(), &mut app.table_state))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

pub fn ui(f: &mut Frame, store: &Store, table_state: &mut TableState) {
    let error_height = if store.error().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(error_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    let titles: Vec<Line> = StatusFilter::ALL
        .iter()
        .map(|filter| Line::from(filter.label()))
        .collect();
    let selected_tab = StatusFilter::ALL
        .iter()
        .position(|filter| *filter == store.filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Task list"))
        .select(selected_tab)
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Black),
        );
    f.render_widget(tabs, chunks[0]);

    render_tasks(f, store, table_state, chunks[1]);

    if let Some(message) = store.error() {
        let error = Paragraph::new(message).style(Style::default().fg(Color::Red));
        f.render_widget(error, chunks[2]);
    }

    f.render_widget(Paragraph::new(footer_text(store)), chunks[3]);

    if store.is_form_open() {
        render_form(f, store);
    }
}

fn footer_text(store: &Store) -> Line<'static> {
    if store.is_form_open() {
        Line::from(vec![
            Span::styled("[Confirm]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Enter  Tab: next field  Up/Down + Ctrl+E: edit other task  Esc: cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[+ New task]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" n  e: edit  space: status  d: delete  a/c/p: filter  r: refresh  q: quit"),
        ])
    }
}

fn render_tasks(f: &mut Frame, store: &Store, table_state: &mut TableState, area: Rect) {
    let rows: Vec<Row> = store
        .tasks()
        .iter()
        .map(|task| {
            let label = StatusLabel::from_status(task.status);
            let status_color = if label.is_completed() {
                Color::Green
            } else {
                Color::Yellow
            };
            Row::new(vec![
                Cell::from(label.as_str()).style(Style::default().fg(status_color)),
                Cell::from(task.name.clone()),
                Cell::from(task.description.clone()),
                Cell::from(task.due_date.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(30),
        Constraint::Percentage(45),
        Constraint::Length(12),
    ];
    let header = Row::new(vec!["Status", "Name", "Description", "Due date"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, table_state);
}

fn render_form(f: &mut Frame, store: &Store) {
    let area = centered_rect(60, 40, f.area());
    let title = match store.form() {
        FormState::Edit(task) => format!("Edit task #{}", task.id),
        _ => "New task".to_string(),
    };

    let draft = store.draft();
    let fields = [
        (FormField::Name, "Name", &draft.name),
        (FormField::Description, "Description", &draft.description),
        (FormField::DueDate, "Due date (YYYY-MM-DD)", &draft.due_date),
    ];
    let lines: Vec<Line> = fields
        .iter()
        .map(|(field, label, value)| {
            let style = if *field == draft.focus {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::raw(format!("{label}: ")),
                Span::styled(value.to_string(), style),
            ])
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
