//! Hearth TUI - Terminal settings screen
//!
//! Usage: `hearth-tui [entity] [category]`, defaulting to the global
//! defaults on the general page.

use std::sync::Mutex;

use anyhow::Context;
use ratatui::{
    Frame, Terminal,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, List, ListItem, ListState, Paragraph},
};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearth_core::prelude::*;

type Backend = ratatui::backend::CrosstermBackend<std::io::Stdout>;

fn main() -> anyhow::Result<()> {
    let ctx = AppContext::with_defaults()?;

    // Logs go to a file; the terminal belongs to the screen.
    std::fs::create_dir_all(ctx.config_dir())
        .with_context(|| format!("Failed to create {}", ctx.config_dir().display()))?;
    let log_path = ctx.config_dir().join("hearth-tui.log");
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearth_tui=debug,hearth_core=debug,info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let entity = args.next().unwrap_or_else(|| "default".to_string());
    let category = args.next().unwrap_or_else(|| "general".to_string());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start async runtime")?;
    let mut app = App::new(&ctx, NavigationContext::new(entity, category))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the TUI
    let res = run_tui(&mut terminal, &runtime, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.close();
    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

struct App {
    screen: SettingsScreen<LocalGateway>,
    category: Option<SettingsCategory>,
    list: ListState,
    status: Option<String>,
}

impl App {
    fn new(ctx: &AppContext, nav: NavigationContext) -> anyhow::Result<Self> {
        let gateway = ctx.local_gateway();
        let runner = if nav.entity_id.is_default() {
            Runner::default()
        } else {
            gateway
                .load_library()?
                .get(nav.entity_id.as_str())
                .map(|entry| entry.runner)
                .unwrap_or_default()
        };
        let options = MountOptions {
            runner,
            ..MountOptions::default()
        };
        let screen = SettingsScreen::mount(
            gateway,
            &nav,
            options,
            ctx.environment(),
            ctx.language(),
        );
        let category = screen.selection().category;
        Ok(Self {
            screen,
            category,
            list: ListState::default().with_selected(Some(0)),
            status: None,
        })
    }

    /// Selection with the page the user has tabbed to.
    fn selection(&self) -> ScopeSelection {
        ScopeSelection {
            category: self.category,
            ..self.screen.selection().clone()
        }
    }

    fn fields(&self) -> Vec<FieldName> {
        self.selection().visible_fields()
    }

    fn selected_field(&self) -> Option<FieldName> {
        let fields = self.fields();
        self.list.selected().and_then(|i| fields.get(i).copied())
    }

    fn next_category(&mut self) {
        let scope = self.screen.selection().scope.clone();
        let available: Vec<SettingsCategory> = SettingsCategory::available(&scope).collect();
        let next = match self.category.and_then(|c| available.iter().position(|a| *a == c)) {
            Some(index) => available[(index + 1) % available.len()],
            None => available[0],
        };
        self.category = Some(next);
        self.list.select(Some(0));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.fields().len();
        if len == 0 {
            self.list.select(None);
            return;
        }
        let current = self.list.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.list.select(Some(next));
    }

    /// Apply one edit as its own turn.
    fn edit(&mut self, edit: impl FnOnce(&mut SettingsBuffer, FieldName) -> Result<bool, SettingsError>) {
        let Some(field) = self.selected_field() else {
            return;
        };
        self.status = match self.screen.turn(|buffer| edit(buffer, field)) {
            Ok(_) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    fn copy(&mut self) {
        if self.selection().context_actions().is_empty() {
            return;
        }
        self.status = Some(match self.screen.copy_to_clipboard() {
            Ok(_) => "Copied settings to clipboard".to_string(),
            Err(err) => format!("Copy failed: {err:#}"),
        });
    }

    fn reveal(&mut self) {
        if self.selection().context_actions().is_empty() {
            return;
        }
        if let Err(err) = self.screen.reveal_config_file() {
            self.status = Some(format!("Could not open config folder: {err:#}"));
        }
    }

    fn close(self) {
        let gateway = self.screen.close();
        tracing::debug!(store = %gateway.store_dir().display(), "settings screen closed");
    }
}

fn run_tui(terminal: &mut Terminal<Backend>, runtime: &Runtime, app: &mut App) -> anyhow::Result<()> {
    terminal.draw(|f| ui(f, app))?;
    runtime.block_on(app.screen.load());

    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.screen.is_loading() {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') if matches!(app.screen.load_state(), LoadState::Failed(_)) => {
                    terminal.draw(|f| ui(f, app))?;
                    runtime.block_on(app.screen.load());
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Esc => {
                if app.screen.write_notice().is_some() || app.status.is_some() {
                    app.screen.dismiss_notice();
                    app.status = None;
                } else {
                    return Ok(());
                }
            }
            KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
            KeyCode::Tab => app.next_category(),
            KeyCode::Char(' ') | KeyCode::Enter => app.edit(|buffer, field| buffer.toggle(field)),
            KeyCode::Char('+') | KeyCode::Right => app.edit(|buffer, field| buffer.step(field, 1)),
            KeyCode::Char('-') | KeyCode::Left => app.edit(|buffer, field| buffer.step(field, -1)),
            KeyCode::Char('c') => app.copy(),
            KeyCode::Char('o') => app.reveal(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(f.area());

    let selection = app.selection();
    let buffer = app.screen.buffer();

    let Some(title) = buffer.title() else {
        let text = match app.screen.load_state() {
            LoadState::Failed(reason) => format!("Failed to load settings: {reason}\n\nr: retry  q: quit"),
            _ => "Loading settings...".to_string(),
        };
        let paragraph = Paragraph::new(text)
            .block(Block::bordered().title("Hearth Settings"))
            .centered();
        f.render_widget(paragraph, f.area());
        return;
    };

    let tabs: Vec<String> = SettingsCategory::available(&selection.scope)
        .map(|category| {
            if Some(category) == selection.category {
                format!("[{category}]")
            } else {
                category.to_string()
            }
        })
        .collect();
    let heading = Paragraph::new(Line::from(tabs.join("  "))).block(
        Block::bordered()
            .title(format!(" {title} "))
            .title_bottom(format!(" back: {} ", selection.return_target.path())),
    );
    f.render_widget(heading, header);

    let items: Vec<ListItem> = selection
        .visible_fields()
        .into_iter()
        .map(|field| {
            let value = buffer
                .get(field)
                .map(|v| v.to_string())
                .unwrap_or_default();
            ListItem::new(format!("{:<24} {}", field.as_str(), value))
        })
        .collect();
    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::bordered())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    if empty {
        f.render_widget(
            Paragraph::new("Nothing to edit on this page").block(Block::bordered()),
            body,
        );
    } else {
        f.render_stateful_widget(list, body, &mut app.list);
    }

    let (message, style) = if let Some(notice) = app.screen.write_notice() {
        (notice.to_string(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status {
        (status.clone(), Style::default().fg(Color::Yellow))
    } else if let Some(issue) = buffer.fields().issues().first() {
        (format!("{}: {}", issue.field, issue.message), Style::default().fg(Color::Yellow))
    } else {
        let mut help = "↑↓ select  space toggle  +/- adjust  tab page".to_string();
        if !selection.context_actions().is_empty() {
            help.push_str("  c copy  o open folder");
        }
        help.push_str("  q quit");
        (help, Style::default())
    };
    f.render_widget(
        Paragraph::new(message).style(style).block(Block::bordered()),
        footer,
    );
}
