pub mod browser;
pub mod commands;
pub mod form;
pub mod menu;
pub mod preview;
pub mod setup;
pub mod tasks;
pub mod theme;
pub mod viewport;

use crate::config::app::{self, AppConfig};
use crate::config::workspace::{self, WorkspaceCommand};
use crate::deps;
use crate::install::{self, InstallMethod};
use crate::launcher::LaunchRequest;
use crate::tmux::{Multiplexer, Tmux};
use crate::util;
use anyhow::Result;
use browser::InlineInput;
use commands::{CommandBook, CommandsMode, CommandsOutcome, CommandsScreen};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use form::{Field, Form, FormOutcome};
use menu::{MenuItem, MenuOutcome};
use preview::{PreviewLine, PreviewOutcome, PreviewState};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use setup::{HelpOutcome, HelpView, InstallOutcome, InstallSelect, SetupItem, SetupOutcome, SetupState};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tasks::{Finished, Task, TaskKind, TaskRunner};
use theme::*;
use viewport::{
    BODY_MARGIN, HEADER_ROWS, KEY_HINT_ROWS, INLINE_INPUT_ROWS, MIN_ROWS, PATH_ROWS, STATUS_ROWS,
};
use tracing::{debug, info, warn};
use tui_input::Input;

type Frame<'a> = ratatui::Frame<'a>;

/// Title animation runs at this rate until it has drawn `ANIMATION_FRAMES`.
pub const ANIMATION_FPS: u64 = 60;
pub const ANIMATION_FRAMES: u16 = 90;
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Queries about the machine the wizard runs on.
pub trait SystemProbe {
    fn command_exists(&self, program: &str) -> bool;
    fn has_session(&self, name: &str) -> bool;
    fn plugins_installed(&self) -> bool;
    fn install_methods(&self) -> Vec<InstallMethod>;
}

/// Answers from `$PATH`, the tmux server and the home directory.
pub struct HostProbe {
    tmux: Tmux,
    home: PathBuf,
}

impl HostProbe {
    pub fn new(home: PathBuf) -> Self {
        HostProbe {
            tmux: Tmux::default(),
            home,
        }
    }
}

impl SystemProbe for HostProbe {
    fn command_exists(&self, program: &str) -> bool {
        deps::command_exists(program)
    }

    fn has_session(&self, name: &str) -> bool {
        self.tmux.has_session(name)
    }

    fn plugins_installed(&self) -> bool {
        install::plugins_installed(&self.home)
    }

    fn install_methods(&self) -> Vec<InstallMethod> {
        install::available_install_methods()
    }
}

/// Everything the wizard is seeded with at startup.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub start_dir: PathBuf,
    pub home: PathBuf,
    pub shared_dir: PathBuf,
    pub config: AppConfig,
    pub commands: Vec<WorkspaceCommand>,
}

/// Directories given on the command line; `None` means the default.
#[derive(Debug, Clone, Default)]
pub struct StartupDirs {
    pub start: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub shared: Option<PathBuf>,
}

impl AppContext {
    /// Resolve the startup directories and load saved settings. Never fails:
    /// a directory that cannot be resolved or created is logged and its
    /// settings fall back to defaults.
    pub fn resolve(dirs: StartupDirs) -> Self {
        let home = util::home_dir()
            .map_err(|err| warn!(error = %err, "falling back to the start directory as home"))
            .ok();
        let start = dirs.start.as_deref().or(home.as_deref()).unwrap_or(Path::new("."));
        let start_dir = util::absolute_path(start);
        let home = home.unwrap_or_else(|| start_dir.clone());

        let config_dir = dirs.config.unwrap_or_else(|| util::config_dir(&home));
        let config = match util::ensure_dir(&config_dir) {
            Ok(()) => app::load(&config_dir),
            Err(err) => {
                warn!(error = %format!("{:#}", err), "using default config");
                AppConfig::default()
            }
        };

        let shared_dir = dirs.shared.unwrap_or_else(|| util::shared_dir(&home));
        let commands = match util::ensure_dir(&shared_dir) {
            Ok(()) => workspace::load_commands(&shared_dir),
            Err(err) => {
                warn!(error = %format!("{:#}", err), "starting without saved commands");
                Vec::new()
            }
        };

        AppContext {
            start_dir,
            home,
            shared_dir,
            config,
            commands,
        }
    }
}

/// Input to [`App::update`]. Task completions arrive the same way keys do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
    TaskDone(Finished),
}

/// What the event loop must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Launch(LaunchRequest),
    Spawn(Task),
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu { cursor: usize },
    Form,
    Preview(PreviewState),
    Commands(CommandsScreen),
    Setup(SetupState),
    SetupHelp(HelpView),
    InstallMethodSelect(InstallSelect),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu { .. } => "menu",
            Screen::Form => "form",
            Screen::Preview(_) => "preview",
            Screen::Commands(_) => "commands",
            Screen::Setup(_) => "setup",
            Screen::SetupHelp(_) => "setup-help",
            Screen::InstallMethodSelect(_) => "install-method",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

pub fn run(ctx: AppContext) -> Result<Option<LaunchRequest>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let probe = HostProbe::new(ctx.home.clone());
    let mut app = App::new(ctx, Box::new(probe), size.width, size.height);
    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<Option<LaunchRequest>> {
    let runner = TaskRunner::default();
    let frame_rate = Duration::from_millis(1000 / ANIMATION_FPS);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            app.draw(f);
        })?;

        let tick_rate = if app.animating() { frame_rate } else { IDLE_TICK };
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        let mut events = Vec::new();
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => events.push(AppEvent::Key(key)),
                Event::Resize(w, h) => events.push(AppEvent::Resize(w, h)),
                _ => {}
            }
        }
        events.extend(runner.drain().into_iter().map(AppEvent::TaskDone));

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if app.animating() {
                events.push(AppEvent::Tick);
            }
        }

        for ev in events {
            match app.update(ev) {
                Some(Effect::Quit) => return Ok(None),
                Some(Effect::Launch(req)) => return Ok(Some(req)),
                Some(Effect::Spawn(task)) => runner.spawn(task),
                None => {}
            }
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub form: Form,
    pub commands: CommandBook,
    pub status: Option<Status>,
    pub anim_frame: u16,
    pub tasks_in_flight: usize,
    /// A tmux install is running; the picker refuses to start another.
    pub install_running: bool,
    width: u16,
    height: u16,
    home: PathBuf,
    probe: Box<dyn SystemProbe>,
}

impl App {
    pub fn new(ctx: AppContext, probe: Box<dyn SystemProbe>, width: u16, height: u16) -> Self {
        App {
            screen: Screen::Menu { cursor: 0 },
            form: Form::new(
                &ctx.start_dir,
                height,
                ctx.config.terminal_options,
                ctx.config.agent_options,
            ),
            commands: CommandBook::new(ctx.shared_dir, ctx.commands),
            status: None,
            anim_frame: 0,
            tasks_in_flight: 0,
            install_running: false,
            width,
            height,
            home: ctx.home,
            probe,
        }
    }

    pub fn animating(&self) -> bool {
        self.anim_frame < ANIMATION_FRAMES
    }

    fn goto(&mut self, screen: Screen) {
        debug!(from = self.screen.name(), to = screen.name(), "screen change");
        self.screen = screen;
    }

    fn set_status(&mut self, msg: &str, is_error: bool) {
        self.status = Some(Status {
            text: msg.to_string(),
            is_error,
        });
    }

    fn spawn(&mut self, task: Task) -> Option<Effect> {
        self.tasks_in_flight += 1;
        if task.kind() == TaskKind::Tmux {
            self.install_running = true;
        }
        self.set_status(&format!("{}...", task.label()), false);
        Some(Effect::Spawn(task))
    }

    pub fn update(&mut self, event: AppEvent) -> Option<Effect> {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Resize(width, height) => {
                self.width = width;
                self.height = height;
                self.form.browser.set_height(height);
                if let Screen::SetupHelp(view) = &mut self.screen {
                    view.resize(width, height);
                }
                None
            }
            AppEvent::Tick => {
                if self.animating() {
                    self.anim_frame += 1;
                }
                None
            }
            AppEvent::TaskDone(done) => {
                self.on_task_done(done);
                None
            }
        }
    }

    /// Applied whatever screen is showing. The install picker only moves on
    /// when the tmux install it is waiting for finishes.
    fn on_task_done(&mut self, done: Finished) {
        let Finished { kind, outcome } = done;
        self.tasks_in_flight = self.tasks_in_flight.saturating_sub(1);
        info!(?kind, error = outcome.is_error(), "task finished: {}", outcome.text());
        self.set_status(outcome.text(), outcome.is_error());
        if kind != TaskKind::Tmux {
            return;
        }
        self.install_running = false;
        if matches!(self.screen, Screen::InstallMethodSelect(_)) {
            self.goto(Screen::Setup(SetupState::at(SetupItem::InstallTmux)));
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Effect::Quit);
        }

        match self.screen {
            Screen::Menu { .. } => self.on_menu_key(key),
            Screen::Form => self.on_form_key(key),
            Screen::Preview(_) => self.on_preview_key(key),
            Screen::Commands(_) => self.on_commands_key(key),
            Screen::Setup(_) => self.on_setup_key(key),
            Screen::SetupHelp(_) => self.on_help_key(key),
            Screen::InstallMethodSelect(_) => self.on_install_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::Menu { cursor } = &mut self.screen else {
            return None;
        };
        match menu::handle_key(cursor, key) {
            MenuOutcome::Handled => None,
            MenuOutcome::Quit => Some(Effect::Quit),
            MenuOutcome::Open(MenuItem::NewWorkspace) => {
                self.form.back_to_browser();
                self.goto(Screen::Form);
                None
            }
            MenuOutcome::Open(MenuItem::Setup) => {
                self.goto(Screen::Setup(SetupState::default()));
                None
            }
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match self.form.handle_key(key) {
            FormOutcome::Handled => {}
            FormOutcome::Back => self.goto(Screen::Menu { cursor: 0 }),
            FormOutcome::OpenCommands => {
                self.goto(Screen::Commands(CommandsScreen::new(self.form.focus)));
            }
            FormOutcome::Preview => {
                let custom = self.commands.selected().map(|c| c.command.clone());
                let request = self.form.launch_request(custom);
                let state = PreviewState::check(request, self.probe.as_ref());
                self.goto(Screen::Preview(state));
            }
            FormOutcome::Error(msg) => self.set_status(&msg, true),
        }
        None
    }

    fn on_preview_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::Preview(state) = &mut self.screen else {
            return None;
        };
        match state.handle_key(key, self.probe.as_ref()) {
            PreviewOutcome::Handled => None,
            PreviewOutcome::Quit => Some(Effect::Quit),
            PreviewOutcome::Back => {
                self.form.focus = Field::SessionName;
                self.goto(Screen::Form);
                None
            }
            PreviewOutcome::Launch(request) => Some(Effect::Launch(request)),
        }
    }

    fn on_commands_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::Commands(screen) = &mut self.screen else {
            return None;
        };
        match screen.handle_key(key, &mut self.commands) {
            CommandsOutcome::Handled => None,
            CommandsOutcome::Quit => Some(Effect::Quit),
            CommandsOutcome::Back(field) => {
                self.form.focus = field;
                self.goto(Screen::Form);
                None
            }
            CommandsOutcome::Error(msg) => {
                self.set_status(&msg, true);
                None
            }
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::Setup(state) = &mut self.screen else {
            return None;
        };
        match state.handle_key(key, self.probe.as_ref(), &self.home) {
            SetupOutcome::Handled => None,
            SetupOutcome::Quit => Some(Effect::Quit),
            SetupOutcome::Back => {
                self.goto(Screen::Menu { cursor: 1 });
                None
            }
            SetupOutcome::OpenHelp(item) => {
                let view = HelpView::new(item, self.width, self.height);
                self.goto(Screen::SetupHelp(view));
                None
            }
            SetupOutcome::OpenInstall => {
                let mut select = InstallSelect::new(self.probe.install_methods());
                select.running = self.install_running;
                self.goto(Screen::InstallMethodSelect(select));
                None
            }
            SetupOutcome::Spawn(task) => self.spawn(task),
        }
    }

    fn on_help_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::SetupHelp(view) = &mut self.screen else {
            return None;
        };
        let item = view.item;
        match view.handle_key(key) {
            HelpOutcome::Handled => None,
            HelpOutcome::Quit => Some(Effect::Quit),
            HelpOutcome::Back => {
                self.goto(Screen::Setup(SetupState::at(item)));
                None
            }
        }
    }

    fn on_install_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let Screen::InstallMethodSelect(select) = &mut self.screen else {
            return None;
        };
        match select.handle_key(key) {
            InstallOutcome::Handled => None,
            InstallOutcome::Quit => Some(Effect::Quit),
            InstallOutcome::Back => {
                self.goto(Screen::Setup(SetupState::at(SetupItem::InstallTmux)));
                None
            }
            InstallOutcome::Spawn(_) if self.install_running => None,
            InstallOutcome::Spawn(task) => self.spawn(task),
        }
    }

    fn draw(&self, f: &mut Frame) {
        let size = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_ROWS),
                Constraint::Min(0),
                Constraint::Length(STATUS_ROWS),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);

        let background = Block::default().style(Style::default().bg(SURFACE_BG));
        f.render_widget(background, chunks[1]);
        let body = chunks[1].inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: BODY_MARGIN,
        });

        match &self.screen {
            Screen::Menu { cursor } => self.draw_menu(f, body, *cursor),
            Screen::Form => self.draw_form(f, body),
            Screen::Preview(state) => self.draw_preview(f, body, state),
            Screen::Commands(screen) => self.draw_commands(f, body, screen),
            Screen::Setup(state) => {
                self.draw_setup(f, body, state);
                if let Some(dialog) = &state.dialog {
                    self.draw_dialog(f, dialog);
                }
            }
            Screen::SetupHelp(view) => self.draw_help(f, body, view),
            Screen::InstallMethodSelect(select) => self.draw_install_select(f, body, select),
        }

        self.draw_status(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(LIGHT_BORDER))
            .style(Style::default().bg(HEADER_BG));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        let title = Paragraph::new(animated_title(self.anim_frame, ANIMATION_FRAMES))
            .style(Style::default().bg(HEADER_BG));
        f.render_widget(title, cols[0]);

        let crumb = Paragraph::new(Line::from(Span::styled(
            self.screen.name(),
            Style::default().fg(DIM_TEXT),
        )))
        .alignment(Alignment::Right)
        .style(Style::default().bg(HEADER_BG));
        f.render_widget(crumb, cols[1]);

        let nav = Paragraph::new(hints(&[("Ctrl+C", "quit"), ("Esc", "back")]))
            .alignment(Alignment::Center)
            .style(Style::default().bg(HEADER_BG));
        f.render_widget(nav, rows[1]);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if self.tasks_in_flight > 0 {
            spans.push(Span::styled("◐ ", Style::default().fg(ACCENT)));
        }
        match &self.status {
            Some(status) => {
                let color = if status.is_error {
                    ERROR_COLOR
                } else {
                    SUCCESS_COLOR
                };
                let first_line = status.text.lines().next().unwrap_or_default();
                spans.push(Span::styled(
                    util::truncate_width(first_line, area.width.saturating_sub(4) as usize),
                    Style::default().fg(color),
                ));
            }
            None => {
                spans.push(hint_text("Ready  "));
                spans.push(Span::styled("|  ", Style::default().fg(LIGHT_BORDER)));
                spans.push(key_hint("Ctrl+C"));
                spans.push(hint_text(" quit"));
            }
        }
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(LIGHT_BORDER))
            .style(Style::default().bg(HEADER_BG));
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_menu(&self, f: &mut Frame, area: Rect, cursor: usize) {
        let area = centered_rect(60, 60, area);
        let mut lines = vec![Line::from("")];
        for (idx, item) in MenuItem::ALL.iter().enumerate() {
            let selected = idx == cursor;
            let marker = if selected { "▸ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{}{}", marker, item.title()),
                if selected {
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", item.description()),
                Style::default().fg(DIM_TEXT),
            )));
            lines.push(Line::from(""));
        }
        lines.push(hints(&[("↑/↓", "move"), ("Enter", "select"), ("q", "quit")]));
        let para = Paragraph::new(lines)
            .block(panel("Menu", true))
            .wrap(Wrap { trim: false });
        f.render_widget(para, area);
    }

    fn draw_form(&self, f: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        self.draw_browser(f, cols[0]);
        self.draw_fields(f, cols[1]);
    }

    fn draw_browser(&self, f: &mut Frame, area: Rect) {
        let browser = &self.form.browser;
        let focused = self.form.is_focused(Field::Directory);
        let block = panel("Directory", focused);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut constraints = vec![
            Constraint::Length(PATH_ROWS),
            Constraint::Min(MIN_ROWS as u16),
        ];
        if browser.inline().is_active() {
            constraints.push(Constraint::Length(INLINE_INPUT_ROWS));
        }
        constraints.push(Constraint::Length(KEY_HINT_ROWS));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let path = util::truncate_path_front(
            &util::display_path(browser.path()),
            inner.width.saturating_sub(2) as usize,
        );
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("📁 ", Style::default().fg(ACCENT)),
                Span::styled(path, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            ])),
            rows[0],
        );

        let viewport = browser.viewport();
        let mut lines = Vec::new();
        if browser.filtered().is_empty() {
            lines.push(Line::from(Span::styled(
                if browser.query().is_empty() {
                    "(empty)"
                } else {
                    "(no matches)"
                },
                Style::default().fg(DIM_TEXT),
            )));
        }
        for idx in viewport.range() {
            let Some(entry) = browser.filtered().get(idx) else {
                break;
            };
            let selected = idx == browser.cursor();
            let icon = if entry.is_dir { "▸ " } else { "  " };
            let name = if entry.is_dir && !entry.is_parent() {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = match (selected, entry.is_dir) {
                (true, _) => Style::default()
                    .fg(ACCENT)
                    .bg(ACCENT_HIGHLIGHT_BG)
                    .add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(DIM_TEXT),
            };
            lines.push(Line::from(Span::styled(format!("{}{}", icon, name), style)));
        }
        if viewport.end < browser.filtered().len() {
            lines.push(Line::from(Span::styled(
                format!("  ↓ {} more", browser.filtered().len() - viewport.end),
                Style::default().fg(DIM_TEXT),
            )));
        }
        f.render_widget(Paragraph::new(lines), rows[1]);

        let mut next = 2;
        match browser.inline() {
            InlineInput::Search(input) => {
                self.draw_input(f, rows[next], "Search", input, true, "type to filter");
                next += 1;
            }
            InlineInput::Create(input) => {
                self.draw_input(f, rows[next], "New directory", input, true, "name");
                next += 1;
            }
            InlineInput::None => {}
        }

        let help = match browser.inline() {
            InlineInput::Search(_) => hints(&[
                ("↑/↓", "move"),
                ("Enter", "explore"),
                ("Tab", "choose"),
                ("Esc", "clear"),
            ]),
            InlineInput::Create(_) => hints(&[("Enter", "create"), ("Esc", "cancel")]),
            InlineInput::None => hints(&[
                ("↑/↓", "move"),
                ("←/→", "up/into"),
                ("Enter", "choose"),
                ("s", "search"),
                ("n", "new dir"),
            ]),
        };
        if let Some(area) = rows.get(next) {
            f.render_widget(Paragraph::new(help), *area);
        }
    }

    fn draw_input(
        &self,
        f: &mut Frame,
        area: Rect,
        label: &str,
        input: &Input,
        focused: bool,
        placeholder: &str,
    ) {
        let width = area.width.saturating_sub(2) as usize;
        let scroll = input.visual_scroll(width);
        let content = if input.value().is_empty() && !focused {
            Span::styled(placeholder.to_string(), Style::default().fg(DIM_TEXT))
        } else {
            Span::styled(input.value().to_string(), Style::default().fg(Color::White))
        };
        let para = Paragraph::new(content)
            .scroll((0, scroll as u16))
            .block(panel(label, focused));
        f.render_widget(para, area);
        if focused {
            let x = area.x + 1 + (input.visual_cursor().saturating_sub(scroll)) as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn draw_selector(&self, f: &mut Frame, area: Rect, label: &str, value: &str, pos: (usize, usize), focused: bool) {
        let line = Line::from(vec![
            Span::styled("< ", Style::default().fg(ACCENT_DIM)),
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" >", Style::default().fg(ACCENT_DIM)),
            Span::styled(
                format!("   {}/{}", pos.0 + 1, pos.1),
                Style::default().fg(DIM_TEXT),
            ),
        ]);
        f.render_widget(Paragraph::new(line).block(panel(label, focused)), area);
    }

    fn draw_fields(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);
        let form = &self.form;

        self.draw_input(
            f,
            rows[0],
            "Session name",
            &form.session,
            form.is_focused(Field::SessionName),
            form::DEFAULT_SESSION_NAME,
        );
        self.draw_selector(
            f,
            rows[1],
            "Terminal",
            form.terminal.value(),
            (form.terminal.index(), form.terminal.len()),
            form.is_focused(Field::Terminal),
        );
        self.draw_selector(
            f,
            rows[2],
            "Agent",
            form.agent.value(),
            (form.agent.index(), form.agent.len()),
            form.is_focused(Field::Agent),
        );

        let custom = match self.commands.selected() {
            Some(cmd) => Span::styled(
                format!("{}  ({})", cmd.name, cmd.command),
                Style::default().fg(CODE_COLOR),
            ),
            None => Span::styled("none  (press c to choose)", Style::default().fg(DIM_TEXT)),
        };
        f.render_widget(
            Paragraph::new(Line::from(custom)).block(panel("Workspace command", false)),
            rows[3],
        );

        let btn_focused = form.is_focused(Field::Launch);
        let btn = Paragraph::new(Span::styled(
            "Preview & Launch",
            Style::default()
                .fg(if btn_focused { ACCENT } else { Color::White })
                .add_modifier(if btn_focused {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
        ))
        .block(panel("", btn_focused))
        .alignment(Alignment::Center);
        f.render_widget(btn, rows[4]);

        let help = if form.is_focused(Field::SessionName) {
            hints(&[("Enter", "next"), ("Esc", "directory")])
        } else {
            hints(&[
                ("Tab", "move"),
                ("←/→", "choose"),
                ("c", "commands"),
                ("Esc", "directory"),
            ])
        };
        f.render_widget(Paragraph::new(help).wrap(Wrap { trim: true }), rows[5]);
    }

    fn draw_preview(&self, f: &mut Frame, area: Rect, state: &PreviewState) {
        let lines: Vec<Line> = state
            .lines()
            .into_iter()
            .map(|line| match line {
                PreviewLine::Blank => Line::from(""),
                PreviewLine::Heading(text) => Line::from(Span::styled(
                    text,
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )),
                PreviewLine::Text(text) => {
                    Line::from(Span::styled(text, Style::default().fg(Color::White)))
                }
                PreviewLine::Dependency { name, available } => {
                    let (mark, color) = if available {
                        ("✓", SUCCESS_COLOR)
                    } else {
                        ("✗", ERROR_COLOR)
                    };
                    Line::from(vec![
                        Span::styled(format!("  {} ", mark), Style::default().fg(color)),
                        Span::styled(name, Style::default().fg(Color::White)),
                    ])
                }
                PreviewLine::Blocker(text) => Line::from(Span::styled(
                    format!("⚠ {}", text),
                    Style::default().fg(WARNING_COLOR),
                )),
                PreviewLine::Hint(text) => {
                    Line::from(Span::styled(text, Style::default().fg(DIM_TEXT)))
                }
                PreviewLine::Link(url) => Line::from(Span::styled(
                    format!("  {}", url),
                    Style::default().fg(CODE_COLOR),
                )),
            })
            .collect();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let para = Paragraph::new(lines)
            .block(panel("Preview", true))
            .scroll((state.scroll, 0));
        f.render_widget(para, rows[0]);

        let help = if state.can_launch() {
            hints(&[("Enter", "launch"), ("↑/↓", "scroll"), ("Esc", "back")])
        } else {
            hints(&[("↑/↓", "scroll"), ("Esc", "back and fix")])
        };
        f.render_widget(Paragraph::new(help).alignment(Alignment::Center), rows[1]);
    }

    fn draw_commands(&self, f: &mut Frame, area: Rect, screen: &CommandsScreen) {
        let area = centered_rect(80, 90, area);
        match &screen.mode {
            CommandsMode::Adding(add) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(0),
                    ])
                    .split(area);
                for (idx, label) in commands::AddForm::LABELS.iter().enumerate() {
                    self.draw_input(f, rows[idx], label, &add.inputs[idx], add.focus == idx, "");
                }
                f.render_widget(
                    Paragraph::new(hints(&[("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")])),
                    rows[3],
                );
            }
            CommandsMode::Listing => {
                let mut lines = Vec::new();
                if self.commands.items().is_empty() {
                    lines.push(Line::from(Span::styled(
                        "No workspace commands yet. Press a to add one.",
                        Style::default().fg(DIM_TEXT),
                    )));
                }
                for (idx, cmd) in self.commands.items().iter().enumerate() {
                    let highlighted = idx == screen.cursor;
                    let chosen = self.commands.selected_index() == Some(idx);
                    lines.push(Line::from(vec![
                        Span::styled(
                            if highlighted { "▸ " } else { "  " },
                            Style::default().fg(ACCENT),
                        ),
                        Span::styled(
                            cmd.name.clone(),
                            if highlighted {
                                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                            } else {
                                Style::default().fg(Color::White)
                            },
                        ),
                        Span::styled(
                            if chosen { "  ✓" } else { "" },
                            Style::default().fg(SUCCESS_COLOR),
                        ),
                    ]));
                    let detail = if cmd.description.is_empty() {
                        cmd.command.clone()
                    } else {
                        format!("{}  ·  {}", cmd.command, cmd.description)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("    {}", detail),
                        Style::default().fg(DIM_TEXT),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(hints(&[
                    ("Enter", "use"),
                    ("a", "add"),
                    ("d", "delete"),
                    ("x", "clear choice"),
                    ("Esc", "back"),
                ]));
                let para = Paragraph::new(lines)
                    .block(panel("Workspace commands", true))
                    .wrap(Wrap { trim: false });
                f.render_widget(para, area);
            }
        }
    }

    fn draw_setup(&self, f: &mut Frame, area: Rect, state: &SetupState) {
        let area = centered_rect(70, 80, area);
        let mut lines = vec![Line::from("")];
        for (idx, item) in SetupItem::ALL.iter().enumerate() {
            let selected = idx == state.cursor;
            lines.push(Line::from(Span::styled(
                format!("{}{}", if selected { "▸ " } else { "  " }, item.title()),
                if selected {
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", item.description()),
                Style::default().fg(DIM_TEXT),
            )));
            lines.push(Line::from(""));
        }
        lines.push(hints(&[
            ("Enter", "select"),
            ("?", "help"),
            ("Esc", "menu"),
            ("q", "quit"),
        ]));
        let para = Paragraph::new(lines).block(panel("Setup Assistant", true));
        f.render_widget(para, area);
    }

    fn draw_dialog(&self, f: &mut Frame, dialog: &setup::Dialog) {
        let area = centered_rect(60, 50, f.area());
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", dialog.title),
                Style::default().fg(WARNING_COLOR).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(WARNING_COLOR))
            .style(Style::default().bg(SURFACE_BG));

        let mut lines = vec![Line::from("")];
        lines.extend(
            dialog
                .body
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White)))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                dialog.confirm_key.to_string(),
                Style::default().fg(SUCCESS_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}  ", dialog.confirm_text), Style::default().fg(DIM_TEXT)),
            Span::styled(
                dialog.cancel_key.to_string(),
                Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", dialog.cancel_text), Style::default().fg(DIM_TEXT)),
        ]));
        let text = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        f.render_widget(Clear, area);
        f.render_widget(text, area);
    }

    fn draw_help(&self, f: &mut Frame, area: Rect, view: &HelpView) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(Span::styled(
                view.item.title(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            rows[0],
        );
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("{:>3}%", view.percent()),
                Style::default().fg(Color::Rgb(255, 121, 198)).add_modifier(Modifier::BOLD),
            )),
            rows[1],
        );

        let lines: Vec<Line> = view.visible().iter().map(|l| markdown_line(l)).collect();
        f.render_widget(Paragraph::new(lines).block(panel("Help", true)), rows[2]);
        f.render_widget(
            Paragraph::new(hints(&[
                ("↑/↓ j/k", "scroll"),
                ("PgUp/PgDn", "page"),
                ("g/G", "top/bottom"),
                ("Esc/?", "back"),
            ])),
            rows[3],
        );
    }

    fn draw_install_select(&self, f: &mut Frame, area: Rect, select: &InstallSelect) {
        let area = centered_rect(70, 80, area);
        let mut lines = vec![Line::from("")];
        if select.methods.is_empty() {
            lines.push(Line::from(Span::styled(
                "No supported installation method was found on this system.",
                Style::default().fg(WARNING_COLOR),
            )));
            lines.push(Line::from(Span::styled(
                format!("See {}", install::TMUX_WIKI_URL),
                Style::default().fg(CODE_COLOR),
            )));
        }
        for (idx, method) in select.methods.iter().enumerate() {
            let selected = idx == select.cursor;
            lines.push(Line::from(Span::styled(
                format!("{}{}", if selected { "▸ " } else { "  " }, method.name),
                if selected {
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", method.description),
                Style::default().fg(DIM_TEXT),
            )));
            if selected {
                lines.push(Line::from(Span::styled(
                    format!("    $ {} {}", method.command, method.args.join(" ")),
                    Style::default().fg(CODE_COLOR),
                )));
            }
        }
        lines.push(Line::from(""));
        if select.running {
            lines.push(Line::from(Span::styled(
                "◐ Installing... this may take a while",
                Style::default().fg(ACCENT),
            )));
        } else {
            lines.push(hints(&[("Enter", "install"), ("Esc", "back"), ("q", "quit")]));
        }
        let para = Paragraph::new(lines)
            .block(panel("Install tmux", true))
            .wrap(Wrap { trim: false });
        f.render_widget(para, area);
    }
}

/// Light styling for the bundled help pages.
fn markdown_line(line: &str) -> Line<'static> {
    if let Some(rest) = line.strip_prefix("# ") {
        return Line::from(Span::styled(
            rest.to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Line::from(Span::styled(
            rest.to_string(),
            Style::default().fg(Color::Rgb(139, 233, 253)).add_modifier(Modifier::BOLD),
        ));
    }
    let mut spans = Vec::new();
    let body = match line.strip_prefix("- ") {
        Some(rest) => {
            spans.push(Span::styled("• ", Style::default().fg(SUCCESS_COLOR)));
            rest
        }
        None => line,
    };
    // odd segments sit between backticks
    for (idx, part) in body.split('`').enumerate() {
        let style = if idx % 2 == 1 {
            Style::default().fg(CODE_COLOR)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(part.to_string(), style));
    }
    Line::from(spans)
}
