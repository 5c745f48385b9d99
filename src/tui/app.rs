// src/tui/app.rs - TUI application state, event loop, and rendering.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::api::AnalysisApi;
use crate::cli::AppContext;
use crate::pages::auth::{self, LoginForm, SignupForm};
use crate::pages::dashboard::{self, DashboardPage};
use crate::pages::detail::{DetailPage, DetailTab};
use crate::pages::mypage::MyPage;
use crate::router::{self, analysis_path, Page, DASHBOARD_PATH, LOGIN_PATH, MYPAGE_PATH, SIGNUP_PATH};
use crate::upload::UploadedFile;

use super::theme::Theme;
use super::widgets;

// ── Screens ──────────────────────────────────────────────────────

enum Screen {
    Login {
        form: LoginForm,
        focus_password: bool,
    },
    Signup {
        form: SignupForm,
        /// 0 name, 1 email, 2 password, 3 confirmation.
        focus: usize,
    },
    Dashboard {
        page: DashboardPage,
        input: String,
    },
    MyPage {
        page: MyPage,
        password_focus: usize,
    },
    Detail {
        page: DetailPage,
    },
}

/// Network work queued by a key press. It runs after the next draw so the
/// screen shows the loading state first.
#[derive(Debug)]
enum Action {
    Login,
    Signup,
    Upload(UploadedFile),
    LoadProfile,
    ToggleHistory,
    ChangePassword,
    LoadDetail,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Login => "Logging in...",
            Action::Signup => "Creating account...",
            Action::Upload(_) => "Analyzing...",
            Action::LoadProfile => "Loading profile...",
            Action::ToggleHistory => "Loading history...",
            Action::ChangePassword => "Changing password...",
            Action::LoadDetail => "Loading analysis...",
        }
    }
}

// ── App state ────────────────────────────────────────────────────

struct App {
    ctx: AppContext,
    screen: Screen,
    /// One-shot hint carried across a navigation.
    notice: Option<String>,
    pending: Option<Action>,
    quit: bool,
}

impl App {
    fn new(ctx: AppContext, start: &str) -> Self {
        let mut app = Self {
            ctx,
            screen: Screen::Dashboard {
                page: DashboardPage::new(),
                input: String::new(),
            },
            notice: None,
            pending: None,
            quit: false,
        };
        app.navigate(start);
        app
    }

    /// Route `path` through the session guard and open the resulting page.
    fn navigate(&mut self, path: &str) {
        let page = router::resolve_page(path, self.ctx.session.is_authenticated());
        tracing::debug!("Navigate {path} -> {page}");
        self.pending = None;
        self.screen = match page {
            Page::Login => Screen::Login {
                form: LoginForm::default(),
                focus_password: false,
            },
            Page::Signup => Screen::Signup {
                form: SignupForm::default(),
                focus: 0,
            },
            Page::Dashboard => Screen::Dashboard {
                page: DashboardPage::new(),
                input: String::new(),
            },
            Page::MyPage => {
                self.pending = Some(Action::LoadProfile);
                Screen::MyPage {
                    page: MyPage::new(),
                    password_focus: 0,
                }
            }
            Page::AnalysisDetail { id } => {
                self.pending = Some(Action::LoadDetail);
                Screen::Detail {
                    page: DetailPage::new(id),
                }
            }
        };
    }

    fn logout(&mut self) {
        match auth::logout(&mut self.ctx.session) {
            Ok(redirect) => {
                self.navigate(redirect.path);
                self.notice = Some("Logged out.".into());
            }
            Err(e) => tracing::warn!("Logout failed: {e:#}"),
        }
    }

    // ── Pending work ─────────────────────────────────────────────

    async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let App { ctx, screen, .. } = &mut *self;
        let mut redirect = None;

        match (action, screen) {
            (Action::Login, Screen::Login { form, .. }) => {
                redirect = form.submit(&mut ctx.session, &ctx.client).await;
            }
            (Action::Signup, Screen::Signup { form, .. }) => {
                redirect = form.submit(&ctx.client).await;
            }
            (Action::Upload(file), Screen::Dashboard { page, .. }) => {
                let outcome = dashboard::upload(&ctx.session, &ctx.client, &file).await;
                page.finish_analysis(outcome);
            }
            (Action::LoadProfile, Screen::MyPage { page, .. }) => {
                page.load_profile(&mut ctx.session, &ctx.client).await;
            }
            (Action::ToggleHistory, Screen::MyPage { page, .. }) => {
                page.toggle_history(&ctx.session, &ctx.client).await;
            }
            (Action::ChangePassword, Screen::MyPage { page, .. }) => {
                page.change_password(&ctx.session, &ctx.client).await;
            }
            (Action::LoadDetail, Screen::Detail { page }) => {
                page.load(&ctx.session, &ctx.client).await;
            }
            (action, _) => tracing::debug!("Dropping {action:?}: screen changed"),
        }

        if let Some(r) = redirect {
            self.navigate(r.path);
            self.notice = r.notice.map(str::to_string);
        }
    }

    // ── Keys ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        // Input is ignored while a request is queued.
        if self.pending.is_some() {
            return;
        }
        match &self.screen {
            Screen::Login { .. } => self.login_key(key),
            Screen::Signup { .. } => self.signup_key(key),
            Screen::Dashboard { .. } => self.dashboard_key(key),
            Screen::MyPage { .. } => self.mypage_key(key),
            Screen::Detail { .. } => self.detail_key(key),
        }
    }

    fn login_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.navigate(SIGNUP_PATH);
            return;
        }
        let Screen::Login {
            form,
            focus_password,
        } = &mut self.screen
        else {
            return;
        };
        let field = if *focus_password {
            &mut form.password
        } else {
            &mut form.email
        };
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                *focus_password = !*focus_password
            }
            KeyCode::Enter => self.pending = Some(Action::Login),
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Char(c) => field.push(c),
            _ => {}
        }
    }

    fn signup_key(&mut self, key: KeyEvent) {
        let Screen::Signup { form, focus } = &mut self.screen else {
            return;
        };
        let field = match *focus {
            0 => &mut form.name,
            1 => &mut form.email,
            2 => &mut form.password,
            _ => &mut form.confirm_password,
        };
        match key.code {
            KeyCode::Esc => self.navigate(LOGIN_PATH),
            KeyCode::Tab | KeyCode::Down => *focus = (*focus + 1) % 4,
            KeyCode::BackTab | KeyCode::Up => *focus = (*focus + 3) % 4,
            KeyCode::Enter => self.pending = Some(Action::Signup),
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Char(c) => field.push(c),
            _ => {}
        }
    }

    /// Time-based housekeeping, run once per loop iteration.
    fn tick(&mut self, now: Instant) {
        if let Screen::MyPage { page, .. } = &mut self.screen {
            page.expire_notice(now);
        }
    }

    fn dashboard_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Screen::Dashboard { page, input } = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('r') if ctrl => {
                page.reset();
                input.clear();
            }
            KeyCode::Char('p') if ctrl => self.navigate(MYPAGE_PATH),
            KeyCode::Char('l') if ctrl => self.logout(),
            KeyCode::Char('o') if ctrl => {
                if let Some(id) = page.result().and_then(|r| r.analysis_id) {
                    self.navigate(&analysis_path(&id.to_string()));
                }
            }
            KeyCode::Enter => {
                let path = input.trim();
                if !path.is_empty() {
                    page.select_path(Path::new(path));
                    if page.error().is_some() {
                        return;
                    }
                }
                if let Some(file) = page.begin_analysis() {
                    self.pending = Some(Action::Upload(file));
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !ctrl => input.push(c),
            _ => {}
        }
    }

    fn mypage_key(&mut self, key: KeyEvent) {
        let Screen::MyPage {
            page,
            password_focus,
        } = &mut self.screen
        else {
            return;
        };

        if page.password.open {
            let dialog = &mut page.password;
            let field = match *password_focus {
                0 => &mut dialog.current_password,
                1 => &mut dialog.new_password,
                _ => &mut dialog.confirm_password,
            };
            match key.code {
                KeyCode::Esc => dialog.close(),
                KeyCode::Tab | KeyCode::Down => *password_focus = (*password_focus + 1) % 3,
                KeyCode::BackTab | KeyCode::Up => *password_focus = (*password_focus + 2) % 3,
                KeyCode::Enter => self.pending = Some(Action::ChangePassword),
                KeyCode::Backspace => {
                    field.pop();
                }
                KeyCode::Char(c) => field.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('d') => self.navigate(DASHBOARD_PATH),
            KeyCode::Char('h') => {
                page.dismiss_notice();
                self.pending = Some(Action::ToggleHistory);
            }
            KeyCode::Char('r') => self.pending = Some(Action::LoadProfile),
            KeyCode::Char('p') => {
                page.dismiss_notice();
                page.password.open();
                *password_focus = 0;
            }
            KeyCode::Char('L') => self.logout(),
            KeyCode::Down | KeyCode::Char('j') => page.select_next(),
            KeyCode::Up | KeyCode::Char('k') => page.select_prev(),
            KeyCode::Enter => {
                if let Some(path) = page.selected_detail_path() {
                    self.navigate(&path);
                }
            }
            _ => {}
        }
    }

    fn detail_key(&mut self, key: KeyEvent) {
        let origin = self.ctx.client.analysis_origin().to_string();
        let Screen::Detail { page } = &mut self.screen else {
            return;
        };
        if page.lightbox().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                page.close_lightbox();
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.navigate(MYPAGE_PATH),
            KeyCode::Char('d') => self.navigate(DASHBOARD_PATH),
            KeyCode::Char('1') => page.select_tab(DetailTab::Charts),
            KeyCode::Char('2') => page.select_tab(DetailTab::Statistics),
            KeyCode::Char('3') => page.select_tab(DetailTab::Preview),
            KeyCode::Tab | KeyCode::Right => page.next_tab(),
            KeyCode::BackTab | KeyCode::Left => page.prev_tab(),
            KeyCode::Down | KeyCode::Char('j') => page.select_next_chart(),
            KeyCode::Up | KeyCode::Char('k') => page.select_prev_chart(),
            KeyCode::Enter if page.tab() == DetailTab::Charts => page.open_selected_chart(&origin),
            _ => {}
        }
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the TUI at `start`. Blocks until the user quits (Esc / q / Ctrl-C).
pub async fn run_ui(ctx: AppContext, start: &str) -> anyhow::Result<()> {
    let mut app = App::new(ctx, start);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    while !app.quit {
        app.tick(Instant::now());
        terminal.draw(|f| render(f, app))?;

        if app.pending.is_some() {
            app.run_pending().await;
            continue;
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Page
            Constraint::Length(1), // Footer / key hints
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_page(f, chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let right = if app.ctx.session.is_authenticated() {
        DashboardPage::greeting(&app.ctx.session)
    } else {
        "Not logged in".to_string()
    };
    let mut spans = vec![Span::styled(format!(" {right}"), Theme::text())];
    if let Some(n) = &app.notice {
        spans.push(Span::styled(format!("   {n}"), Theme::success()));
    }
    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(" Drop & See ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_page(f: &mut Frame, area: Rect, app: &App) {
    let origin = app.ctx.client.analysis_origin();
    match &app.screen {
        Screen::Login {
            form,
            focus_password,
        } => widgets::login::render(f, area, form, *focus_password, app.notice.as_deref()),
        Screen::Signup { form, focus } => widgets::signup::render(f, area, form, *focus),
        Screen::Dashboard { page, input } => {
            widgets::dashboard::render(f, area, page, input, origin)
        }
        Screen::MyPage {
            page,
            password_focus,
        } => {
            let profile = page.profile_view(&app.ctx.session);
            widgets::mypage::render(f, area, page, &profile, *password_focus)
        }
        Screen::Detail { page } => widgets::detail::render(
            f,
            area,
            &page.view(origin, app.ctx.config.ui.preview_rows),
        ),
    }
}

fn footer_hints(screen: &Screen) -> &'static [(&'static str, &'static str)] {
    match screen {
        Screen::Login { .. } => &[
            ("Esc", "quit"),
            ("Tab", "switch field"),
            ("Enter", "log in"),
            ("^N", "sign up"),
        ],
        Screen::Signup { .. } => &[("Esc", "back to login"), ("Tab", "next field"), ("Enter", "sign up")],
        Screen::Dashboard { .. } => &[
            ("Esc", "quit"),
            ("Enter", "analyze"),
            ("^R", "reset"),
            ("^O", "open details"),
            ("^P", "my page"),
            ("^L", "log out"),
        ],
        Screen::MyPage { .. } => &[
            ("q", "quit"),
            ("Esc", "dashboard"),
            ("h", "history"),
            ("j/k", "select"),
            ("Enter", "open"),
            ("p", "password"),
            ("L", "log out"),
        ],
        Screen::Detail { .. } => &[
            ("q", "quit"),
            ("Esc", "back"),
            ("1-3", "tab"),
            ("j/k", "chart"),
            ("Enter", "enlarge"),
        ],
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.pending {
        Some(action) => Line::from(Span::styled(format!(" {}", action.label()), Theme::warning())),
        None => Line::from(
            footer_hints(&app.screen)
                .iter()
                .flat_map(|(key, desc)| {
                    [
                        Span::styled(format!(" {key}"), Theme::key_hint()),
                        Span::styled(format!(" {desc} "), Theme::key_desc()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };
    f.render_widget(Paragraph::new(line), area);
}
