use crate::api::HttpAdminApi;
use crate::clock::SystemClock;
use crate::config::{ModelInputMode, MonitorConfig};
use crate::controller::{
    fetch_cycle, test_outcome_from_task, CycleData, DashboardState, EventEntry, LoadingIndicator,
    LogLevel, RefreshController, RefreshOutcome, RefreshTicket,
};
use crate::error::AppError;
use crate::form::{FormField, TestForm};
use crate::models::{ProviderStatus, TestOutcome};
use crate::ui::app::{AppState, Focus, Screen};
use crate::ui::panels::{
    cost_rows, provider_detail_rows, rate_limit_rows, stats_rows, test_output_lines, Rows,
    ESTIMATE_DISCLAIMER,
};
use crate::view::ModelOptions;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const COLOR_ACCENT: Color = Color::Cyan;
const COLOR_INFO: Color = Color::Green;
const COLOR_MUTED: Color = Color::DarkGray;
const COLOR_HEADER: Color = Color::White;
const COLOR_ERROR: Color = Color::Red;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct RefreshJob {
    ticket: RefreshTicket,
    handle: JoinHandle<Result<CycleData, AppError>>,
}

struct TestJob {
    started_at: Instant,
    handle: JoinHandle<Result<TestOutcome, AppError>>,
}

pub async fn run_tui(cfg: MonitorConfig) -> Result<(), AppError> {
    let api = Arc::new(HttpAdminApi::from_config(&cfg)?);
    let mut controller = RefreshController::new(api, Arc::new(SystemClock), &cfg);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let loop_result = run_loop(&mut terminal, &cfg, &mut controller).await;

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    loop_result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: &MonitorConfig,
    controller: &mut RefreshController,
) -> Result<(), AppError> {
    let mut app = AppState::default();
    let mut refresh_job: Option<RefreshJob> = None;
    let mut test_job: Option<TestJob> = None;
    let tick_rate = cfg.refresh_interval();
    let mut last_tick = Instant::now();

    start_refresh(controller, &mut app, &mut refresh_job, true);

    while app.running {
        if refresh_job
            .as_ref()
            .is_some_and(|job| job.handle.is_finished())
        {
            finish_refresh(controller, &mut app, &mut refresh_job).await;
        }
        if test_job
            .as_ref()
            .is_some_and(|job| job.handle.is_finished())
        {
            finish_test(controller, &mut app, &mut test_job).await;
        }

        terminal.draw(|f| render(f, cfg, &app, controller.state()))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO)
            .min(POLL_INTERVAL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(
                    key.code,
                    key.modifiers,
                    &mut app,
                    controller,
                    &mut refresh_job,
                    &mut test_job,
                );
            }
        }

        if last_tick.elapsed() >= tick_rate {
            // a cycle still in flight covers this tick
            if refresh_job.is_none() {
                start_refresh(controller, &mut app, &mut refresh_job, false);
            }
            last_tick = Instant::now();
        }
    }

    if let Some(job) = refresh_job.take() {
        job.handle.abort();
    }
    if let Some(job) = test_job.take() {
        job.handle.abort();
    }
    Ok(())
}

fn start_refresh(
    controller: &mut RefreshController,
    app: &mut AppState,
    refresh_job: &mut Option<RefreshJob>,
    manual: bool,
) {
    let Some(ticket) = controller.begin_refresh(manual) else {
        if manual {
            app.status = "refresh paused while the test form is in use".into();
        }
        return;
    };
    if let Some(stale) = refresh_job.take() {
        stale.handle.abort();
    }

    let api = controller.api();
    let mode = controller.mode();
    let handle = tokio::spawn(async move { fetch_cycle(api.as_ref(), mode).await });
    app.status = match ticket.indicator() {
        LoadingIndicator::FullScreen => "loading...".into(),
        _ => "refreshing...".into(),
    };
    *refresh_job = Some(RefreshJob { ticket, handle });
}

async fn finish_refresh(
    controller: &mut RefreshController,
    app: &mut AppState,
    refresh_job: &mut Option<RefreshJob>,
) {
    let Some(job) = refresh_job.take() else {
        return;
    };
    let result = job
        .handle
        .await
        .unwrap_or_else(|e| Err(AppError::Task(e.to_string())));

    let previous = app
        .selected_provider(&controller.state().view)
        .map(str::to_string);
    match controller.complete_refresh(job.ticket, result) {
        RefreshOutcome::Committed => app.status = "ok".into(),
        RefreshOutcome::Failed(_) => app.status = "refresh failed".into(),
        RefreshOutcome::Stale | RefreshOutcome::Skipped => {}
    }
    app.reselect(previous.as_deref(), &controller.state().view);
}

fn start_test(
    controller: &mut RefreshController,
    app: &mut AppState,
    test_job: &mut Option<TestJob>,
    provider: Option<&str>,
) {
    if test_job.is_some() {
        app.status = "A test request is already running.".into();
        return;
    }
    let request = match provider {
        Some(name) => controller.test_specific_provider(name),
        None => controller.begin_test(),
    };
    let Some(request) = request else {
        app.status = "test not sent".into();
        return;
    };

    app.status = if request.provider.is_empty() {
        "testing auto-selected provider...".into()
    } else {
        format!("testing '{}'...", request.provider)
    };
    let api = controller.api();
    let handle = tokio::spawn(async move { api.run_test(&request).await });
    *test_job = Some(TestJob {
        started_at: Instant::now(),
        handle,
    });
}

async fn finish_test(
    controller: &mut RefreshController,
    app: &mut AppState,
    test_job: &mut Option<TestJob>,
) {
    let Some(job) = test_job.take() else {
        return;
    };
    let elapsed = job.started_at.elapsed();
    let outcome = test_outcome_from_task(job.handle.await);
    app.status = match &outcome {
        TestOutcome::Success { .. } => format!("test finished in {}ms", elapsed.as_millis()),
        TestOutcome::Failure { .. } => "test failed".into(),
        TestOutcome::NetworkError { .. } => "test failed: network error".into(),
    };
    controller.finish_test(outcome);
}

fn handle_key(
    code: KeyCode,
    modifiers: KeyModifiers,
    app: &mut AppState,
    controller: &mut RefreshController,
    refresh_job: &mut Option<RefreshJob>,
    test_job: &mut Option<TestJob>,
) {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        app.screen = Screen::ConfirmQuit;
        app.confirm_selected = 0;
        return;
    }

    match app.screen.clone() {
        Screen::ConfirmQuit => match code {
            KeyCode::Esc => app.screen = Screen::Dashboard,
            KeyCode::Left => {
                if app.confirm_selected > 0 {
                    app.confirm_selected -= 1;
                }
            }
            KeyCode::Right => {
                if app.confirm_selected < 1 {
                    app.confirm_selected += 1;
                }
            }
            KeyCode::Enter => {
                if app.confirm_selected == 0 {
                    app.screen = Screen::Dashboard;
                } else {
                    app.running = false;
                }
            }
            _ => {}
        },
        Screen::Detail { provider } => match code {
            KeyCode::Esc | KeyCode::Enter => app.screen = Screen::Dashboard,
            KeyCode::Char('c') => app.screen = Screen::Cost { provider },
            KeyCode::Char('t') => {
                app.screen = Screen::Dashboard;
                start_test(controller, app, test_job, Some(&provider));
            }
            _ => {}
        },
        Screen::Cost { .. } => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                app.screen = Screen::Dashboard;
            }
        }
        Screen::Dashboard => match app.focus {
            Focus::Providers => handle_dashboard_key(code, app, controller, refresh_job, test_job),
            Focus::Form(field) => handle_form_key(code, field, app, controller, test_job),
        },
    }
}

fn handle_dashboard_key(
    code: KeyCode,
    app: &mut AppState,
    controller: &mut RefreshController,
    refresh_job: &mut Option<RefreshJob>,
    test_job: &mut Option<TestJob>,
) {
    let selected = app
        .selected_provider(&controller.state().view)
        .map(str::to_string);
    match code {
        KeyCode::Char('q') => {
            app.screen = Screen::ConfirmQuit;
            app.confirm_selected = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection(false, controller.state().view.providers().len())
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection(true, controller.state().view.providers().len())
        }
        KeyCode::Char('r') => start_refresh(controller, app, refresh_job, true),
        KeyCode::Char('t') => {
            if let Some(provider) = selected {
                start_test(controller, app, test_job, Some(&provider));
            }
        }
        KeyCode::Enter | KeyCode::Char('d') => {
            if let Some(provider) = selected {
                app.screen = Screen::Detail { provider };
            }
        }
        KeyCode::Char('c') => {
            if let Some(provider) = selected {
                app.screen = Screen::Cost { provider };
            }
        }
        KeyCode::Tab => {
            app.focus = Focus::Form(FormField::Provider);
            controller.focus_form();
        }
        KeyCode::Esc => controller.dismiss_banner(),
        _ => {}
    }
}

fn handle_form_key(
    code: KeyCode,
    field: FormField,
    app: &mut AppState,
    controller: &mut RefreshController,
    test_job: &mut Option<TestJob>,
) {
    match code {
        KeyCode::Esc => leave_form(app, controller),
        KeyCode::Tab | KeyCode::Down => match field.next() {
            Some(next) => app.focus = Focus::Form(next),
            None if code == KeyCode::Tab => leave_form(app, controller),
            None => {}
        },
        KeyCode::BackTab | KeyCode::Up => match field.prev() {
            Some(prev) => app.focus = Focus::Form(prev),
            None if code == KeyCode::BackTab => leave_form(app, controller),
            None => {}
        },
        KeyCode::Enter => start_test(controller, app, test_job, None),
        KeyCode::Left | KeyCode::Right => {
            let forward = code == KeyCode::Right;
            let state = controller.state_mut();
            match field {
                FormField::Provider => state.form.cycle_provider(forward, &state.catalog),
                FormField::Model => state.form.cycle_model(forward),
                FormField::Message => {}
            }
        }
        KeyCode::Backspace => controller.state_mut().form.backspace(field),
        KeyCode::Char(c) => controller.state_mut().form.input_char(field, c),
        _ => {}
    }
}

fn leave_form(app: &mut AppState, controller: &mut RefreshController) {
    app.focus = Focus::Providers;
    controller.leave_form();
}

fn render(f: &mut ratatui::Frame, cfg: &MonitorConfig, app: &AppState, state: &DashboardState) {
    let size = f.area();
    let banner_height = if state.banner.is_some() { 3 } else { 0 };

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(2),
        ])
        .split(size);

    let updating = if state.loading == LoadingIndicator::Inline {
        "  ·  updating..."
    } else {
        ""
    };
    let header = Paragraph::new(format!(
        " llm-monitor  ·  {}  ·  {}  ·  last refresh {}{} ",
        cfg.base_url,
        app.status,
        state.last_refresh_label(),
        updating
    ))
    .block(Block::default().borders(Borders::ALL).title(" Gateway "))
    .style(Style::default().fg(COLOR_HEADER));
    f.render_widget(header, root[0]);

    if let Some(banner) = &state.banner {
        let (title, color) = match banner.level {
            LogLevel::Error => (" Error (Esc to dismiss) ", COLOR_ERROR),
            LogLevel::Info => (" Notice (Esc to dismiss) ", COLOR_INFO),
        };
        let banner = Paragraph::new(banner.message.clone())
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(color));
        f.render_widget(banner, root[1]);
    }

    render_kpis(f, root[2], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(root[3]);
    render_provider_table(f, body[0], app, state);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Min(4),
        ])
        .split(body[1]);
    render_stats(f, side[0], state);
    render_test_form(f, side[1], app, state);

    let output = Paragraph::new(
        test_output_lines(state.test.panel())
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>(),
    )
    .block(Block::default().borders(Borders::ALL).title(" Test Result "))
    .wrap(Wrap { trim: false });
    f.render_widget(output, side[2]);

    render_events(f, root[4], &state.events);

    let footer = Paragraph::new(footer_text(app))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(COLOR_MUTED));
    f.render_widget(footer, root[5]);

    if state.loading == LoadingIndicator::FullScreen {
        render_loading(f);
    }

    match &app.screen {
        Screen::Dashboard => {}
        Screen::Detail { provider } => render_detail(f, state, provider),
        Screen::Cost { provider } => render_cost(f, cfg, state, provider),
        Screen::ConfirmQuit => render_confirm(f, app),
    }
}

fn render_kpis(f: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let kpis = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let (requests, avg) = match &state.stats {
        Some(stats) => (
            stats.metrics.total_requests.to_string(),
            format!("{:.0}ms", stats.metrics.avg_response_time),
        ),
        None => ("--".into(), "--".into()),
    };
    let cards = [
        (" Providers ", state.view.total_providers().to_string(), COLOR_ACCENT),
        (" Healthy ", state.view.healthy_providers().to_string(), COLOR_INFO),
        (" Requests ", requests, COLOR_ACCENT),
        (" Avg Response ", avg, COLOR_ACCENT),
    ];
    for (idx, (title, value, color)) in cards.into_iter().enumerate() {
        let card = Paragraph::new(value)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(card, kpis[idx]);
    }
}

fn status_color(status: ProviderStatus) -> Color {
    match status {
        ProviderStatus::Healthy => COLOR_INFO,
        ProviderStatus::Unhealthy => COLOR_ERROR,
        ProviderStatus::Unknown => COLOR_MUTED,
    }
}

fn render_provider_table(f: &mut ratatui::Frame, area: Rect, app: &AppState, state: &DashboardState) {
    let focused = app.focus == Focus::Providers;
    let rows = state
        .view
        .providers()
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let style = if idx == app.provider_selected && focused {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(p.display_name()),
                Cell::from(p.status.as_label())
                    .style(Style::default().fg(status_color(p.status))),
                Cell::from(p.requests.to_string()),
                Cell::from(p.tokens.to_string()),
                Cell::from(format!("{:.0}ms", p.avg_response_time)),
                Cell::from(p.usage_badge().unwrap_or("")),
            ])
            .style(style)
        })
        .collect::<Vec<_>>();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(16),
            Constraint::Percentage(15),
            Constraint::Percentage(17),
            Constraint::Percentage(16),
            Constraint::Percentage(12),
        ],
    )
    .header(
        Row::new(vec!["Provider", "Status", "Requests", "Tokens", "Avg", ""]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(Block::default().borders(Borders::ALL).title(" Providers "));
    f.render_widget(table, area);
}

fn rows_to_lines(rows: Rows) -> Vec<Line<'static>> {
    rows.into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(COLOR_MUTED)),
                Span::raw(value),
            ])
        })
        .collect()
}

fn render_stats(f: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let mut lines = match &state.stats {
        Some(stats) => {
            let mut lines = rows_to_lines(stats_rows(stats));
            if let Some(rate) = rate_limit_rows(stats.rate_limit.as_ref()) {
                lines.extend(rows_to_lines(rate));
            }
            lines
        }
        None => vec![Line::from("No data yet.")],
    };
    lines.push(Line::from(Span::styled(
        format!("Model catalog: {}", state.catalog.source().as_label()),
        Style::default().fg(COLOR_MUTED),
    )));

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" System "));
    f.render_widget(panel, area);
}

fn model_display(form: &TestForm) -> String {
    match form.mode() {
        ModelInputMode::FreeText => form.model_value(),
        ModelInputMode::Catalog => match form.model_options() {
            ModelOptions::Available { options, .. } => options
                .get(form.model_index())
                .map(|o| o.label())
                .unwrap_or_default(),
            ModelOptions::Disabled { placeholder } => placeholder.to_string(),
        },
    }
}

fn form_line(label: &str, value: &str, active: bool, enabled: bool) -> Line<'static> {
    let prefix = if active { "> " } else { "  " };
    let style = if active {
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else if !enabled {
        Style::default().fg(COLOR_MUTED)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(prefix.to_string(), style),
        Span::styled(format!("{label}: {value}"), style),
    ])
}

fn render_test_form(f: &mut ratatui::Frame, area: Rect, app: &AppState, state: &DashboardState) {
    let form = &state.form;
    let active = |field: FormField| app.focus == Focus::Form(field);
    let selectable = form.mode() == ModelInputMode::Catalog;

    let provider = format!("< {} >", form.provider().label());
    let model = if selectable && form.model_enabled() {
        format!("< {} >", model_display(form))
    } else {
        model_display(form)
    };
    let trigger_style = if state.test.is_busy() {
        Style::default().fg(COLOR_MUTED)
    } else {
        Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        form_line("Provider", &provider, active(FormField::Provider), true),
        form_line("Model", &model, active(FormField::Model), form.model_enabled()),
        form_line("Message", form.message(), active(FormField::Message), true),
        Line::from(Span::styled(
            format!("  [{}]", state.test.trigger_label()),
            trigger_style,
        )),
    ];
    let title = if app.focus.in_form() {
        " Test Request (editing, refresh paused) "
    } else {
        " Test Request "
    };
    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(panel, area);
}

fn format_event_line(entry: &EventEntry) -> Line<'static> {
    let (level, color) = match entry.level {
        LogLevel::Info => ("INFO", COLOR_HEADER),
        LogLevel::Error => ("ERROR", COLOR_ERROR),
    };
    let suffix = entry
        .duration
        .map(|d| format!(" dur={}ms", d.as_millis()))
        .unwrap_or_default();

    Line::from(Span::styled(
        format!(
            "[{}] {} {} - {}{}",
            entry.ts, level, entry.event, entry.detail, suffix
        ),
        Style::default().fg(color),
    ))
}

fn render_events(f: &mut ratatui::Frame, area: Rect, events: &[EventEntry]) {
    let visible = (area.height.saturating_sub(2) as usize).max(1);
    let start = events.len().saturating_sub(visible);
    let mut lines: Vec<Line<'static>> = events[start..].iter().map(format_event_line).collect();
    if lines.is_empty() {
        lines.push(Line::from("No activity yet."));
    }
    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Activity "))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn footer_text(app: &AppState) -> &'static str {
    match (&app.screen, app.focus) {
        (Screen::Dashboard, Focus::Providers) => {
            "Up/Down select | Enter/d details | c cost | t test provider | Tab test form | r refresh | Esc dismiss | q quit"
        }
        (Screen::Dashboard, Focus::Form(_)) => {
            "Tab/Shift+Tab field | Left/Right choose | type to edit | Enter send test | Esc leave form"
        }
        (Screen::Detail { .. }, _) => "t test this provider | c cost | Enter/Esc close",
        (Screen::Cost { .. }, _) => "Enter/Esc close",
        (Screen::ConfirmQuit, _) => "Left/Right choose | Enter confirm | Esc cancel",
    }
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

fn render_loading(f: &mut ratatui::Frame) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from("Loading dashboard data..."),
    ])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center)
    .style(Style::default().fg(COLOR_ACCENT));
    f.render_widget(content, area);
}

fn render_detail(f: &mut ratatui::Frame, state: &DashboardState, provider: &str) {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let lines = match state.view.find(provider) {
        Some(record) => rows_to_lines(provider_detail_rows(record)),
        None => vec![Line::from("Provider is no longer reported by the gateway.")],
    };
    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} Details ", provider.to_uppercase())),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn render_cost(f: &mut ratatui::Frame, cfg: &MonitorConfig, state: &DashboardState, provider: &str) {
    let area = centered_rect(60, 55, f.area());
    f.render_widget(Clear, area);

    let mut lines = match state.view.find(provider) {
        Some(record) => rows_to_lines(cost_rows(record, &cfg.pricing_overrides)),
        None => vec![Line::from("Provider is no longer reported by the gateway.")],
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        ESTIMATE_DISCLAIMER,
        Style::default().fg(Color::Yellow),
    )));

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} Cost Estimate ", provider.to_uppercase())),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn render_confirm(f: &mut ratatui::Frame, app: &AppState) {
    let area = centered_rect(56, 30, f.area());
    f.render_widget(Clear, area);

    let cancel_style = if app.confirm_selected == 0 {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let confirm_style = if app.confirm_selected == 1 {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let content = Paragraph::new(vec![
        Line::from("Do you want to exit llm-monitor?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Cancel (Esc)]", cancel_style),
            Span::raw("   "),
            Span::styled("[Quit (Enter)]", confirm_style),
        ]),
        Line::from("Use Left/Right to choose"),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Confirm Quit "))
    .alignment(Alignment::Center);

    f.render_widget(content, area);
}
