use crate::api::AdminApi;
use crate::catalog::ModelCatalog;
use crate::clock::Clock;
use crate::config::{ModelInputMode, MonitorConfig};
use crate::error::AppError;
use crate::form::{FormSnapshot, TestForm};
use crate::guard::InteractionGuard;
use crate::invoker::{outcome_from, TestInvoker};
use crate::models::{ProviderRecord, SystemStats, TestOutcome, TestRequest};
use crate::view::ProviderView;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingIndicator {
    #[default]
    Hidden,
    FullScreen,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Skipped,
    Committed,
    Failed(String),
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct EventEntry {
    pub ts: String,
    pub level: LogLevel,
    pub event: String,
    pub detail: String,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: LogLevel,
    pub message: String,
}

/// Everything the dashboard renders. Rendering reads this and nothing else.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub view: ProviderView,
    pub stats: Option<SystemStats>,
    pub catalog: ModelCatalog,
    pub form: TestForm,
    pub test: TestInvoker,
    pub loading: LoadingIndicator,
    pub last_refresh: Option<DateTime<Local>>,
    pub banner: Option<Banner>,
    pub events: Vec<EventEntry>,
    pub max_events: usize,
}

impl DashboardState {
    pub fn new(mode: ModelInputMode) -> Self {
        Self {
            view: ProviderView::default(),
            stats: None,
            catalog: ModelCatalog::fallback(),
            form: TestForm::new(mode),
            test: TestInvoker::default(),
            loading: LoadingIndicator::Hidden,
            last_refresh: None,
            banner: None,
            events: Vec::new(),
            max_events: 100,
        }
    }

    pub fn last_refresh_label(&self) -> String {
        self.last_refresh
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".into())
    }
}

/// Issued by `begin_refresh`; hand it back to `complete_refresh` together
/// with the fetch result.
#[derive(Debug, Clone)]
pub struct RefreshTicket {
    seq: u64,
    indicator: LoadingIndicator,
    snapshot: FormSnapshot,
}

impl RefreshTicket {
    pub fn indicator(&self) -> LoadingIndicator {
        self.indicator
    }
}

#[derive(Debug, Clone)]
pub struct CycleData {
    pub providers: Vec<ProviderRecord>,
    pub stats: SystemStats,
    /// `None` when the form takes free-text models and no catalog is fetched.
    pub catalog: Option<ModelCatalog>,
}

/// Runs the cycle's fetches concurrently. A failed catalog fetch degrades to
/// the built-in table; a failed providers or stats fetch fails the cycle.
pub async fn fetch_cycle(api: &dyn AdminApi, mode: ModelInputMode) -> Result<CycleData, AppError> {
    let catalog = async {
        match mode {
            ModelInputMode::Catalog => Some(api.fetch_models_config().await),
            ModelInputMode::FreeText => None,
        }
    };
    let (providers, stats, catalog) =
        tokio::join!(api.fetch_providers(), api.fetch_stats(), catalog);

    let catalog = catalog.map(|result| match result {
        Ok(config) => ModelCatalog::from_live(config),
        Err(err) => {
            warn!(error = %err, "models config unavailable, using built-in catalog");
            ModelCatalog::fallback()
        }
    });

    Ok(CycleData {
        providers: providers?,
        stats: stats?,
        catalog,
    })
}

pub struct RefreshController {
    api: Arc<dyn AdminApi>,
    clock: Arc<dyn Clock>,
    guard: InteractionGuard,
    mode: ModelInputMode,
    latest_seq: u64,
    state: DashboardState,
}

impl RefreshController {
    pub fn new(api: Arc<dyn AdminApi>, clock: Arc<dyn Clock>, cfg: &MonitorConfig) -> Self {
        Self {
            api,
            clock,
            guard: InteractionGuard::new(cfg.interaction_cooldown()),
            mode: cfg.model_input,
            latest_seq: 0,
            state: DashboardState::new(cfg.model_input),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn api(&self) -> Arc<dyn AdminApi> {
        Arc::clone(&self.api)
    }

    pub fn mode(&self) -> ModelInputMode {
        self.mode
    }

    pub fn focus_form(&mut self) {
        self.guard.focus_gained();
    }

    pub fn leave_form(&mut self) {
        self.guard.focus_lost(self.clock.now());
    }

    pub fn is_interacting(&self) -> bool {
        self.guard.is_interacting(self.clock.now())
    }

    /// Starts a cycle unless the user is editing the test form. Manual and
    /// initial loads get the full-screen indicator, timer ticks the inline one.
    pub fn begin_refresh(&mut self, manual: bool) -> Option<RefreshTicket> {
        if self.is_interacting() {
            debug!("refresh skipped: test form in use");
            return None;
        }

        self.latest_seq += 1;
        let indicator = if manual {
            LoadingIndicator::FullScreen
        } else {
            LoadingIndicator::Inline
        };
        self.state.loading = indicator;
        debug!(seq = self.latest_seq, manual, "refresh cycle started");

        Some(RefreshTicket {
            seq: self.latest_seq,
            indicator,
            snapshot: self.state.form.capture(),
        })
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<CycleData, AppError>,
    ) -> RefreshOutcome {
        if ticket.seq != self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale refresh result"
            );
            return RefreshOutcome::Stale;
        }
        self.state.loading = LoadingIndicator::Hidden;

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                let message = format!("Failed to load dashboard data: {err}");
                self.surface_error("refresh_failed", message.clone());
                return RefreshOutcome::Failed(message);
            }
        };

        let live = self.state.form.capture();
        let snapshot = if live == ticket.snapshot {
            ticket.snapshot
        } else {
            debug!("form edited while refresh was in flight, keeping live values");
            live
        };

        if let Some(catalog) = data.catalog {
            self.state.catalog = catalog;
        }
        self.state.view = ProviderView::derive(data.providers);
        self.state
            .form
            .rebuild_provider_options(&self.state.view, &self.state.catalog);
        self.state.stats = Some(data.stats);
        self.state.form.restore(&snapshot, &self.state.catalog);

        let now = self.clock.wall();
        self.state.last_refresh = Some(now);
        debug!(
            seq = ticket.seq,
            providers = self.state.view.total_providers(),
            healthy = self.state.view.healthy_providers(),
            catalog = self.state.catalog.source().as_label(),
            "refresh cycle committed"
        );
        self.append_event(
            LogLevel::Info,
            "refresh_completed",
            &format!(
                "{} providers, {} healthy, catalog {}",
                self.state.view.total_providers(),
                self.state.view.healthy_providers(),
                self.state.catalog.source().as_label()
            ),
            None,
        );
        RefreshOutcome::Committed
    }

    pub async fn refresh(&mut self, manual: bool) -> RefreshOutcome {
        let Some(ticket) = self.begin_refresh(manual) else {
            return RefreshOutcome::Skipped;
        };
        let api = self.api();
        let result = fetch_cycle(api.as_ref(), self.mode).await;
        self.complete_refresh(ticket, result)
    }

    /// Validates the form and marks the test tool busy. Validation failures
    /// are surfaced here and yield `None`.
    pub fn begin_test(&mut self) -> Option<TestRequest> {
        let input = self.state.form.capture();
        match self
            .state
            .test
            .begin(&input.provider, &input.model, &input.message)
        {
            Ok(request) => {
                self.append_event(
                    LogLevel::Info,
                    "test_started",
                    &format!("{} / {}", provider_label(&request.provider), request.model),
                    None,
                );
                Some(request)
            }
            Err(err) => {
                self.surface_error("test_rejected", err.to_string());
                None
            }
        }
    }

    pub fn finish_test(&mut self, outcome: TestOutcome) {
        self.record_test_outcome(&outcome);
        self.state.test.finish(outcome);
    }

    fn prefill_provider(&mut self, name: &str) {
        let catalog = &self.state.catalog;
        self.state.form.select_provider(name, catalog);
    }

    /// Points the test form at `name` with its default model selected, then
    /// takes the same validated path as the form's own trigger.
    pub fn test_specific_provider(&mut self, name: &str) -> Option<TestRequest> {
        self.prefill_provider(name);
        self.begin_test()
    }

    pub fn dismiss_banner(&mut self) {
        self.state.banner = None;
    }

    pub fn append_event(
        &mut self,
        level: LogLevel,
        event: &str,
        detail: &str,
        duration: Option<Duration>,
    ) {
        let entry = EventEntry {
            ts: self.clock.wall().format("%H:%M:%S").to_string(),
            level,
            event: event.to_string(),
            detail: detail.to_string(),
            duration,
        };

        let events = &mut self.state.events;
        events.push(entry);
        if events.len() > self.state.max_events {
            let trim = events.len() - self.state.max_events;
            events.drain(0..trim);
        }
    }

    fn surface_error(&mut self, event: &str, message: String) {
        warn!(event = event, "{message}");
        self.append_event(LogLevel::Error, event, &message, None);
        self.state.banner = Some(Banner {
            level: LogLevel::Error,
            message,
        });
    }

    fn record_test_outcome(&mut self, outcome: &TestOutcome) {
        match outcome {
            TestOutcome::Success {
                provider,
                model,
                duration_ms,
                ..
            } => {
                info!(provider = %provider, model = %model, duration_ms, "test request succeeded");
                self.append_event(
                    LogLevel::Info,
                    "test_succeeded",
                    &format!("{} / {model}", provider_label(provider)),
                    Some(Duration::from_millis(*duration_ms)),
                );
            }
            TestOutcome::Failure {
                error, duration_ms, ..
            } => {
                info!(error = %error, "test request failed");
                self.append_event(
                    LogLevel::Error,
                    "test_failed",
                    error,
                    duration_ms.map(Duration::from_millis),
                );
            }
            TestOutcome::NetworkError { error } => {
                warn!(error = %error, "test request could not reach gateway");
                self.append_event(LogLevel::Error, "test_network_error", error, None);
            }
        }
    }
}

fn provider_label(provider: &str) -> &str {
    if provider.is_empty() {
        "auto"
    } else {
        provider
    }
}

/// Maps a finished background test task onto an outcome.
pub fn test_outcome_from_task(
    joined: Result<Result<TestOutcome, AppError>, tokio::task::JoinError>,
) -> TestOutcome {
    outcome_from(joined.unwrap_or_else(|e| Err(AppError::Task(e.to_string()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::form::FormField;
    use crate::models::{ModelCatalogEntry, ModelsConfig, ProviderStatus};
    use crate::view::ProviderChoice;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls {
        providers: AtomicUsize,
        stats: AtomicUsize,
        models: AtomicUsize,
        tests: AtomicUsize,
    }

    impl Calls {
        fn fetches(&self) -> usize {
            self.providers.load(Ordering::SeqCst)
                + self.stats.load(Ordering::SeqCst)
                + self.models.load(Ordering::SeqCst)
        }
    }

    struct FakeApi {
        providers: Mutex<Result<Vec<ProviderRecord>, String>>,
        stats: Mutex<Result<SystemStats, String>>,
        models: Mutex<Result<ModelsConfig, String>>,
        calls: Calls,
    }

    impl FakeApi {
        fn healthy() -> Self {
            Self {
                providers: Mutex::new(Ok(vec![
                    record("openai", 4, ProviderStatus::Healthy),
                    record("moonshot", 12, ProviderStatus::Healthy),
                    record("gemini", 4, ProviderStatus::Unhealthy),
                ])),
                stats: Mutex::new(Ok(stats(42))),
                models: Mutex::new(Ok(HashMap::from([
                    (
                        "openai".to_string(),
                        ModelCatalogEntry {
                            models: vec!["gpt-4o".into(), "gpt-4o-mini".into()],
                            default_model: Some("gpt-4o-mini".into()),
                        },
                    ),
                    (
                        "moonshot".to_string(),
                        ModelCatalogEntry {
                            models: vec!["moonshot-v1-8k".into()],
                            default_model: Some("moonshot-v1-8k".into()),
                        },
                    ),
                ]))),
                calls: Calls::default(),
            }
        }

        fn fail_stats(&self, message: &str) {
            *self.stats.lock().expect("lock") = Err(message.to_string());
        }

        fn fail_models(&self) {
            *self.models.lock().expect("lock") = Err("HTTP 500".to_string());
        }

        fn set_providers(&self, providers: Vec<ProviderRecord>) {
            *self.providers.lock().expect("lock") = Ok(providers);
        }
    }

    #[async_trait]
    impl AdminApi for FakeApi {
        async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, AppError> {
            self.calls.providers.fetch_add(1, Ordering::SeqCst);
            self.providers.lock().expect("lock").clone().map_err(AppError::Api)
        }

        async fn fetch_stats(&self) -> Result<SystemStats, AppError> {
            self.calls.stats.fetch_add(1, Ordering::SeqCst);
            self.stats.lock().expect("lock").clone().map_err(AppError::Api)
        }

        async fn fetch_models_config(&self) -> Result<ModelsConfig, AppError> {
            self.calls.models.fetch_add(1, Ordering::SeqCst);
            self.models.lock().expect("lock").clone().map_err(AppError::Api)
        }

        async fn run_test(&self, request: &TestRequest) -> Result<TestOutcome, AppError> {
            self.calls.tests.fetch_add(1, Ordering::SeqCst);
            Ok(TestOutcome::Success {
                provider: request.provider.clone(),
                model: request.model.clone(),
                duration_ms: 80,
                body: "{}".into(),
            })
        }
    }

    fn record(name: &str, requests: u64, status: ProviderStatus) -> ProviderRecord {
        ProviderRecord {
            name: name.to_string(),
            status,
            models: vec![],
            requests,
            tokens: requests * 100,
            avg_response_time: 200.0,
            base_url: None,
            timeout: 30.0,
            retries: 3,
            last_test: None,
        }
    }

    fn stats(total_requests: u64) -> SystemStats {
        let mut stats = SystemStats::default();
        stats.metrics.total_requests = total_requests;
        stats
    }

    fn controller_with(
        api: Arc<FakeApi>,
        mode: ModelInputMode,
    ) -> (RefreshController, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cfg = MonitorConfig {
            model_input: mode,
            ..MonitorConfig::default()
        };
        let controller = RefreshController::new(api, clock.clone(), &cfg);
        (controller, clock)
    }

    async fn send(controller: &mut RefreshController, request: TestRequest) -> TestOutcome {
        let outcome = outcome_from(controller.api().run_test(&request).await);
        controller.finish_test(outcome.clone());
        outcome
    }

    fn names(controller: &RefreshController) -> Vec<String> {
        controller
            .state()
            .view
            .providers()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn error_events(controller: &RefreshController) -> usize {
        controller
            .state()
            .events
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .count()
    }

    #[tokio::test]
    async fn successful_cycle_commits_everything_and_clears_indicator() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);

        let ticket = controller.begin_refresh(true).expect("ticket");
        assert_eq!(ticket.indicator(), LoadingIndicator::FullScreen);
        assert_eq!(controller.state().loading, LoadingIndicator::FullScreen);

        let result = fetch_cycle(api.as_ref(), ModelInputMode::Catalog).await;
        assert_eq!(
            controller.complete_refresh(ticket, result),
            RefreshOutcome::Committed
        );

        let state = controller.state();
        assert_eq!(names(&controller), vec!["moonshot", "gemini", "openai"]);
        assert_eq!(state.view.total_providers(), 3);
        assert_eq!(state.view.healthy_providers(), 2);
        assert_eq!(state.stats.as_ref().map(|s| s.metrics.total_requests), Some(42));
        assert_eq!(state.catalog.source(), crate::catalog::CatalogSource::Live);
        assert_eq!(state.loading, LoadingIndicator::Hidden);
        assert!(state.last_refresh.is_some());
        assert_eq!(api.calls.fetches(), 3);
    }

    #[tokio::test]
    async fn timer_tick_uses_inline_indicator() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api, ModelInputMode::Catalog);
        let ticket = controller.begin_refresh(false).expect("ticket");
        assert_eq!(ticket.indicator(), LoadingIndicator::Inline);
        assert_eq!(controller.state().loading, LoadingIndicator::Inline);
    }

    #[tokio::test]
    async fn interacting_user_blocks_refresh_without_side_effects() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        controller.refresh(true).await;
        controller.prefill_provider("openai");
        controller.state_mut().form.input_char(FormField::Message, 'x');
        let before = controller.state().form.capture();
        let fetches_before = api.calls.fetches();

        controller.focus_form();
        assert_eq!(controller.refresh(false).await, RefreshOutcome::Skipped);
        assert_eq!(controller.refresh(true).await, RefreshOutcome::Skipped);

        assert_eq!(api.calls.fetches(), fetches_before);
        assert_eq!(controller.state().form.capture(), before);
        assert_eq!(controller.state().loading, LoadingIndicator::Hidden);
    }

    #[tokio::test]
    async fn refresh_resumes_only_after_cooldown() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, clock) = controller_with(api.clone(), ModelInputMode::Catalog);

        controller.focus_form();
        controller.leave_form();
        clock.advance(Duration::from_millis(999));
        assert_eq!(controller.refresh(false).await, RefreshOutcome::Skipped);
        assert_eq!(api.calls.fetches(), 0);

        clock.advance(Duration::from_millis(1));
        assert_eq!(controller.refresh(false).await, RefreshOutcome::Committed);
        assert_eq!(api.calls.fetches(), 3);
    }

    #[tokio::test]
    async fn single_failed_fetch_keeps_previous_view_and_surfaces_one_error() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        assert_eq!(controller.refresh(true).await, RefreshOutcome::Committed);
        let view_before = controller.state().view.clone();
        let stats_before = controller.state().stats.clone();
        let catalog_before = controller.state().catalog.clone();
        let refreshed_at = controller.state().last_refresh;

        api.set_providers(vec![record("qwen", 99, ProviderStatus::Healthy)]);
        api.fail_stats("redis unavailable");
        let outcome = controller.refresh(false).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Failed("Failed to load dashboard data: redis unavailable".into())
        );
        let state = controller.state();
        assert_eq!(state.view, view_before);
        assert_eq!(state.stats, stats_before);
        assert_eq!(state.catalog, catalog_before);
        assert_eq!(state.last_refresh, refreshed_at);
        assert_eq!(state.loading, LoadingIndicator::Hidden);
        assert_eq!(error_events(&controller), 1);
        assert_eq!(
            controller.state().banner.as_ref().map(|b| b.message.as_str()),
            Some("Failed to load dashboard data: redis unavailable")
        );
    }

    #[tokio::test]
    async fn catalog_failure_degrades_to_built_in_table() {
        let api = Arc::new(FakeApi::healthy());
        api.fail_models();
        let (mut controller, _) = controller_with(api, ModelInputMode::Catalog);

        assert_eq!(controller.refresh(true).await, RefreshOutcome::Committed);
        let catalog = &controller.state().catalog;
        assert_eq!(catalog.source(), crate::catalog::CatalogSource::Fallback);
        assert!(catalog.models_for("deepseek").is_some());
        assert_eq!(error_events(&controller), 0);
    }

    #[tokio::test]
    async fn free_text_mode_skips_catalog_fetch() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::FreeText);

        assert_eq!(controller.refresh(true).await, RefreshOutcome::Committed);
        assert_eq!(api.calls.models.load(Ordering::SeqCst), 0);
        assert_eq!(api.calls.providers.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_cycle_result_is_discarded() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);

        let slow = controller.begin_refresh(false).expect("first ticket");
        let slow_result = fetch_cycle(api.as_ref(), ModelInputMode::Catalog).await;
        let fresh = controller.begin_refresh(true).expect("second ticket");

        assert_eq!(
            controller.complete_refresh(slow, slow_result),
            RefreshOutcome::Stale
        );
        assert!(controller.state().last_refresh.is_none());
        assert_eq!(controller.state().loading, LoadingIndicator::FullScreen);

        let fresh_result = fetch_cycle(api.as_ref(), ModelInputMode::Catalog).await;
        assert_eq!(
            controller.complete_refresh(fresh, fresh_result),
            RefreshOutcome::Committed
        );
        assert_eq!(controller.state().loading, LoadingIndicator::Hidden);
    }

    #[tokio::test]
    async fn form_selection_survives_background_refresh() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        controller.refresh(true).await;

        controller.prefill_provider("openai");
        controller.state_mut().form.set_model("gpt-4o");
        for ch in "ping".chars() {
            controller.state_mut().form.input_char(FormField::Message, ch);
        }
        let before = controller.state().form.capture();

        api.set_providers(vec![
            record("openai", 1, ProviderStatus::Healthy),
            record("deepseek", 50, ProviderStatus::Healthy),
        ]);
        assert_eq!(controller.refresh(false).await, RefreshOutcome::Committed);

        assert_eq!(controller.state().form.capture(), before);
        assert_eq!(names(&controller), vec!["deepseek", "openai"]);
    }

    #[tokio::test]
    async fn edits_made_during_flight_win_over_snapshot() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        controller.refresh(true).await;

        let ticket = controller.begin_refresh(false).expect("ticket");
        controller.state_mut().form.input_char(FormField::Message, 'z');
        let result = fetch_cycle(api.as_ref(), ModelInputMode::Catalog).await;
        controller.complete_refresh(ticket, result);

        assert_eq!(controller.state().form.message(), "z");
    }

    #[tokio::test]
    async fn blank_message_test_is_rejected_locally() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        controller.refresh(true).await;
        controller.prefill_provider("openai");
        controller.state_mut().form.input_char(FormField::Message, ' ');

        assert!(controller.begin_test().is_none());
        assert_eq!(api.calls.tests.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.state().banner.as_ref().map(|b| b.message.as_str()),
            Some("Enter a test message.")
        );
        assert!(!controller.state().test.is_busy());
    }

    #[tokio::test]
    async fn test_specific_provider_prefills_default_model() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api.clone(), ModelInputMode::Catalog);
        controller.refresh(true).await;
        for ch in "hello".chars() {
            controller.state_mut().form.input_char(FormField::Message, ch);
        }

        let request = controller
            .test_specific_provider("openai")
            .expect("test request");
        let outcome = send(&mut controller, request).await;

        assert_eq!(
            controller.state().form.provider(),
            &ProviderChoice::Named("openai".into())
        );
        assert!(matches!(
            outcome,
            TestOutcome::Success { ref model, .. } if model == "gpt-4o-mini"
        ));
        assert_eq!(api.calls.tests.load(Ordering::SeqCst), 1);
        assert!(!controller.state().test.is_busy());
    }

    #[tokio::test]
    async fn split_test_flow_releases_trigger_on_task_failure() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api, ModelInputMode::FreeText);
        controller.refresh(true).await;
        for ch in "gpt-4o".chars() {
            controller.state_mut().form.input_char(FormField::Model, ch);
        }
        controller.state_mut().form.input_char(FormField::Message, 'q');

        let request = controller.begin_test().expect("request");
        assert_eq!(request.provider, "");
        assert!(controller.state().test.is_busy());

        let handle: tokio::task::JoinHandle<Result<TestOutcome, AppError>> =
            tokio::spawn(async { panic!("boom") });
        let outcome = test_outcome_from_task(handle.await);
        controller.finish_test(outcome);

        assert!(!controller.state().test.is_busy());
        assert!(matches!(
            controller.state().test.panel(),
            crate::invoker::TestPanel::Done(TestOutcome::NetworkError { .. })
        ));
    }

    #[test]
    fn event_log_is_capped() {
        let api = Arc::new(FakeApi::healthy());
        let (mut controller, _) = controller_with(api, ModelInputMode::Catalog);
        controller.state_mut().max_events = 2;
        for name in ["first", "second", "third"] {
            controller.append_event(LogLevel::Info, name, "detail", None);
        }
        let events: Vec<&str> = controller
            .state()
            .events
            .iter()
            .map(|e| e.event.as_str())
            .collect();
        assert_eq!(events, vec!["second", "third"]);
    }
}
