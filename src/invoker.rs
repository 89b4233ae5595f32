use crate::api::AdminApi;
use crate::error::AppError;
use crate::models::{TestOutcome, TestRequest};

pub const BUSY_LABEL: &str = "Testing...";
pub const IDLE_LABEL: &str = "Send test";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TestPanel {
    #[default]
    Idle,
    Running {
        provider: String,
    },
    Done(TestOutcome),
}

/// Owns the trigger state of the test tool. At most one request is in flight;
/// the trigger is re-enabled by `finish` whatever the outcome.
#[derive(Debug, Clone, Default)]
pub struct TestInvoker {
    busy: bool,
    panel: TestPanel,
}

pub fn validate_test_input(
    provider: &str,
    model: &str,
    message: &str,
) -> Result<TestRequest, AppError> {
    if model.trim().is_empty() {
        return Err(AppError::Validation("Select a model to test.".into()));
    }
    if message.trim().is_empty() {
        return Err(AppError::Validation("Enter a test message.".into()));
    }
    Ok(TestRequest {
        provider: provider.to_string(),
        model: model.to_string(),
        message: message.to_string(),
    })
}

pub fn outcome_from(result: Result<TestOutcome, AppError>) -> TestOutcome {
    result.unwrap_or_else(|err| TestOutcome::NetworkError {
        error: err.to_string(),
    })
}

impl TestInvoker {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn panel(&self) -> &TestPanel {
        &self.panel
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.busy {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Validates and marks the tool busy. Nothing is sent on error.
    pub fn begin(
        &mut self,
        provider: &str,
        model: &str,
        message: &str,
    ) -> Result<TestRequest, AppError> {
        if self.busy {
            return Err(AppError::Validation(
                "A test request is already running.".into(),
            ));
        }
        let request = validate_test_input(provider, model, message)?;
        self.busy = true;
        self.panel = TestPanel::Running {
            provider: request.provider.clone(),
        };
        Ok(request)
    }

    pub fn finish(&mut self, outcome: TestOutcome) {
        self.busy = false;
        self.panel = TestPanel::Done(outcome);
    }

    pub async fn run_test(
        &mut self,
        api: &dyn AdminApi,
        provider: &str,
        model: &str,
        message: &str,
    ) -> Result<TestOutcome, AppError> {
        let request = self.begin(provider, model, message)?;
        let outcome = outcome_from(api.run_test(&request).await);
        self.finish(outcome.clone());
        Ok(outcome)
    }
}
