use crate::catalog::ModelCatalog;
use crate::config::ModelInputMode;
use crate::view::{model_options, provider_options, ModelOptions, ProviderChoice, ProviderView};

/// Values the user has entered in the test form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSnapshot {
    pub provider: String,
    pub model: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Provider,
    Model,
    Message,
}

impl FormField {
    pub fn next(self) -> Option<FormField> {
        match self {
            FormField::Provider => Some(FormField::Model),
            FormField::Model => Some(FormField::Message),
            FormField::Message => None,
        }
    }

    pub fn prev(self) -> Option<FormField> {
        match self {
            FormField::Provider => None,
            FormField::Model => Some(FormField::Provider),
            FormField::Message => Some(FormField::Model),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestForm {
    mode: ModelInputMode,
    provider_options: Vec<ProviderChoice>,
    provider_index: usize,
    model_options: ModelOptions,
    model_index: usize,
    model_text: String,
    message: String,
}

impl TestForm {
    pub fn new(mode: ModelInputMode) -> Self {
        Self {
            mode,
            provider_options: vec![ProviderChoice::Auto],
            provider_index: 0,
            model_options: ModelOptions::default(),
            model_index: 0,
            model_text: String::new(),
            message: String::new(),
        }
    }

    pub fn mode(&self) -> ModelInputMode {
        self.mode
    }

    pub fn provider_options(&self) -> &[ProviderChoice] {
        &self.provider_options
    }

    pub fn provider(&self) -> &ProviderChoice {
        // index is kept in range by every mutator
        &self.provider_options[self.provider_index.min(self.provider_options.len() - 1)]
    }

    pub fn model_options(&self) -> &ModelOptions {
        &self.model_options
    }

    pub fn model_index(&self) -> usize {
        self.model_index
    }

    pub fn model_enabled(&self) -> bool {
        match self.mode {
            ModelInputMode::FreeText => true,
            ModelInputMode::Catalog => matches!(self.model_options, ModelOptions::Available { .. }),
        }
    }

    pub fn model_value(&self) -> String {
        match self.mode {
            ModelInputMode::FreeText => self.model_text.clone(),
            ModelInputMode::Catalog => self
                .model_options
                .options()
                .get(self.model_index)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn capture(&self) -> FormSnapshot {
        FormSnapshot {
            provider: self.provider().value().to_string(),
            model: self.model_value(),
            message: self.message.clone(),
        }
    }

    /// Reapplies each field whose live value differs from the snapshot.
    /// Fields that already match are left untouched.
    pub fn restore(&mut self, snapshot: &FormSnapshot, catalog: &ModelCatalog) {
        if self.provider().value() != snapshot.provider {
            self.select_provider(&snapshot.provider, catalog);
        }
        if self.model_value() != snapshot.model {
            self.set_model(&snapshot.model);
        }
        if self.message != snapshot.message {
            self.message = snapshot.message.clone();
        }
    }

    /// Replaces the provider option list from a freshly derived view. Like a
    /// rebuilt select control, the selection drops back to the auto sentinel
    /// and the model control resets; callers restore the snapshot afterwards.
    pub fn rebuild_provider_options(&mut self, view: &ProviderView, catalog: &ModelCatalog) {
        self.provider_options = provider_options(view);
        self.provider_index = 0;
        self.refresh_model_options(catalog);
    }

    /// Selects a provider by wire value. Values no longer offered fall back to
    /// the auto sentinel.
    pub fn select_provider(&mut self, value: &str, catalog: &ModelCatalog) {
        self.provider_index = self
            .provider_options
            .iter()
            .position(|c| c.value() == value)
            .unwrap_or(0);
        self.refresh_model_options(catalog);
    }

    pub fn cycle_provider(&mut self, forward: bool, catalog: &ModelCatalog) {
        let len = self.provider_options.len();
        self.provider_index = if forward {
            (self.provider_index + 1) % len
        } else {
            (self.provider_index + len - 1) % len
        };
        self.refresh_model_options(catalog);
    }

    pub fn cycle_model(&mut self, forward: bool) {
        let len = self.model_options.options().len();
        if len == 0 {
            return;
        }
        self.model_index = if forward {
            (self.model_index + 1) % len
        } else {
            (self.model_index + len - 1) % len
        };
    }

    pub fn set_model(&mut self, model: &str) {
        match self.mode {
            ModelInputMode::FreeText => self.model_text = model.to_string(),
            ModelInputMode::Catalog => {
                if let Some(idx) = self
                    .model_options
                    .options()
                    .iter()
                    .position(|o| o.value == model)
                {
                    self.model_index = idx;
                }
            }
        }
    }

    pub fn input_char(&mut self, field: FormField, ch: char) {
        match field {
            FormField::Message => self.message.push(ch),
            FormField::Model if self.mode == ModelInputMode::FreeText => self.model_text.push(ch),
            FormField::Provider | FormField::Model => {}
        }
    }

    pub fn backspace(&mut self, field: FormField) {
        match field {
            FormField::Message => {
                self.message.pop();
            }
            FormField::Model if self.mode == ModelInputMode::FreeText => {
                self.model_text.pop();
            }
            FormField::Provider | FormField::Model => {}
        }
    }

    fn refresh_model_options(&mut self, catalog: &ModelCatalog) {
        if self.mode == ModelInputMode::FreeText {
            return;
        }
        self.model_options = model_options(catalog, self.provider());
        self.model_index = match &self.model_options {
            ModelOptions::Available { default_index, .. } => *default_index,
            ModelOptions::Disabled { .. } => 0,
        };
    }
}
