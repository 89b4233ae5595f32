use crate::form::FormField;
use crate::view::ProviderView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Detail { provider: String },
    Cost { provider: String },
    ConfirmQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Providers,
    Form(FormField),
}

impl Focus {
    pub fn in_form(self) -> bool {
        matches!(self, Focus::Form(_))
    }
}

/// Terminal-only state: which pane has focus, which modal is open. Data the
/// dashboard shows lives in the controller's `DashboardState`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub running: bool,
    pub status: String,
    pub screen: Screen,
    pub focus: Focus,
    pub provider_selected: usize,
    pub confirm_selected: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            running: true,
            status: "ready".into(),
            screen: Screen::Dashboard,
            focus: Focus::Providers,
            provider_selected: 0,
            confirm_selected: 0,
        }
    }
}

impl AppState {
    pub fn selected_provider<'a>(&self, view: &'a ProviderView) -> Option<&'a str> {
        view.providers()
            .get(self.provider_selected)
            .map(|p| p.name.as_str())
    }

    /// Keeps the cursor on the same provider after the list is re-sorted.
    pub fn reselect(&mut self, previous: Option<&str>, view: &ProviderView) {
        let len = view.providers().len();
        self.provider_selected = previous
            .and_then(|name| view.position(name))
            .unwrap_or_else(|| self.provider_selected.min(len.saturating_sub(1)));
    }

    pub fn move_selection(&mut self, down: bool, len: usize) {
        if down {
            if self.provider_selected + 1 < len {
                self.provider_selected += 1;
            }
        } else if self.provider_selected > 0 {
            self.provider_selected -= 1;
        }
    }
}
