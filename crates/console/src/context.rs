//! Explicit application context handed to every page and editor
//!
//! Holds the remote service, the toast stack, the confirmation strategy for
//! destructive actions, and console settings.

use crate::notify::Notifier;
use staffdesk_common::{
    api::{HttpTransport, RemoteService, Transport},
    config::{AppConfig, UiConfig},
    Result,
};
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Blocking yes/no prompt used before destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Fixed answer, remembering every prompt it was shown
pub struct AutoConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl AutoConfirm {
    pub fn accept() -> Self {
        Self { answer: true, prompts: Mutex::new(Vec::new()) }
    }

    pub fn decline() -> Self {
        Self { answer: false, prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Confirm for AutoConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answer
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = std::io::stdout();
        if write!(stdout, "{} [y/N] ", prompt).and_then(|_| stdout.flush()).is_err() {
            return false;
        }

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Dependencies shared by the list pages and editors
#[derive(Clone)]
pub struct AppContext {
    pub service: RemoteService,
    pub notifier: Notifier,
    pub confirm: Arc<dyn Confirm>,
    pub ui: UiConfig,
}

impl AppContext {
    pub fn new(service: RemoteService, notifier: Notifier, confirm: Arc<dyn Confirm>, ui: UiConfig) -> Self {
        Self { service, notifier, confirm, ui }
    }

    /// Context over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, confirm: Arc<dyn Confirm>, ui: UiConfig) -> Self {
        let notifier = Notifier::new(Duration::from_millis(ui.toast_dismiss_ms));
        Self::new(RemoteService::new(transport), notifier, confirm, ui)
    }

    /// Production context talking HTTP to the configured backend
    pub fn from_config(config: &AppConfig, confirm: Arc<dyn Confirm>) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::with_transport(Arc::new(transport), confirm, config.ui.clone()))
    }
}
