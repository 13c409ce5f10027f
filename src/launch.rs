//! Launch trigger: one POST to the local companion launcher.
//!
//! While the request is in flight the control is disabled and shows a busy
//! label. The outcome is surfaced through a [`Notifier`], and after a fixed
//! delay the control gets its original label back whatever happened.

use crate::page::Page;
use crate::{Error, LaunchConfig, Result};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default label shown on the control while a launch is in flight.
pub const BUSY_LABEL: &str = "<span class=\"btn-icon\">⏳</span> Launching...";

/// Shown for every failure: no connection, bad status or a malformed body.
pub const UNREACHABLE_MESSAGE: &str =
    "Error: unable to reach the launcher.\nMake sure the launcher process is running, or start it manually.";

#[derive(Debug, Deserialize)]
struct LaunchResponse {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The launcher accepted the request
    Launched { message: String },
    /// Anything else
    Failed { reason: String },
}

impl LaunchOutcome {
    /// The text the user sees.
    pub fn user_message(&self) -> &str {
        match self {
            LaunchOutcome::Launched { message } => message,
            LaunchOutcome::Failed { .. } => UNREACHABLE_MESSAGE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LaunchOutcome::Launched { .. })
    }
}

/// Surfaces launch outcomes to the user (the browser's `alert`).
pub trait Notifier: Send + Sync {
    fn notify(&self, outcome: &LaunchOutcome);
}

/// Writes outcomes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, outcome: &LaunchOutcome) {
        match outcome {
            LaunchOutcome::Launched { message } => log::info!("{}", message),
            LaunchOutcome::Failed { .. } => log::warn!("{}", UNREACHABLE_MESSAGE),
        }
    }
}

/// Result of one activation.
pub struct LaunchActivation {
    pub outcome: LaunchOutcome,
    /// Completes once the control has been restored
    pub restore: JoinHandle<()>,
}

pub struct LaunchTrigger {
    client: reqwest::Client,
    config: LaunchConfig,
    notifier: Arc<dyn Notifier>,
}

impl LaunchTrigger {
    pub fn new(config: LaunchConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config, notifier })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// POST to the endpoint and return the response's `message`.
    pub async fn request(&self) -> Result<String> {
        let res = self
            .client
            .post(&self.config.endpoint)
            .send()
            .await
            .map_err(|e| Error::LaunchUnreachable(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::LaunchUnreachable(format!("launcher answered {}", status)));
        }
        let body = res
            .bytes()
            .await
            .map_err(|e| Error::LaunchUnreachable(e.to_string()))?;
        let parsed: LaunchResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::LaunchUnreachable(format!("unexpected launcher response: {}", e)))?;
        Ok(parsed.message)
    }

    /// Handle a click on the launch control.
    ///
    /// Returns `None` without sending anything when the page has no control
    /// or the control is already disabled.
    pub async fn activate(&self, page: &Arc<Mutex<Page>>) -> Option<LaunchActivation> {
        let original = self.mark_busy(page)?;
        let outcome = match self.request().await {
            Ok(message) => LaunchOutcome::Launched { message },
            Err(err) => {
                log::error!("launch failed: {}", err);
                LaunchOutcome::Failed { reason: err.to_string() }
            }
        };
        Some(self.settle(page, original, outcome))
    }

    /// Disable the control and swap in the busy label. Returns the label to
    /// restore later.
    fn mark_busy(&self, page: &Mutex<Page>) -> Option<String> {
        let mut guard = page.lock().unwrap_or_else(|e| e.into_inner());
        let control = guard.launch_control.as_mut()?;
        if control.disabled {
            return None;
        }
        control.disabled = true;
        Some(std::mem::replace(&mut control.label_html, self.config.busy_label.clone()))
    }

    /// Report `outcome`, then give the control back after the restore delay.
    fn settle(&self, page: &Arc<Mutex<Page>>, original: String, outcome: LaunchOutcome) -> LaunchActivation {
        self.notifier.notify(&outcome);

        let page = Arc::clone(page);
        let delay = Duration::from_millis(self.config.restore_delay_ms);
        let restore = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = page.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(control) = guard.launch_control.as_mut() {
                control.label_html = original;
                control.disabled = false;
            }
        });

        LaunchActivation { outcome, restore }
    }
}
