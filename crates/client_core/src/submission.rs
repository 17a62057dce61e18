//! Validate, exchange, render: the submit lifecycle behind the action buttons.
//!
//! `Idle -> Loading -> Success | Error -> Idle`. Only one submission may be
//! loading at a time; action buttons stay disabled until it settles and any
//! activation in between is answered with [`SubmitOutcome::Busy`].
//!
//! A settled `Success` or `Error` stays in [`SubmissionController::state`]
//! while its content is on screen. It counts as idle: the next activation may
//! start immediately. A submission dropped mid-flight falls back to `Idle`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{ActionTag, SelectedFile},
    error::ValidationError,
    protocol::ActionRequest,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::PageConfig,
    exchange::AnalysisExchange,
    render::{escape_text, MarkdownRenderer},
    surface::{Element, ScrollBehavior, Surface},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the user was notified and nothing was sent.
    Rejected(ValidationError),
    /// Another submission is still loading.
    Busy,
    /// The exchange settled; carries the terminal `Success` or `Error` state.
    Completed(SubmissionState),
}

/// Checks run in a fixed order and the first failure wins.
pub fn validate(job_description: &str, file: Option<&SelectedFile>) -> Result<(), ValidationError> {
    accepted_file(job_description, file).map(|_| ())
}

fn accepted_file<'a>(
    job_description: &str,
    file: Option<&'a SelectedFile>,
) -> Result<&'a SelectedFile, ValidationError> {
    if job_description.trim().is_empty() {
        return Err(ValidationError::EmptyJobDescription);
    }
    let file = file.ok_or(ValidationError::NoFileSelected)?;
    if !file.is_pdf() {
        return Err(ValidationError::WrongFileType);
    }
    Ok(file)
}

pub struct SubmissionController {
    config: Arc<PageConfig>,
    surface: Arc<dyn Surface>,
    exchange: Arc<dyn AnalysisExchange>,
    renderer: Arc<dyn MarkdownRenderer>,
    state: Mutex<SubmissionState>,
}

impl SubmissionController {
    pub fn new(
        config: Arc<PageConfig>,
        surface: Arc<dyn Surface>,
        exchange: Arc<dyn AnalysisExchange>,
        renderer: Arc<dyn MarkdownRenderer>,
    ) -> Self {
        Self {
            config,
            surface,
            exchange,
            renderer,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    /// False for `Idle` and for a settled `Success` or `Error`.
    pub fn is_loading(&self) -> bool {
        *self.lock_state() == SubmissionState::Loading
    }

    /// Message shown for a validation failure.
    pub fn message_for(&self, err: ValidationError) -> &str {
        let errors = &self.config.messages.errors;
        match err {
            ValidationError::EmptyJobDescription => &errors.job_description,
            ValidationError::NoFileSelected => &errors.no_file,
            ValidationError::WrongFileType => &errors.file_type,
        }
    }

    pub async fn submit(
        &self,
        action: ActionTag,
        job_description: String,
        file: Option<SelectedFile>,
    ) -> SubmitOutcome {
        if self.is_loading() {
            debug!(action = %action, "submission already loading; activation ignored");
            return SubmitOutcome::Busy;
        }

        let resume = match accepted_file(&job_description, file.as_ref()) {
            Ok(resume) => resume.clone(),
            Err(err) => {
                debug!(action = %action, error = %err, "submission blocked by validation");
                self.surface.notify(self.message_for(err));
                return SubmitOutcome::Rejected(err);
            }
        };

        {
            let mut state = self.lock_state();
            if *state == SubmissionState::Loading {
                return SubmitOutcome::Busy;
            }
            *state = SubmissionState::Loading;
        }

        let request = ActionRequest::new(job_description, resume, action);
        info!(submission = %request.id, action = %request.action, file = %request.resume.name, "submission started");

        let _loading = LoadingGuard::enter(self);
        let settled = match self.exchange.analyze(&request).await {
            Ok(body) => {
                let markup = self.renderer.render(&body);
                self.display_result(&markup).await;
                self.surface
                    .scroll_into_view(Element::ResultHeading, ScrollBehavior::Smooth);
                info!(submission = %request.id, bytes = body.len(), "submission succeeded");
                SubmissionState::Success(markup)
            }
            Err(err) => {
                error!(submission = %request.id, error = %err, "analysis exchange failed");
                self.display_error();
                SubmissionState::Error(self.config.messages.errors.generic.clone())
            }
        };

        *self.lock_state() = settled.clone();
        SubmitOutcome::Completed(settled)
    }

    fn show_loading(&self) {
        self.set_actions_enabled(false);
        self.surface.set_visible(Element::ProgressIndicator, true);
        self.surface.set_visible(Element::ResultContainer, true);
        self.surface.set_markup(Element::ResultContent, "");
        self.surface
            .scroll_into_view(Element::ProgressIndicator, ScrollBehavior::Smooth);
    }

    fn hide_loading(&self) {
        self.surface.set_visible(Element::ProgressIndicator, false);
        self.set_actions_enabled(true);
    }

    async fn display_result(&self, markup: &str) {
        self.surface.set_markup(Element::ResultContent, markup);
        self.fade_in(Element::ResultContent).await;
    }

    fn display_error(&self) {
        let markup = format!(
            "<div class=\"error-message\">\n  <i class=\"fas fa-exclamation-circle\"></i>\n  <p>{}</p>\n</div>\n",
            escape_text(&self.config.messages.errors.generic)
        );
        self.surface.set_markup(Element::ResultContent, &markup);
    }

    async fn fade_in(&self, element: Element) {
        self.surface.set_opacity(element, 0.0, None);
        tokio::time::sleep(self.config.fade_delay).await;
        self.surface
            .set_opacity(element, 1.0, Some(self.config.fade_duration));
    }

    fn set_actions_enabled(&self, enabled: bool) {
        for index in 0..self.config.actions.len() {
            self.surface.set_enabled(Element::ActionButton(index), enabled);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shows the progress indicator on entry; hides it and re-enables the actions
/// on drop, whichever way the submission ends. A submission that never settled
/// leaves the controller `Idle`.
struct LoadingGuard<'a> {
    controller: &'a SubmissionController,
}

impl<'a> LoadingGuard<'a> {
    fn enter(controller: &'a SubmissionController) -> Self {
        controller.show_loading();
        Self { controller }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.hide_loading();
        let mut state = self.controller.lock_state();
        if *state == SubmissionState::Loading {
            warn!("submission dropped before settling");
            *state = SubmissionState::Idle;
        }
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
