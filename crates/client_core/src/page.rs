//! Page bootstrap and event routing for the three controllers.

use std::sync::Arc;

use chrono::{Datelike, Local};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    config::PageConfig,
    disclosure::DisclosureController,
    exchange::AnalysisExchange,
    render::MarkdownRenderer,
    selection::SelectionController,
    submission::{SubmissionController, SubmitOutcome},
    surface::{DragPhase, Element, Surface, SurfaceEvent},
};

/// What the page did with one surface event.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// The platform's default handling must be suppressed.
    pub prevent_default: bool,
    /// Set when the event started a submission.
    pub submission: Option<JoinHandle<SubmitOutcome>>,
}

impl Dispatch {
    fn handled() -> Self {
        Self::default()
    }

    fn prevented() -> Self {
        Self {
            prevent_default: true,
            submission: None,
        }
    }
}

pub struct Page {
    config: Arc<PageConfig>,
    surface: Arc<dyn Surface>,
    selection: SelectionController,
    disclosure: DisclosureController,
    submission: Arc<SubmissionController>,
}

impl Page {
    pub fn new(
        config: Arc<PageConfig>,
        surface: Arc<dyn Surface>,
        exchange: Arc<dyn AnalysisExchange>,
        renderer: Arc<dyn MarkdownRenderer>,
    ) -> Self {
        let selection = SelectionController::new(config.clone(), surface.clone());
        let mut disclosure =
            DisclosureController::new(config.clone(), surface.clone(), config.faq.len());
        let submission = Arc::new(SubmissionController::new(
            config.clone(),
            surface.clone(),
            exchange,
            renderer,
        ));

        surface.set_text(Element::FooterYear, &Local::now().year().to_string());
        selection.update_label(None);
        disclosure.collapse_all();
        surface.set_visible(Element::ProgressIndicator, false);

        Self {
            config,
            surface,
            selection,
            disclosure,
            submission,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn disclosure(&self) -> &DisclosureController {
        &self.disclosure
    }

    pub fn submission(&self) -> &Arc<SubmissionController> {
        &self.submission
    }

    /// Routes one event. Submissions are spawned on the current runtime so
    /// drags and FAQ toggles keep flowing while a request is in flight.
    pub fn handle(&mut self, event: SurfaceEvent) -> Dispatch {
        debug!(event = event.name(), "surface event");
        match event {
            SurfaceEvent::Drag(phase) => {
                match phase {
                    DragPhase::Enter => self.selection.on_drag_enter(),
                    DragPhase::Over => self.selection.on_drag_over(),
                    DragPhase::Leave => self.selection.on_drag_leave(),
                    DragPhase::Drop(files) => self.selection.on_drop(files),
                }
                Dispatch::prevented()
            }
            SurfaceEvent::FileChosen(files) => {
                self.selection.on_picker_change(files);
                Dispatch::handled()
            }
            SurfaceEvent::DropZoneClicked => {
                self.selection.on_click();
                Dispatch::handled()
            }
            SurfaceEvent::QuestionActivated(index) => {
                self.disclosure.toggle(index);
                Dispatch::handled()
            }
            SurfaceEvent::ActionActivated(index) => self.activate(index),
        }
    }

    fn activate(&self, index: usize) -> Dispatch {
        let Some(button) = self.config.actions.get(index) else {
            warn!(index, "ignoring activation of unknown action button");
            return Dispatch::handled();
        };

        let action = button.tag.clone();
        let job_description = self.surface.input_value(Element::JobDescription);
        let file = self.selection.selected().cloned();
        let submission = self.submission.clone();
        let handle =
            tokio::spawn(async move { submission.submit(action, job_description, file).await });

        Dispatch {
            prevent_default: false,
            submission: Some(handle),
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
