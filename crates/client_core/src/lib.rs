//! Client-side workflow for the resume analysis page: file selection, FAQ
//! disclosure and the submit/validate/render lifecycle, all rendered through
//! an abstract [`surface::Surface`].

pub mod config;
pub mod disclosure;
pub mod exchange;
pub mod page;
pub mod render;
pub mod selection;
pub mod submission;
pub mod surface;

pub use config::{load_settings, PageConfig};
pub use disclosure::{Disclosure, DisclosureController};
pub use exchange::{AnalysisExchange, ExchangeError, HttpAnalysisClient};
pub use page::{Dispatch, Page};
pub use render::{CmarkRenderer, MarkdownRenderer};
pub use selection::SelectionController;
pub use submission::{validate, SubmissionController, SubmissionState, SubmitOutcome};
pub use surface::{DragPhase, Element, ScrollBehavior, Surface, SurfaceEvent};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
