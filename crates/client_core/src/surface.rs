//! Abstract interactive surface the controllers render into, plus the input
//! events it delivers.

use std::time::Duration;

use shared::domain::SelectedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    DropZone,
    DropZoneLabel,
    FilePicker,
    JobDescription,
    ActionButton(usize),
    Question(usize),
    Answer(usize),
    ProgressIndicator,
    ResultContainer,
    ResultContent,
    ResultHeading,
    FooterYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Rendering capabilities the controllers need. Implementations use interior
/// mutability; every method is called from the page loop.
pub trait Surface: Send + Sync {
    fn set_text(&self, element: Element, text: &str);
    fn set_markup(&self, element: Element, markup: &str);
    fn set_class(&self, element: Element, class: &str, on: bool);
    fn set_visible(&self, element: Element, visible: bool);
    fn set_attribute(&self, element: Element, name: &str, value: &str);
    fn set_max_height(&self, element: Element, px: u32);
    /// Natural height of the element's content, measured at call time.
    fn measure_content_height(&self, element: Element) -> u32;
    fn set_opacity(&self, element: Element, opacity: f32, transition: Option<Duration>);
    fn set_enabled(&self, element: Element, enabled: bool);
    fn scroll_into_view(&self, element: Element, behavior: ScrollBehavior);
    fn input_value(&self, element: Element) -> String;
    fn open_file_picker(&self);
    /// Blocking, modal-style notification.
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    Drop(Vec<SelectedFile>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Drag(DragPhase),
    FileChosen(Vec<SelectedFile>),
    DropZoneClicked,
    QuestionActivated(usize),
    ActionActivated(usize),
}

impl SurfaceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::Drag(DragPhase::Enter) => "dragenter",
            SurfaceEvent::Drag(DragPhase::Over) => "dragover",
            SurfaceEvent::Drag(DragPhase::Leave) => "dragleave",
            SurfaceEvent::Drag(DragPhase::Drop(_)) => "drop",
            SurfaceEvent::FileChosen(_) => "change",
            SurfaceEvent::DropZoneClicked => "dropzone_click",
            SurfaceEvent::QuestionActivated(_) => "question_click",
            SurfaceEvent::ActionActivated(_) => "action_click",
        }
    }
}
