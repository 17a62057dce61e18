//! Recording surface and scripted collaborators shared by the unit tests.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{domain::SelectedFile, protocol::ActionRequest};
use tokio::sync::Notify;

use crate::{
    exchange::{AnalysisExchange, ExchangeError},
    surface::{Element, ScrollBehavior, Surface},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub text: Option<String>,
    pub markup: Option<String>,
    pub classes: HashSet<String>,
    pub visible: Option<bool>,
    pub attributes: HashMap<String, String>,
    pub max_height: Option<u32>,
    pub opacity: Option<f32>,
    pub opacity_history: Vec<f32>,
    pub transition: Option<Duration>,
    pub enabled: Option<bool>,
}

#[derive(Default)]
struct Recorded {
    elements: HashMap<Element, ElementState>,
    inputs: HashMap<Element, String>,
    heights: HashMap<Element, u32>,
    notifications: Vec<String>,
    scrolls: Vec<(Element, ScrollBehavior)>,
    picker_opened: usize,
}

#[derive(Default)]
pub struct RecordingSurface {
    inner: Mutex<Recorded>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_input(self: &Arc<Self>, element: Element, value: &str) -> Arc<Self> {
        self.inner
            .lock()
            .expect("surface lock")
            .inputs
            .insert(element, value.to_string());
        self.clone()
    }

    pub fn with_height(self: &Arc<Self>, element: Element, px: u32) -> Arc<Self> {
        self.inner
            .lock()
            .expect("surface lock")
            .heights
            .insert(element, px);
        self.clone()
    }

    pub fn element(&self, element: Element) -> ElementState {
        self.inner
            .lock()
            .expect("surface lock")
            .elements
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }

    pub fn text(&self, element: Element) -> Option<String> {
        self.element(element).text
    }

    pub fn markup(&self, element: Element) -> Option<String> {
        self.element(element).markup
    }

    pub fn has_class(&self, element: Element, class: &str) -> bool {
        self.element(element).classes.contains(class)
    }

    pub fn visible(&self, element: Element) -> Option<bool> {
        self.element(element).visible
    }

    pub fn attribute(&self, element: Element, name: &str) -> Option<String> {
        self.element(element).attributes.get(name).cloned()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("surface lock")
            .notifications
            .clone()
    }

    pub fn scrolls(&self) -> Vec<(Element, ScrollBehavior)> {
        self.inner.lock().expect("surface lock").scrolls.clone()
    }

    pub fn picker_opened(&self) -> usize {
        self.inner.lock().expect("surface lock").picker_opened
    }

    fn update(&self, element: Element, apply: impl FnOnce(&mut ElementState)) {
        let mut inner = self.inner.lock().expect("surface lock");
        apply(inner.elements.entry(element).or_default());
    }
}

impl Surface for RecordingSurface {
    fn set_text(&self, element: Element, text: &str) {
        self.update(element, |state| state.text = Some(text.to_string()));
    }

    fn set_markup(&self, element: Element, markup: &str) {
        self.update(element, |state| state.markup = Some(markup.to_string()));
    }

    fn set_class(&self, element: Element, class: &str, on: bool) {
        self.update(element, |state| {
            if on {
                state.classes.insert(class.to_string());
            } else {
                state.classes.remove(class);
            }
        });
    }

    fn set_visible(&self, element: Element, visible: bool) {
        self.update(element, |state| state.visible = Some(visible));
    }

    fn set_attribute(&self, element: Element, name: &str, value: &str) {
        self.update(element, |state| {
            state
                .attributes
                .insert(name.to_string(), value.to_string());
        });
    }

    fn set_max_height(&self, element: Element, px: u32) {
        self.update(element, |state| state.max_height = Some(px));
    }

    fn measure_content_height(&self, element: Element) -> u32 {
        self.inner
            .lock()
            .expect("surface lock")
            .heights
            .get(&element)
            .copied()
            .unwrap_or(0)
    }

    fn set_opacity(&self, element: Element, opacity: f32, transition: Option<Duration>) {
        self.update(element, |state| {
            state.opacity = Some(opacity);
            state.opacity_history.push(opacity);
            state.transition = transition;
        });
    }

    fn set_enabled(&self, element: Element, enabled: bool) {
        self.update(element, |state| state.enabled = Some(enabled));
    }

    fn scroll_into_view(&self, element: Element, behavior: ScrollBehavior) {
        self.inner
            .lock()
            .expect("surface lock")
            .scrolls
            .push((element, behavior));
    }

    fn input_value(&self, element: Element) -> String {
        self.inner
            .lock()
            .expect("surface lock")
            .inputs
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }

    fn open_file_picker(&self) {
        self.inner.lock().expect("surface lock").picker_opened += 1;
    }

    fn notify(&self, message: &str) {
        self.inner
            .lock()
            .expect("surface lock")
            .notifications
            .push(message.to_string());
    }
}

/// Exchange that replays canned results in order and records every request.
/// When gated, each call waits for [`ScriptedExchange::release`].
#[derive(Default)]
pub struct ScriptedExchange {
    responses: Mutex<VecDeque<Result<String, ExchangeError>>>,
    requests: Mutex<Vec<ActionRequest>>,
    gate: Option<Notify>,
}

impl ScriptedExchange {
    pub fn replying(responses: Vec<Result<String, ExchangeError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        })
    }

    pub fn gated(responses: Vec<Result<String, ExchangeError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            gate: Some(Notify::new()),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl AnalysisExchange for ScriptedExchange {
    async fn analyze(&self, request: &ActionRequest) -> Result<String, ExchangeError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(ExchangeError::Transport("no scripted response".into())))
    }
}

pub fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, "application/pdf", b"%PDF-1.7\n".to_vec())
}

pub fn png(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}
