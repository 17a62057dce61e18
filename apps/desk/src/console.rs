//! Terminal-backed surface: keeps the page state in memory and reports the
//! user-visible changes on stderr.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use client_core::{Element, PageConfig, ScrollBehavior, Surface};
use tracing::debug;

const CONSOLE_WIDTH: usize = 80;

#[derive(Default)]
struct ConsoleState {
    inputs: HashMap<Element, String>,
    texts: HashMap<Element, String>,
    markup: HashMap<Element, String>,
}

pub struct ConsoleSurface {
    answers: Vec<String>,
    quiet: bool,
    state: Mutex<ConsoleState>,
}

impl ConsoleSurface {
    pub fn new(config: &PageConfig, quiet: bool) -> Self {
        Self {
            answers: config.faq.iter().map(|entry| entry.answer.clone()).collect(),
            quiet,
            state: Mutex::new(ConsoleState::default()),
        }
    }

    pub fn set_input(&self, element: Element, value: impl Into<String>) {
        self.lock().inputs.insert(element, value.into());
    }

    pub fn markup(&self, element: Element) -> Option<String> {
        self.lock().markup.get(&element).cloned()
    }

    pub fn text(&self, element: Element) -> Option<String> {
        self.lock().texts.get(&element).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn status(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

impl Surface for ConsoleSurface {
    fn set_text(&self, element: Element, text: &str) {
        if element == Element::DropZoneLabel {
            self.status(text);
        }
        self.lock().texts.insert(element, text.to_string());
    }

    fn set_markup(&self, element: Element, markup: &str) {
        self.lock().markup.insert(element, markup.to_string());
    }

    fn set_class(&self, element: Element, class: &str, on: bool) {
        debug!(?element, class, on, "class");
    }

    fn set_visible(&self, element: Element, visible: bool) {
        if element == Element::ProgressIndicator && visible {
            self.status("Analyzing resume...");
        }
        debug!(?element, visible, "visibility");
    }

    fn set_attribute(&self, element: Element, name: &str, value: &str) {
        debug!(?element, name, value, "attribute");
    }

    fn set_max_height(&self, element: Element, px: u32) {
        debug!(?element, px, "max height");
    }

    /// Rows the answer occupies when wrapped to the console width.
    fn measure_content_height(&self, element: Element) -> u32 {
        let Element::Answer(index) = element else {
            return 0;
        };
        self.answers
            .get(index)
            .map(|answer| {
                answer
                    .lines()
                    .map(|line| line.chars().count().div_ceil(CONSOLE_WIDTH).max(1))
                    .sum::<usize>() as u32
            })
            .unwrap_or(0)
    }

    fn set_opacity(&self, element: Element, opacity: f32, transition: Option<Duration>) {
        debug!(?element, opacity, ?transition, "opacity");
    }

    fn set_enabled(&self, element: Element, enabled: bool) {
        debug!(?element, enabled, "enabled");
    }

    fn scroll_into_view(&self, element: Element, behavior: ScrollBehavior) {
        debug!(?element, ?behavior, "scroll");
    }

    fn input_value(&self, element: Element) -> String {
        self.lock().inputs.get(&element).cloned().unwrap_or_default()
    }

    fn open_file_picker(&self) {
        self.status("Pass the resume with --resume <path>");
    }

    fn notify(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
