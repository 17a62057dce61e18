//! Exclusive-open FAQ accordion.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::PageConfig,
    surface::{Element, Surface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disclosure {
    pub expanded: bool,
    pub answer_height: u32,
}

pub struct DisclosureController {
    config: Arc<PageConfig>,
    surface: Arc<dyn Surface>,
    items: Vec<Disclosure>,
}

impl DisclosureController {
    pub fn new(config: Arc<PageConfig>, surface: Arc<dyn Surface>, len: usize) -> Self {
        Self {
            config,
            surface,
            items: vec![Disclosure::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Disclosure] {
        &self.items
    }

    pub fn expanded(&self) -> Option<usize> {
        self.items.iter().position(|item| item.expanded)
    }

    /// Collapses everything, then reopens `index` only if it was closed
    /// before the call.
    pub fn toggle(&mut self, index: usize) {
        let Some(was_expanded) = self.items.get(index).map(|item| item.expanded) else {
            warn!(index, len = self.items.len(), "ignoring toggle for unknown question");
            return;
        };

        self.collapse_all();

        if !was_expanded {
            let height = self.surface.measure_content_height(Element::Answer(index));
            self.items[index] = Disclosure {
                expanded: true,
                answer_height: height,
            };
            self.present(index);
        }
        debug!(index, expanded = !was_expanded, "question toggled");
    }

    pub fn collapse_all(&mut self) {
        for index in 0..self.items.len() {
            self.items[index] = Disclosure::default();
            self.present(index);
        }
    }

    fn present(&self, index: usize) {
        let item = self.items[index];
        let question = Element::Question(index);
        let answer = Element::Answer(index);
        self.surface
            .set_attribute(question, "aria-expanded", bool_attr(item.expanded));
        self.surface
            .set_attribute(answer, "aria-hidden", bool_attr(!item.expanded));
        self.surface
            .set_class(question, &self.config.classes.active, item.expanded);
        self.surface.set_max_height(answer, item.answer_height);
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
#[path = "tests/disclosure_tests.rs"]
mod tests;
