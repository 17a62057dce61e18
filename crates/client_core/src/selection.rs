//! Drop-zone and file-picker selection: two input paths, one selected file.

use std::sync::Arc;

use shared::domain::SelectedFile;
use tracing::debug;

use crate::{
    config::PageConfig,
    surface::{Element, Surface},
};

pub struct SelectionController {
    config: Arc<PageConfig>,
    surface: Arc<dyn Surface>,
    selected: Option<SelectedFile>,
}

impl SelectionController {
    pub fn new(config: Arc<PageConfig>, surface: Arc<dyn Surface>) -> Self {
        Self {
            config,
            surface,
            selected: None,
        }
    }

    /// The file a submission would carry right now.
    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn on_drag_enter(&self) {
        self.set_highlight(true);
    }

    pub fn on_drag_over(&self) {
        self.set_highlight(true);
    }

    pub fn on_drag_leave(&self) {
        self.set_highlight(false);
    }

    /// Only the first dropped file is kept. An empty drop changes nothing but
    /// the highlight.
    pub fn on_drop(&mut self, files: Vec<SelectedFile>) {
        self.set_highlight(false);
        let dropped = files.len();
        let Some(file) = files.into_iter().next() else {
            debug!("drop carried no files; selection unchanged");
            return;
        };
        if dropped > 1 {
            debug!(dropped, kept = %file.name, "multiple files dropped; keeping the first");
        }
        self.replace(Some(file));
    }

    /// Mirrors the native input: the picker's list becomes the selection, so
    /// an empty list clears it.
    pub fn on_picker_change(&mut self, files: Vec<SelectedFile>) {
        self.replace(files.into_iter().next());
    }

    pub fn on_click(&self) {
        self.surface.open_file_picker();
    }

    pub fn label_for(&self, file: Option<&SelectedFile>) -> String {
        match file {
            Some(file) => format!("Selected file: {}", file.name),
            None => self.config.messages.default_dropzone.clone(),
        }
    }

    pub fn update_label(&self, file: Option<&SelectedFile>) {
        self.surface
            .set_text(Element::DropZoneLabel, &self.label_for(file));
    }

    fn replace(&mut self, file: Option<SelectedFile>) {
        match &file {
            Some(file) => debug!(name = %file.name, media_type = %file.media_type, size = file.len(), "file selected"),
            None => debug!("file selection cleared"),
        }
        self.selected = file;
        self.update_label(self.selected.as_ref());
    }

    fn set_highlight(&self, on: bool) {
        self.surface
            .set_class(Element::DropZone, &self.config.classes.highlight, on);
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
