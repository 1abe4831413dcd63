//! The working set of images being branded.
//!
//! A [`Session`] owns the decoded images, each with its own [`Settings`], plus
//! the settings template and an optional selection. Edits are routed by the
//! two-tier rule in [`crate::settings::resolve`]: with a selection they change
//! only that image, without one they change the template (which seeds images
//! added later).

use crate::naming::display_name;
use crate::settings::{self, Settings, SettingsEdit};
use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Opaque image identity, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("no image with id {0}")]
    UnknownImage(ImageId),
}

/// One decoded photo and the settings it will be branded with.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub id: ImageId,
    /// Where the photo was read from.
    pub source_path: PathBuf,
    /// File name as found on disk.
    pub original_name: String,
    /// Output file name (`.png`).
    pub name: String,
    source: DynamicImage,
    pub settings: Settings,
}

impl ImageEntry {
    /// The decoded photo. Never modified after ingest.
    pub fn source(&self) -> &DynamicImage {
        &self.source
    }
}

#[derive(Debug, Default)]
pub struct Session {
    images: Vec<ImageEntry>,
    template: Settings,
    selected: Option<ImageId>,
    next_id: u64,
}

impl Session {
    pub fn new(template: Settings) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// Add a decoded photo; its settings start as a copy of the template.
    pub fn add(&mut self, source_path: PathBuf, source: DynamicImage) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        let original_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.images.push(ImageEntry {
            id,
            name: display_name(&original_name),
            original_name,
            source_path,
            source,
            settings: self.template.clone(),
        });
        id
    }

    /// Images in insertion order.
    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageEntry> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn template(&self) -> &Settings {
        &self.template
    }

    pub fn select(&mut self, id: ImageId) -> Result<(), SessionError> {
        if self.get(id).is_none() {
            return Err(SessionError::UnknownImage(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ImageEntry> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Settings currently in effect: the selected image's, else the template.
    pub fn current_settings(&self) -> &Settings {
        settings::resolve(self.selected().map(|img| &img.settings), &self.template)
    }

    /// Apply one field change to the selected image, or to the template when
    /// nothing is selected.
    pub fn edit(&mut self, edit: SettingsEdit) {
        let selected = self.selected;
        match selected.and_then(|id| self.images.iter_mut().find(|img| img.id == id)) {
            Some(img) => img.settings.apply(edit),
            None => self.template.apply(edit),
        }
    }

    /// Push the effective settings onto every image.
    ///
    /// With a selection the template also becomes a copy of the selected
    /// image's settings, so later additions inherit them. Without one the
    /// template is the source and stays as it is.
    pub fn apply_to_all(&mut self) {
        let source = self.current_settings().clone();
        for img in &mut self.images {
            img.settings = source.clone();
        }
        if self.selected.is_some() {
            self.template = source;
        }
    }

    /// Remove one image; removing the selected image clears the selection.
    pub fn remove(&mut self, id: ImageId) -> Result<ImageEntry, SessionError> {
        let index = self
            .images
            .iter()
            .position(|img| img.id == id)
            .ok_or(SessionError::UnknownImage(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.images.remove(index))
    }

    /// Remove every image and the selection. The template is kept.
    pub fn clear(&mut self) {
        self.images.clear();
        self.selected = None;
    }
}
