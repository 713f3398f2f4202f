//! In-memory grid model: compositions of lists, rows and sections.
//!
//! The model is owned and mutated by the editing side. Rendering only ever
//! reads a snapshot of it. Rows that lose their last section and lists that
//! lose their last row are removed by [`Composition::prune`] rather than by
//! the children themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, warn};

use crate::error::LayoutError;
use crate::rendering::image::ImageDecoder;

/// Default logical width of a new list
pub const DEFAULT_LIST_WIDTH: u32 = 50;
/// Default logical height shared by the rows of a new list
pub const DEFAULT_LIST_HEIGHT: u32 = 25;
/// Default font family of a new section
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Default logical font size of a new section
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
/// A list never grows past this many rows through [`List::add_row`]
pub const MAX_ROWS_PER_LIST: usize = 3;
/// Logical side length of the canvas rendered for an empty composition
pub const EMPTY_CANVAS_UNITS: f64 = 100.0;

/// A decoded image placed in a section.
///
/// Pixels are shared so snapshots of the composition stay cheap to clone.
#[derive(Debug, Clone)]
pub struct SectionImage {
    pub path: Option<PathBuf>,
    pub pixels: Arc<RgbaImage>,
}

impl SectionImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { path: None, pixels: Arc::new(pixels) }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// What a section shows. Text and image are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub enum SectionContent {
    #[default]
    Empty,
    Text(String),
    Image(SectionImage),
}

/// The atomic cell of a row.
#[derive(Debug, Clone)]
pub struct Section {
    pub content: SectionContent,
    pub font_family: String,
    /// Logical font size; converted to pixels at render time
    pub font_size: f32,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            content: SectionContent::Empty,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Section {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { content: SectionContent::Text(text.into()), ..Default::default() }
    }

    pub fn with_image(image: SectionImage) -> Self {
        Self { content: SectionContent::Image(image), ..Default::default() }
    }

    /// Replace any content (including an image) with text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = SectionContent::Text(text.into());
    }

    /// Replace any content (including text) with an image.
    pub fn set_image(&mut self, image: SectionImage) {
        self.content = SectionContent::Image(image);
    }

    pub fn clear(&mut self) {
        self.content = SectionContent::Empty;
    }

    /// Decode the image at `path` into this section.
    ///
    /// A decode failure leaves the section empty and is not an error: the
    /// render simply shows the background. Returns whether an image was set.
    pub fn load_image(&mut self, path: &Path, decoder: &dyn ImageDecoder) -> bool {
        match decoder.decode(path) {
            Ok(pixels) => {
                debug!("loaded image {} ({}x{})", path.display(), pixels.width(), pixels.height());
                self.content = SectionContent::Image(SectionImage {
                    path: Some(path.to_path_buf()),
                    pixels: Arc::new(pixels),
                });
                true
            }
            Err(e) => {
                warn!("failed to load image {}: {}", path.display(), e);
                self.content = SectionContent::Empty;
                false
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            SectionContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&SectionImage> {
        match &self.content {
            SectionContent::Image(img) => Some(img),
            _ => None,
        }
    }
}

/// A horizontal band of a list, split into equal-width sections.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub sections: Vec<Section>,
}

impl Row {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// A fresh row holding a single section labelled "1".
    pub fn seeded() -> Self {
        Self::new(vec![Section::with_text("1")])
    }

    /// Grow or shrink to exactly `count` sections.
    ///
    /// New sections are labelled with their 1-based position; removal drops
    /// sections from the end. A row left with zero sections is pruned by its
    /// composition.
    pub fn set_section_count(&mut self, count: usize) {
        while self.sections.len() < count {
            let label = (self.sections.len() + 1).to_string();
            self.sections.push(Section::with_text(label));
        }
        self.sections.truncate(count);
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A column-like group of rows sharing one width and one target height.
#[derive(Debug, Clone)]
pub struct List {
    /// Logical width of the column
    pub width: u32,
    /// Logical height the rows divide between them
    pub height: u32,
    pub rows: Vec<Row>,
}

impl Default for List {
    fn default() -> Self {
        Self { width: DEFAULT_LIST_WIDTH, height: DEFAULT_LIST_HEIGHT, rows: Vec::new() }
    }
}

impl List {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, rows: Vec::new() }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Append a seeded row unless the list is already at [`MAX_ROWS_PER_LIST`].
    pub fn add_row(&mut self) -> bool {
        if self.rows.len() >= MAX_ROWS_PER_LIST {
            return false;
        }
        self.rows.push(Row::seeded());
        true
    }
}

/// The whole diagram: lists laid out left to right.
#[derive(Debug, Clone)]
pub struct Composition {
    pub lists: Vec<List>,
    /// Height applied to lists created through [`Composition::add_list`]
    pub default_height: u32,
}

impl Default for Composition {
    fn default() -> Self {
        Self { lists: Vec::new(), default_height: DEFAULT_LIST_HEIGHT }
    }
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: Vec<List>) -> Self {
        Self { lists, ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Append a list with one seeded row and return its index.
    pub fn add_list(&mut self) -> usize {
        let list =
            List::new(DEFAULT_LIST_WIDTH, self.default_height).with_rows(vec![Row::seeded()]);
        self.lists.push(list);
        self.lists.len() - 1
    }

    pub fn remove_list(&mut self, index: usize) -> Option<List> {
        (index < self.lists.len()).then(|| self.lists.remove(index))
    }

    /// Apply one shared row height to every list.
    pub fn set_height(&mut self, height: u32) {
        self.default_height = height;
        for list in &mut self.lists {
            list.height = height;
        }
    }

    /// Resize a row's sections, then prune whatever became empty.
    ///
    /// Returns `false` when the list or row index does not exist.
    pub fn set_section_count(&mut self, list: usize, row: usize, count: usize) -> bool {
        let Some(target) = self.lists.get_mut(list).and_then(|l| l.rows.get_mut(row)) else {
            return false;
        };
        target.set_section_count(count);
        self.prune();
        true
    }

    /// Drop rows with no sections, then lists with no rows.
    pub fn prune(&mut self) {
        let before = self.lists.len();
        for list in &mut self.lists {
            list.rows.retain(|row| !row.is_empty());
        }
        self.lists.retain(|list| !list.rows.is_empty());
        if self.lists.len() != before {
            debug!("pruned {} empty list(s)", before - self.lists.len());
        }
    }

    /// Check the structural preconditions of layout without resolving it.
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        for (i, list) in self.lists.iter().enumerate() {
            if list.rows.is_empty() {
                return Err(LayoutError::EmptyList { list: i });
            }
            if let Some(j) = list.rows.iter().position(Row::is_empty) {
                return Err(LayoutError::EmptyRow { list: i, row: j });
            }
        }
        Ok(())
    }

    /// Logical canvas size: summed list widths by the tallest list.
    pub fn logical_size(&self) -> (f64, f64) {
        if self.lists.is_empty() {
            return (EMPTY_CANVAS_UNITS, EMPTY_CANVAS_UNITS);
        }
        let width = self.lists.iter().map(|l| f64::from(l.width)).sum();
        let height = self.lists.iter().map(|l| f64::from(l.height)).fold(0.0, f64::max);
        (width, height)
    }
}
