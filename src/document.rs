//! JSON scene descriptions for the command line.
//!
//! A scene names lists, rows and sections the same way the editor builds
//! them. It is read once into a [`Composition`]; nothing writes it back.
//!
//! ```json
//! { "lists": [ { "width": 50, "height": 25, "rows": [
//!     { "sections": [ { "text": "A" }, { "image": "logo.png" }, {} ] }
//! ] } ] }
//! ```

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::model::{
    Composition, List, Row, Section, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_LIST_HEIGHT,
    DEFAULT_LIST_WIDTH,
};
use crate::rendering::image::ImageDecoder;
use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    #[serde(default)]
    pub lists: Vec<SceneList>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneList {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub rows: Vec<SceneRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneRow {
    #[serde(default)]
    pub sections: Vec<SceneSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneSection {
    pub text: Option<String>,
    /// Image file; relative paths resolve against the scene's directory
    pub image: Option<PathBuf>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
}

fn default_width() -> u32 {
    DEFAULT_LIST_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_LIST_HEIGHT
}

impl SceneDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Build the composition, decoding images through `decoder`.
    ///
    /// An image that fails to decode leaves its section empty. A section
    /// with both fields shows the image. Empty rows and lists are pruned.
    pub fn into_composition(self, base_dir: &Path, decoder: &dyn ImageDecoder) -> Composition {
        let lists = self
            .lists
            .into_iter()
            .map(|list| List {
                width: list.width,
                height: list.height,
                rows: list
                    .rows
                    .into_iter()
                    .map(|row| {
                        Row::new(
                            row.sections
                                .into_iter()
                                .map(|s| s.into_section(base_dir, decoder))
                                .collect(),
                        )
                    })
                    .collect(),
            })
            .collect();

        let mut composition = Composition::with_lists(lists);
        let before = composition.lists.len();
        composition.prune();
        if composition.lists.len() != before {
            warn!(
                "scene had {} list(s) without rows or sections; skipped",
                before - composition.lists.len()
            );
        }
        debug!("scene built with {} list(s)", composition.lists.len());
        composition
    }
}

impl SceneSection {
    fn into_section(self, base_dir: &Path, decoder: &dyn ImageDecoder) -> Section {
        let mut section = Section {
            font_family: self.font_family.unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            ..Default::default()
        };
        if let Some(text) = self.text {
            section.set_text(text);
        }
        if let Some(image) = self.image {
            let path = if image.is_relative() { base_dir.join(image) } else { image };
            section.load_image(&path, decoder);
        }
        section
    }
}
