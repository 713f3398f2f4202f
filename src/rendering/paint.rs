//! Display list construction
//!
//! Painting order is fixed: per section background then content (list, row,
//! section order), then interior border strokes, then the four outer strokes.

use std::sync::Arc;

use image::RgbaImage;
use log::debug;

use crate::model::{Composition, SectionContent};
use crate::rendering::layout::{LayoutTree, Rect};
use crate::rendering::text::TextStyle;
use crate::RenderConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        rect: Rect,
        rgba: (u8, u8, u8, u8),
    },
    /// Text wrapped to and centered in `cell`
    Text {
        cell: Rect,
        text: String,
        style: TextStyle,
        rgba: (u8, u8, u8, u8),
    },
    /// Image letterboxed into `cell`
    Image {
        cell: Rect,
        image: Arc<RgbaImage>,
    },
}

/// Build the paint commands for `composition` laid out as `layout`.
///
/// `layout` must come from resolving this same composition.
pub fn build_display_list(
    composition: &Composition,
    layout: &LayoutTree,
    config: &RenderConfig,
) -> Vec<PaintCommand> {
    let mut commands = Vec::new();
    let scale = layout.scale as f32;

    for (list, list_layout) in composition.lists.iter().zip(&layout.lists) {
        for (row, row_layout) in list.rows.iter().zip(&list_layout.rows) {
            for (section, &cell) in row.sections.iter().zip(&row_layout.sections) {
                commands.push(PaintCommand::SolidRect { rect: cell, rgba: config.background });

                match &section.content {
                    SectionContent::Empty => {}
                    SectionContent::Image(img) => {
                        commands.push(PaintCommand::Image { cell, image: Arc::clone(&img.pixels) });
                    }
                    SectionContent::Text(text) => {
                        let size_px = section.font_size / config.font_calibration * scale;
                        if text.trim().is_empty() || !size_px.is_finite() || size_px <= 0.0 {
                            continue;
                        }
                        commands.push(PaintCommand::Text {
                            cell,
                            text: text.clone(),
                            style: TextStyle { family: section.font_family.clone(), size_px },
                            rgba: config.ink,
                        });
                    }
                }
            }
        }
    }

    let b = config.border_px(layout.scale);
    let last_list = layout.lists.len().saturating_sub(1);
    for (i, list_layout) in layout.lists.iter().enumerate() {
        let last_row = list_layout.rows.len().saturating_sub(1);
        for (j, row_layout) in list_layout.rows.iter().enumerate() {
            let last_section = row_layout.sections.len().saturating_sub(1);
            for (k, cell) in row_layout.sections.iter().enumerate() {
                // The right edge of the whole canvas belongs to the outer border.
                if k < last_section || i < last_list {
                    let w = b.min(cell.width);
                    let stroke = Rect::new(cell.right() - w as i32, cell.y, w, cell.height);
                    commands.push(border(stroke, config));
                }
            }
            if j < last_row {
                let r = row_layout.rect;
                let h = b.min(r.height);
                commands.push(border(Rect::new(r.x, r.bottom() - h as i32, r.width, h), config));
            }
        }
    }

    let (w, h) = (layout.canvas.width, layout.canvas.height);
    let (bw, bh) = (b.min(w), b.min(h));
    commands.extend([
        border(Rect::new(0, 0, w, bh), config),
        border(Rect::new(0, 0, bw, h), config),
        border(Rect::new((w - bw) as i32, 0, bw, h), config),
        border(Rect::new(0, (h - bh) as i32, w, bh), config),
    ]);

    debug!("display list has {} command(s)", commands.len());
    commands
}

fn border(rect: Rect, config: &RenderConfig) -> PaintCommand {
    PaintCommand::SolidRect { rect, rgba: config.ink }
}
