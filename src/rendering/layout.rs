//! Geometry resolution: turns the list/row/section tree into pixel rectangles.
//!
//! Logical positions are accumulated in floating point and only converted to
//! pixels at the edges (`round(edge * scale)`). Every rectangle spans from its
//! rounded start edge to its rounded end edge, so neighbours share an edge and
//! columns always tile the canvas exactly.

use log::debug;
use serde::Serialize;

use crate::error::LayoutError;
use crate::model::Composition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Rect::new(x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLayout {
    pub rect: Rect,
    pub sections: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListLayout {
    pub rect: Rect,
    pub rows: Vec<RowLayout>,
}

/// Resolved pixel geometry of a whole composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutTree {
    pub scale: f64,
    pub canvas: Size,
    pub lists: Vec<ListLayout>,
}

impl LayoutTree {
    /// Rectangle of section `k` in row `j` of list `i`.
    pub fn section(&self, i: usize, j: usize, k: usize) -> Option<Rect> {
        self.lists.get(i)?.rows.get(j)?.sections.get(k).copied()
    }

    /// Every section rectangle in paint order (list, row, section).
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize, usize), Rect)> + '_ {
        self.lists.iter().enumerate().flat_map(|(i, list)| {
            list.rows.iter().enumerate().flat_map(move |(j, row)| {
                row.sections.iter().enumerate().map(move |(k, rect)| ((i, j, k), *rect))
            })
        })
    }
}

fn edge(logical: f64, scale: f64) -> i32 {
    (logical * scale).round() as i32
}

/// Compute pixel rectangles for every list, row and section at `scale`
/// pixels per logical unit.
pub fn resolve(composition: &Composition, scale: f64) -> Result<LayoutTree, LayoutError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LayoutError::InvalidScale(scale));
    }

    let (total_width, total_height) = composition.logical_size();
    let canvas = Size {
        width: edge(total_width, scale).max(0) as u32,
        height: edge(total_height, scale).max(0) as u32,
    };
    let bottom = edge(total_height, scale);

    let list_count = composition.lists.len();
    let mut lists = Vec::with_capacity(list_count);
    let mut current_x = 0.0;

    for (i, list) in composition.lists.iter().enumerate() {
        // The last list takes whatever width is left so columns sum to the total.
        let list_width = if i == list_count - 1 {
            total_width - current_x
        } else {
            f64::from(list.width)
        };
        let x0 = edge(current_x, scale);
        let x1 = edge(current_x + list_width, scale);

        let row_count = list.rows.len();
        if row_count == 0 {
            return Err(LayoutError::EmptyList { list: i });
        }
        let row_height = total_height / row_count as f64;

        let mut rows = Vec::with_capacity(row_count);
        for (j, row) in list.rows.iter().enumerate() {
            let section_count = row.sections.len();
            if section_count == 0 {
                return Err(LayoutError::EmptyRow { list: i, row: j });
            }
            let y0 = edge(j as f64 * row_height, scale);
            let y1 = if j == row_count - 1 {
                bottom
            } else {
                edge((j + 1) as f64 * row_height, scale)
            };

            let section_width = list_width / section_count as f64;
            let sections = (0..section_count)
                .map(|k| {
                    let sx0 = edge(current_x + k as f64 * section_width, scale);
                    let sx1 = if k == section_count - 1 {
                        x1
                    } else {
                        edge(current_x + (k + 1) as f64 * section_width, scale)
                    };
                    Rect::from_edges(sx0, y0, sx1, y1)
                })
                .collect();

            rows.push(RowLayout { rect: Rect::from_edges(x0, y0, x1, y1), sections });
        }

        lists.push(ListLayout { rect: Rect::from_edges(x0, 0, x1, bottom), rows });
        current_x += list_width;
    }

    debug!(
        "resolved {} list(s) onto a {}x{} canvas at scale {}",
        lists.len(),
        canvas.width,
        canvas.height,
        scale
    );

    Ok(LayoutTree { scale, canvas, lists })
}
