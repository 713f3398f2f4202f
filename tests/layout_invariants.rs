use multitables::model::{Composition, List, Row, Section};
use multitables::rendering::layout::resolve;
use multitables::LayoutError;

const SCALES: [f64; 7] = [0.5, 1.0, 1.3, 2.7, 3.3, 7.25, 10.0];

fn row(sections: usize) -> Row {
    Row::new((0..sections).map(|i| Section::with_text((i + 1).to_string())).collect())
}

/// Compositions with awkward widths, heights and row/section counts.
fn samples() -> Vec<Composition> {
    let mut out = Vec::new();
    let cases = [
        vec![50],
        vec![33, 17],
        vec![7, 11, 13],
        vec![1, 0, 3, 99],
        vec![49, 51, 10, 3, 2],
    ];
    for widths in cases {
        for heights in [[25, 10, 7], [1, 3, 100]] {
            let lists = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let rows = (0..(i % 3 + 1)).map(|j| row((i + j) % 4 + 1)).collect();
                    List::new(*w, heights[i % 3]).with_rows(rows)
                })
                .collect();
            out.push(Composition::with_lists(lists));
        }
    }
    out
}

#[test]
fn list_widths_sum_to_canvas_width() {
    for c in samples() {
        for scale in SCALES {
            let tree = resolve(&c, scale).expect("layout");
            let (w, _) = c.logical_size();
            assert_eq!(tree.canvas.width, (w * scale).round() as u32);

            let sum: u32 = tree.lists.iter().map(|l| l.rect.width).sum();
            assert_eq!(sum, tree.canvas.width, "scale {scale}");

            // columns are contiguous
            let mut x = 0;
            for list in &tree.lists {
                assert_eq!(list.rect.x, x);
                x = list.rect.right();
            }
        }
    }
}

#[test]
fn rows_in_a_list_have_equal_height() {
    for c in samples() {
        for scale in SCALES {
            let tree = resolve(&c, scale).expect("layout");
            for list in &tree.lists {
                let heights: Vec<u32> = list.rows.iter().map(|r| r.rect.height).collect();
                let min = *heights.iter().min().unwrap();
                let max = *heights.iter().max().unwrap();
                assert!(max - min <= 1, "heights {heights:?} at scale {scale}");
                assert_eq!(heights.iter().sum::<u32>(), list.rect.height);
                assert_eq!(list.rect.height, tree.canvas.height);
            }
        }
    }
}

#[test]
fn sections_tile_their_row() {
    for c in samples() {
        for scale in SCALES {
            let tree = resolve(&c, scale).expect("layout");
            for list in &tree.lists {
                for row in &list.rows {
                    let mut x = row.rect.x;
                    for cell in &row.sections {
                        assert_eq!(cell.x, x);
                        assert_eq!((cell.y, cell.height), (row.rect.y, row.rect.height));
                        x = cell.right();
                    }
                    assert_eq!(x, row.rect.right());
                    let widths: Vec<u32> = row.sections.iter().map(|s| s.width).collect();
                    assert!(widths.iter().max().unwrap() - widths.iter().min().unwrap() <= 1);
                }
            }
        }
    }
}

#[test]
fn cells_iterate_in_paint_order() {
    let c = Composition::with_lists(vec![
        List::new(10, 10).with_rows(vec![row(2), row(1)]),
        List::new(10, 10).with_rows(vec![row(1)]),
    ]);
    let tree = resolve(&c, 1.0).unwrap();
    let order: Vec<_> = tree.cells().map(|(idx, _)| idx).collect();
    assert_eq!(order, [(0, 0, 0), (0, 0, 1), (0, 1, 0), (1, 0, 0)]);
}

#[test]
fn layout_is_deterministic() {
    for c in samples() {
        assert_eq!(resolve(&c, 2.7).unwrap(), resolve(&c, 2.7).unwrap());
    }
}

#[test]
fn degenerate_rows_fail_fast_with_their_index() {
    let c = Composition::with_lists(vec![
        List::new(10, 10).with_rows(vec![row(1)]),
        List::new(10, 10).with_rows(vec![row(2), Row::default()]),
    ]);
    assert_eq!(resolve(&c, 10.0), Err(LayoutError::EmptyRow { list: 1, row: 1 }));
    assert_eq!(c.validate(), Err(LayoutError::EmptyRow { list: 1, row: 1 }));
}
