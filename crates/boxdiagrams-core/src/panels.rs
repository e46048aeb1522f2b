//! Panel detection.
//!
//! A "panel" is a text box that has some other shape lying entirely inside it.
//! The editor treats panels a little differently even though they look the
//! same, e.g. a new box can be drawn on top of one.

use crate::geometry::{area, contains_rect};
use crate::shapes::Shape;
use kurbo::Rect;

/// Compute the panel flag of every shape, in document order.
///
/// Returns `None` for shapes that are not text boxes. A text box is a panel
/// when its closed bounding box contains the bounding box of at least one
/// shape of strictly smaller area. Shapes of equal area never make each other
/// panels, so two identical boxes are both plain boxes, and neither is a box
/// whose diagonal is drawn as a line.
pub fn classify(shapes: &[Shape]) -> Vec<Option<bool>> {
    // Lines without points have no geometry and take no part.
    let mut placed: Vec<(usize, Rect, f64)> = shapes
        .iter()
        .enumerate()
        .filter_map(|(i, shape)| shape.bounds().map(|b| (i, b, area(b))))
        .collect();
    // Stable: equal areas keep document order.
    placed.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut flags = vec![None; shapes.len()];
    for (pos, &(index, outer, outer_area)) in placed.iter().enumerate().rev() {
        if !shapes[index].is_text_box() {
            continue;
        }
        let smaller = placed[..pos].partition_point(|&(_, _, a)| a < outer_area);
        let is_panel = placed[..smaller]
            .iter()
            .any(|&(_, inner, _)| contains_rect(outer, inner));
        flags[index] = Some(is_panel);
    }
    flags
}

/// Recompute `is_panel` on every text box in `shapes`.
///
/// Returns the number of panels found.
pub fn mark_panels(shapes: &mut [Shape]) -> usize {
    let flags = classify(shapes);
    let mut panels = 0;
    for (shape, flag) in shapes.iter_mut().zip(flags) {
        if let (Some(text_box), Some(is_panel)) = (shape.as_text_box_mut(), flag) {
            text_box.is_panel = is_panel;
            panels += usize::from(is_panel);
        }
    }
    panels
}
