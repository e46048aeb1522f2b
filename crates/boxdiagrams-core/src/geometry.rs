//! Bounding box helpers shared by shapes and the panel classifier.
//!
//! Bounding boxes are plain `kurbo::Rect` values. The persisted form names the
//! coordinates `X1, X2, Y1, Y2`, which map to `x0, x1, y0, y1`.

use kurbo::{Point, Rect};

/// True when `x0 <= x1` and `y0 <= y1`.
///
/// Containment comparisons are only meaningful for well-formed boxes. The file
/// format does not check this; editing code should.
pub fn is_well_formed(rect: Rect) -> bool {
    rect.x0 <= rect.x1 && rect.y0 <= rect.y1
}

/// Area of a bounding box.
pub fn area(rect: Rect) -> f64 {
    rect.area().abs()
}

/// Closed-rectangle containment: `inner` lies within `outer` or on its edges.
pub fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

/// Smallest box enclosing all points, or `None` for an empty slice.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(contains_rect(outer, Rect::new(10.0, 10.0, 50.0, 50.0)));
        assert!(contains_rect(outer, outer));
        assert!(contains_rect(outer, Rect::new(0.0, 0.0, 100.0, 0.0)));
        assert!(!contains_rect(outer, Rect::new(-1.0, 10.0, 50.0, 50.0)));
        assert!(!contains_rect(outer, Rect::new(10.0, 10.0, 50.0, 100.5)));
    }

    #[test]
    fn test_zero_area_box_contains_itself() {
        let point_box = Rect::new(5.0, 5.0, 5.0, 5.0);
        assert!(contains_rect(point_box, point_box));
        assert_eq!(area(point_box), 0.0);
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(is_well_formed(Rect::ZERO));
        assert!(!is_well_formed(Rect::new(2.0, 0.0, 1.0, 1.0)));
        assert!(!is_well_formed(Rect::new(0.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_points_bounds() {
        let points = [
            Point::new(10.0, 40.0),
            Point::new(-5.0, 12.0),
            Point::new(30.0, 20.0),
        ];
        assert_eq!(points_bounds(&points), Some(Rect::new(-5.0, 12.0, 30.0, 40.0)));
        assert_eq!(points_bounds(&[Point::new(3.0, 4.0)]), Some(Rect::new(3.0, 4.0, 3.0, 4.0)));
        assert_eq!(points_bounds(&[]), None);
    }
}
