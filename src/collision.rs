//! Separating-axis overlap test for convex polygons.

use crate::library::{Vector, find_normal};

/// Outcome of [`find_collision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub collided: bool,
    /// Minimum-overlap axis, unit length. Meaningless when `collided` is
    /// false. The sign is arbitrary; consumers orient it themselves.
    pub axis: Vector,
}

impl CollisionInfo {
    const SEPARATED: CollisionInfo = CollisionInfo {
        collided: false,
        axis: Vector::ZERO,
    };

    pub fn contact_axis(&self) -> Option<Vector> {
        self.collided.then_some(self.axis)
    }
}

/// Projects every vertex onto `axis` and returns the `(min, max)` interval.
pub fn project(shape: &[Vector], axis: Vector) -> (f64, f64) {
    shape.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        let point = v.dot(axis);
        (min.min(point), max.max(point))
    })
}

/// Smallest interval overlap over the edge normals of `edges`, or `None`
/// as soon as one of them separates the shapes.
fn min_overlap_axis(edges: &[Vector], shape1: &[Vector], shape2: &[Vector]) -> Option<(f64, Vector)> {
    let mut best: Option<(f64, Vector)> = None;
    for i in 0..edges.len() {
        let axis = find_normal(edges[i], edges[(i + 1) % edges.len()]);
        let (min1, max1) = project(shape1, axis);
        let (min2, max2) = project(shape2, axis);
        if min1 > max2 || min2 > max1 {
            return None;
        }
        let overlap = (max2 - min1).min(max1 - min2);
        if best.is_none_or(|(min_overlap, _)| overlap < min_overlap) {
            best = Some((overlap, axis));
        }
    }
    best
}

/// Tests two convex polygons for overlap.
///
/// Candidate axes are the edge normals of `shape1` followed by those of
/// `shape2`; the first axis with the smallest overlap is reported.
/// Touching intervals count as overlapping.
pub fn find_collision(shape1: &[Vector], shape2: &[Vector]) -> CollisionInfo {
    let Some(first) = min_overlap_axis(shape1, shape1, shape2) else {
        return CollisionInfo::SEPARATED;
    };
    let Some(second) = min_overlap_axis(shape2, shape1, shape2) else {
        return CollisionInfo::SEPARATED;
    };
    let (_, axis) = if second.0 < first.0 { second } else { first };
    CollisionInfo { collided: true, axis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{circle, rect};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn translated(shape: Vec<Vector>, offset: Vector) -> Vec<Vector> {
        shape.into_iter().map(|v| v + offset).collect()
    }

    #[test]
    fn separated_rectangles() {
        let a = translated(rect(4.0, 2.0), Vector::new(0.0, 0.0));
        let b = translated(rect(4.0, 2.0), Vector::new(4.5, 0.0));
        assert!(!find_collision(&a, &b).collided);
        assert!(!find_collision(&b, &a).collided);
        assert_eq!(find_collision(&a, &b).contact_axis(), None);
    }

    #[test]
    fn rectangles_with_x_gap_never_collide() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (w1, h1) = (rng.random_range(0.1..10.0), rng.random_range(0.1..10.0));
            let (w2, h2) = (rng.random_range(0.1..10.0), rng.random_range(0.1..10.0));
            let gap = rng.random_range(0.01..5.0);
            let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let offset = Vector::new(
                side * ((w1 + w2) / 2.0 + gap),
                rng.random_range(-10.0..10.0),
            );
            let a = rect(w1, h1);
            let b = translated(rect(w2, h2), offset);
            assert!(!find_collision(&a, &b).collided, "{w1}x{h1} vs {w2}x{h2} at {offset}");
            assert!(!find_collision(&b, &a).collided, "{w2}x{h2} at {offset} vs {w1}x{h1}");
        }
    }

    #[test]
    fn overlapping_squares_report_x_axis() {
        let a = rect(4.0, 4.0);
        let b = translated(rect(4.0, 4.0), Vector::new(2.0, 0.0));
        let info = find_collision(&a, &b);
        assert!(info.collided);
        assert_abs_diff_eq!(info.axis.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(info.axis.x.abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn touching_edges_collide() {
        let a = rect(2.0, 2.0);
        let b = translated(rect(2.0, 2.0), Vector::new(2.0, 0.0));
        assert!(find_collision(&a, &b).collided);
    }

    #[test]
    fn diagonal_gap_is_found() {
        let a = circle(1.0, 12);
        let b = translated(circle(1.0, 12), Vector::new(1.6, 1.6));
        assert!(!find_collision(&a, &b).collided);
    }

    #[test]
    fn symmetric_on_random_polygons() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let a = translated(
                circle(rng.random_range(0.5..4.0), rng.random_range(3..10)),
                Vector::new(rng.random_range(-6.0..6.0), rng.random_range(-6.0..6.0)),
            );
            let b = translated(
                rect(rng.random_range(0.5..5.0), rng.random_range(0.5..5.0)),
                Vector::new(rng.random_range(-6.0..6.0), rng.random_range(-6.0..6.0)),
            );
            assert_eq!(find_collision(&a, &b).collided, find_collision(&b, &a).collided);
        }
    }

    #[test]
    fn projection_interval() {
        let shape = translated(rect(2.0, 6.0), Vector::new(10.0, 0.0));
        let (min, max) = project(&shape, Vector::new(1.0, 0.0));
        assert_eq!((min, max), (9.0, 11.0));
    }
}
