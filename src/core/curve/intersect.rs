//! Segment-Tests auf geflachten Kurven: Kreuzung und Punktabstand.
//!
//! Orientierung wird in f64 gerechnet, damit fast kollineare Segmente
//! nicht durch f32-Rundung als Kreuzung gewertet werden.

use glam::Vec2;

/// Unterhalb dieses Kreuzprodukts gelten Segmente als parallel.
const PARALLEL_EPS: f64 = 1e-12;
/// Quadrierter Abstand, ab dem ein Treffer nicht mehr als Endpunkt-Berührung gilt.
const END_TOUCH_EPS_SQ: f32 = 1e-3;

#[inline]
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

/// Schnittpunkt der Segmente AB und CD (Ränder eingeschlossen).
///
/// Parallele und kollineare Segmente liefern `None`.
pub fn segment_intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    if o1 * o2 > 0.0 || o3 * o4 > 0.0 {
        return None;
    }

    let (rx, ry) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (sx, sy) = ((d.x - c.x) as f64, (d.y - c.y) as f64);
    let rxs = rx * sy - ry * sx;
    if rxs.abs() <= PARALLEL_EPS {
        return None;
    }

    let (qx, qy) = ((c.x - a.x) as f64, (c.y - a.y) as f64);
    let t = (qx * sy - qy * sx) / rxs;
    let u = (qx * ry - qy * rx) / rxs;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Vec2::new(
        (a.x as f64 + t * rx) as f32,
        (a.y as f64 + t * ry) as f32,
    ))
}

/// Prüft ob sich zwei Polylinien treffen.
///
/// Treffer an den Endpunkten der beiden Polylinien (gemeinsame Anker zweier
/// Kanten am selben Node) zählen nicht.
pub fn polylines_cross(a: &[Vec2], b: &[Vec2]) -> bool {
    let (Some(a_first), Some(a_last), Some(b_first), Some(b_last)) =
        (a.first(), a.last(), b.first(), b.last())
    else {
        return false;
    };
    if a.len() < 2 || b.len() < 2 {
        return false;
    }
    let ends = [*a_first, *a_last, *b_first, *b_last];

    // Bounding-Box-Vorfilter über die gesamte Polylinie
    let (a_min, a_max) = bounds(a);
    let (b_min, b_max) = bounds(b);
    if a_max.x < b_min.x || b_max.x < a_min.x || a_max.y < b_min.y || b_max.y < a_min.y {
        return false;
    }

    a.windows(2).any(|sa| {
        let (sa_min, sa_max) = (sa[0].min(sa[1]), sa[0].max(sa[1]));
        b.windows(2).any(|sb| {
            let (sb_min, sb_max) = (sb[0].min(sb[1]), sb[0].max(sb[1]));
            if sa_max.x < sb_min.x
                || sb_max.x < sa_min.x
                || sa_max.y < sb_min.y
                || sb_max.y < sa_min.y
            {
                return false;
            }
            segment_intersection(sa[0], sa[1], sb[0], sb[1]).is_some_and(|hit| {
                !ends
                    .iter()
                    .any(|end| end.distance_squared(hit) <= END_TOUCH_EPS_SQ)
            })
        })
    })
}

/// Abstand eines Punkts zum Segment AB.
pub fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Kleinster Abstand eines Punkts zu einer Polylinie.
pub fn distance_to_polyline(point: Vec2, polyline: &[Vec2]) -> f32 {
    match polyline {
        [] => f32::INFINITY,
        [single] => point.distance(*single),
        _ => polyline
            .windows(2)
            .map(|s| distance_to_segment(point, s[0], s[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proper_cross_is_detected() {
        let hit = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        )
        .expect("Schnittpunkt erwartet");
        assert!(hit.abs_diff_eq(Vec2::new(1.0, 1.0), 1e-6));
    }

    #[test]
    fn collinear_overlap_has_no_intersection_point() {
        assert!(segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn shared_polyline_end_is_not_a_cross() {
        let a = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let b = [Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert!(!polylines_cross(&a, &b));
    }

    #[test]
    fn touch_at_interior_vertex_counts() {
        // Beide Polylinien haben einen Stützpunkt genau im Schnittpunkt
        let a = [Vec2::new(0.0, 5.0), Vec2::new(5.0, 5.0), Vec2::new(10.0, 5.0)];
        let b = [Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(5.0, 10.0)];
        assert!(polylines_cross(&a, &b));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let d = distance_to_segment(Vec2::new(-3.0, 4.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);

        let d = distance_to_segment(Vec2::new(5.0, 2.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn polylines_far_apart_do_not_cross() {
        let a = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let b = [Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0)];
        assert!(!polylines_cross(&a, &b));
    }
}
