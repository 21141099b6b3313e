//! Stateless vector math for the item ring.
//!
//! Hexagons are regular and "flat-topped": vertex `k` sits at angle `k * 60°` from the
//! positive x axis, so the horizontal extent is the full radius and the vertical extent is
//! the apothem. Angles follow screen coordinates (y grows downward), so increasing angles
//! run clockwise on the canvas.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, TAU};

use crate::foundation::core::{BezPath, Point, Rect, Vec2};

/// Radius of the circle circumscribing `r`.
pub fn half_diagonal(r: Rect) -> f64 {
    0.5 * r.width().hypot(r.height())
}

/// Vertical gap between `center` and the nearest horizontal edge of `band`.
///
/// Zero when the band spans `center.y`.
pub fn vertical_clearance(center: Point, band: Rect) -> f64 {
    if band.y0 >= center.y {
        band.y0 - center.y
    } else if band.y1 <= center.y {
        center.y - band.y1
    } else {
        0.0
    }
}

/// `count` points evenly spaced on a circle, starting at 12 o'clock, clockwise.
pub fn ring_positions(center: Point, radius: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = ring_angle(i, count);
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

/// Angle of slot `i` out of `count`.
pub fn ring_angle(i: usize, count: usize) -> f64 {
    -FRAC_PI_2 + TAU * (i as f64) / (count.max(1) as f64)
}

pub fn hexagon_vertices(center: Point, radius: f64) -> [Point; 6] {
    std::array::from_fn(|k| center + Vec2::from_angle(FRAC_PI_3 * k as f64) * radius)
}

pub fn hexagon_path(center: Point, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for (k, v) in hexagon_vertices(center, radius).into_iter().enumerate() {
        if k == 0 {
            path.move_to(v);
        } else {
            path.line_to(v);
        }
    }
    path.close_path();
    path
}

/// Distance from a hexagon's center to its boundary along `angle`.
///
/// Ranges from the apothem (edge midpoints) to the full radius (vertices).
pub fn hex_boundary_distance(radius: f64, angle: f64) -> f64 {
    let apothem = radius * FRAC_PI_6.cos();
    let t = angle.rem_euclid(FRAC_PI_3) - FRAC_PI_6;
    apothem / t.cos()
}

/// True when the hexagon and `rect` overlap with positive area. Touching edges do not count.
pub fn hexagon_intersects_rect(center: Point, radius: f64, rect: Rect) -> bool {
    let hex = hexagon_vertices(center, radius);
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];

    // Separating axis test: three hexagon edge normals plus the two rectangle axes.
    let axes = [
        Vec2::from_angle(FRAC_PI_6),
        Vec2::from_angle(FRAC_PI_2),
        Vec2::from_angle(FRAC_PI_2 + FRAC_PI_3),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
    ];
    axes.iter().all(|&axis| {
        let (a0, a1) = project(&hex, axis);
        let (b0, b1) = project(&corners, axis);
        a0.max(b0) < a1.min(b1) - 1e-9
    })
}

fn project(points: &[Point], axis: Vec2) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.to_vec2().dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Endpoints of the line joining the character to one item slot.
///
/// The line starts on the character's bounding circle and ends on the hexagon boundary,
/// each pulled `inset` pixels inside its shape. `None` when the shapes are concentric or
/// the inset endpoints would cross.
pub fn connector_endpoints(
    character_center: Point,
    character_radius: f64,
    hex_center: Point,
    hex_radius: f64,
    inset: f64,
) -> Option<(Point, Point)> {
    let delta = hex_center - character_center;
    let len = delta.hypot();
    if len <= f64::EPSILON {
        return None;
    }
    let dir = delta / len;

    let start_dist = (character_radius - inset).max(0.0);
    let back_angle = (-dir).atan2();
    let end_back = (hex_boundary_distance(hex_radius, back_angle) - inset).max(0.0);
    let end_dist = len - end_back;
    if end_dist <= start_dist {
        return None;
    }
    Some((
        character_center + dir * start_dist,
        character_center + dir * end_dist,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
