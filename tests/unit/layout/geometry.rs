use super::*;
use crate::foundation::math::approx_eq;

const EPS: f64 = 1e-9;

#[test]
fn half_diagonal_of_3_4_box_is_2_5() {
    assert!(approx_eq(
        half_diagonal(Rect::new(10.0, 10.0, 13.0, 14.0)),
        2.5,
        EPS
    ));
}

#[test]
fn vertical_clearance_above_below_and_spanning() {
    let c = Point::new(50.0, 100.0);
    assert_eq!(vertical_clearance(c, Rect::new(0.0, 160.0, 10.0, 200.0)), 60.0);
    assert_eq!(vertical_clearance(c, Rect::new(0.0, 10.0, 10.0, 30.0)), 70.0);
    assert_eq!(vertical_clearance(c, Rect::new(0.0, 90.0, 10.0, 110.0)), 0.0);
}

#[test]
fn ring_starts_at_top_and_runs_clockwise() {
    let c = Point::new(100.0, 100.0);
    let pts = ring_positions(c, 10.0, 4);
    let want = [(100.0, 90.0), (110.0, 100.0), (100.0, 110.0), (90.0, 100.0)];
    for (p, (x, y)) in pts.iter().zip(want) {
        assert!(approx_eq(p.x, x, 1e-9) && approx_eq(p.y, y, 1e-9), "{p:?}");
    }
    assert!(ring_positions(c, 10.0, 0).is_empty());
}

#[test]
fn hexagon_vertices_sit_on_circumcircle() {
    let c = Point::new(3.0, -2.0);
    let verts = hexagon_vertices(c, 7.0);
    for v in verts {
        assert!(approx_eq((v - c).hypot(), 7.0, EPS));
    }
    assert!(approx_eq(verts[0].x, 10.0, EPS) && approx_eq(verts[0].y, -2.0, EPS));

    let path = hexagon_path(c, 7.0);
    assert_eq!(path.elements().len(), 7);
}

#[test]
fn boundary_distance_spans_apothem_to_radius() {
    let r = 10.0;
    let apothem = r * FRAC_PI_6.cos();
    assert!(approx_eq(hex_boundary_distance(r, 0.0), r, EPS));
    assert!(approx_eq(hex_boundary_distance(r, FRAC_PI_3), r, EPS));
    assert!(approx_eq(hex_boundary_distance(r, FRAC_PI_6), apothem, EPS));
    assert!(approx_eq(hex_boundary_distance(r, FRAC_PI_2), apothem, EPS));
    assert!(approx_eq(hex_boundary_distance(r, -FRAC_PI_2), apothem, EPS));
    for i in 0..72 {
        let d = hex_boundary_distance(r, TAU * i as f64 / 72.0);
        assert!(d >= apothem - EPS && d <= r + EPS);
    }
}

#[test]
fn hexagon_rect_intersection() {
    let c = Point::new(0.0, 0.0);
    // Overlapping.
    assert!(hexagon_intersects_rect(c, 10.0, Rect::new(-1.0, -1.0, 1.0, 1.0)));
    assert!(hexagon_intersects_rect(c, 10.0, Rect::new(5.0, 5.0, 50.0, 50.0)));
    // Clearly apart.
    assert!(!hexagon_intersects_rect(c, 10.0, Rect::new(20.0, 20.0, 30.0, 30.0)));
    // Inside the circumcircle's bounding box corner, but outside the hexagon.
    assert!(!hexagon_intersects_rect(c, 10.0, Rect::new(7.0, 7.0, 12.0, 12.0)));
    // Touching the flat bottom edge only.
    let apothem = 10.0 * FRAC_PI_6.cos();
    assert!(!hexagon_intersects_rect(
        c,
        10.0,
        Rect::new(-5.0, apothem, 5.0, apothem + 10.0)
    ));
}

#[test]
fn connector_runs_from_circle_to_hex_boundary() {
    let cc = Point::new(0.0, 0.0);
    let hc = Point::new(0.0, -100.0);
    let (start, end) = connector_endpoints(cc, 30.0, hc, 10.0, 2.0).unwrap();
    // Straight up: starts 28px from the character center.
    assert!(approx_eq(start.x, 0.0, EPS) && approx_eq(start.y, -28.0, EPS));
    // Hex boundary toward the character is a flat edge (apothem), minus the inset.
    let apothem = 10.0 * FRAC_PI_6.cos();
    assert!(approx_eq(end.y, -100.0 + apothem - 2.0, 1e-9));
    assert!((end - start).hypot() > 0.0);
}

#[test]
fn connector_degenerate_cases() {
    let cc = Point::new(0.0, 0.0);
    assert!(connector_endpoints(cc, 30.0, cc, 10.0, 2.0).is_none());
    // Hex overlaps the character circle: endpoints would cross.
    assert!(connector_endpoints(cc, 30.0, Point::new(35.0, 0.0), 10.0, 0.0).is_none());
}
