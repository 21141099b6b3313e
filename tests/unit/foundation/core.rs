use serde_json::json;

use super::*;

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 70_000).is_err());
    let c = Canvas::new(1200, 1200).unwrap();
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1200.0, 1200.0));
}

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(Rgba8::parse_hex("#8B0000").unwrap(), Rgba8::rgb(0x8b, 0, 0));
    assert_eq!(
        Rgba8::parse_hex("0000ff80").unwrap(),
        Rgba8::rgba(0, 0, 255, 0x80)
    );
    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#zz0000").is_err());
}

#[test]
fn deserializes_all_representations() {
    let c: Rgba8 = serde_json::from_value(json!("#ffffff")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 255, 255));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgba8::rgba(1, 2, 3, 4));

    let c: Rgba8 = serde_json::from_value(json!({"r": 9, "g": 8, "b": 7})).unwrap();
    assert_eq!(c, Rgba8::rgb(9, 8, 7));

    assert!(serde_json::from_value::<Rgba8>(json!("nope")).is_err());
}
