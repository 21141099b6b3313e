use std::io::Cursor;

use serde_json::json;

use super::*;
use crate::{assets::fetch::StaticFetcher, config::Endpoints};

const PROFILE: &str = "https://profile.test/api";
const CATALOG: &str = "https://tables.test/items.json";
const FALLBACK: &str = "https://tables.test/cdn.json";
const BASE: &str = "https://img.test/pngs";

fn cfg() -> CardConfig {
    CardConfig {
        endpoints: Endpoints {
            profile_url: PROFILE.to_owned(),
            catalog_url: CATALOG.to_owned(),
            fallback_map_url: FALLBACK.to_owned(),
            primary_image_base: BASE.to_owned(),
        },
        ..CardConfig::default()
    }
}

fn png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(6, 6, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn tables(fetcher: StaticFetcher) -> StaticFetcher {
    fetcher
        .with_json(
            CATALOG,
            &json!([
                {"itemID": 203, "icon": "Icon_203", "description": "Jacket"},
                {"itemID": "907", "icon": "Icon_907", "description": "Rifle"}
            ]),
        )
        .with_json(FALLBACK, &json!([{"907": "https://cdn.test/907.png"}]))
}

fn gets(fetcher: &StaticFetcher) -> Vec<String> {
    fetcher
        .requests()
        .into_iter()
        .filter(|r| r.starts_with("GET "))
        .collect()
}

#[test]
fn blank_id_is_rejected_before_any_request() {
    let fetcher = StaticFetcher::new();
    for id in ["", "   "] {
        let err = render_outfit(id, &cfg(), &fetcher).unwrap_err();
        assert!(matches!(err, CardError::ClientInput(_)));
        assert_eq!(err.status_code(), 400);
    }
    assert!(fetcher.requests().is_empty());
}

#[test]
fn require_id_trims() {
    assert_eq!(require_id("  123 ").unwrap(), "123");
}

#[test]
fn profile_url_carries_the_id_as_query() {
    let fetcher = StaticFetcher::new().with_json(
        format!("{PROFILE}?id=42"),
        &json!({"basicInfo": {"nickname": "x"}}),
    );
    let profile = fetch_profile("42", &cfg(), &fetcher).unwrap();
    assert_eq!(profile["basicInfo"]["nickname"], "x");
}

#[test]
fn upstream_status_or_bad_body_is_profile_not_found() {
    let fetcher = StaticFetcher::new()
        .with_status(format!("{PROFILE}?id=1"), 500)
        .with_body(format!("{PROFILE}?id=2"), b"<html>".to_vec());

    for id in ["1", "2", "3"] {
        let err = fetch_profile(id, &cfg(), &fetcher).unwrap_err();
        assert!(matches!(err, CardError::ProfileNotFound), "id {id}");
        assert_eq!(err.status_code(), 404);
    }
}

#[test]
fn missing_identity_section_fails_before_image_fetches() {
    let fetcher = StaticFetcher::new().with_json(
        format!("{PROFILE}?id=7"),
        &json!({"profileInfo": {"avatarId": 102000007}}),
    );
    let err = render_outfit("7", &cfg(), &fetcher).unwrap_err();
    assert!(matches!(err, CardError::ProfileNotFound));
    assert_eq!(fetcher.requests(), vec![format!("GET {PROFILE}?id=7")]);
}

#[test]
fn invalid_config_is_a_server_error() {
    let mut cfg = cfg();
    cfg.layout.shrink_step = 0.0;
    let err = render_outfit("7", &cfg, &StaticFetcher::new()).unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.to_payload().error, "failed to render outfit card");
}

#[test]
fn unavailable_tables_are_empty() {
    let (catalog, fallback) = load_tables(&cfg(), &StaticFetcher::new());
    assert!(catalog.is_empty());
    assert!(fallback.is_empty());

    let (catalog, fallback) = load_tables(&cfg(), &tables(StaticFetcher::new()));
    assert_eq!(catalog.len(), 2);
    assert_eq!(fallback.len(), 1);
}

#[test]
fn bare_profile_skips_lookup_tables() {
    let fetcher = tables(StaticFetcher::new());
    let profile = json!({"basicInfo": {"nickname": "nobody"}});
    let png = render_profile(&profile, &cfg(), &fetcher).unwrap();

    assert!(fetcher.requests().is_empty());
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 1200));
}

#[test]
fn ring_uses_primary_and_fallback_and_skips_unknown_items() {
    let fetcher = tables(StaticFetcher::new())
        .with_body(format!("{BASE}/Icon_203.png"), png([0, 200, 0]))
        .with_body("https://cdn.test/907.png", png([0, 0, 200]))
        .with_body(format!("{BASE}/102000007.png"), png([200, 200, 200]));
    let profile = json!({
        "basicInfo": {"weaponSkinShows": [907], "title": 555},
        "profileInfo": {"avatarId": 102000007, "clothesImage": "x?ids=203"},
        "petInfo": null
    });

    let png = render_profile(&profile, &cfg(), &fetcher).unwrap();
    assert!(image::load_from_memory(&png).is_ok());

    let gets = gets(&fetcher);
    assert!(gets.contains(&format!("GET {BASE}/Icon_203.png")));
    assert!(gets.contains(&"GET https://cdn.test/907.png".to_owned()));
    assert!(gets.contains(&format!("GET {BASE}/102000007.png")));
    // Title 555 is not in the catalog: never probed, never fetched.
    assert!(!fetcher.requests().iter().any(|r| r.contains("555")));
}

#[test]
fn corrupt_character_image_is_a_render_failure() {
    let fetcher = tables(StaticFetcher::new())
        .with_body(format!("{BASE}/102000007.png"), b"not an image".to_vec());
    let profile = json!({
        "basicInfo": {},
        "profileInfo": {"avatarId": "102000007"}
    });
    let err = render_profile(&profile, &cfg(), &fetcher).unwrap_err();
    assert!(matches!(err, CardError::Render(_)));
    assert_eq!(err.status_code(), 500);
}

#[test]
fn missing_banner_is_skipped() {
    let fetcher = StaticFetcher::new();
    let profile = json!({
        "basicInfo": {"avatars": {"png": "https://banner.test/b.png"}}
    });
    assert!(render_profile(&profile, &cfg(), &fetcher).is_ok());
    assert_eq!(gets(&fetcher), vec!["GET https://banner.test/b.png".to_owned()]);
}

#[test]
fn oversized_item_image_is_dropped_from_the_ring() {
    let huge = {
        let img = image::RgbaImage::from_pixel(70_000, 1, image::Rgba([0, 200, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    };
    let fetcher = tables(StaticFetcher::new())
        .with_body(format!("{BASE}/Icon_203.png"), huge)
        .with_body("https://cdn.test/907.png", png([0, 0, 200]));
    let profile = json!({
        "basicInfo": {"weaponSkinShows": [907]},
        "profileInfo": {"clothesImage": "x?ids=203"}
    });

    let png = render_profile(&profile, &cfg(), &fetcher).unwrap();
    assert!(image::load_from_memory(&png).is_ok());
}

fn red_pixels_in_header_band(card: &[u8]) -> usize {
    let img = image::load_from_memory(card).unwrap().to_rgba8();
    (0..110)
        .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| img.get_pixel(x, y).0[0] > 220)
        .count()
}

#[test]
fn header_draws_nickname_or_placeholder() {
    let mut cfg = cfg();
    cfg.style.header.font_path = Some(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans-Bold.ttf"),
    );
    let fetcher = StaticFetcher::new();

    let bare = render_profile(&json!({"basicInfo": {}}), &CardConfig::default(), &fetcher).unwrap();
    assert_eq!(red_pixels_in_header_band(&bare), 0);

    let placeholder = render_profile(&json!({"basicInfo": {}}), &cfg, &fetcher).unwrap();
    let named = render_profile(
        &json!({"basicInfo": {"nickname": "WWWWWWWWWWWW"}}),
        &cfg,
        &fetcher,
    )
    .unwrap();
    let placeholder = red_pixels_in_header_band(&placeholder);
    let named = red_pixels_in_header_band(&named);
    assert!(placeholder > 100, "placeholder ink {placeholder}");
    assert!(named > placeholder, "named ink {named} vs {placeholder}");
}

#[test]
fn unreadable_header_font_is_a_server_error() {
    let mut cfg = cfg();
    cfg.style.header.font_path = Some("/nonexistent/outfit-card/font.ttf".into());
    let err = render_profile(&json!({"basicInfo": {}}), &cfg, &StaticFetcher::new()).unwrap_err();
    assert!(matches!(err, CardError::Other(_)));
    assert_eq!(err.to_payload().error, "failed to render outfit card");
}
