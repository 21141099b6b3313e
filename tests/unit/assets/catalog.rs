use serde_json::json;

use super::*;

fn id(s: &str) -> ItemRef {
    ItemRef::parse(s).unwrap()
}

#[test]
fn catalog_accepts_numeric_and_string_ids() {
    let cat = ItemCatalog::from_json(&json!([
        { "itemID": 203000001, "icon": "Icon_203000001", "description": "Red Hoodie" },
        { "itemID": "907000002", "icon": "Icon_pet_2", "description": "Falco" },
    ]));
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.get(&id("203000001")).unwrap().icon, "Icon_203000001");
    assert_eq!(cat.get(&id("907000002")).unwrap().description, "Falco");
    assert!(cat.get(&id("1")).is_none());
}

#[test]
fn catalog_skips_rows_without_id_or_icon_and_keeps_first_duplicate() {
    let cat = ItemCatalog::from_json(&json!([
        { "icon": "no_id" },
        { "itemID": 5 },
        { "itemID": 6, "icon": "   " },
        { "itemID": 7, "icon": "first" },
        { "itemID": 7, "icon": "second" },
    ]));
    assert_eq!(cat.len(), 1);
    assert_eq!(cat.get(&id("7")).unwrap().icon, "first");
    assert_eq!(cat.get(&id("7")).unwrap().description, "");
}

#[test]
fn non_array_documents_are_empty() {
    assert!(ItemCatalog::from_json(&json!({"items": []})).is_empty());
    assert!(FallbackMap::from_json(&json!("x")).is_empty());
}

#[test]
fn fallback_map_merges_single_key_objects() {
    let map = FallbackMap::from_json(&json!([
        { "10": "https://cdn/a.png" },
        { "20": "https://cdn/b.png" },
        { "10": "https://cdn/a2.png" },
        { "30": 12 },
        "not an object",
    ]));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&id("10")), Some("https://cdn/a2.png"));
    assert_eq!(map.get(&id("20")), Some("https://cdn/b.png"));
    assert_eq!(map.get(&id("30")), None);
}
