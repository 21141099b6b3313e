use serde_json::Value;

use crate::{
    assets::item::{ItemRef, json_u64},
    foundation::error::{CardError, CardResult},
};

/// Top-level section whose presence identifies a real profile.
const IDENTITY_SECTION: &str = "basicInfo";

// Candidate locations per field, highest priority first. The first location holding a
// usable value wins.
const AVATAR_SOURCES: &[&str] = &["/profileInfo/avatarId"];
const CLOTHES_SOURCES: &[&str] = &["/profileInfo/clothesImage"];
const WEAPON_SOURCES: &[&str] = &[
    "/basicInfo/weaponSkinShows",
    "/profileInfo/weaponSkinShows",
    "/weaponSkinShows",
];
const PET_SOURCES: &[&str] = &["/petInfo/skinId", "/petInfo/petId"];
const TITLE_SOURCES: &[&str] = &["/basicInfo/title"];
const BANNER_SOURCES: &[&str] = &["/basicInfo/avatars/png"];

/// Role of an item in the ring. Ring order follows declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKind {
    Clothing,
    Weapon,
    Title,
    Pet,
}

/// One entry of the item ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingItem {
    pub kind: SlotKind,
    pub id: ItemRef,
}

/// Canonical view of an upstream profile payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub avatar_id: Option<ItemRef>,
    pub clothing_ids: Vec<ItemRef>,
    pub weapon_id: Option<ItemRef>,
    pub pet_id: Option<ItemRef>,
    pub title_ids: Vec<ItemRef>,
    pub banner_url: Option<String>,
    pub nickname: Option<String>,
    pub level: Option<u64>,
    pub rank: Option<u64>,
    pub region: Option<String>,
}

impl ProfileFields {
    /// Items to place around the character: clothing, then weapon, then titles, then pet.
    pub fn ring_items(&self) -> Vec<RingItem> {
        let clothing = self.clothing_ids.iter().map(|id| (SlotKind::Clothing, id));
        let weapon = self.weapon_id.iter().map(|id| (SlotKind::Weapon, id));
        let titles = self.title_ids.iter().map(|id| (SlotKind::Title, id));
        let pet = self.pet_id.iter().map(|id| (SlotKind::Pet, id));

        clothing
            .chain(weapon)
            .chain(titles)
            .chain(pet)
            .map(|(kind, id)| RingItem {
                kind,
                id: id.clone(),
            })
            .collect()
    }
}

/// Normalize a raw profile payload.
///
/// Only a missing identity section is an error ([`CardError::ProfileNotFound`]); every
/// other field degrades to absent.
pub fn extract(raw: &Value) -> CardResult<ProfileFields> {
    if !raw.get(IDENTITY_SECTION).is_some_and(Value::is_object) {
        return Err(CardError::ProfileNotFound);
    }

    let fields = ProfileFields {
        avatar_id: first_match(raw, AVATAR_SOURCES, ItemRef::from_json),
        clothing_ids: first_match(raw, CLOTHES_SOURCES, |v| {
            Some(clothing_ids(v)).filter(|ids| !ids.is_empty())
        })
        .unwrap_or_default(),
        weapon_id: first_match(raw, WEAPON_SOURCES, |v| id_list(v).into_iter().next()),
        pet_id: first_match(raw, PET_SOURCES, ItemRef::from_json),
        title_ids: first_match(raw, TITLE_SOURCES, |v| {
            Some(id_list(v)).filter(|ids| !ids.is_empty())
        })
        .unwrap_or_default(),
        banner_url: first_match(raw, BANNER_SOURCES, |v| {
            v.as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        }),
        nickname: text_at(raw, "/basicInfo/nickname"),
        level: raw.pointer("/basicInfo/level").and_then(json_u64),
        rank: raw.pointer("/basicInfo/rank").and_then(json_u64),
        region: text_at(raw, "/basicInfo/region"),
    };
    Ok(fields)
}

fn first_match<T>(raw: &Value, sources: &[&str], read: impl Fn(&Value) -> Option<T>) -> Option<T> {
    sources
        .iter()
        .filter_map(|ptr| raw.pointer(ptr))
        .find_map(read)
}

fn text_at(raw: &Value, ptr: &str) -> Option<String> {
    raw.pointer(ptr)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Scalar → one id, list → every valid id in order, anything else → empty.
fn id_list(value: &Value) -> Vec<ItemRef> {
    match value {
        Value::Array(items) => items.iter().filter_map(ItemRef::from_json).collect(),
        other => ItemRef::from_json(other).into_iter().collect(),
    }
}

fn clothing_ids(value: &Value) -> Vec<ItemRef> {
    match value {
        Value::String(s) => parse_clothing_ids(s),
        Value::Array(_) | Value::Number(_) => id_list(value),
        _ => Vec::new(),
    }
}

/// Parse the clothing id string.
///
/// Accepted shapes: `"<anything>ids=1,2,3[&more]"`, a bare `"1,2,3"` list, or a single
/// `"203"` token. Non-numeric tokens are dropped.
pub fn parse_clothing_ids(raw: &str) -> Vec<ItemRef> {
    let list = match raw.find("ids=") {
        Some(at) => &raw[at + "ids=".len()..],
        None => raw,
    };
    let list = list.split('&').next().unwrap_or_default();

    list.split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(ItemRef::parse)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/profile/extract.rs"]
mod tests;
