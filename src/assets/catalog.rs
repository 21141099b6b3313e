use std::collections::HashMap;

use crate::assets::item::ItemRef;

/// One row of the item catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Icon file stem under the primary image base.
    pub icon: String,
    pub description: String,
}

/// id → icon lookup built from the upstream catalog document.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    entries: HashMap<ItemRef, CatalogEntry>,
}

impl ItemCatalog {
    /// Build from `[{ "itemID": .., "icon": "..", "description": ".." }, ...]`.
    ///
    /// Rows without a usable id or icon are skipped. A non-array document yields an empty
    /// catalog. On duplicate ids the first row wins.
    pub fn from_json(doc: &serde_json::Value) -> Self {
        let mut entries = HashMap::new();
        let Some(rows) = doc.as_array() else {
            tracing::warn!("item catalog is not a JSON array; treating as empty");
            return Self { entries };
        };

        let mut skipped = 0usize;
        for row in rows {
            let id = row.get("itemID").and_then(ItemRef::from_json);
            let icon = row
                .get("icon")
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty());
            let (Some(id), Some(icon)) = (id, icon) else {
                skipped += 1;
                continue;
            };
            let description = row
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_owned();
            entries.entry(id).or_insert(CatalogEntry {
                icon: icon.to_owned(),
                description,
            });
        }
        if skipped > 0 {
            tracing::debug!(skipped, "skipped unusable catalog rows");
        }
        Self { entries }
    }

    pub fn get(&self, id: &ItemRef) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// id → absolute image URL used when the primary path is unavailable.
#[derive(Clone, Debug, Default)]
pub struct FallbackMap {
    urls: HashMap<ItemRef, String>,
}

impl FallbackMap {
    /// Build from a list of single-key objects (`[{"123": "https://.."}, ...]`), merged
    /// left to right: a later object overrides an earlier one for the same id.
    pub fn from_json(doc: &serde_json::Value) -> Self {
        let mut urls = HashMap::new();
        let Some(rows) = doc.as_array() else {
            tracing::warn!("fallback map is not a JSON array; treating as empty");
            return Self { urls };
        };

        for obj in rows.iter().filter_map(|r| r.as_object()) {
            for (key, url) in obj {
                let (Some(id), Some(url)) = (ItemRef::parse(key), url.as_str()) else {
                    continue;
                };
                let url = url.trim();
                if url.is_empty() {
                    continue;
                }
                urls.insert(id, url.to_owned());
            }
        }
        Self { urls }
    }

    pub fn get(&self, id: &ItemRef) -> Option<&str> {
        self.urls.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
