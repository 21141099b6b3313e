use rayon::prelude::*;

use crate::assets::{
    catalog::{FallbackMap, ItemCatalog},
    fetch::{FetchError, Fetcher},
    item::ItemRef,
};

/// Which source an image was finally downloaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    /// The templated primary CDN path.
    Primary,
    /// The absolute URL from the fallback map.
    Fallback,
}

/// Encoded image bytes for one item, as downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    pub source_id: ItemRef,
    pub bytes: Vec<u8>,
    pub origin: ImageOrigin,
}

/// Why an item could not be resolved. Every variant means "not found" to the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("item {0} is not in the catalog")]
    NotInCatalog(ItemRef),

    #[error("item {0} is unavailable on the primary path and has no fallback")]
    NoFallback(ItemRef),

    #[error("fetching item {id} from {url} failed: {source}")]
    Fetch {
        id: ItemRef,
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Resolves item ids to image bytes: catalog lookup, primary probe, fallback map.
///
/// Borrowed tables are loaded once per request by the caller; the resolver itself holds
/// no mutable state, so one instance can serve every worker of a parallel batch.
pub struct ItemResolver<'a> {
    fetcher: &'a dyn Fetcher,
    catalog: &'a ItemCatalog,
    fallback: &'a FallbackMap,
    primary_base: &'a str,
}

impl<'a> ItemResolver<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        catalog: &'a ItemCatalog,
        fallback: &'a FallbackMap,
        primary_base: &'a str,
    ) -> Self {
        Self {
            fetcher,
            catalog,
            fallback,
            primary_base,
        }
    }

    /// `{primary_base}/{stem}.png`
    pub fn primary_url(&self, stem: &str) -> String {
        format!("{}/{}.png", self.primary_base.trim_end_matches('/'), stem)
    }

    /// Resolve a catalog item.
    pub fn resolve(&self, id: &ItemRef) -> Result<ResolvedImage, ResolveError> {
        let entry = self
            .catalog
            .get(id)
            .ok_or_else(|| ResolveError::NotInCatalog(id.clone()))?;
        tracing::debug!(%id, description = %entry.description, "catalog hit");
        let primary = self.primary_url(&entry.icon);
        self.resolve_from(id, &primary)
    }

    /// Resolve a character sprite. Avatars are addressed by id on the primary path
    /// directly and are not listed in the catalog.
    pub fn resolve_avatar(&self, id: &ItemRef) -> Result<ResolvedImage, ResolveError> {
        let primary = self.primary_url(id.as_str());
        self.resolve_from(id, &primary)
    }

    /// Resolve many items on the rayon pool. Output slot `i` belongs to `ids[i]`;
    /// failures become `None` and never affect sibling slots.
    pub fn resolve_all(&self, ids: &[ItemRef]) -> Vec<Option<ResolvedImage>> {
        ids.par_iter()
            .map(|id| match self.resolve(id) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!(%id, error = %e, "item omitted from ring");
                    None
                }
            })
            .collect()
    }

    fn resolve_from(&self, id: &ItemRef, primary: &str) -> Result<ResolvedImage, ResolveError> {
        let (url, origin) = if self.fetcher.probe(primary) {
            (primary, ImageOrigin::Primary)
        } else {
            let fallback = self
                .fallback
                .get(id)
                .ok_or_else(|| ResolveError::NoFallback(id.clone()))?;
            tracing::debug!(%id, url = fallback, "primary unavailable, using fallback");
            (fallback, ImageOrigin::Fallback)
        };

        let bytes = self
            .fetcher
            .fetch_bytes(url)
            .map_err(|source| ResolveError::Fetch {
                id: id.clone(),
                url: url.to_owned(),
                source,
            })?;
        Ok(ResolvedImage {
            source_id: id.clone(),
            bytes,
            origin,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
