use anyhow::Context;
use serde_json::Value;

use crate::{
    assets::{
        catalog::{FallbackMap, ItemCatalog},
        fetch::{FetchError, Fetcher},
        item::ItemRef,
        resolver::ItemResolver,
    },
    config::CardConfig,
    foundation::error::{CardError, CardResult},
    layout::radial::RadialLayoutEngine,
    profile::extract::{ProfileFields, extract},
    render::{
        compositor::{CardImages, Compositor},
        text::{HeaderText, header_label},
    },
};

/// Render the outfit card for profile `id` to PNG bytes.
///
/// Runs the whole request: profile fetch, field extraction, item resolution, layout and
/// compositing. Per-item failures shrink the ring; everything else is a [`CardError`].
#[tracing::instrument(skip(cfg, fetcher))]
pub fn render_outfit(id: &str, cfg: &CardConfig, fetcher: &dyn Fetcher) -> CardResult<Vec<u8>> {
    let result = require_id(id).and_then(|id| {
        cfg.validate()?;
        let profile = fetch_profile(id, cfg, fetcher)?;
        render_card(&profile, cfg, fetcher)
    });
    result.inspect_err(log_failure)
}

/// Render from an already-fetched profile payload.
#[tracing::instrument(skip_all)]
pub fn render_profile(
    profile: &Value,
    cfg: &CardConfig,
    fetcher: &dyn Fetcher,
) -> CardResult<Vec<u8>> {
    cfg.validate()
        .and_then(|()| render_card(profile, cfg, fetcher))
        .inspect_err(log_failure)
}

/// Trimmed, non-empty profile id.
pub fn require_id(id: &str) -> CardResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CardError::client_input("profile id is required"));
    }
    Ok(id)
}

/// `GET {profile_url}?id={id}`.
///
/// A non-2xx answer or a body that is not JSON means the profile does not exist.
pub fn fetch_profile(id: &str, cfg: &CardConfig, fetcher: &dyn Fetcher) -> CardResult<Value> {
    let url = reqwest::Url::parse_with_params(&cfg.endpoints.profile_url, &[("id", id)])
        .with_context(|| format!("invalid profile url '{}'", cfg.endpoints.profile_url))?;

    match fetcher.fetch_json(url.as_str()) {
        Ok(profile) => Ok(profile),
        Err(e @ (FetchError::Status(_) | FetchError::Decode(_))) => {
            tracing::warn!(id, error = %e, "profile unavailable");
            Err(CardError::ProfileNotFound)
        }
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("fetch profile {id}"))
            .into()),
    }
}

/// Fetch the item catalog and fallback map. A table that cannot be fetched is empty.
pub fn load_tables(cfg: &CardConfig, fetcher: &dyn Fetcher) -> (ItemCatalog, FallbackMap) {
    let (catalog, fallback) = rayon::join(
        || fetcher.fetch_json(&cfg.endpoints.catalog_url),
        || fetcher.fetch_json(&cfg.endpoints.fallback_map_url),
    );

    let catalog = match catalog {
        Ok(doc) => ItemCatalog::from_json(&doc),
        Err(e) => {
            tracing::warn!(error = %e, "item catalog unavailable");
            ItemCatalog::default()
        }
    };
    let fallback = match fallback {
        Ok(doc) => FallbackMap::from_json(&doc),
        Err(e) => {
            tracing::warn!(error = %e, "fallback map unavailable");
            FallbackMap::default()
        }
    };
    tracing::debug!(
        catalog = catalog.len(),
        fallback = fallback.len(),
        "lookup tables loaded"
    );
    (catalog, fallback)
}

fn render_card(profile: &Value, cfg: &CardConfig, fetcher: &dyn Fetcher) -> CardResult<Vec<u8>> {
    let fields = extract(profile)?;
    tracing::info!(
        nickname = fields.nickname.as_deref().unwrap_or("-"),
        level = ?fields.level,
        rank = ?fields.rank,
        region = fields.region.as_deref().unwrap_or("-"),
        "profile loaded"
    );

    let header = prepare_header(&fields, cfg)?;
    let images = fetch_images(&fields, cfg, fetcher)?;

    let engine = RadialLayoutEngine::from_params(&cfg.layout);
    let plan = engine.compute_layout(
        cfg.canvas()?,
        cfg.canvas.character_box,
        cfg.canvas.banner_box,
        images.items.len(),
        cfg.layout.preferred_hex_radius,
        cfg.layout.hex_radius_floor,
    )?;

    let png = Compositor::new(cfg.style.clone())
        .with_header(header)
        .render(&plan, &images)?;
    tracing::debug!(
        slots = plan.positions.len(),
        hex_radius = plan.hex_radius,
        bytes = png.len(),
        "card rendered"
    );
    Ok(png)
}

/// Shape the nickname header. Without a configured font the card has no header.
fn prepare_header(fields: &ProfileFields, cfg: &CardConfig) -> CardResult<Option<HeaderText>> {
    let Some(path) = cfg.style.header.font_path.as_deref() else {
        tracing::debug!("no header font configured, header skipped");
        return Ok(None);
    };
    let font = std::fs::read(path)
        .with_context(|| format!("read header font '{}'", path.display()))?;
    let label = header_label(fields.nickname.as_deref());
    HeaderText::shape(label, &font, &cfg.style.header).map(Some)
}

fn fetch_images(
    fields: &ProfileFields,
    cfg: &CardConfig,
    fetcher: &dyn Fetcher,
) -> CardResult<CardImages> {
    let ring_items = fields.ring_items();
    let ring: Vec<ItemRef> = ring_items.iter().map(|r| r.id.clone()).collect();

    let (character, items) = if ring.is_empty() && fields.avatar_id.is_none() {
        (None, Vec::new())
    } else {
        let (catalog, fallback) = load_tables(cfg, fetcher);
        let resolver = ItemResolver::new(
            fetcher,
            &catalog,
            &fallback,
            &cfg.endpoints.primary_image_base,
        );
        rayon::join(
            || {
                let id = fields.avatar_id.as_ref()?;
                resolver
                    .resolve_avatar(id)
                    .inspect_err(|e| tracing::warn!(%id, error = %e, "character image unavailable"))
                    .ok()
            },
            || resolver.resolve_all(&ring),
        )
    };

    let banner = fields.banner_url.as_deref().and_then(|url| {
        fetcher
            .fetch_bytes(url)
            .inspect_err(|e| tracing::warn!(url, error = %e, "banner unavailable"))
            .ok()
    });

    for (slot, image) in ring_items.iter().zip(&items) {
        match image {
            Some(image) => tracing::debug!(
                kind = ?slot.kind,
                id = %slot.id,
                source = %image.source_id,
                origin = ?image.origin,
                "slot resolved"
            ),
            None => tracing::debug!(kind = ?slot.kind, id = %slot.id, "slot dropped"),
        }
    }

    CardImages::decode(
        character.as_ref().map(|c| c.bytes.as_slice()),
        banner.as_deref(),
        &items,
    )
}

fn log_failure(e: &CardError) {
    match e {
        CardError::ClientInput(_) | CardError::ProfileNotFound => {
            tracing::warn!(status = e.status_code(), error = %e, "card request rejected");
        }
        _ => tracing::error!(status = e.status_code(), error = ?e, "card render failed"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
