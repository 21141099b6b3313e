//! Outfit card renderer.
//!
//! Given a player profile id, fetches the profile from an upstream API, resolves every
//! equipped item (clothing, weapon, titles, pet) to an image, arranges the items in a
//! hexagon ring around the character sprite and encodes the card as PNG.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: raw profile JSON -> [`ProfileFields`] (first matching location wins)
//! 2. **Resolve**: [`ItemRef`] -> image bytes via catalog, primary CDN probe and fallback map
//! 3. **Lay out**: item count -> [`LayoutPlan`] (ring radius shrinks until clear of the banner)
//! 4. **Composite**: [`LayoutPlan`] + [`CardImages`] + nickname header -> PNG bytes (CPU
//!    rasterizer)
//!
//! Key properties:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Degrade per item**: an item that cannot be resolved is dropped from the ring; only
//!   request-level failures surface as [`CardError`].
//! - **Network behind a trait**: every upstream call goes through [`Fetcher`], so the
//!   whole pipeline runs offline against [`StaticFetcher`].
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod layout;
mod pipeline;
mod profile;
mod render;

pub use assets::catalog::{CatalogEntry, FallbackMap, ItemCatalog};
pub use assets::decode::{PreparedImage, decode_image};
pub use assets::fetch::{FetchError, Fetcher, HttpFetcher, StaticFetcher};
pub use assets::item::ItemRef;
pub use assets::resolver::{ImageOrigin, ItemResolver, ResolveError, ResolvedImage};
pub use config::{CanvasProfile, CardConfig, CardStyle, Endpoints, HeaderStyle, LayoutParams};
pub use foundation::core::{Canvas, Point, Rect, Rgba8};
pub use foundation::error::{CardError, CardResult, ErrorPayload};
pub use layout::geometry;
pub use layout::radial::{LayoutPlan, MAX_SHRINK_STEPS, RadialLayoutEngine};
pub use pipeline::{fetch_profile, load_tables, render_outfit, render_profile, require_id};
pub use profile::extract::{ProfileFields, RingItem, SlotKind, extract, parse_clothing_ids};
pub use render::FrameRGBA;
pub use render::compositor::{CardImages, Compositor};
pub use render::cpu::encode_png;
pub use render::text::{DEFAULT_HEADER, HeaderText, header_label};
