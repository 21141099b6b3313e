pub mod geometry;
pub(crate) mod radial;
