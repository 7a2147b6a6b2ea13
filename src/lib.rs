//! Segment rasterized document pages into content blocks and repack a chosen
//! subset of them into a new single-column PDF.
//!
//! The per-page pipeline is binarize → segment → filter → crop
//! ([`segment`]); crops from all pages are then stacked onto A4 pages by
//! [`layout::packer`] and serialized by [`pdf::writer`].

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod segment;
