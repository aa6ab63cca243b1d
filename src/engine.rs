//! Seam to the document decoding and rasterization engine.
//!
//! The engine is consumed, not implemented, by the renderer: it opens a document from a locator,
//! hands out pages and draws a page at a given scale onto whatever surface it was built with.
#![allow(async_fn_in_trait)]

use crate::error::LoadError;
use crate::error::RenderError;

/// Pixel dimensions of a page at a given scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

pub trait DocumentEngine {
    type Document: Document;

    async fn open(&self, url: &str) -> Result<Self::Document, LoadError>;
}

pub trait Document {
    type Page: Page;

    fn page_count(&self) -> u32;

    /// `number` is 1-indexed.
    async fn page(&self, number: u32) -> Result<Self::Page, RenderError>;
}

pub trait Page {
    fn viewport(&self, scale: f64) -> Viewport;

    /// Draws the page onto the engine's surface, resizing the surface to `viewport` first.
    async fn draw(&self, viewport: &Viewport) -> Result<(), RenderError>;
}
