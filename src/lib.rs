//! Paginated PDF reader plus a switchable media player (YouTube, local video, local audio),
//! running in the browser.
//!
//! The page renderer and the media switch are platform independent and talk to the browser only
//! through the seams in [`engine`], [`render::PageView`] and [`media`]. The `web` and `app`
//! modules provide the browser side when built for `wasm32`.

pub mod config;
pub mod embed;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod media;
pub mod render;
pub mod selection;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::ViewerConfig;
pub use manifest::BackendKind;
pub use manifest::DocumentItem;
pub use manifest::MediaItem;
pub use media::MediaBackendSwitch;
pub use render::PageRenderCoordinator;
pub use render::RenderState;
pub use selection::SelectionController;
