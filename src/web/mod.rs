//! Browser adapters for the renderer and the media switch.
//!
//! The DOM is built by the `app` components; everything here looks elements up by id at call
//! time, so the adapters can be constructed before the first mount.

pub mod iframe_api;
pub mod page_view;
pub mod panel;
pub mod pdfjs;

use crate::config::ViewerConfig;
use crate::config::CONFIG_PATH;
use crate::error::js_reason;
use crate::error::ManifestError;
use crate::manifest;
use crate::media::MediaBackendSwitch;
use crate::render::PageRenderCoordinator;
use crate::selection::SelectionController;

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;

pub use iframe_api::IframeApi;
pub use page_view::DomPageView;
pub use panel::DomMediaPanel;
pub use pdfjs::PdfJsEngine;

pub type WebViewer = SelectionController<PdfJsEngine, DomPageView, DomMediaPanel, IframeApi>;

/// Wires the browser adapters into a selection controller.
pub fn viewer(config: ViewerConfig) -> WebViewer {
    let pages = PageRenderCoordinator::new(
        PdfJsEngine::new(page_view::CANVAS_ID),
        DomPageView,
        config.zoom(),
    );
    let player = MediaBackendSwitch::new(
        DomMediaPanel::default(),
        IframeApi::new(panel::EMBED_FRAME_ID),
    );

    SelectionController::new(config, pages, player)
}

pub fn element(id: &str) -> Option<web_sys::Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn html_element(id: &str) -> Option<web_sys::HtmlElement> {
    element(id)?.dyn_into::<web_sys::HtmlElement>().ok()
}

pub fn set_display(id: &str, display: &str) {
    let Some(element) = html_element(id) else {
        tracing::warn!(id, "Element missing, cannot toggle display.");
        return;
    };

    if let Err(error) = element.style().set_property("display", display) {
        tracing::warn!(id, error = %js_reason(&error), "Failed to set display.");
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(element) = element(id) {
        element.set_text_content(Some(text));
    }
}

pub fn set_html(id: &str, html: &str) {
    if let Some(element) = element(id) {
        element.set_inner_html(html);
    }
}

pub fn alert(message: &str) {
    if let Err(error) = gloo_utils::window().alert_with_message(message) {
        tracing::warn!(error = %js_reason(&error), "Alert failed.");
    }
}

pub fn open_in_new_tab(url: &str) {
    if let Err(error) = gloo_utils::window().open_with_url_and_target(url, "_blank") {
        tracing::warn!(url, error = %js_reason(&error), "Failed to open download.");
    }
}

/// Width available to a page inside `container_id`, minus the padding around the canvas.
pub fn container_width(container_id: &str, padding: f64) -> Option<f64> {
    let width = element(container_id)?.client_width() as f64 - padding;
    (width > 0.0).then_some(width)
}

fn page_href() -> String {
    gloo_utils::window()
        .location()
        .href()
        .unwrap_or_default()
}

pub async fn fetch_manifest<T: DeserializeOwned>(location: &str) -> Result<Vec<T>, ManifestError> {
    let url = manifest::resolve(&page_href(), location)?;
    manifest::fetch(url).await
}

/// Loads `data/viewer.json` when the page ships one. Any failure falls back to defaults.
pub async fn load_config() -> ViewerConfig {
    let Ok(url) = manifest::resolve(&page_href(), CONFIG_PATH) else {
        return ViewerConfig::default();
    };

    let body = match reqwest::get(url).await {
        Ok(response) if response.status() == reqwest::StatusCode::OK => response.text().await,
        Ok(response) => {
            tracing::info!(status = response.status().as_u16(), "No viewer config, using defaults.");
            return ViewerConfig::default();
        }
        Err(error) => {
            tracing::info!(%error, "No viewer config, using defaults.");
            return ViewerConfig::default();
        }
    };

    match body.map(|body| ViewerConfig::from_json(&body)) {
        Ok(Ok(config)) => {
            tracing::info!(?config, "Loaded viewer config.");
            config
        }
        Ok(Err(error)) => {
            tracing::warn!(%error, "Invalid viewer config, using defaults.");
            ViewerConfig::default()
        }
        Err(error) => {
            tracing::warn!(%error, "Unreadable viewer config, using defaults.");
            ViewerConfig::default()
        }
    }
}
