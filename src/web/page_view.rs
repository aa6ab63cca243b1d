use crate::error::LoadError;
use crate::error::RenderError;
use crate::render::PageView;

use super::set_display;
use super::set_html;
use super::set_text;

pub const CONTAINER_ID: &str = "pdf-container";
pub const CANVAS_ID: &str = "pdf-canvas";
pub const LOADER_ID: &str = "pdf-loader";
pub const PAGE_NUM_ID: &str = "page-num";
pub const PAGE_COUNT_ID: &str = "page-count";

const LOADING_HTML: &str = r#"<i class="fas fa-spinner fa-spin fa-3x"></i><p>Loading PDF...</p>"#;

const FAILED_HTML: &str = r#"<i class="fas fa-exclamation-triangle fa-3x error-icon"></i>
<p class="error-text">Failed to load PDF</p>
<p>Check your network connection or the PDF URL</p>"#;

const RENDER_FAILED_HTML: &str = r#"<i class="fas fa-exclamation-triangle fa-3x error-icon"></i>
<p class="error-text">Failed to render page</p>"#;

/// Loader, canvas and page labels, addressed by element id.
#[derive(Default)]
pub struct DomPageView;

impl PageView for DomPageView {
    fn loading(&self) {
        set_html(LOADER_ID, LOADING_HTML);
        set_display(LOADER_ID, "block");
        set_display(CANVAS_ID, "none");
    }

    fn load_failed(&self, _: &LoadError) {
        set_html(LOADER_ID, FAILED_HTML);
        set_display(LOADER_ID, "block");
        set_display(CANVAS_ID, "none");
    }

    fn document_ready(&self, page_count: u32) {
        set_text(PAGE_COUNT_ID, &page_count.to_string());
    }

    fn page_rendered(&self, page: u32) {
        set_display(CANVAS_ID, "block");
        set_display(LOADER_ID, "none");
        set_text(PAGE_NUM_ID, &page.to_string());
    }

    fn render_failed(&self, page: u32, error: &RenderError) {
        tracing::warn!(page, %error, "Page render failed, keeping previous canvas.");
        set_text(PAGE_NUM_ID, &page.to_string());
    }

    fn first_render_failed(&self, page: u32, error: &RenderError) {
        tracing::warn!(page, %error, "Page render failed, nothing on screen yet.");
        set_html(LOADER_ID, RENDER_FAILED_HTML);
        set_display(LOADER_ID, "block");
        set_display(CANVAS_ID, "none");
        set_text(PAGE_NUM_ID, &page.to_string());
    }
}
