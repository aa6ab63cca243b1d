use displaydoc::Display;
use thiserror::Error;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// Failure to open a document with the decoding engine.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum LoadError {
    /// Document engine rejected {url}: {reason}
    Rejected { url: String, reason: String },
    /// Document engine is not available on this page
    EngineMissing,
}

/// Failure while fetching or drawing a single page.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum RenderError {
    /// Page {page} could not be fetched: {reason}
    Page { page: u32, reason: String },
    /// Page {page} could not be drawn: {reason}
    Draw { page: u32, reason: String },
    /// Drawing surface is not available
    SurfaceMissing,
}

#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum ManifestError {
    /// Invalid manifest location {0}
    Location(String),
    /// Fetch error: {0}
    Fetch(String),
    /// Server returned non-success code {0}
    HttpCode(u16),
    /// Manifest is not valid JSON: {0}
    Data(String),
}

#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum MediaError {
    /// No embedded video identifier found in {0}
    NoVideoId(String),
    /// Embedded player runtime failed to load: {0}
    Runtime(String),
    /// Embedded player could not be created: {0}
    Player(String),
}

/// Rejected user input from the manual controls.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum InputError {
    /// Please enter a YouTube video URL or ID
    EmptyVideoInput,
    /// Please enter a valid YouTube video URL or ID
    InvalidVideoInput,
    /// Please choose a PDF document
    NoDocumentSelected,
    /// Unknown item {0}
    UnknownItem(UnknownKind),
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum UnknownKind {
    /// document
    Document,
    /// media
    Media,
}

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Config is not valid JSON: {0}
    Parse(#[from] serde_json::Error),
    /// Config value {field} must be positive
    NotPositive { field: &'static str },
}

/// Everything the selection layer can report back to the UI.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum ViewerError {
    /// {0}
    Load(#[from] LoadError),
    /// {0}
    Media(#[from] MediaError),
    /// {0}
    Input(#[from] InputError),
}

/// Best-effort readable text for an exception thrown by the browser or a script.
pub fn js_reason(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }

    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
