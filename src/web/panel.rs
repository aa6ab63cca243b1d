use crate::error::js_reason;
use crate::manifest::BackendKind;
use crate::media::MediaElement;
use crate::media::MediaPanel;

use super::set_display;
use super::set_html;
use super::set_text;

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::HtmlMediaElement;

pub const EMBED_CONTAINER_ID: &str = "youtube-player";
pub const EMBED_FRAME_ID: &str = "youtube-frame";
pub const EMBED_ERROR_ID: &str = "youtube-error";
pub const VIDEO_ID: &str = "video-player";
pub const AUDIO_ID: &str = "audio-player";
pub const NOW_PLAYING_ID: &str = "current-media-title";
pub const DOWNLOAD_ID: &str = "download-media";
pub const MUTE_ID: &str = "mute-media";

pub const MUTED_LABEL: &str = r#"<i class="fas fa-volume-up"></i> Unmute"#;
pub const UNMUTED_LABEL: &str = r#"<i class="fas fa-volume-mute"></i> Mute"#;

fn surface_id(surface: BackendKind) -> &'static str {
    match surface {
        BackendKind::EmbeddedVideo => EMBED_CONTAINER_ID,
        BackendKind::LocalVideo => VIDEO_ID,
        BackendKind::LocalAudio => AUDIO_ID,
    }
}

/// `<video>` / `<audio>` element looked up by id on every call.
pub struct DomMediaElement {
    id: &'static str,
}

impl DomMediaElement {
    fn element(&self) -> Option<HtmlMediaElement> {
        let element = super::element(self.id)?.dyn_into::<HtmlMediaElement>().ok();
        if element.is_none() {
            tracing::warn!(id = self.id, "Media element missing.");
        }
        element
    }
}

impl MediaElement for DomMediaElement {
    fn set_source(&self, url: &str) {
        if let Some(element) = self.element() {
            element.set_src(url);
        }
    }

    fn reload(&self) {
        if let Some(element) = self.element() {
            element.load();
        }
    }

    fn play(&self) {
        let Some(element) = self.element() else { return };

        // The returned promise rejects on autoplay policy; the user can press play again.
        if let Err(error) = element.play() {
            tracing::warn!(id = self.id, error = %js_reason(&error), "Play failed.");
        }
    }

    fn pause(&self) {
        let Some(element) = self.element() else { return };

        if let Err(error) = element.pause() {
            tracing::warn!(id = self.id, error = %js_reason(&error), "Pause failed.");
        }
    }

    fn muted(&self) -> bool {
        self.element().is_some_and(|element| element.muted())
    }

    fn set_muted(&self, muted: bool) {
        if let Some(element) = self.element() {
            element.set_muted(muted);
        }
    }

    fn request_fullscreen(&self) {
        let Some(element) = self.element() else { return };

        if let Err(error) = element.request_fullscreen() {
            tracing::warn!(id = self.id, error = %js_reason(&error), "Fullscreen refused.");
        }
    }
}

pub struct DomMediaPanel {
    video: DomMediaElement,
    audio: DomMediaElement,
    download: RefCell<Option<String>>,
}

impl Default for DomMediaPanel {
    fn default() -> Self {
        Self {
            video: DomMediaElement { id: VIDEO_ID },
            audio: DomMediaElement { id: AUDIO_ID },
            download: RefCell::new(None),
        }
    }
}

impl DomMediaPanel {
    /// Source of the currently playing local file, if the download button is shown.
    pub fn download_url(&self) -> Option<String> {
        self.download.borrow().clone()
    }
}

impl MediaPanel for DomMediaPanel {
    type Element = DomMediaElement;

    fn video(&self) -> &DomMediaElement {
        &self.video
    }

    fn audio(&self) -> &DomMediaElement {
        &self.audio
    }

    fn set_visible(&self, surface: BackendKind, visible: bool) {
        set_display(surface_id(surface), if visible { "block" } else { "none" });
    }

    fn set_now_playing(&self, title: &str) {
        set_text(NOW_PLAYING_ID, &format!("Now playing: {title}"));
    }

    fn set_download(&self, url: Option<&str>) {
        *self.download.borrow_mut() = url.map(str::to_string);
        set_display(DOWNLOAD_ID, if url.is_some() { "inline-flex" } else { "none" });
    }

    fn set_mute_label(&self, muted: bool) {
        set_html(MUTE_ID, if muted { MUTED_LABEL } else { UNMUTED_LABEL });
    }

    fn set_embed_error(&self, message: Option<&str>) {
        match message {
            Some(message) => {
                set_text(EMBED_ERROR_ID, message);
                set_display(EMBED_ERROR_ID, "block");
                set_display(EMBED_FRAME_ID, "none");
            }
            None => {
                set_display(EMBED_ERROR_ID, "none");
                set_display(EMBED_FRAME_ID, "block");
            }
        }
    }

    fn embed_fullscreen(&self) {
        let selector = format!("#{EMBED_CONTAINER_ID} iframe");

        let Ok(Some(frame)) = gloo_utils::document().query_selector(&selector) else {
            tracing::info!("No embedded frame to take fullscreen.");
            return;
        };

        if let Err(error) = frame.request_fullscreen() {
            tracing::warn!(error = %js_reason(&error), "Fullscreen refused.");
        }
    }
}
