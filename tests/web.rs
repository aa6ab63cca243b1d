#![cfg(target_arch = "wasm32")]

use folio::media::MediaBackendSwitch;
use folio::media::MediaPanel;
use folio::web::panel;
use folio::web::DomMediaPanel;
use folio::web::IframeApi;
use folio::BackendKind;
use folio::MediaItem;

use futures::executor::block_on;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount() {
    let document = gloo_utils::document();
    let body = document.body().unwrap();

    let html = format!(
        r#"<div id="{embed}"><div id="{frame}"></div><div id="{error}"></div></div>
        <video id="{video}"></video><audio id="{audio}"></audio>
        <h3 id="{title}"></h3><button id="{download}"></button><button id="{mute}"></button>"#,
        embed = panel::EMBED_CONTAINER_ID,
        frame = panel::EMBED_FRAME_ID,
        error = panel::EMBED_ERROR_ID,
        video = panel::VIDEO_ID,
        audio = panel::AUDIO_ID,
        title = panel::NOW_PLAYING_ID,
        download = panel::DOWNLOAD_ID,
        mute = panel::MUTE_ID,
    );
    body.set_inner_html(&html);
}

fn display(id: &str) -> String {
    gloo_utils::document()
        .get_element_by_id(id)
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap()
        .style()
        .get_property_value("display")
        .unwrap()
}

#[wasm_bindgen_test]
fn audio_selection_shows_only_audio_element() {
    mount();
    let switch = MediaBackendSwitch::new(DomMediaPanel::default(), IframeApi::new(panel::EMBED_FRAME_ID));

    let item = MediaItem {
        id: "song".into(),
        title: "Song".into(),
        kind: BackendKind::LocalAudio,
        url: "media/song.mp3".into(),
    };
    block_on(switch.select_media(&item)).unwrap();

    assert_eq!(display(panel::AUDIO_ID), "block");
    assert_eq!(display(panel::VIDEO_ID), "none");
    assert_eq!(display(panel::EMBED_CONTAINER_ID), "none");
    assert_eq!(display(panel::DOWNLOAD_ID), "inline-flex");
    assert_eq!(
        switch.panel().download_url().as_deref(),
        Some("media/song.mp3")
    );
}

#[wasm_bindgen_test]
fn mute_label_tracks_new_state() {
    mount();
    let media_panel = DomMediaPanel::default();

    media_panel.set_mute_label(true);
    let button = gloo_utils::document()
        .get_element_by_id(panel::MUTE_ID)
        .unwrap();

    assert_eq!(button.inner_html(), panel::MUTED_LABEL);
    assert!(button.text_content().unwrap().contains("Unmute"));
}
