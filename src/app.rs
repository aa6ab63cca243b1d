use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::manifest::short_title;
use crate::manifest::DocumentItem;
use crate::manifest::MediaItem;
use crate::render::RenderOutcome;
use crate::web;
use crate::web::page_view;
use crate::web::panel;
use crate::web::WebViewer;

use dioxus::prelude::*;

use std::rc::Rc;

type Viewer = Rc<WebViewer>;

#[derive(Clone, Debug, PartialEq)]
enum ListState<T> {
    Loading,
    Ready(Vec<T>),
    Failed,
}

const IDLE_LOADER: &str = r#"<i class="fas fa-file-pdf fa-3x"></i><p>Choose a PDF to start reading</p>"#;

#[component]
pub fn App() -> Element {
    let config = use_resource(move || web::load_config());

    let Some(config) = config.cloned() else {
        return rsx! {
            div { class: "loading-message", "Loading..." }
        };
    };

    rsx! {
        ViewerRoot { config }
    }
}

#[component]
fn ViewerRoot(config: ViewerConfig) -> Element {
    let viewer: Viewer = use_context_provider(|| Rc::new(web::viewer(config.clone())));

    let mut documents = use_signal(|| ListState::<DocumentItem>::Loading);
    let mut media = use_signal(|| ListState::<MediaItem>::Loading);
    let mut active_media = use_signal(|| None::<String>);

    use_future({
        let viewer = viewer.clone();
        move || {
            let viewer = viewer.clone();
            async move {
                let location = viewer.config().document_manifest.clone();
                match web::fetch_manifest::<DocumentItem>(&location).await {
                    Ok(items) => {
                        viewer.set_documents(items.clone());
                        documents.set(ListState::Ready(items));
                    }
                    Err(error) => {
                        tracing::error!(%error, "Failed to load PDF manifest.");
                        documents.set(ListState::Failed);
                    }
                }
            }
        }
    });

    use_future({
        let viewer = viewer.clone();
        move || {
            let viewer = viewer.clone();
            async move {
                let location = viewer.config().media_manifest.clone();
                let items = match web::fetch_manifest::<MediaItem>(&location).await {
                    Ok(items) => items,
                    Err(error) => {
                        tracing::error!(%error, "Failed to load media manifest.");
                        media.set(ListState::Failed);
                        return;
                    }
                };

                let first = viewer.set_media(items.clone());
                media.set(ListState::Ready(items));

                if let Some(first) = first {
                    active_media.set(Some(first.id.clone()));
                    if let Err(error) = viewer.select_media(&first.id).await {
                        tracing::warn!(%error, "Default media failed to load.");
                    }
                }
            }
        }
    });

    rsx! {
        div { class: "viewer",
            DocumentSection { documents }
            MediaSection { media, active_media }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum PageCommand {
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
}

impl PageCommand {
    async fn run(self, viewer: &WebViewer) -> RenderOutcome {
        let pages = viewer.pages();
        match self {
            PageCommand::Prev => pages.prev_page().await,
            PageCommand::Next => pages.next_page().await,
            PageCommand::ZoomIn => pages.zoom_in().await,
            PageCommand::ZoomOut => pages.zoom_out().await,
        }
    }
}

fn open_document(
    viewer: Viewer,
    choice: String,
    mut documents: Signal<ListState<DocumentItem>>,
    mut active: Signal<Option<String>>,
) {
    if viewer.document(&choice).is_some() {
        active.set(Some(choice.clone()));
    }

    spawn(async move {
        match viewer.submit_document_choice(&choice).await {
            Ok(selection) => tracing::debug!(?selection, "Document selected."),
            Err(ViewerError::Input(error)) => {
                web::alert(&error.to_string());
                return;
            }
            Err(error) => tracing::warn!(%error, "Document selection failed."),
        }

        active.set(viewer.active_document());
        documents.set(ListState::Ready(viewer.documents()));
    });
}

#[component]
fn DocumentSection(documents: Signal<ListState<DocumentItem>>) -> Element {
    let viewer = use_context::<Viewer>();
    let active = use_signal(|| None::<String>);
    let mut choice = use_signal(String::new);

    let open = use_callback({
        let viewer = viewer.clone();
        move |id: String| open_document(viewer.clone(), id, documents, active)
    });

    // A list click also moves the dropdown to the clicked document.
    let pick = use_callback(move |id: String| {
        choice.set(id.clone());
        open.call(id);
    });

    let config = viewer.config().clone();

    let list = match &*documents.read() {
        ListState::Loading => rsx! {
            div { class: "loading-message", "Loading PDF list..." }
        },
        ListState::Failed => rsx! {
            div { class: "error-message",
                i { class: "fas fa-exclamation-triangle" }
                " Could not load the PDF list, check your network connection"
            }
        },
        ListState::Ready(items) if items.is_empty() => rsx! {
            div { class: "empty-message",
                i { class: "fas fa-info-circle" }
                " No PDF documents yet"
            }
        },
        ListState::Ready(items) => {
            let entries = items.iter().map(|item| {
                let id = item.id.clone();
                let class = if active().as_deref() == Some(item.id.as_str()) {
                    "pdf-item active"
                } else {
                    "pdf-item"
                };

                rsx! {
                    div {
                        key: "{item.id}",
                        class,
                        title: "{item.title}",
                        onclick: move |_| pick.call(id.clone()),
                        div { class: "item-title", {short_title(&item.title, config.list_title_limit)} }
                        div { class: "pdf-stats",
                            span { i { class: "fas fa-eye" } " {item.views}" }
                            span { i { class: "fas fa-heart" } " {item.likes}" }
                        }
                    }
                }
            });

            rsx! { {entries} }
        }
    };

    let options: Vec<(String, String)> = match &*documents.read() {
        ListState::Ready(items) => items
            .iter()
            .map(|item| (item.id.clone(), short_title(&item.title, config.select_title_limit)))
            .collect(),
        _ => Vec::new(),
    };

    let pages = |command: PageCommand| {
        let viewer = viewer.clone();
        move |_: MouseEvent| {
            let viewer = viewer.clone();
            spawn(async move {
                let outcome = command.run(&viewer).await;
                tracing::debug!(?command, ?outcome, "Page command.");
            });
        }
    };

    let fit_width = {
        let viewer = viewer.clone();
        move |_: MouseEvent| {
            let viewer = viewer.clone();
            let padding = viewer.config().fit_width_padding;
            let Some(width) = web::container_width(page_view::CONTAINER_ID, padding) else {
                return;
            };

            spawn(async move {
                if let Err(error) = viewer.pages().fit_width(width).await {
                    tracing::warn!(%error, "Fit width failed.");
                }
            });
        }
    };

    rsx! {
        section { class: "pdf-section",
            h2 { i { class: "fas fa-file-pdf" } " PDF documents" }

            div { id: "pdf-list-container", class: "item-list", {list} }

            div { class: "pdf-select-row",
                select {
                    id: "pdf-select",
                    value: "{choice}",
                    onchange: move |e| choice.set(e.value()),
                    option { value: "", "Choose a PDF document" }
                    for (id, title) in options {
                        option { key: "{id}", value: "{id}", "{title}" }
                    }
                }
                button {
                    id: "load-pdf",
                    onclick: move |_| open.call(choice()),
                    "Load"
                }
            }

            div { class: "pdf-controls",
                button { id: "prev-page", onclick: pages(PageCommand::Prev), i { class: "fas fa-chevron-left" } }
                span { class: "page-info",
                    span { id: page_view::PAGE_NUM_ID }
                    " / "
                    span { id: page_view::PAGE_COUNT_ID }
                }
                button { id: "next-page", onclick: pages(PageCommand::Next), i { class: "fas fa-chevron-right" } }
                button { id: "zoom-out", onclick: pages(PageCommand::ZoomOut), i { class: "fas fa-search-minus" } }
                button { id: "zoom-in", onclick: pages(PageCommand::ZoomIn), i { class: "fas fa-search-plus" } }
                button { id: "fit-width", onclick: fit_width, i { class: "fas fa-arrows-alt-h" } }
            }

            div { id: page_view::CONTAINER_ID, class: "pdf-container",
                div { id: page_view::LOADER_ID, class: "pdf-loader", dangerous_inner_html: IDLE_LOADER }
                canvas { id: page_view::CANVAS_ID, style: "display: none;" }
            }
        }
    }
}

#[component]
fn MediaSection(media: Signal<ListState<MediaItem>>, active_media: Signal<Option<String>>) -> Element {
    let viewer = use_context::<Viewer>();
    let mut active_media = active_media;
    let mut video_input = use_signal(String::new);

    let select = use_callback({
        let viewer = viewer.clone();
        move |id: String| {
            let viewer = viewer.clone();
            active_media.set(Some(id.clone()));
            spawn(async move {
                if let Err(error) = viewer.select_media(&id).await {
                    tracing::warn!(%error, "Media selection failed.");
                }
            });
        }
    });

    let limit = viewer.config().list_title_limit;

    let list = match &*media.read() {
        ListState::Loading => rsx! {
            div { class: "loading-message", "Loading media list..." }
        },
        ListState::Failed => rsx! {
            div { class: "error-message",
                i { class: "fas fa-exclamation-triangle" }
                " Could not load the media list, check your network connection"
            }
        },
        ListState::Ready(items) if items.is_empty() => rsx! {
            div { class: "empty-message",
                i { class: "fas fa-info-circle" }
                " No media yet"
            }
        },
        ListState::Ready(items) => {
            let entries = items.iter().map(|item| {
                let id = item.id.clone();
                let class = if active_media().as_deref() == Some(item.id.as_str()) {
                    "media-item active"
                } else {
                    "media-item"
                };
                let badge = format!("item-type {}", item.kind.class());

                rsx! {
                    div {
                        key: "{item.id}",
                        class,
                        title: "{item.title}",
                        onclick: move |_| select.call(id.clone()),
                        div { class: badge, {item.kind.badge()} }
                        div { class: "item-title", {short_title(&item.title, limit)} }
                    }
                }
            });

            rsx! { {entries} }
        }
    };

    let load_custom = {
        let viewer = viewer.clone();
        move |_: MouseEvent| {
            let viewer = viewer.clone();
            let input = video_input();
            spawn(async move {
                match viewer.load_custom_video(&input).await {
                    Ok(()) => active_media.set(viewer.active_media()),
                    Err(ViewerError::Input(error)) => web::alert(&error.to_string()),
                    Err(error) => tracing::warn!(%error, "Custom video failed."),
                }
            });
        }
    };

    let transport = |f: fn(&WebViewer)| {
        let viewer = viewer.clone();
        move |_: MouseEvent| f(&viewer)
    };

    let download = {
        let viewer = viewer.clone();
        move |_: MouseEvent| {
            if let Some(url) = viewer.player().panel().download_url() {
                web::open_in_new_tab(&url);
            }
        }
    };

    rsx! {
        section { class: "media-section",
            h2 { i { class: "fas fa-photo-video" } " Media" }

            div { id: "media-list-container", class: "item-list", {list} }

            div { class: "video-input-row",
                input {
                    id: "video-url",
                    r#type: "text",
                    placeholder: "YouTube URL or video ID",
                    value: "{video_input}",
                    oninput: move |e| video_input.set(e.value()),
                }
                button { id: "load-youtube", onclick: load_custom, "Load" }
            }

            h3 { id: panel::NOW_PLAYING_ID, class: "now-playing" }

            div { class: "player-area",
                div { id: panel::EMBED_CONTAINER_ID, class: "surface", style: "display: none;",
                    div { id: panel::EMBED_FRAME_ID }
                    div { id: panel::EMBED_ERROR_ID, class: "error-message", style: "display: none;" }
                }
                video { id: panel::VIDEO_ID, class: "surface", controls: true, style: "display: none;" }
                audio { id: panel::AUDIO_ID, class: "surface", controls: true, style: "display: none;" }
            }

            div { class: "media-controls",
                button { id: "play-media", onclick: transport(|v| { v.player().play(); }), i { class: "fas fa-play" } " Play" }
                button { id: "pause-media", onclick: transport(|v| { v.player().pause(); }), i { class: "fas fa-pause" } " Pause" }
                button { id: panel::MUTE_ID, onclick: transport(|v| { v.player().toggle_mute(); }), dangerous_inner_html: panel::UNMUTED_LABEL }
                button { id: "fullscreen-media", onclick: transport(|v| { v.player().fullscreen(); }), i { class: "fas fa-expand" } " Fullscreen" }
                button { id: panel::DOWNLOAD_ID, style: "display: none;", onclick: download, i { class: "fas fa-download" } " Download" }
            }
        }
    }
}
