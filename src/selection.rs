use crate::config::ViewerConfig;
use crate::embed::embed_url;
use crate::embed::extract_video_id;
use crate::engine::DocumentEngine;
use crate::error::InputError;
use crate::error::UnknownKind;
use crate::error::ViewerError;
use crate::manifest::BackendKind;
use crate::manifest::DocumentItem;
use crate::manifest::MediaItem;
use crate::media::EmbeddedRuntime;
use crate::media::MediaBackendSwitch;
use crate::media::MediaPanel;
use crate::render::PageRenderCoordinator;
use crate::render::PageView;
use crate::render::RenderOutcome;

use std::cell::RefCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSelection {
    /// The document is already the loaded one, nothing happened.
    AlreadyLoaded,
    Loaded(RenderOutcome),
}

/// Resolves list and dropdown selections against the two manifests and hands them to the page
/// renderer or the media switch.
pub struct SelectionController<E, V, P, R>
where
    E: DocumentEngine,
    V: PageView,
    P: MediaPanel,
    R: EmbeddedRuntime,
{
    config: ViewerConfig,
    pages: PageRenderCoordinator<E, V>,
    player: MediaBackendSwitch<P, R>,

    documents: RefCell<Vec<DocumentItem>>,
    media: RefCell<Vec<MediaItem>>,
    active_document: RefCell<Option<String>>,
    active_media: RefCell<Option<String>>,
}

impl<E, V, P, R> SelectionController<E, V, P, R>
where
    E: DocumentEngine,
    V: PageView,
    P: MediaPanel,
    R: EmbeddedRuntime,
{
    pub fn new(
        config: ViewerConfig,
        pages: PageRenderCoordinator<E, V>,
        player: MediaBackendSwitch<P, R>,
    ) -> Self {
        Self {
            config,
            pages,
            player,
            documents: RefCell::new(Vec::new()),
            media: RefCell::new(Vec::new()),
            active_document: RefCell::new(None),
            active_media: RefCell::new(None),
        }
    }

    pub fn set_documents(&self, items: Vec<DocumentItem>) {
        *self.documents.borrow_mut() = items;
    }

    /// Replaces the media manifest and returns the entry to select by default.
    pub fn set_media(&self, items: Vec<MediaItem>) -> Option<MediaItem> {
        let first = items.first().cloned();
        *self.media.borrow_mut() = items;
        first
    }

    pub fn documents(&self) -> Vec<DocumentItem> {
        self.documents.borrow().clone()
    }

    pub fn media(&self) -> Vec<MediaItem> {
        self.media.borrow().clone()
    }

    pub fn document(&self, id: &str) -> Option<DocumentItem> {
        self.documents.borrow().iter().find(|d| d.id == id).cloned()
    }

    pub fn active_document(&self) -> Option<String> {
        self.active_document.borrow().clone()
    }

    pub fn active_media(&self) -> Option<String> {
        self.active_media.borrow().clone()
    }

    /// Loads the document with `id` and counts the view. Re-selecting the loaded document is a
    /// no-op.
    pub async fn select_document(&self, id: &str) -> Result<DocumentSelection, ViewerError> {
        if self.active_document.borrow().as_deref() == Some(id) && self.pages.is_loaded() {
            return Ok(DocumentSelection::AlreadyLoaded);
        }

        let url = {
            let mut documents = self.documents.borrow_mut();
            let item = documents
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or(InputError::UnknownItem(UnknownKind::Document))?;

            item.views += 1;
            tracing::info!(id, views = item.views, "Selected document.");
            item.url.clone()
        };

        *self.active_document.borrow_mut() = Some(id.to_string());

        let outcome = self.pages.load(&url).await?;

        Ok(DocumentSelection::Loaded(outcome))
    }

    /// The dropdown + Load button path. An empty choice is rejected before anything changes.
    pub async fn submit_document_choice(
        &self,
        choice: &str,
    ) -> Result<DocumentSelection, ViewerError> {
        if choice.is_empty() {
            return Err(InputError::NoDocumentSelected.into());
        }

        self.select_document(choice).await
    }

    pub async fn select_media(&self, id: &str) -> Result<(), ViewerError> {
        let item = self
            .media
            .borrow()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(InputError::UnknownItem(UnknownKind::Media))?;

        self.play_item(item).await
    }

    /// Plays whatever the user typed into the manual video box.
    pub async fn load_custom_video(&self, input: &str) -> Result<(), ViewerError> {
        let item = self.custom_video(input)?;

        self.play_item(item).await
    }

    pub fn custom_video(&self, input: &str) -> Result<MediaItem, InputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InputError::EmptyVideoInput);
        }

        let video_id = extract_video_id(input).ok_or(InputError::InvalidVideoInput)?;

        Ok(MediaItem {
            id: self.config.custom_video_id.clone(),
            title: self.config.custom_video_title.clone(),
            kind: BackendKind::EmbeddedVideo,
            url: embed_url(&video_id),
        })
    }

    pub fn pages(&self) -> &PageRenderCoordinator<E, V> {
        &self.pages
    }

    pub fn player(&self) -> &MediaBackendSwitch<P, R> {
        &self.player
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    async fn play_item(&self, item: MediaItem) -> Result<(), ViewerError> {
        *self.active_media.borrow_mut() = Some(item.id.clone());
        self.player.select_media(&item).await?;

        Ok(())
    }
}
