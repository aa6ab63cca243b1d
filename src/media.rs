#![allow(async_fn_in_trait)]

use crate::embed::extract_video_id;
use crate::error::MediaError;
use crate::manifest::BackendKind;
use crate::manifest::MediaItem;

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

/// A browser media element (`<video>` or `<audio>`).
pub trait MediaElement {
    fn set_source(&self, url: &str);
    fn reload(&self);
    fn play(&self);
    fn pause(&self);
    fn muted(&self) -> bool;
    fn set_muted(&self, muted: bool);
    fn request_fullscreen(&self);
}

/// The player panel: three presentation surfaces plus the shared controls around them.
pub trait MediaPanel {
    type Element: MediaElement;

    fn video(&self) -> &Self::Element;
    fn audio(&self) -> &Self::Element;

    fn set_visible(&self, surface: BackendKind, visible: bool);
    fn set_now_playing(&self, title: &str);
    /// `Some(url)` shows the download button wired to `url`, `None` hides it.
    fn set_download(&self, url: Option<&str>);
    /// Label reflects the state the backend is now in.
    fn set_mute_label(&self, muted: bool);
    /// Inline error inside the embedded surface, `None` clears it.
    fn set_embed_error(&self, message: Option<&str>);
    fn embed_fullscreen(&self);
}

/// Callbacks handed to the embedded player on construction.
pub struct PlayerEvents {
    /// Fires once the player accepts commands. Nothing may be sent to it before that.
    pub on_ready: Box<dyn Fn()>,
    pub on_state_change: Box<dyn Fn(i32)>,
}

/// The process-wide third-party player runtime.
pub trait EmbeddedRuntime {
    type Player: EmbeddedPlayer + 'static;

    /// Resolves once the runtime is initialized. Initialization starts on the first call and
    /// every later call awaits the same outcome.
    async fn ready(&self) -> Result<(), MediaError>;

    fn create_player(
        &self,
        video_id: &str,
        events: PlayerEvents,
    ) -> Result<Self::Player, MediaError>;
}

/// Commands fail until the player has reported ready, and may fail afterwards too.
pub trait EmbeddedPlayer {
    /// Loads `video_id` into the existing player without starting playback.
    fn cue(&self, video_id: &str) -> Result<(), MediaError>;
    fn play(&self) -> Result<(), MediaError>;
    fn pause(&self) -> Result<(), MediaError>;
    fn mute(&self) -> Result<(), MediaError>;
    fn unmute(&self) -> Result<(), MediaError>;
    fn is_muted(&self) -> Result<bool, MediaError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct PlaybackSession {
    kind: Option<BackendKind>,
    item_id: Option<String>,
}

/// The embedded player, shared with its own `on_ready` callback.
struct EmbedSlot<T> {
    player: RefCell<Option<T>>,
    ready: Cell<bool>,
    /// Last video requested while the player was still starting up.
    pending_cue: RefCell<Option<String>>,
}

impl<T: EmbeddedPlayer> EmbedSlot<T> {
    fn new() -> Self {
        Self {
            player: RefCell::new(None),
            ready: Cell::new(false),
            pending_cue: RefCell::new(None),
        }
    }

    fn mark_ready(&self) {
        tracing::info!("Embedded player ready.");
        self.ready.set(true);
        self.flush();
    }

    /// Sends the held cue once there is a ready player to take it.
    fn flush(&self) {
        if !self.ready.get() {
            return;
        }

        let player = self.player.borrow();
        let Some(player) = player.as_ref() else { return };

        if let Some(video_id) = self.pending_cue.borrow_mut().take() {
            tracing::info!(%video_id, "Cueing video held during player start-up.");
            if let Err(error) = player.cue(&video_id) {
                tracing::warn!(%video_id, %error, "Cue failed.");
            }
        }
    }

    /// Runs `f` on the player if it exists and is ready.
    fn command<U>(
        &self,
        action: &'static str,
        f: impl FnOnce(&T) -> Result<U, MediaError>,
    ) -> Option<U> {
        let player = self.player.borrow();

        let Some(player) = player.as_ref().filter(|_| self.ready.get()) else {
            tracing::debug!(action, "Embedded player not ready.");
            return None;
        };

        f(player)
            .inspect_err(|error| tracing::warn!(action, %error, "Embedded player call failed."))
            .ok()
    }
}

/// Routes a single set of transport controls to whichever backend is active. Only the active
/// backend's surface is visible and only it receives commands.
pub struct MediaBackendSwitch<P: MediaPanel, R: EmbeddedRuntime> {
    panel: P,
    runtime: R,

    session: RefCell<PlaybackSession>,
    /// Built on the first embedded load, reused afterwards.
    embed: Rc<EmbedSlot<R::Player>>,
    /// Bumped on every selection so a load resuming after an await can tell it went stale.
    selections: Cell<u64>,
}

impl<P: MediaPanel, R: EmbeddedRuntime> MediaBackendSwitch<P, R> {
    pub fn new(panel: P, runtime: R) -> Self {
        Self {
            panel,
            runtime,
            session: RefCell::new(PlaybackSession::default()),
            embed: Rc::new(EmbedSlot::new()),
            selections: Cell::new(0),
        }
    }

    /// Switches playback to `item`.
    pub async fn select_media(&self, item: &MediaItem) -> Result<(), MediaError> {
        let ticket = self.selections.get() + 1;
        self.selections.set(ticket);

        tracing::info!(item_id = %item.id, kind = ?item.kind, "Switching media.");

        *self.session.borrow_mut() = PlaybackSession {
            kind: Some(item.kind),
            item_id: Some(item.id.clone()),
        };

        self.panel.set_now_playing(&item.title);
        self.panel
            .set_download(item.kind.is_file().then_some(item.url.as_str()));

        for surface in BackendKind::ALL {
            self.panel.set_visible(surface, false);
        }

        match item.kind {
            BackendKind::EmbeddedVideo => self.load_embedded(&item.url, ticket).await,
            BackendKind::LocalVideo => {
                self.load_local(BackendKind::LocalVideo, self.panel.video(), &item.url);
                Ok(())
            }
            BackendKind::LocalAudio => {
                self.load_local(BackendKind::LocalAudio, self.panel.audio(), &item.url);
                Ok(())
            }
        }
    }

    pub fn play(&self) -> bool {
        match self.active_kind() {
            Some(BackendKind::EmbeddedVideo) => self.embed.command("play", |p| p.play()).is_some(),
            Some(BackendKind::LocalVideo) => {
                self.panel.video().play();
                true
            }
            Some(BackendKind::LocalAudio) => {
                self.panel.audio().play();
                true
            }
            None => false,
        }
    }

    pub fn pause(&self) -> bool {
        match self.active_kind() {
            Some(BackendKind::EmbeddedVideo) => self.embed.command("pause", |p| p.pause()).is_some(),
            Some(BackendKind::LocalVideo) => {
                self.panel.video().pause();
                true
            }
            Some(BackendKind::LocalAudio) => {
                self.panel.audio().pause();
                true
            }
            None => false,
        }
    }

    /// Inverts the active backend's muted state. Returns the new state, or `None` when nothing
    /// was muted or unmuted; the label only changes when the backend did.
    pub fn toggle_mute(&self) -> Option<bool> {
        let muted = match self.active_kind()? {
            BackendKind::EmbeddedVideo => self.embed.command("toggle mute", |player| {
                if player.is_muted()? {
                    player.unmute().map(|_| false)
                } else {
                    player.mute().map(|_| true)
                }
            })?,
            BackendKind::LocalVideo => toggle_element(self.panel.video()),
            BackendKind::LocalAudio => toggle_element(self.panel.audio()),
        };

        self.panel.set_mute_label(muted);

        Some(muted)
    }

    /// Audio has no fullscreen, so it is a no-op there.
    pub fn fullscreen(&self) -> bool {
        match self.active_kind() {
            Some(BackendKind::EmbeddedVideo) => {
                self.panel.embed_fullscreen();
                true
            }
            Some(BackendKind::LocalVideo) => {
                self.panel.video().request_fullscreen();
                true
            }
            Some(BackendKind::LocalAudio) | None => false,
        }
    }

    pub fn active_kind(&self) -> Option<BackendKind> {
        self.session.borrow().kind
    }

    pub fn active_item(&self) -> Option<String> {
        self.session.borrow().item_id.clone()
    }

    pub fn has_player(&self) -> bool {
        self.embed.player.borrow().is_some()
    }

    /// Whether the embedded player exists and has reported ready.
    pub fn player_ready(&self) -> bool {
        self.has_player() && self.embed.ready.get()
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    fn load_local(&self, surface: BackendKind, element: &P::Element, url: &str) {
        self.panel.set_visible(surface, true);
        element.set_source(url);
        element.reload();
        self.panel.set_mute_label(element.muted());
    }

    async fn load_embedded(&self, url: &str, ticket: u64) -> Result<(), MediaError> {
        self.panel.set_visible(BackendKind::EmbeddedVideo, true);

        let Some(video_id) = extract_video_id(url) else {
            tracing::warn!(url, "Could not parse YouTube URL.");
            self.panel
                .set_embed_error(Some("Could not parse the YouTube URL"));
            return Err(MediaError::NoVideoId(url.to_string()));
        };

        self.panel.set_embed_error(None);

        if self.cue_existing(&video_id) {
            return Ok(());
        }

        if let Err(error) = self.runtime.ready().await {
            tracing::error!(%error, "Embedded runtime failed.");
            self.report_embed_error(ticket, &error);
            return Err(error);
        }

        if self.selections.get() != ticket {
            tracing::info!(%video_id, "Embedded load went stale while runtime loaded.");
            return Ok(());
        }

        // Another load may have built the player while this one waited on the runtime.
        if self.cue_existing(&video_id) {
            return Ok(());
        }

        let events = {
            let embed = Rc::clone(&self.embed);
            PlayerEvents {
                on_ready: Box::new(move || embed.mark_ready()),
                on_state_change: Box::new(|state| tracing::debug!(state, "Embedded player state.")),
            }
        };

        match self.runtime.create_player(&video_id, events) {
            Ok(player) => {
                tracing::info!(%video_id, "Embedded player created.");
                *self.embed.player.borrow_mut() = Some(player);
                // `on_ready` may already have fired while the player was being built.
                self.embed.flush();
                self.panel.set_mute_label(false);
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "Embedded player creation failed.");
                self.report_embed_error(ticket, &error);
                Err(error)
            }
        }
    }

    /// Hands `video_id` to an existing player, holding it until the player is ready. Returns
    /// `false` when there is no player yet.
    fn cue_existing(&self, video_id: &str) -> bool {
        if !self.has_player() {
            return false;
        }

        if !self.embed.ready.get() {
            tracing::info!(%video_id, "Embedded player starting, holding cue.");
            *self.embed.pending_cue.borrow_mut() = Some(video_id.to_string());
            return true;
        }

        self.embed.command("cue", |p| p.cue(video_id));
        if let Some(muted) = self.embed.command("is muted", |p| p.is_muted()) {
            self.panel.set_mute_label(muted);
        }

        true
    }

    fn report_embed_error(&self, ticket: u64, error: &MediaError) {
        if self.selections.get() == ticket {
            self.panel.set_embed_error(Some(&error.to_string()));
        }
    }
}

fn toggle_element(element: &impl MediaElement) -> bool {
    let muted = !element.muted();
    element.set_muted(muted);
    muted
}
