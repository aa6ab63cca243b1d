//! `EmbeddedRuntime` over the YouTube IFrame Player API.
//!
//! The API script is page-global: it is injected once and announces itself through the global
//! `onYouTubeIframeAPIReady` callback. Every caller awaits the same shared initialization.

use crate::error::js_reason;
use crate::error::MediaError;
use crate::media::EmbeddedPlayer;
use crate::media::EmbeddedRuntime;
use crate::media::PlayerEvents;

use futures::future::FutureExt;
use futures::future::LocalBoxFuture;
use futures::future::Shared;

use js_sys::Object;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use std::cell::OnceCell;

const API_SCRIPT: &str = "https://www.youtube.com/iframe_api";
const READY_CALLBACK: &str = "onYouTubeIframeAPIReady";

#[wasm_bindgen(js_namespace = YT)]
extern "C" {
    #[wasm_bindgen(js_name = Player)]
    type YtPlayer;

    #[wasm_bindgen(constructor, js_class = "Player", catch)]
    fn new(element_id: &str, options: &JsValue) -> Result<YtPlayer, JsValue>;

    #[wasm_bindgen(method, js_class = "Player", js_name = playVideo, catch)]
    fn play_video(this: &YtPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "Player", js_name = pauseVideo, catch)]
    fn pause_video(this: &YtPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "Player", catch)]
    fn mute(this: &YtPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "Player", js_name = unMute, catch)]
    fn un_mute(this: &YtPlayer) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "Player", js_name = isMuted, catch)]
    fn is_muted(this: &YtPlayer) -> Result<bool, JsValue>;

    #[wasm_bindgen(method, js_class = "Player", js_name = cueVideoById, catch)]
    fn cue_video_by_id(this: &YtPlayer, video_id: &str) -> Result<(), JsValue>;
}

type Ready = Shared<LocalBoxFuture<'static, Result<(), MediaError>>>;

pub struct IframeApi {
    element_id: &'static str,
    ready: OnceCell<Ready>,
}

impl IframeApi {
    pub fn new(element_id: &'static str) -> Self {
        Self {
            element_id,
            ready: OnceCell::new(),
        }
    }
}

fn api_loaded() -> bool {
    let Ok(yt) = Reflect::get(&js_sys::global(), &JsValue::from_str("YT")) else {
        return false;
    };

    !yt.is_undefined() && Reflect::has(&yt, &JsValue::from_str("Player")).unwrap_or(false)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), MediaError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| MediaError::Player(js_reason(&e)))
}

/// Injects the API script and resolves when its global callback fires.
fn initialize() -> LocalBoxFuture<'static, Result<(), MediaError>> {
    if api_loaded() {
        tracing::info!("YouTube API already present.");
        return futures::future::ready(Ok(())).boxed_local();
    }

    let (tx, rx) = flume::bounded::<Result<(), MediaError>>(1);

    let on_ready = {
        let tx = tx.clone();
        Closure::once_into_js(move || {
            tracing::info!("YouTube API ready.");
            let _ = tx.try_send(Ok(()));
        })
    };

    let on_error = Closure::once_into_js(move || {
        let _ = tx.try_send(Err(MediaError::Runtime("script failed to load".into())));
    });

    if let Err(error) = Reflect::set(&js_sys::global(), &JsValue::from_str(READY_CALLBACK), &on_ready) {
        let error = MediaError::Runtime(js_reason(&error));
        return futures::future::ready(Err(error)).boxed_local();
    }

    if let Err(error) = inject_script(&on_error) {
        return futures::future::ready(Err(error)).boxed_local();
    }

    async move {
        rx.recv_async()
            .await
            .map_err(|_| MediaError::Runtime("ready callback dropped".into()))?
    }
    .boxed_local()
}

fn inject_script(on_error: &JsValue) -> Result<(), MediaError> {
    let document = gloo_utils::document();

    let script = document
        .create_element("script")
        .map_err(|e| MediaError::Runtime(js_reason(&e)))?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| MediaError::Runtime("not a script element".into()))?;

    script.set_src(API_SCRIPT);
    script.set_onerror(Some(on_error.unchecked_ref()));

    let head = document
        .head()
        .ok_or(MediaError::Runtime("document has no head".into()))?;

    head.append_child(&script)
        .map_err(|e| MediaError::Runtime(js_reason(&e)))?;

    tracing::info!(src = API_SCRIPT, "Injected YouTube API script.");

    Ok(())
}

impl EmbeddedRuntime for IframeApi {
    type Player = YoutubePlayer;

    async fn ready(&self) -> Result<(), MediaError> {
        self.ready
            .get_or_init(|| initialize().shared())
            .clone()
            .await
    }

    fn create_player(&self, video_id: &str, events: PlayerEvents) -> Result<YoutubePlayer, MediaError> {
        let PlayerEvents {
            on_ready,
            on_state_change,
        } = events;

        let on_ready = Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| on_ready());
        let on_state_change = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            let state = Reflect::get(&event, &JsValue::from_str("data"))
                .ok()
                .and_then(|data| data.as_f64())
                .unwrap_or(-1.0);
            on_state_change(state as i32);
        });

        let handlers = Object::new();
        set(&handlers, "onReady", &on_ready.into_js_value())?;
        set(&handlers, "onStateChange", &on_state_change.into_js_value())?;

        let player_vars = Object::new();
        set(&player_vars, "autoplay", &JsValue::from_f64(0.0))?;

        let options = Object::new();
        set(&options, "width", &JsValue::from_str("100%"))?;
        set(&options, "height", &JsValue::from_str("100%"))?;
        set(&options, "videoId", &JsValue::from_str(video_id))?;
        set(&options, "playerVars", &player_vars)?;
        set(&options, "events", &handlers)?;

        let inner = YtPlayer::new(self.element_id, &options)
            .map_err(|e| MediaError::Player(js_reason(&e)))?;

        Ok(YoutubePlayer { inner })
    }
}

/// Player methods are attached by the API only once `onReady` has fired; before that every
/// call throws.
pub struct YoutubePlayer {
    inner: YtPlayer,
}

fn player_call<T>(result: Result<T, JsValue>) -> Result<T, MediaError> {
    result.map_err(|e| MediaError::Player(js_reason(&e)))
}

impl EmbeddedPlayer for YoutubePlayer {
    fn cue(&self, video_id: &str) -> Result<(), MediaError> {
        player_call(self.inner.cue_video_by_id(video_id))
    }

    fn play(&self) -> Result<(), MediaError> {
        player_call(self.inner.play_video())
    }

    fn pause(&self) -> Result<(), MediaError> {
        player_call(self.inner.pause_video())
    }

    fn mute(&self) -> Result<(), MediaError> {
        player_call(self.inner.mute())
    }

    fn unmute(&self) -> Result<(), MediaError> {
        player_call(self.inner.un_mute())
    }

    fn is_muted(&self) -> Result<bool, MediaError> {
        player_call(self.inner.is_muted())
    }
}
