use crate::config::ZoomSettings;
use crate::engine::Document;
use crate::engine::DocumentEngine;
use crate::engine::Page;
use crate::error::LoadError;
use crate::error::RenderError;

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

/// Float slack applied to the zoom floor so repeated zoom-out steps cannot creep just above it.
const SCALE_EPSILON: f64 = 1e-9;

/// Render pipeline state. At most one draw is in flight against the canvas; requests arriving
/// while it runs collapse into a single pending slot, last write wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering { page: u32 },
    RenderingWithPending { page: u32, pending: u32 },
}

impl RenderState {
    /// Applies a render request. Returns the next state and the page to start drawing now, if
    /// the request did not get coalesced.
    pub fn request(self, target: u32) -> (Self, Option<u32>) {
        match self {
            RenderState::Idle => (RenderState::Rendering { page: target }, Some(target)),
            RenderState::Rendering { page } | RenderState::RenderingWithPending { page, .. } => (
                RenderState::RenderingWithPending {
                    page,
                    pending: target,
                },
                None,
            ),
        }
    }

    /// Applies completion of the in-flight draw. Returns the next state and the pending page that
    /// has to be drawn next, if any.
    pub fn complete(self) -> (Self, Option<u32>) {
        match self {
            RenderState::Idle | RenderState::Rendering { .. } => (RenderState::Idle, None),
            RenderState::RenderingWithPending { pending, .. } => {
                (RenderState::Rendering { page: pending }, Some(pending))
            }
        }
    }
}

/// What happened to a single load / page / zoom request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No document, out of range page or refused zoom. Nothing changed.
    Ignored,
    /// A draw was already running; this request now sits in the pending slot.
    Coalesced,
    /// This request started the render loop, which finished after drawing `page`.
    Rendered { page: u32 },
    /// A newer document load started while this one was awaiting the engine.
    Superseded,
}

/// Presentation side of the page renderer: loader, canvas visibility and page labels.
pub trait PageView {
    /// Shows the loading indicator and hides the canvas.
    fn loading(&self);

    /// Replaces the loading indicator with an error. The canvas stays hidden.
    fn load_failed(&self, error: &LoadError);

    fn document_ready(&self, page_count: u32);

    /// Reveals the canvas, hides the loading indicator and shows `page` as current.
    fn page_rendered(&self, page: u32);

    /// A page failed to draw while an earlier page of the same document is still on screen.
    fn render_failed(&self, page: u32, error: &RenderError);

    /// A page failed to draw and nothing of this document has been shown yet, so the loading
    /// indicator has to give way to an error.
    fn first_render_failed(&self, page: u32, error: &RenderError);
}

struct RenderSession<D> {
    document: Rc<D>,
    page_count: u32,
    current_page: u32,
    scale: f64,
    /// Some page of this document has reached the canvas.
    revealed: bool,
}

pub struct PageRenderCoordinator<E: DocumentEngine, V: PageView> {
    engine: E,
    view: V,
    zoom: ZoomSettings,

    session: RefCell<Option<RenderSession<E::Document>>>,
    state: Cell<RenderState>,
    /// Bumped on every `load`, so a slow open can tell it has been overtaken.
    loads: Cell<u64>,
}

impl<E: DocumentEngine, V: PageView> PageRenderCoordinator<E, V> {
    pub fn new(engine: E, view: V, zoom: ZoomSettings) -> Self {
        Self {
            engine,
            view,
            zoom,
            session: RefCell::new(None),
            state: Cell::new(RenderState::Idle),
            loads: Cell::new(0),
        }
    }

    /// Opens `url`, replacing the current document, and renders its first page at the default
    /// scale.
    pub async fn load(&self, url: &str) -> Result<RenderOutcome, LoadError> {
        let ticket = self.loads.get() + 1;
        self.loads.set(ticket);

        tracing::info!(url, "Loading document...");
        self.view.loading();

        let opened = self.engine.open(url).await;

        if self.loads.get() != ticket {
            tracing::info!(url, "Document load superseded.");
            return Ok(RenderOutcome::Superseded);
        }

        let document = match opened {
            Ok(document) => document,
            Err(error) => {
                tracing::error!(url, %error, "Document load failed.");
                self.session.replace(None);
                self.view.load_failed(&error);
                return Err(error);
            }
        };

        let page_count = document.page_count();
        tracing::info!(url, page_count, "Document loaded.");

        self.session.replace(Some(RenderSession {
            document: Rc::new(document),
            page_count,
            current_page: 1,
            scale: self.zoom.default_scale,
            revealed: false,
        }));
        self.view.document_ready(page_count);

        Ok(self.request_page(1).await)
    }

    /// Makes `page` current and renders it. Pages outside `1..=page_count` and calls without a
    /// document are ignored.
    pub async fn request_page(&self, page: u32) -> RenderOutcome {
        {
            let mut session = self.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                return RenderOutcome::Ignored;
            };

            if page < 1 || page > session.page_count {
                return RenderOutcome::Ignored;
            }

            session.current_page = page;
        }

        self.schedule(page).await
    }

    pub async fn next_page(&self) -> RenderOutcome {
        match self.position() {
            Some((current, count)) if current < count => self.request_page(current + 1).await,
            _ => RenderOutcome::Ignored,
        }
    }

    pub async fn prev_page(&self) -> RenderOutcome {
        match self.position() {
            Some((current, _)) if current > 1 => self.request_page(current - 1).await,
            _ => RenderOutcome::Ignored,
        }
    }

    /// Adds `delta` to the scale and re-renders the current page. Refused when the result would
    /// land at or below the zoom floor.
    pub async fn request_zoom(&self, delta: f64) -> RenderOutcome {
        let page = {
            let mut session = self.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                return RenderOutcome::Ignored;
            };

            let scale = session.scale + delta;
            if scale <= self.zoom.min_scale + SCALE_EPSILON {
                tracing::info!(scale = session.scale, delta, "Zoom refused at floor.");
                return RenderOutcome::Ignored;
            }

            session.scale = scale;
            session.current_page
        };

        self.schedule(page).await
    }

    pub async fn zoom_in(&self) -> RenderOutcome {
        self.request_zoom(self.zoom.step).await
    }

    pub async fn zoom_out(&self) -> RenderOutcome {
        self.request_zoom(-self.zoom.step).await
    }

    /// Scales the current page so its natural width fills `container_width`.
    pub async fn fit_width(&self, container_width: f64) -> Result<RenderOutcome, RenderError> {
        let Some((document, page)) = self.current() else {
            return Ok(RenderOutcome::Ignored);
        };

        let natural = document.page(page).await?.viewport(1.0);

        if !self.is_current(&document) {
            return Ok(RenderOutcome::Superseded);
        }

        if natural.width <= 0.0 || container_width <= 0.0 {
            return Ok(RenderOutcome::Ignored);
        }

        let page = {
            let mut session = self.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                return Ok(RenderOutcome::Ignored);
            };

            session.scale = container_width / natural.width;
            tracing::info!(scale = session.scale, "Fit to width.");
            session.current_page
        };

        Ok(self.schedule(page).await)
    }

    pub fn state(&self) -> RenderState {
        self.state.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn current_page(&self) -> Option<u32> {
        self.position().map(|(current, _)| current)
    }

    pub fn page_count(&self) -> Option<u32> {
        self.position().map(|(_, count)| count)
    }

    pub fn scale(&self) -> Option<f64> {
        self.session.borrow().as_ref().map(|s| s.scale)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    async fn schedule(&self, page: u32) -> RenderOutcome {
        let (state, start) = self.state.get().request(page);
        self.state.set(state);

        match start {
            Some(page) => self.drive(page).await,
            None => {
                tracing::info!(page, "Render in flight, request coalesced.");
                RenderOutcome::Coalesced
            }
        }
    }

    /// Runs draws back to back until the pending slot is empty.
    async fn drive(&self, mut page: u32) -> RenderOutcome {
        loop {
            if let Err(error) = self.render_once(page).await {
                tracing::error!(page, %error, "Render failed.");
                if self.revealed() {
                    self.view.render_failed(page, &error);
                } else {
                    self.view.first_render_failed(page, &error);
                }
            }

            let (state, next) = self.state.get().complete();
            self.state.set(state);

            match next {
                Some(next) => page = next,
                None => return RenderOutcome::Rendered { page },
            }
        }
    }

    async fn render_once(&self, page: u32) -> Result<(), RenderError> {
        let Some((document, scale)) = self
            .session
            .borrow()
            .as_ref()
            .map(|s| (s.document.clone(), s.scale))
        else {
            return Ok(());
        };

        tracing::info!(page, scale, "Rendering page...");

        let drawn = async {
            let handle = document.page(page).await?;
            let viewport = handle.viewport(scale);
            handle.draw(&viewport).await
        }
        .await;

        if !self.is_current(&document) {
            tracing::info!(page, "Rendered page of a replaced document, not revealing.");
            return Ok(());
        }

        drawn?;

        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.revealed = true;
        }
        self.view.page_rendered(page);

        Ok(())
    }

    fn revealed(&self) -> bool {
        self.session.borrow().as_ref().is_some_and(|s| s.revealed)
    }

    fn position(&self) -> Option<(u32, u32)> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| (s.current_page, s.page_count))
    }

    fn current(&self) -> Option<(Rc<E::Document>, u32)> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| (s.document.clone(), s.current_page))
    }

    fn is_current(&self, document: &Rc<E::Document>) -> bool {
        self.session
            .borrow()
            .as_ref()
            .is_some_and(|s| Rc::ptr_eq(&s.document, document))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::Viewport;

    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    use std::collections::VecDeque;

    #[derive(Clone, Debug, PartialEq)]
    pub enum ViewEvent {
        Loading,
        LoadFailed,
        Ready(u32),
        Rendered(u32),
        RenderFailed(u32),
        FirstRenderFailed(u32),
    }

    #[derive(Default)]
    pub struct FakeView {
        pub events: RefCell<Vec<ViewEvent>>,
    }

    impl FakeView {
        pub fn last(&self) -> Option<ViewEvent> {
            self.events.borrow().last().cloned()
        }
    }

    impl PageView for FakeView {
        fn loading(&self) {
            self.events.borrow_mut().push(ViewEvent::Loading);
        }

        fn load_failed(&self, _: &LoadError) {
            self.events.borrow_mut().push(ViewEvent::LoadFailed);
        }

        fn document_ready(&self, page_count: u32) {
            self.events.borrow_mut().push(ViewEvent::Ready(page_count));
        }

        fn page_rendered(&self, page: u32) {
            self.events.borrow_mut().push(ViewEvent::Rendered(page));
        }

        fn render_failed(&self, page: u32, _: &RenderError) {
            self.events.borrow_mut().push(ViewEvent::RenderFailed(page));
        }

        fn first_render_failed(&self, page: u32, _: &RenderError) {
            self.events.borrow_mut().push(ViewEvent::FirstRenderFailed(page));
        }
    }

    /// In-memory engine. Documents named `*.bad` fail to open, documents named `broken*` open
    /// but never draw, page 13 never draws; page count comes from the locator digits
    /// (`doc12.pdf` has 12 pages, default 5). When gated, every draw parks until the test
    /// releases it.
    #[derive(Default)]
    pub struct FakeEngine {
        pub shared: Rc<Shared>,
    }

    #[derive(Default)]
    pub struct Shared {
        pub gated: Cell<bool>,
        pub opened: RefCell<Vec<String>>,
        pub draws: RefCell<Vec<(u32, f64)>>,
        gates: RefCell<VecDeque<oneshot::Sender<()>>>,
        open_gates: RefCell<VecDeque<oneshot::Sender<()>>>,
        pub gate_opens: Cell<bool>,
    }

    impl Shared {
        pub fn release(&self) {
            let gate = self.gates.borrow_mut().pop_front();
            gate.expect("no draw waiting").send(()).unwrap();
        }

        pub fn release_open(&self) {
            let gate = self.open_gates.borrow_mut().pop_front();
            gate.expect("no open waiting").send(()).unwrap();
        }

        pub fn drawn_pages(&self) -> Vec<u32> {
            self.draws.borrow().iter().map(|(page, _)| *page).collect()
        }
    }

    pub struct FakeDocument {
        shared: Rc<Shared>,
        pages: u32,
        broken: bool,
    }

    pub struct FakePage {
        shared: Rc<Shared>,
        number: u32,
        broken: bool,
    }

    impl DocumentEngine for FakeEngine {
        type Document = FakeDocument;

        async fn open(&self, url: &str) -> Result<FakeDocument, LoadError> {
            self.shared.opened.borrow_mut().push(url.to_string());

            if self.shared.gate_opens.get() {
                let (tx, rx) = oneshot::channel();
                self.shared.open_gates.borrow_mut().push_back(tx);
                let _ = rx.await;
            }

            if url.ends_with(".bad") {
                return Err(LoadError::Rejected {
                    url: url.into(),
                    reason: "malformed".into(),
                });
            }

            let digits: String = url.chars().filter(char::is_ascii_digit).collect();
            let pages = digits.parse().unwrap_or(5);

            Ok(FakeDocument {
                shared: self.shared.clone(),
                pages,
                broken: url.starts_with("broken"),
            })
        }
    }

    impl Document for FakeDocument {
        type Page = FakePage;

        fn page_count(&self) -> u32 {
            self.pages
        }

        async fn page(&self, number: u32) -> Result<FakePage, RenderError> {
            Ok(FakePage {
                shared: self.shared.clone(),
                number,
                broken: self.broken,
            })
        }
    }

    impl Page for FakePage {
        fn viewport(&self, scale: f64) -> Viewport {
            Viewport {
                scale,
                width: 600.0 * scale,
                height: 800.0 * scale,
            }
        }

        async fn draw(&self, viewport: &Viewport) -> Result<(), RenderError> {
            self.shared
                .draws
                .borrow_mut()
                .push((self.number, viewport.scale));

            if self.shared.gated.get() {
                let (tx, rx) = oneshot::channel();
                self.shared.gates.borrow_mut().push_back(tx);
                let _ = rx.await;
            }

            if self.number == 13 || self.broken {
                return Err(RenderError::Draw {
                    page: self.number,
                    reason: "unlucky".into(),
                });
            }

            Ok(())
        }
    }

    type Coordinator = PageRenderCoordinator<FakeEngine, FakeView>;

    fn coordinator() -> Rc<Coordinator> {
        Rc::new(PageRenderCoordinator::new(
            FakeEngine::default(),
            FakeView::default(),
            ZoomSettings::default(),
        ))
    }

    fn spawn(pool: &LocalPool, fut: impl std::future::Future<Output = ()> + 'static) {
        pool.spawner().spawn_local(fut).unwrap();
    }

    #[test]
    fn transitions_are_last_write_wins() {
        let (state, start) = RenderState::Idle.request(2);
        assert_eq!((state, start), (RenderState::Rendering { page: 2 }, Some(2)));

        let (state, start) = state.request(3);
        assert_eq!(start, None);
        let (state, start) = state.request(4);
        assert_eq!(start, None);
        assert_eq!(state, RenderState::RenderingWithPending { page: 2, pending: 4 });

        let (state, next) = state.complete();
        assert_eq!((state, next), (RenderState::Rendering { page: 4 }, Some(4)));

        let (state, next) = state.complete();
        assert_eq!((state, next), (RenderState::Idle, None));
    }

    #[test]
    fn load_renders_first_page_at_default_scale() {
        let coord = coordinator();

        let outcome = block_on(coord.load("doc12.pdf")).unwrap();

        assert_eq!(outcome, RenderOutcome::Rendered { page: 1 });
        assert_eq!(coord.page_count(), Some(12));
        assert_eq!(coord.scale(), Some(1.0));
        assert_eq!(coord.state(), RenderState::Idle);
        assert_eq!(
            *coord.view().events.borrow(),
            vec![ViewEvent::Loading, ViewEvent::Ready(12), ViewEvent::Rendered(1)]
        );
    }

    #[test]
    fn burst_of_requests_renders_only_the_latest() {
        let mut pool = LocalPool::new();
        let coord = coordinator();
        let shared = coord.engine().shared.clone();

        block_on(coord.load("doc9.pdf")).unwrap();
        shared.gated.set(true);

        let outcomes = Rc::new(RefCell::new(Vec::new()));
        for page in [2, 3, 4] {
            let (coord, outcomes) = (coord.clone(), outcomes.clone());
            spawn(&pool, async move {
                let outcome = coord.request_page(page).await;
                outcomes.borrow_mut().push((page, outcome));
            });
            pool.run_until_stalled();
        }

        assert_eq!(
            coord.state(),
            RenderState::RenderingWithPending { page: 2, pending: 4 }
        );
        assert_eq!(shared.drawn_pages(), vec![1, 2]);

        shared.release();
        pool.run_until_stalled();
        assert_eq!(coord.state(), RenderState::Rendering { page: 4 });
        assert_eq!(shared.drawn_pages(), vec![1, 2, 4]);

        shared.release();
        pool.run_until_stalled();
        assert_eq!(coord.state(), RenderState::Idle);
        assert_eq!(shared.drawn_pages(), vec![1, 2, 4]);
        assert_eq!(coord.view().last(), Some(ViewEvent::Rendered(4)));

        let outcomes = outcomes.borrow();
        assert!(outcomes.contains(&(3, RenderOutcome::Coalesced)));
        assert!(outcomes.contains(&(4, RenderOutcome::Coalesced)));
        assert!(outcomes.contains(&(2, RenderOutcome::Rendered { page: 4 })));
    }

    #[test]
    fn zoom_during_render_is_coalesced_and_uses_new_scale() {
        let mut pool = LocalPool::new();
        let coord = coordinator();
        let shared = coord.engine().shared.clone();

        block_on(coord.load("doc9.pdf")).unwrap();
        shared.gated.set(true);

        let c = coord.clone();
        spawn(&pool, async move {
            c.request_page(2).await;
        });
        pool.run_until_stalled();

        let c = coord.clone();
        spawn(&pool, async move {
            c.zoom_in().await;
        });
        pool.run_until_stalled();
        assert_eq!(
            coord.state(),
            RenderState::RenderingWithPending { page: 2, pending: 2 }
        );

        shared.release();
        pool.run_until_stalled();
        shared.release();
        pool.run_until_stalled();

        let draws = shared.draws.borrow();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[2].0, 2);
        assert!((draws[2].1 - 1.2).abs() < 1e-9);
    }

    #[test]
    fn zoom_floor_rejects_and_keeps_scale() {
        let coord = coordinator();
        block_on(coord.load("doc3.pdf")).unwrap();

        assert_eq!(block_on(coord.request_zoom(-0.8)), RenderOutcome::Ignored);
        assert_eq!(coord.scale(), Some(1.0));

        for _ in 0..3 {
            assert!(matches!(block_on(coord.zoom_out()), RenderOutcome::Rendered { .. }));
        }
        let scale = coord.scale().unwrap();
        assert!((scale - 0.4).abs() < 1e-9);

        assert_eq!(block_on(coord.zoom_out()), RenderOutcome::Ignored);
        assert_eq!(coord.scale(), Some(scale));
    }

    #[test]
    fn zoom_renders_even_when_scale_is_unchanged() {
        let coord = coordinator();
        block_on(coord.load("doc3.pdf")).unwrap();

        assert_eq!(block_on(coord.request_zoom(0.0)), RenderOutcome::Rendered { page: 1 });
        assert_eq!(coord.engine().shared.drawn_pages(), vec![1, 1]);
    }

    #[test]
    fn zoom_in_has_no_ceiling() {
        let coord = coordinator();
        block_on(coord.load("doc3.pdf")).unwrap();

        block_on(coord.request_zoom(50.0));
        assert_eq!(coord.scale(), Some(51.0));
    }

    #[test]
    fn page_bounds_are_no_ops() {
        let coord = coordinator();
        block_on(coord.load("doc4.pdf")).unwrap();

        assert_eq!(block_on(coord.request_page(0)), RenderOutcome::Ignored);
        assert_eq!(block_on(coord.request_page(5)), RenderOutcome::Ignored);
        assert_eq!(block_on(coord.prev_page()), RenderOutcome::Ignored);
        assert_eq!(coord.current_page(), Some(1));

        block_on(coord.request_page(4));
        assert_eq!(block_on(coord.next_page()), RenderOutcome::Ignored);
        assert_eq!(coord.current_page(), Some(4));
        assert_eq!(coord.engine().shared.drawn_pages(), vec![1, 4]);
    }

    #[test]
    fn requests_without_document_are_ignored() {
        let coord = coordinator();

        assert_eq!(block_on(coord.request_page(1)), RenderOutcome::Ignored);
        assert_eq!(block_on(coord.zoom_in()), RenderOutcome::Ignored);
        assert_eq!(block_on(coord.fit_width(800.0)), Ok(RenderOutcome::Ignored));
        assert!(coord.engine().shared.drawn_pages().is_empty());
    }

    #[test]
    fn new_document_resets_page_and_scale() {
        let coord = coordinator();
        block_on(coord.load("doc8.pdf")).unwrap();
        block_on(coord.request_page(6));
        block_on(coord.zoom_in());

        block_on(coord.load("doc3.pdf")).unwrap();

        assert_eq!(coord.current_page(), Some(1));
        assert_eq!(coord.page_count(), Some(3));
        assert_eq!(coord.scale(), Some(1.0));
    }

    #[test]
    fn failed_load_resets_to_no_document() {
        let coord = coordinator();
        block_on(coord.load("doc8.pdf")).unwrap();

        let err = block_on(coord.load("broken.bad")).unwrap_err();

        assert!(matches!(err, LoadError::Rejected { .. }));
        assert!(!coord.is_loaded());
        assert_eq!(coord.view().last(), Some(ViewEvent::LoadFailed));
        assert_eq!(block_on(coord.next_page()), RenderOutcome::Ignored);
    }

    #[test]
    fn slow_load_is_superseded_by_newer_one() {
        let mut pool = LocalPool::new();
        let coord = coordinator();
        let shared = coord.engine().shared.clone();
        shared.gate_opens.set(true);

        let results = Rc::new(RefCell::new(Vec::new()));
        for url in ["doc7.pdf", "doc2.pdf"] {
            let (coord, results) = (coord.clone(), results.clone());
            spawn(&pool, async move {
                let outcome = coord.load(url).await;
                results.borrow_mut().push((url, outcome));
            });
            pool.run_until_stalled();
        }

        shared.release_open();
        shared.release_open();
        pool.run_until_stalled();

        assert_eq!(coord.page_count(), Some(2));
        assert!(results
            .borrow()
            .contains(&("doc7.pdf", Ok(RenderOutcome::Superseded))));
    }

    #[test]
    fn fit_width_scales_to_container() {
        let coord = coordinator();
        block_on(coord.load("doc3.pdf")).unwrap();
        block_on(coord.request_page(2));

        let outcome = block_on(coord.fit_width(900.0)).unwrap();

        assert_eq!(outcome, RenderOutcome::Rendered { page: 2 });
        assert_eq!(coord.scale(), Some(1.5));
        assert_eq!(coord.engine().shared.draws.borrow().last(), Some(&(2, 1.5)));
    }

    #[test]
    fn render_failure_is_reported_and_pipeline_recovers() {
        let coord = coordinator();
        block_on(coord.load("doc20.pdf")).unwrap();

        let outcome = block_on(coord.request_page(13));

        assert_eq!(outcome, RenderOutcome::Rendered { page: 13 });
        assert_eq!(coord.view().last(), Some(ViewEvent::RenderFailed(13)));
        assert_eq!(coord.state(), RenderState::Idle);

        assert_eq!(block_on(coord.next_page()), RenderOutcome::Rendered { page: 14 });
        assert_eq!(coord.view().last(), Some(ViewEvent::Rendered(14)));
    }

    #[test]
    fn failed_first_page_replaces_loading_indicator() {
        let coord = coordinator();

        let outcome = block_on(coord.load("broken4.pdf")).unwrap();

        assert_eq!(outcome, RenderOutcome::Rendered { page: 1 });
        assert_eq!(coord.view().last(), Some(ViewEvent::FirstRenderFailed(1)));
        assert_eq!(coord.state(), RenderState::Idle);

        block_on(coord.next_page());
        assert_eq!(coord.view().last(), Some(ViewEvent::FirstRenderFailed(2)));
    }

    #[test]
    fn load_during_render_never_reveals_old_document() {
        let mut pool = LocalPool::new();
        let coord = coordinator();
        let shared = coord.engine().shared.clone();

        block_on(coord.load("doc9.pdf")).unwrap();
        shared.gated.set(true);

        let c = coord.clone();
        spawn(&pool, async move {
            c.request_page(2).await;
        });
        pool.run_until_stalled();

        let loaded = Rc::new(RefCell::new(None));
        let (c, l) = (coord.clone(), loaded.clone());
        spawn(&pool, async move {
            *l.borrow_mut() = Some(c.load("doc3.pdf").await);
        });
        pool.run_until_stalled();

        assert_eq!(*loaded.borrow(), Some(Ok(RenderOutcome::Coalesced)));
        assert_eq!(
            coord.state(),
            RenderState::RenderingWithPending { page: 2, pending: 1 }
        );

        coord.view().events.borrow_mut().clear();
        shared.release();
        pool.run_until_stalled();
        shared.release();
        pool.run_until_stalled();

        assert_eq!(coord.state(), RenderState::Idle);
        assert_eq!(*coord.view().events.borrow(), vec![ViewEvent::Rendered(1)]);
        assert_eq!(coord.page_count(), Some(3));
        assert_eq!(shared.drawn_pages(), vec![1, 2, 1]);
    }
}
