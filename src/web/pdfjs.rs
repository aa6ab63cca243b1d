//! `DocumentEngine` backed by the page-global `pdfjsLib`.

use crate::engine;
use crate::engine::Viewport;
use crate::error::js_reason;
use crate::error::LoadError;
use crate::error::RenderError;

use js_sys::Object;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::CanvasRenderingContext2d;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = pdfjsLib, js_name = getDocument, catch)]
    fn get_document(src: &str) -> Result<LoadingTask, JsValue>;

    type LoadingTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &LoadingTask) -> js_sys::Promise;

    type PdfDocumentProxy;

    #[wasm_bindgen(method, getter, js_name = numPages)]
    fn num_pages(this: &PdfDocumentProxy) -> u32;

    #[wasm_bindgen(method, js_name = getPage, catch)]
    fn get_page(this: &PdfDocumentProxy, number: u32) -> Result<js_sys::Promise, JsValue>;

    type PdfPageProxy;

    #[wasm_bindgen(method, js_name = getViewport)]
    fn get_viewport(this: &PdfPageProxy, params: &JsValue) -> PageViewport;

    #[wasm_bindgen(method, catch)]
    fn render(this: &PdfPageProxy, params: &JsValue) -> Result<RenderTask, JsValue>;

    type PageViewport;

    #[wasm_bindgen(method, getter)]
    fn width(this: &PageViewport) -> f64;

    #[wasm_bindgen(method, getter)]
    fn height(this: &PageViewport) -> f64;

    type RenderTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &RenderTask) -> js_sys::Promise;
}

pub struct PdfJsEngine {
    canvas_id: &'static str,
}

impl PdfJsEngine {
    pub fn new(canvas_id: &'static str) -> Self {
        Self { canvas_id }
    }

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        super::element(self.canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }
}

fn engine_present() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("pdfjsLib")).unwrap_or(false)
}

fn params(entries: &[(&str, &JsValue)]) -> Result<JsValue, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object.into())
}

impl engine::DocumentEngine for PdfJsEngine {
    type Document = PdfDocument;

    async fn open(&self, url: &str) -> Result<PdfDocument, LoadError> {
        if !engine_present() {
            return Err(LoadError::EngineMissing);
        }

        let rejected = |e: JsValue| LoadError::Rejected {
            url: url.to_string(),
            reason: js_reason(&e),
        };

        let task = get_document(url).map_err(rejected)?;
        let proxy = JsFuture::from(task.promise()).await.map_err(rejected)?;

        let canvas = self.canvas().ok_or_else(|| LoadError::Rejected {
            url: url.to_string(),
            reason: format!("canvas #{} missing", self.canvas_id),
        })?;

        Ok(PdfDocument {
            proxy: proxy.unchecked_into(),
            canvas,
        })
    }
}

pub struct PdfDocument {
    proxy: PdfDocumentProxy,
    canvas: HtmlCanvasElement,
}

impl engine::Document for PdfDocument {
    type Page = PdfPage;

    fn page_count(&self) -> u32 {
        self.proxy.num_pages()
    }

    async fn page(&self, number: u32) -> Result<PdfPage, RenderError> {
        let failed = |e: JsValue| RenderError::Page {
            page: number,
            reason: js_reason(&e),
        };

        let promise = self.proxy.get_page(number).map_err(failed)?;
        let proxy = JsFuture::from(promise).await.map_err(failed)?;

        Ok(PdfPage {
            proxy: proxy.unchecked_into(),
            canvas: self.canvas.clone(),
            number,
        })
    }
}

pub struct PdfPage {
    proxy: PdfPageProxy,
    canvas: HtmlCanvasElement,
    number: u32,
}

impl PdfPage {
    fn js_viewport(&self, scale: f64) -> Result<PageViewport, JsValue> {
        let params = params(&[("scale", &JsValue::from_f64(scale))])?;
        Ok(self.proxy.get_viewport(&params))
    }
}

impl engine::Page for PdfPage {
    fn viewport(&self, scale: f64) -> Viewport {
        match self.js_viewport(scale) {
            Ok(viewport) => Viewport {
                scale,
                width: viewport.width(),
                height: viewport.height(),
            },
            Err(error) => {
                tracing::warn!(page = self.number, error = %js_reason(&error), "Viewport failed.");
                Viewport {
                    scale,
                    width: 0.0,
                    height: 0.0,
                }
            }
        }
    }

    async fn draw(&self, viewport: &Viewport) -> Result<(), RenderError> {
        let failed = |e: JsValue| RenderError::Draw {
            page: self.number,
            reason: js_reason(&e),
        };

        let js_viewport = self.js_viewport(viewport.scale).map_err(failed)?;

        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);

        let context = self
            .canvas
            .get_context("2d")
            .map_err(failed)?
            .ok_or(RenderError::SurfaceMissing)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::SurfaceMissing)?;

        let context = JsValue::from(context);
        let js_viewport = JsValue::from(js_viewport);
        let params = params(&[("canvasContext", &context), ("viewport", &js_viewport)])
            .map_err(failed)?;

        let task = self.proxy.render(&params).map_err(failed)?;
        JsFuture::from(task.promise()).await.map_err(failed)?;

        Ok(())
    }
}
