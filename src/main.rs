#[cfg(target_arch = "wasm32")]
fn main() {
    tracing_wasm::set_as_global_default();
    dioxus::launch(folio::app::App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("folio runs in the browser, build it for wasm32-unknown-unknown.");
}
