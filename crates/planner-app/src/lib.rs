//! Meal Planner App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters, session and stores and hands them to
//! the egui pages.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod routes;

#[cfg(test)]
mod tests;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "planner_canvas";

/// WASM entry point, called from index.html
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn main() {
    // Initialize logging
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("Meal planner starting...");

    let canvas = match find_canvas() {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return;
        }
    };

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::PlannerApp::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn find_canvas() -> Result<web_sys::HtmlCanvasElement, String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| format!("no canvas element with id '{}'", CANVAS_ID))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| format!("element '{}' is not a canvas", CANVAS_ID))
}
