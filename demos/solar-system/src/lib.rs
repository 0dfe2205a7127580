use wasm_bindgen::prelude::*;

mod bodies;
mod controls;
mod game;
mod orbit;
mod panel;
use game::SolarSystem;

orrery_web::export_app!(SolarSystem, "solar-system", "solarCanvas");

/// Element holding an optional JSON planet catalogue.
const CATALOGUE_ID: &str = "planetCatalogue";

fn load_game() -> SolarSystem {
    let json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CATALOGUE_ID))
        .and_then(|e| e.text_content());
    match json {
        Some(json) if !json.trim().is_empty() => SolarSystem::from_catalogue_json(&json),
        _ => SolarSystem::new(),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    let game = load_game();
    let names = game.planet_names();
    let app = launch_app(game)?;
    panel::install(&app, &names)
}
