pub mod app;
pub mod geometry;
pub mod gl;
pub mod overlay;
pub mod runner;

pub use app::WebApp;
pub use gl::WebGlRenderer;
pub use runner::GameRunner;

/// Generate the thread-local app slot and the `#[wasm_bindgen]` exports a
/// host page uses to drive an app without the built-in controls.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// orrery_web::export_app!(MyGame, "my-app", "appCanvas");
///
/// #[wasm_bindgen(start)]
/// pub fn start() -> Result<(), JsValue> {
///     launch_app(MyGame::new())?;
///     Ok(())
/// }
/// ```
///
/// # Generated items
///
/// - `init_logging()`: panic hook plus `console_log` at `Info`.
/// - `launch_app(game) -> Result<WebApp<_>, JsValue>`: calls `init_logging`,
///   launches the app on the canvas, stores it.
/// - `with_app(f) -> Option<R>`: run `f` against the stored app.
/// - `app_pause`, `app_resume`, `app_is_paused`, `app_custom_event`.
#[macro_export]
macro_rules! export_app {
    ($game_type:ty, $app_name:literal, $canvas_id:literal) => {
        thread_local! {
            static APP: std::cell::RefCell<Option<$crate::WebApp<$game_type>>> =
                std::cell::RefCell::new(None);
        }

        #[allow(dead_code)]
        fn with_app<R>(f: impl FnOnce(&$crate::WebApp<$game_type>) -> R) -> Option<R> {
            APP.with(|cell| cell.borrow().as_ref().map(f))
        }

        /// Install the panic hook and the console logger. Safe to call twice.
        pub fn init_logging() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        pub fn launch_app(
            game: $game_type,
        ) -> Result<$crate::WebApp<$game_type>, wasm_bindgen::JsValue> {
            init_logging();
            let app = $crate::WebApp::launch(game, $canvas_id)?;
            APP.with(|cell| {
                *cell.borrow_mut() = Some(app.clone());
            });
            log::info!("{}: launched", $app_name);
            Ok(app)
        }

        #[wasm_bindgen::prelude::wasm_bindgen]
        pub fn app_pause() {
            with_app(|app| app.pause());
        }

        #[wasm_bindgen::prelude::wasm_bindgen]
        pub fn app_resume() {
            with_app(|app| app.resume());
        }

        #[wasm_bindgen::prelude::wasm_bindgen]
        pub fn app_is_paused() -> bool {
            with_app(|app| app.is_paused()).unwrap_or(false)
        }

        #[wasm_bindgen::prelude::wasm_bindgen]
        pub fn app_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_app(|app| app.custom_event(kind, a, b, c));
        }
    };
}
