/// DOM control panel inside `#controls`: a speed slider per planet, a
/// clickable name that flies the camera to it, Pause / Resume and
/// Reset View. Every control talks to the app through the same custom
/// events a host page can send with `app_custom_event`.

use std::cell::RefCell;
use std::rc::Rc;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};
use orrery_web::WebApp;

use crate::controls::{format_multiplier, Command, ControlPanelState, PauseButtons};
use crate::game::SolarSystem;
use crate::orbit::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED, SPEED_STEP};

pub const CONTAINER_ID: &str = "controls";

type SharedState = Rc<RefCell<ControlPanelState>>;

fn send(app: &WebApp<SolarSystem>, command: Command) {
    let (kind, a, b, c) = command.encode();
    app.custom_event(kind, a, b, c);
}

fn on_click(target: &Element, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn button(document: &Document, id: &str, text: &str) -> Result<HtmlButtonElement, JsValue> {
    let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
    button.set_id(id);
    button.set_text_content(Some(text));
    Ok(button)
}

fn planet_row(
    document: &Document,
    app: &WebApp<SolarSystem>,
    state: &SharedState,
    index: usize,
    name: &str,
) -> Result<Element, JsValue> {
    let row = document.create_element("div")?;
    row.set_class_name("planet-control");

    let label = document.create_element("label")?;
    label.set_text_content(Some(&format!("{name}:")));
    label.set_attribute("style", "cursor: pointer")?;
    label.set_attribute("for", &format!("speed_{index}"))?;
    let focus_app = app.clone();
    on_click(&label, move || send(&focus_app, Command::Focus { planet: index }))?;

    let slider: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    slider.set_type("range");
    slider.set_id(&format!("speed_{index}"));
    slider.set_min(&MIN_SPEED.to_string());
    slider.set_max(&MAX_SPEED.to_string());
    slider.set_step(&SPEED_STEP.to_string());
    slider.set_value(&DEFAULT_SPEED.to_string());

    let value = document.create_element("span")?;
    value.set_id(&format!("speed_{index}_value"));
    value.set_text_content(Some(&format_multiplier(DEFAULT_SPEED)));

    let input_app = app.clone();
    let input_state = state.clone();
    let input_slider = slider.clone();
    let input_value = value.clone();
    let on_input = Closure::wrap(Box::new(move || {
        let raw = input_slider.value();
        let Some((command, text)) = input_state.borrow_mut().slider_input(index, &raw) else {
            warn!("panel: ignoring slider value {raw:?} for planet #{index}");
            return;
        };
        input_value.set_text_content(Some(&text));
        send(&input_app, command);
    }) as Box<dyn FnMut()>);
    slider.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();

    row.append_child(&label)?;
    row.append_child(&slider)?;
    row.append_child(&value)?;
    Ok(row)
}

fn sync_buttons(paused: bool, pause: &HtmlButtonElement, resume: &HtmlButtonElement) {
    let state = PauseButtons::for_state(paused);
    pause.set_disabled(state.pause_disabled);
    resume.set_disabled(state.resume_disabled);
}

/// Build the panel for `names` (catalogue order). Without a `#controls`
/// element on the page this does nothing.
pub fn install(app: &WebApp<SolarSystem>, names: &[String]) -> Result<(), JsValue> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    let Some(container) = document.get_element_by_id(CONTAINER_ID) else {
        debug!("panel: no #{CONTAINER_ID} element, skipping controls");
        return Ok(());
    };

    let state: SharedState = Rc::new(RefCell::new(ControlPanelState::new(names.len())));

    for (index, name) in names.iter().enumerate() {
        let row = planet_row(&document, app, &state, index, name)?;
        container.append_child(&row)?;
    }

    let buttons = document.create_element("div")?;
    buttons.set_class_name("buttons");
    let pause = button(&document, "pauseBtn", "Pause")?;
    let resume = button(&document, "resumeBtn", "Resume")?;
    let reset = button(&document, "resetViewBtn", "Reset View")?;
    sync_buttons(app.is_paused(), &pause, &resume);

    // Button state follows the app, so a pause from app_pause() shows too.
    {
        let (p, r) = (pause.clone(), resume.clone());
        app.on_pause_change(move |paused| sync_buttons(paused, &p, &r));
    }
    {
        let app = app.clone();
        on_click(&pause, move || app.pause())?;
    }
    {
        let app = app.clone();
        on_click(&resume, move || app.resume())?;
    }
    {
        let app = app.clone();
        on_click(&reset, move || send(&app, Command::ResetView))?;
    }

    buttons.append_child(&pause)?;
    buttons.append_child(&resume)?;
    buttons.append_child(&reset)?;
    container.append_child(&buttons)?;

    debug!("panel: {} planet controls", names.len());
    Ok(())
}
