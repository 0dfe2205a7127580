use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};
use orrery_engine::Tooltip;

const TOOLTIP_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("pointer-events", "none"),
    ("background", "rgba(30,30,30,0.85)"),
    ("color", "white"),
    ("padding", "4px 10px"),
    ("border-radius", "6px"),
    ("font-size", "14px"),
    ("display", "none"),
    ("z-index", "1000"),
];

/// Floating `<div>` that mirrors the runner's tooltip state.
pub struct TooltipOverlay {
    element: HtmlElement,
    shown: Option<Tooltip>,
}

impl TooltipOverlay {
    /// Create the overlay element and append it to `<body>`.
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let element: HtmlElement = document.create_element("div")?.dyn_into()?;
        let style = element.style();
        for (name, value) in TOOLTIP_STYLE {
            style.set_property(name, value)?;
        }
        let body = document.body().ok_or_else(|| JsValue::from_str("document has no <body>"))?;
        body.append_child(&element)?;
        Ok(Self { element, shown: None })
    }

    /// Show, move or hide the overlay. `origin` is the canvas' top-left
    /// corner in viewport coordinates; tooltip positions are canvas-relative.
    pub fn sync(&mut self, tooltip: Option<&Tooltip>, origin: (f64, f64)) -> Result<(), JsValue> {
        if self.shown.as_ref() == tooltip {
            return Ok(());
        }
        let style = self.element.style();
        match tooltip {
            Some(tip) => {
                self.element.set_text_content(Some(&tip.text));
                style.set_property("left", &format!("{}px", origin.0 + tip.x as f64))?;
                style.set_property("top", &format!("{}px", origin.1 + tip.y as f64))?;
                style.set_property("display", "block")?;
            }
            None => style.set_property("display", "none")?,
        }
        self.shown = tooltip.cloned();
        Ok(())
    }
}
