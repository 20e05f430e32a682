use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_ticker_core::{
    Completion, Counter, CounterState, GlyphMetrics, MonospaceMetrics, RollingWheelFactory, Size,
    TickerConfig, TickerOutputs,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Glyph metrics backed by an optional JS `measure(text) -> { width, height }`
/// callback, falling back to fixed-advance metrics.
struct JsMetrics {
    measure: Option<Function>,
    fallback: MonospaceMetrics,
}

impl JsMetrics {
    fn call(&self, text: &str) -> Option<Size> {
        let f = self.measure.as_ref()?;
        let val = f.call1(&JsValue::UNDEFINED, &JsValue::from_str(text)).ok()?;
        if jsvalue_is_undefined_or_null(&val) {
            return None;
        }
        swb::from_value::<Size>(val).ok()
    }
}

impl GlyphMetrics for JsMetrics {
    fn text_size(&self, text: &str) -> Size {
        self.call(text)
            .unwrap_or_else(|| self.fallback.text_size(text))
    }

    fn digit_size(&self) -> Size {
        // Widest digit; wheels are fixed-width cells.
        let mut best: Option<Size> = None;
        for d in ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"] {
            match (self.call(d), best) {
                (Some(s), Some(b)) => {
                    best = Some(Size::new(s.width.max(b.width), s.height.max(b.height)))
                }
                (Some(s), None) => best = Some(s),
                (None, _) => return self.fallback.digit_size(),
            }
        }
        best.unwrap_or_else(|| self.fallback.digit_size())
    }
}

fn js_completion(f: Option<Function>) -> Option<Completion> {
    f.map(|f| {
        Box::new(move || {
            if let Err(err) = f.call0(&JsValue::UNDEFINED) {
                log::warn!("completion callback threw: {err:?}");
            }
        }) as Completion
    })
}

#[wasm_bindgen]
pub struct VizijTicker {
    core: Counter<RollingWheelFactory, JsMetrics>,
}

#[wasm_bindgen]
impl VizijTicker {
    /// Create a counter. `config` is a (partial) TickerConfig object or undefined/null
    /// for defaults; `measure` is an optional `(text) => ({ width, height })`.
    /// Example:
    ///   new VizijTicker({ delimiter: ",", group_size: 3 }, "0", measureText)
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        initial: String,
        measure: Option<Function>,
    ) -> Result<VizijTicker, JsError> {
        console_error_panic_hook::set_once();

        let cfg: TickerConfig = if jsvalue_is_undefined_or_null(&config) {
            TickerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let metrics = JsMetrics {
            measure,
            fallback: MonospaceMetrics::default(),
        };
        let core = Counter::new(cfg, RollingWheelFactory, metrics, &initial)
            .map_err(|e| JsError::new(&format!("ticker init error: {e}")))?;
        Ok(VizijTicker { core })
    }

    /// Show a pre-formatted numeric string. `on_complete` fires once iff the
    /// resulting batch finishes without being superseded.
    #[wasm_bindgen(js_name = set_value)]
    pub fn set_value(&mut self, value: String, animated: bool, on_complete: Option<Function>) {
        self.core
            .set_value(&value, animated, js_completion(on_complete));
    }

    /// Show a number formatted with the configured decimal places.
    #[wasm_bindgen(js_name = set_number)]
    pub fn set_number(&mut self, value: f64, animated: bool, on_complete: Option<Function>) {
        self.core
            .set_number(value, animated, js_completion(on_complete));
    }

    /// Replace the config (partial objects are filled with defaults).
    #[wasm_bindgen(js_name = set_config)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let cfg: TickerConfig = if jsvalue_is_undefined_or_null(&config) {
            TickerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        self.core
            .set_config(cfg)
            .map_err(|e| JsError::new(&format!("config error: {e}")))
    }

    /// Current config as a JS object.
    #[wasm_bindgen(js_name = get_config)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.config()).map_err(|e| JsError::new(&format!("config error: {e}")))
    }

    #[wasm_bindgen(js_name = reset_layout)]
    pub fn reset_layout(&mut self) {
        self.core.reset_layout();
    }

    #[wasm_bindgen(js_name = stop_animations)]
    pub fn stop_animations(&mut self) {
        self.core.stop_animations();
    }

    /// True while a batch is in flight.
    #[wasm_bindgen(js_name = is_animating)]
    pub fn is_animating(&self) -> bool {
        matches!(self.core.state(), CounterState::Animating(_))
    }

    /// Intrinsic content size `{ width, height }`.
    #[wasm_bindgen(js_name = intrinsic_size)]
    pub fn intrinsic_size(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.intrinsic_size())
            .map_err(|e| JsError::new(&format!("size error: {e}")))
    }

    /// Advance by dt (seconds). Returns the frame's TickerOutputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let out: &TickerOutputs = self.core.update(dt);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
