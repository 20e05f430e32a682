#![cfg(target_arch = "wasm32")]
use serde_wasm_bindgen as swb;
use vizij_ticker_core::TickerOutputs;
use vizij_ticker_wasm::{abi_version, VizijTicker};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use serde::Serialize;
use serde_json::json;

fn to_js(v: serde_json::Value) -> JsValue {
    v.serialize(&swb::Serializer::json_compatible()).unwrap()
}

wasm_bindgen_test_configure!(run_in_browser);

fn grouped_config() -> JsValue {
    to_js(json!({ "delimiter": ",", "group_size": 3, "slide_duration": 0.5 }))
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    let t = VizijTicker::new(JsValue::UNDEFINED, "0".into(), None);
    assert!(t.is_ok());
}

#[wasm_bindgen_test]
fn construct_rejects_digitless_value() {
    let t = VizijTicker::new(JsValue::NULL, "--".into(), None);
    assert!(t.is_err());
}

#[wasm_bindgen_test]
fn set_value_and_update() {
    let mut t = VizijTicker::new(grouped_config(), "0".into(), None).unwrap();
    t.set_value("1234.5".into(), true, None);
    assert!(t.is_animating());

    let out: TickerOutputs = swb::from_value(t.update(1.0).unwrap()).unwrap();
    assert!(!t.is_animating());
    // 5 digits, 1 delimiter, 1 separator
    assert_eq!(out.elements.len(), 7);
    assert_eq!(out.size.width, 70.0);
}

#[wasm_bindgen_test]
fn live_config_change() {
    let mut t = VizijTicker::new(JsValue::UNDEFINED, "12".into(), None).unwrap();
    let cfg = to_js(json!({ "prefix": "$" }));
    t.set_config(cfg).unwrap();
    let size: vizij_ticker_core::Size = swb::from_value(t.intrinsic_size().unwrap()).unwrap();
    assert_eq!(size.width, 30.0);
}

#[wasm_bindgen_test]
fn throwing_completion_does_not_escape() {
    let mut t = VizijTicker::new(JsValue::UNDEFINED, "1".into(), None).unwrap();
    let cb = js_sys::Function::new_no_args("throw new Error('completion failed')");
    t.set_value("2".into(), false, Some(cb));
    assert!(!t.is_animating());

    let out: TickerOutputs = swb::from_value(t.update(0.0).unwrap()).unwrap();
    assert_eq!(out.size.width, 10.0);
}
