use serde_json::json;
use vizij_ticker_core::{
    AnimationCurve, Counter, ElementKey, GradientConfig, MonospaceMetrics, RollingWheelFactory,
    SlotId, TickerConfig, TickerOutputs,
};

fn mk(initial: &str) -> vizij_ticker_core::RollingCounter {
    let cfg = TickerConfig {
        prefix: Some("$".into()),
        delimiter: Some(",".into()),
        group_size: 3,
        curve: AnimationCurve::Linear,
        gradient: GradientConfig {
            horizontal_stop: Some(0.1),
            vertical_stop: Some(0.75),
        },
        ..Default::default()
    };
    Counter::new(cfg, RollingWheelFactory, MonospaceMetrics::default(), initial).unwrap()
}

/// it should serialize frame outputs with tagged keys and events
#[test]
fn outputs_serialize_with_tags() {
    let mut c = mk("1000");
    let out = c.update(0.0).clone();
    let v = serde_json::to_value(&out).unwrap();

    assert_eq!(v["events"][0], json!({ "type": "batch_started", "batch": 0, "duration": 0.0 }));
    assert_eq!(v["events"][1], json!({ "type": "batch_completed", "batch": 0 }));
    assert_eq!(v["elements"][0]["key"], json!({ "kind": "prefix" }));
    assert_eq!(v["elements"][0]["text"], json!("$"));
    assert_eq!(v["size"], json!({ "width": 60.0, "height": 20.0 }));
    assert_eq!(v["gradient"], json!({ "horizontal": 0.1f32, "vertical": null }));

    let back: TickerOutputs = serde_json::from_value(v).unwrap();
    assert_eq!(back, out);
}

/// it should emit one element frame per attached element and one wheel frame per slot
#[test]
fn frames_cover_attached_elements() {
    let mut c = mk("1234");
    c.set_value("12", true, None);
    let out = c.update(0.1);

    // prefix + fading delimiter + 2 active digits + 2 retiring digits.
    assert_eq!(out.elements.len(), 6);
    let delim = out.element(ElementKey::Delimiter(0)).unwrap();
    assert_eq!(delim.text.as_deref(), Some(","));
    assert!(delim.opacity < 1.0);
    let digit = out.element(ElementKey::Digit(SlotId(0))).unwrap();
    assert!(digit.text.is_none());
    assert!(digit.opacity < 1.0);

    assert_eq!(out.wheels.len(), 4);
    assert_eq!(out.wheels.iter().filter(|w| w.retiring).count(), 2);
    let scrolling = out.wheels.iter().find(|w| w.slot == SlotId(2)).unwrap();
    assert_eq!(scrolling.digit, 1);
    assert!(scrolling.scrolling);
}
