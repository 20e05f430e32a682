use anyhow::Result;
use vizij_ticker_core::{
    Counter, ElementKey, MonospaceMetrics, RollingWheelFactory, TickerConfig, TickerEvent,
};

fn main() -> Result<()> {
    let cfg = TickerConfig::from_json(
        r#"{
            "prefix": "$",
            "delimiter": ",",
            "group_size": 3,
            "decimal_places": 2,
            "slide_duration": 0.25,
            "scroll_duration": 0.5
        }"#,
    )?;
    let mut counter = Counter::new(cfg, RollingWheelFactory, MonospaceMetrics::default(), "0")?;

    for value in ["999.99", "1000", "-42.5", "1234567.891"] {
        counter.set_value(value, true, Some(Box::new(move || println!("  done: {value}"))));
        println!("-> {value}");
        for frame in 0..40 {
            let out = counter.update(1.0 / 60.0);
            if frame % 10 != 0 && out.events.is_empty() {
                continue;
            }
            let row: Vec<String> = out
                .elements
                .iter()
                .filter(|e| e.opacity > 0.0)
                .map(|e| match e.key {
                    ElementKey::Digit(id) => {
                        let w = out.wheels.iter().find(|w| w.slot == id);
                        format!("{:.1}@{:.0}", w.map(|w| w.position).unwrap_or(0.0), e.x)
                    }
                    _ => format!("{}@{:.0}", e.text.as_deref().unwrap_or(""), e.x),
                })
                .collect();
            println!("  [{frame:02}] {}", row.join(" "));
            for ev in &out.events {
                if !matches!(ev, TickerEvent::BatchStarted { .. }) {
                    println!("       {ev:?}");
                }
            }
        }
    }
    println!("final size: {:?}", counter.intrinsic_size());
    Ok(())
}
