#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use yoloaug::label::YoloBox;

/// Tolerance for values that went through 6-decimal formatting.
pub const EPS_WRITTEN: f64 = 1e-6;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn class_names() -> Vec<String> {
    ["car", "bus", "truck", "person"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Any finite value, including ones far outside the unit frame.
pub fn arb_coord() -> BoxedStrategy<f64> {
    prop_oneof![
        -2.0f64..3.0,
        Just(0.0),
        Just(1.0),
        -1e6f64..1e6,
    ]
    .boxed()
}

/// A box that already satisfies the unit-frame invariant.
pub fn arb_unit_box() -> BoxedStrategy<YoloBox> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
        .prop_map(|(w, h, tx, ty)| {
            let cx = w / 2.0 + tx * (1.0 - w);
            let cy = h / 2.0 + ty * (1.0 - h);
            YoloBox::new(cx, cy, w, h)
        })
        .boxed()
}

pub fn approx_eq(a: &YoloBox, b: &YoloBox, eps: f64) -> bool {
    a.values()
        .iter()
        .zip(b.values().iter())
        .all(|(x, y)| (x - y).abs() <= eps)
}
