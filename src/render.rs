//! Text rendering of a finished aggregate: `{key=min/mean/max, ...}`

use std::fmt::Write;

use crate::aggregate::AggregateMap;

/// Render in key order with one decimal place per statistic
pub fn format_aggregate(aggregate: &AggregateMap) -> String {
    let mut out = String::with_capacity(aggregate.len() * 24 + 2);
    out.push('{');

    for (index, (key, summary)) in aggregate.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "{key}={:.1}/{:.1}/{:.1}",
            round_tenth(summary.min()),
            round_tenth(summary.mean()),
            round_tenth(summary.max())
        );
    }

    out.push('}');
    out
}

/// Round half toward positive infinity at one decimal, avoiding `-0.0`
fn round_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0 + 0.5).floor() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
