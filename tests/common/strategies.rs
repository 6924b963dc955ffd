use proptest::prelude::*;
use proptest::sample::select;

use super::STATIONS;

/// Strategy for measurement values as they appear in input: one decimal place
pub fn measurement_value_strategy() -> impl Strategy<Value = f64> {
    (-999i32..=999).prop_map(|tenths| f64::from(tenths) / 10.0)
}

/// Strategy for a well-formed `<station>;<value>` line
pub fn measurement_line_strategy() -> impl Strategy<Value = String> {
    (select(STATIONS), measurement_value_strategy())
        .prop_map(|(station, value)| format!("{station};{value:.1}"))
}

/// Strategy for lines that must be rejected by the parser
pub fn malformed_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z ]{1,16}",
        "[a-zA-Z]{1,8};[a-zA-Z]{1,8};[0-9]{1,2}\\.[0-9]",
        "[a-zA-Z]{1,8};[a-zA-Z]{1,6}",
    ]
}

/// Strategy mixing well-formed and malformed lines, roughly 9:1
pub fn mixed_input_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![9 => measurement_line_strategy(), 1 => malformed_line_strategy()],
        0..400,
    )
}

/// Strategy for pipeline shapes: (workers, batch_size, queue_depth, flush_interval)
pub fn pipeline_shape_strategy() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..=6, 1usize..=64, 1usize..=8, 1usize..=4)
}
