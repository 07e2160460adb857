//! Shared fixtures for integration tests.

#![allow(dead_code)]

use number_cross::cp::{BoolVar, CpModel, IntVar};
use number_cross::grid::GridLayout;
use number_cross::predicate::Predicate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Five nested diagonal regions, two highlighted cells per corner.
pub const EXAMPLE_LAYOUT: &str = "\
0 0 0 0 0
1 0 0 0 0
1 1 0 0 0
2 1 1 0 0
2 2 1 1 0

x x . . .
x . . . .
. . . . .
. . . . x
. . . x x
";

pub fn example_layout() -> GridLayout {
    GridLayout::parse(EXAMPLE_LAYOUT).expect("example layout parses")
}

pub fn example_predicates() -> Vec<Predicate> {
    [11, 14, 28, 101, 2025]
        .into_iter()
        .map(Predicate::divisible_by)
        .collect()
}

/// Installs a test-writer subscriber once; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Free-standing run of `len` digits in 1..=9 with linked digit indicators,
/// the same linkage the grid posts for untiled cells.
pub struct TestRun {
    pub digits: Vec<IntVar>,
    pub indicators: Vec<[BoolVar; 10]>,
}

impl TestRun {
    pub fn new(model: &mut CpModel, len: usize) -> Self {
        let mut digits = Vec::with_capacity(len);
        let mut indicators = Vec::with_capacity(len);
        for i in 0..len {
            let value = model.new_int_var(1, 9, format!("d{i}"));
            let bools: [BoolVar; 10] =
                std::array::from_fn(|k| model.new_bool_var(format!("d{i}={k}")));
            model.add_exactly_one(&bools.map(|b| b.lit()));
            for (k, b) in bools.iter().enumerate() {
                let c = model.add_eq(value, k as i64);
                model.only_enforce_if(c, &[b.lit()]);
            }
            digits.push(value);
            indicators.push(bools);
        }
        Self { digits, indicators }
    }

    pub fn number(&self, values: impl Fn(IntVar) -> i64) -> u64 {
        self.digits
            .iter()
            .fold(0u64, |acc, &d| acc * 10 + values(d) as u64)
    }
}
