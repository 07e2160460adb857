//! Search progress goes to the debug level.

use number_cross::compose::PuzzleModel;
use number_cross::cp::{BacktrackingSolver, SolverConfig};
use number_cross::grid::GridLayout;
use number_cross::predicate::Predicate;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn solve_logged(level: Level) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let layout = GridLayout::parse("0 0 0\n0 0 0\n\n. . .\n. . .\n").expect("layout");
    let mut puzzle = PuzzleModel::new(layout);
    puzzle
        .apply_row(0, &Predicate::divisible_by(7))
        .expect("row in range");
    let config = SolverConfig::default()
        .with_log_search_progress(true)
        .with_progress_interval(1);
    tracing::subscriber::with_default(subscriber, || {
        puzzle.solve(&BacktrackingSolver, &config, |_| {});
    });

    let bytes = captured.0.lock().expect("log buffer").clone();
    String::from_utf8(bytes).expect("utf-8 log")
}

#[test]
fn progress_lines_are_debug_only() {
    let info = solve_logged(Level::INFO);
    assert!(!info.contains("search progress"));

    let debug = solve_logged(Level::DEBUG);
    assert!(debug.contains("search progress"));
    assert!(debug.contains("grid model built") || debug.contains("row predicate applied"));
}
