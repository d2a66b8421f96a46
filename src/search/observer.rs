//! Progress observation.
//!
//! The driver performs no I/O. Per-iteration progress and the final
//! summary are handed to a [`SearchObserver`]; what happens with them
//! (nothing, structured logs, console lines, an in-memory trace) is the
//! observer's business.

use std::fmt::Debug;
use std::io::{self, Write};

use tracing::info;

use super::runner::StopReason;

/// Snapshot of one completed iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Cost of the current solution (population mode: best member).
    pub current_cost: f64,
    /// Best cost seen so far.
    pub best_cost: f64,
    /// Whether the iteration moved the search.
    pub accepted: bool,
    /// Annealing temperature after cooling, if annealing.
    pub temperature: Option<f64>,
    /// Tabu tenure in effect, if tabu search.
    pub tenure: Option<usize>,
    /// Adapted step size after the iteration, if step control is on.
    pub step_size: Option<f64>,
}

/// End-of-run summary passed to [`SearchObserver::on_finish`].
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pub best: &'a dyn Debug,
    pub best_cost: f64,
    pub iterations: usize,
    pub stop_reason: StopReason,
}

/// Receives search progress.
pub trait SearchObserver {
    /// Called once with the initial best cost before the first iteration.
    fn on_start(&mut self, _initial_cost: f64) {}

    /// Called after every iteration.
    fn on_iteration(&mut self, _record: &IterationRecord) {}

    /// Called once when the search stops.
    fn on_finish(&mut self, _summary: &Summary<'_>) {}
}

impl<T: SearchObserver + ?Sized> SearchObserver for &mut T {
    fn on_start(&mut self, initial_cost: f64) {
        (**self).on_start(initial_cost);
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        (**self).on_iteration(record);
    }

    fn on_finish(&mut self, summary: &Summary<'_>) {
        (**self).on_finish(summary);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Emits progress as `tracing` events at `INFO` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_iteration(&mut self, record: &IterationRecord) {
        info!(
            iteration = record.iteration,
            best_cost = record.best_cost,
            current_cost = record.current_cost,
            "search iteration"
        );
    }

    fn on_finish(&mut self, summary: &Summary<'_>) {
        info!(
            best_cost = summary.best_cost,
            iterations = summary.iterations,
            stop_reason = ?summary.stop_reason,
            best = ?summary.best,
            "search finished"
        );
    }
}

/// Writes human-readable progress lines.
///
/// ```text
///  > iteration 1, best=9431.52
///  ...
/// Done. Best Solution: c=7542, v={ 0 48 31 ... }
/// ```
///
/// Sequence-shaped solutions are listed space-separated inside braces;
/// anything else is printed with its `Debug` form.
///
/// Write failures do not interrupt the search; the first one is kept and
/// can be retrieved with [`take_error`](ProgressWriter::take_error).
#[derive(Debug)]
pub struct ProgressWriter<W> {
    out: W,
    every: usize,
    error: Option<io::Error>,
}

impl<W: io::Write> ProgressWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            every: 1,
            error: None,
        }
    }

    /// Only report every `n`-th iteration. `0` is treated as 1.
    pub fn with_interval(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn keep(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }
}

impl ProgressWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: io::Write> SearchObserver for ProgressWriter<W> {
    fn on_iteration(&mut self, record: &IterationRecord) {
        if record.iteration % self.every != 0 {
            return;
        }
        let result = writeln!(
            self.out,
            " > iteration {}, best={}",
            record.iteration, record.best_cost
        );
        self.keep(result);
    }

    fn on_finish(&mut self, summary: &Summary<'_>) {
        let result = writeln!(
            self.out,
            "Done. Best Solution: c={}, v={}",
            summary.best_cost,
            braced(&format!("{:?}", summary.best))
        )
        .and_then(|()| self.out.flush());
        self.keep(result);
    }
}

/// Turns a `Debug` list like `[1, 0, 2]` into `{ 1 0 2 }`.
fn braced(debug: &str) -> String {
    match debug.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some("") => "{ }".to_string(),
        Some(items) => format!("{{ {} }}", items.split(", ").collect::<Vec<_>>().join(" ")),
        None => debug.to_string(),
    }
}

/// Keeps every iteration record in memory.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    initial_cost: Option<f64>,
    records: Vec<IterationRecord>,
    stop_reason: Option<StopReason>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_cost(&self) -> Option<f64> {
        self.initial_cost
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn into_records(self) -> Vec<IterationRecord> {
        self.records
    }
}

impl SearchObserver for TraceRecorder {
    fn on_start(&mut self, initial_cost: f64) {
        self.initial_cost = Some(initial_cost);
    }

    fn on_iteration(&mut self, record: &IterationRecord) {
        self.records.push(record.clone());
    }

    fn on_finish(&mut self, summary: &Summary<'_>) {
        self.stop_reason = Some(summary.stop_reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, best_cost: f64) -> IterationRecord {
        IterationRecord {
            iteration,
            current_cost: best_cost,
            best_cost,
            accepted: true,
            temperature: None,
            tenure: None,
            step_size: None,
        }
    }

    #[test]
    fn test_progress_writer_format() {
        let mut writer = ProgressWriter::new(Vec::new());
        writer.on_iteration(&record(1, 12.5));
        writer.on_iteration(&record(2, 3.0));
        let best = vec![1usize, 0, 2];
        writer.on_finish(&Summary {
            best: &best,
            best_cost: 3.0,
            iterations: 2,
            stop_reason: StopReason::MaxIterations,
        });
        assert!(writer.take_error().is_none());

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            " > iteration 1, best=12.5\n > iteration 2, best=3\nDone. Best Solution: c=3, v={ 1 0 2 }\n"
        );
    }

    #[test]
    fn test_braced_solution_rendering() {
        assert_eq!(braced(&format!("{:?}", vec![0.5, -1.0])), "{ 0.5 -1.0 }");
        assert_eq!(braced(&format!("{:?}", vec![true, false])), "{ true false }");
        assert_eq!(braced(&format!("{:?}", Vec::<usize>::new())), "{ }");
        assert_eq!(braced("Point { x: 1 }"), "Point { x: 1 }");
    }

    #[test]
    fn test_progress_writer_interval() {
        let mut writer = ProgressWriter::new(Vec::new()).with_interval(10);
        for i in 1..=25 {
            writer.on_iteration(&record(i, 1.0));
        }
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_writer_keeps_first_error() {
        let mut writer = ProgressWriter::new(Broken);
        writer.on_iteration(&record(1, 1.0));
        writer.on_iteration(&record(2, 1.0));
        let err = writer.take_error().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(writer.take_error().is_none());
    }

    #[test]
    fn test_trace_recorder_collects() {
        let mut recorder = TraceRecorder::new();
        recorder.on_start(10.0);
        recorder.on_iteration(&record(1, 9.0));
        recorder.on_iteration(&record(2, 8.0));
        recorder.on_finish(&Summary {
            best: &(),
            best_cost: 8.0,
            iterations: 2,
            stop_reason: StopReason::Stagnation,
        });
        assert_eq!(recorder.initial_cost(), Some(10.0));
        assert_eq!(recorder.records().len(), 2);
        assert_eq!(recorder.stop_reason(), Some(StopReason::Stagnation));
    }

    fn feed<O: SearchObserver>(mut observer: O) {
        observer.on_start(2.0);
        observer.on_iteration(&record(1, 1.0));
    }

    #[test]
    fn test_observer_through_mut_ref() {
        let mut recorder = TraceRecorder::new();
        feed(&mut recorder);
        assert_eq!(recorder.initial_cost(), Some(2.0));
        assert_eq!(recorder.records().len(), 1);
    }
}
