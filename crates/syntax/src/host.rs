// Chunk: docs/chunks/host_observer - Host callbacks for highlight cycles

//! Callbacks from the engine to the text component that owns the display.
//!
//! Every method has a default, so a host implements only what it cares
//! about. The host is passed into each engine call and never retained.

use rehighlight_buffer::{Style, TextRange};

/// The styles written by one committed cycle.
///
/// `spans` cover only styled text inside `range`; everything else in
/// `range` was reset to the default style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleBatch {
    pub range: TextRange,
    pub spans: Vec<(TextRange, Style)>,
}

/// Observer for highlight cycles.
pub trait HostObserver {
    /// Asked with the raw affected range, before it is expanded to a safe
    /// range. Returning false skips the cycle.
    fn should_highlight(&mut self, _range: TextRange) -> bool {
        true
    }

    /// Reports the end of a cycle that reached the tokenizer.
    fn did_highlight(&mut self, _range: TextRange, _success: bool) {}

    /// Receives the styles of a committed cycle.
    fn apply_styles(&mut self, _batch: &StyleBatch) {}
}

/// A host that accepts every cycle and ignores the results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl HostObserver for NoopHost {}
