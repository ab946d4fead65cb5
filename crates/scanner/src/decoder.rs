//! Keyboard-wedge scan decoder.
//!
//! Scanners type a whole code within a few milliseconds per key and finish
//! with Enter; people type slower. The decoder keeps one buffer per input
//! context and only emits on Enter after a fast enough burst.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::key::{KeyEvent, ScanEvent};

/// Timing and length policy for telling scanner bursts from typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Shortest buffer (in characters) that Enter turns into a scan.
    pub min_length: usize,
    /// Largest gap between two characters of one burst.
    pub max_inter_key_delay_ms: u64,
}

impl ScannerConfig {
    pub fn max_inter_key_delay(&self) -> TimeDelta {
        i64::try_from(self.max_inter_key_delay_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_inter_key_delay_ms: 65,
        }
    }
}

/// Receives decoded scans.
pub trait ScanSink {
    fn on_scan(&mut self, event: &ScanEvent);
}

impl<F> ScanSink for F
where
    F: FnMut(&ScanEvent),
{
    fn on_scan(&mut self, event: &ScanEvent) {
        self(event)
    }
}

/// What a single key event did to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No state change (chord, unhandled named key, Enter on an empty buffer).
    Ignored,
    /// Character appended to the running burst.
    Buffered,
    /// Character arrived too late; it starts a new burst on its own.
    Restarted,
    /// Buffer discarded by Escape or Backspace.
    Reset,
    /// Enter on a buffer too short to be a scan.
    Dropped,
    /// Enter completed a scan; the sink has been called.
    Emitted(ScanEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Accumulating { last_at: DateTime<Utc> },
}

/// Keystroke-timing segmenter for keyboard-wedge scanners.
///
/// One decoder per input context: buffers are never shared, so two forms
/// listening at once each need their own instance.
#[derive(Debug)]
pub struct ScanDecoder<S> {
    config: ScannerConfig,
    max_delay: TimeDelta,
    state: State,
    buffer: String,
    sink: S,
}

impl<S: ScanSink> ScanDecoder<S> {
    pub fn new(config: ScannerConfig, sink: S) -> Self {
        let max_delay = config.max_inter_key_delay();
        Self {
            config,
            max_delay,
            state: State::Idle,
            buffer: String::new(),
            sink,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Characters captured so far in the current burst.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Discard any partial burst.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = State::Idle;
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        if event.modifiers.is_chord() {
            return KeyOutcome::Ignored;
        }

        match event.key.as_str() {
            "Escape" | "Backspace" => {
                if !self.buffer.is_empty() {
                    tracing::trace!(key = %event.key, discarded = self.buffer.len(), "scan buffer reset");
                }
                self.reset();
                KeyOutcome::Reset
            }
            "Enter" => self.finish(event.timestamp),
            _ => match event.printable() {
                Some(c) => self.push(c, event.timestamp),
                None => KeyOutcome::Ignored,
            },
        }
    }

    /// Feed a sequence of events, returning the scans it produced.
    pub fn feed<'a>(&mut self, events: impl IntoIterator<Item = &'a KeyEvent>) -> Vec<ScanEvent> {
        events
            .into_iter()
            .filter_map(|e| match self.handle_key(e) {
                KeyOutcome::Emitted(scan) => Some(scan),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, c: char, at: DateTime<Utc>) -> KeyOutcome {
        let outcome = match self.state {
            State::Accumulating { last_at } if at - last_at > self.max_delay => {
                self.buffer.clear();
                KeyOutcome::Restarted
            }
            _ => KeyOutcome::Buffered,
        };
        self.buffer.push(c);
        self.state = State::Accumulating { last_at: at };
        outcome
    }

    fn finish(&mut self, at: DateTime<Utc>) -> KeyOutcome {
        if self.buffer.is_empty() {
            return KeyOutcome::Ignored;
        }

        let captured = std::mem::take(&mut self.buffer);
        self.state = State::Idle;

        let code = captured.trim();
        if captured.chars().count() < self.config.min_length || code.is_empty() {
            tracing::trace!(length = captured.chars().count(), min_length = self.config.min_length, "scan dropped: too short");
            return KeyOutcome::Dropped;
        }

        let scan = ScanEvent {
            code: code.to_string(),
            scanned_at: at,
        };
        tracing::debug!(code = %scan.code, "scan decoded");
        self.sink.on_scan(&scan);
        KeyOutcome::Emitted(scan)
    }
}

impl ScanDecoder<fn(&ScanEvent)> {
    /// Decoder without a callback; use the returned [`KeyOutcome`]s instead.
    pub fn detached(config: ScannerConfig) -> Self {
        fn discard(_: &ScanEvent) {}
        Self::new(config, discard as fn(&ScanEvent))
    }
}
