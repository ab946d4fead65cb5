//! Keyboard-wedge barcode decoding.
//!
//! Scanners that emulate a keyboard share the key stream with the person at
//! the till. The decoder separates the two by timing: machine-speed bursts
//! terminated by Enter become scan events, everything else is discarded.

pub mod decoder;
pub mod key;

pub use decoder::{KeyOutcome, ScanDecoder, ScanSink, ScannerConfig};
pub use key::{KeyEvent, Modifiers, ScanEvent};
