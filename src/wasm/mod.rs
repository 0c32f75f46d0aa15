//! WebAssembly bindings for the libsm83 emulator.
//!
//! This module exposes the instruction engine to JavaScript so programs can
//! be stepped and inspected from a browser.

pub mod api;

pub use api::{DisassemblyLine, JsError, WasmEmulator};
