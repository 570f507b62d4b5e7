//! WebAssembly bindings for the LS-8 emulator.
//!
//! This module provides JavaScript-callable interfaces so a browser-hosted game
//! client can decode riddles without a native helper.

pub mod api;

pub use api::{decode_hint, Ls8Emulator};
