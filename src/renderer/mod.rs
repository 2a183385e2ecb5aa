//! Canvas rendering module
//!
//! Backdrop layout is plain geometry and builds everywhere; the Canvas 2D
//! painter only exists on wasm32.

pub mod backdrop;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
