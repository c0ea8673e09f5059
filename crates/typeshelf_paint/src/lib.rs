//! Graphics backend for Typeshelf
//!
//! This crate provides:
//! - Bitmap handles and sub-region views ([`BitmapKey`], [`Region`])
//! - Write locks for pixel access ([`LockedRegion`])
//! - The [`Canvas`] trait text rendering draws through
//! - A software implementation ([`CpuCanvas`]) and frame capture/export

pub mod canvas;
pub mod color;
pub mod cpu;
pub mod error;
pub mod frame;

pub use canvas::{BitmapKey, Canvas, LockedRegion, Region};
pub use color::Color;
pub use cpu::CpuCanvas;
pub use error::{PaintError, Result};
pub use frame::Frame;
