//! Common utilities for the kumihan typesetting engine.
//!
//! This crate provides shared infrastructure used by every other crate:
//! - **Warning System** - deduplicated, colored terminal diagnostics
//! - **Geometry** - axes, writing modes, extents and points
//! - **Characters** - code point classes used by collection and line layout

pub mod characters;
pub mod geometry;
pub mod warning;

pub use geometry::{Axis, Dimension, Direction, Extent, Point, WritingMode};
