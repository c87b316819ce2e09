//! A small first-person engine built around three passes over the same
//! wall set:
//!
//! 1. the **BSP compiler** turns an unordered set of map walls into a
//!    binary tree whose leaves are convex regions,
//! 2. the **sector extractor** derives each leaf's exact convex wall loop
//!    by cropping the map boundary against every splitter on the root path,
//! 3. the **renderer** walks the tree in visibility order every frame and
//!    projects walls and floors into screen columns, Doom-style.
//!
//! Compilation happens once at load time ([`compile_level`]); the result is
//! immutable and the per-frame pass ([`engine::render_frame`]) is a pure
//! function of it plus the camera.

pub mod bsp;
pub mod engine;
pub mod renderer;
pub mod world;

pub use bsp::{CompileError, CompiledMap, SplitterPolicy, compile_level};
pub use world::{Camera, Frustum, Level};
