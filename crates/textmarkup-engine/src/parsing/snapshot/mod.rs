//! # Snapshot Testing Support
//!
//! Utilities for testing grammars via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a syntax tree to a stable, serializable `Snap`
//!   with absolute spans and text previews
//! - **`invariants`**: Runtime checks for tree correctness (children tile
//!   their parent and leaves cover the parsed prefix without gaps)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{NodeSnap, Snap, normalize, preview};
