//! Choice system for the enumeration engine
//!
//! A run of an exploration function is a sequence of decisions. Each decision
//! is recorded as a [`ChoicePoint`] on the [`Trail`], which is what lets the
//! engine replay a run up to its deepest point and then take the next branch.

mod navigation;
mod node;

pub use self::navigation::*;
pub use self::node::*;
