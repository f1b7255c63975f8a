//! # Exhaustive
//!
//! A backtracking chooser ("amb" operator) that enumerates every path through
//! the decision tree implied by an exploration function.
//!
//! The exploration function makes its decisions through a [`Chooser`]. It is
//! never suspended: the [`Enumerator`] re-runs it from the start for every
//! leaf, replaying the decisions recorded on the [`Trail`] and diverging only
//! at the deepest point that still has untried alternatives. Decisions are
//! addressed by call order, so a decision made inside a loop is simply a new
//! position on the trail each time round.
//!
//! ```
//! use exhaustive::apply;
//!
//! let results = apply(|chooser| Ok(Some(chooser.choose(&[1, 2, 3])?))).unwrap();
//! assert_eq!(results, vec![3, 2, 1]);
//! ```

pub mod assignments;
pub mod chart;
pub mod choice;
pub mod data;
pub mod engine;

pub use assignments::{Assignment, Assignments};
pub use chart::{execute, Chart, ChartError, Flow, Harvest};
pub use choice::{Advance, ChoicePoint, Trail};
pub use data::{ChooseError, Chooser, ReplayCheck, RunCounters, Status};
pub use engine::{apply, evaluate, EnumerationError, EnumerationStats, Enumerator, EnumeratorConfig};
