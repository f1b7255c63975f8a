//! Enumerator - the driver that explores every path of a decision tree
//!
//! The exploration function cannot be suspended at a decision point, so the
//! enumerator re-runs it from scratch for every leaf. Each run replays the
//! decisions recorded on the trail, records new ones past the old frontier,
//! and then the trail is advanced to the next unexplored path. Leaves are
//! visited depth-first with the alternatives at every level tried in reverse
//! of the order they were supplied.

use crate::choice::Trail;
use crate::data::{ChooseError, Chooser, ReplayCheck, RunCounters, Status};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Configuration for the Enumerator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumeratorConfig {
    /// How replayed decisions are checked against their first recording
    pub replay_check: ReplayCheck,

    /// Log every leaf at info level instead of debug
    pub verbose: bool,
}

/// Statistics about one enumeration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumerationStats {
    /// Complete runs of the exploration function
    pub leaves_visited: u64,

    /// Leaves that produced a result
    pub successful_leaves: u64,

    /// Leaves that returned without a result
    pub empty_leaves: u64,

    /// Leaves cut short by a decision with no alternatives
    pub empty_alternative_leaves: u64,

    /// Choice points appended to the trail over the whole enumeration
    pub choice_points_recorded: u64,

    /// Decisions served by replaying the trail
    pub replayed_choices: u64,

    /// Deepest trail seen
    pub max_depth: usize,

    /// Wall time of the enumeration
    pub elapsed: Duration,
}

/// Errors that abort an enumeration
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    /// The exploration function did not behave the same way on replay
    #[error("exploration function is not deterministic: {0}")]
    ReplayDivergence(#[source] ChooseError),

    /// Trail bookkeeping broke
    #[error("trail bookkeeping broke: {0}")]
    TrailCorrupted(#[source] ChooseError),

    /// The exploration function raised its own fault
    #[error("exploration function failed: {0:#}")]
    UserFault(anyhow::Error),
}

impl EnumerationError {
    fn from_choose(err: ChooseError) -> Self {
        if err.is_divergence() {
            EnumerationError::ReplayDivergence(err)
        } else {
            EnumerationError::TrailCorrupted(err)
        }
    }
}

/// Settle a run whose chooser recorded a decision with no alternatives.
///
/// The leaf ends without a result, unless the function came back with an
/// error of its own rather than the choose error.
fn absorb_empty_alternatives<R>(
    returned: anyhow::Result<Option<R>>,
) -> Result<(), EnumerationError> {
    match returned {
        Err(err) if !err.chain().any(|cause| cause.is::<ChooseError>()) => {
            Err(EnumerationError::UserFault(err))
        }
        _ => Ok(()),
    }
}

/// Outcome of running the exploration function once
#[derive(Debug)]
enum LeafOutcome<R> {
    /// The run produced a result
    Success(R),
    /// The run returned without a result
    Empty,
    /// A decision offered no alternatives
    EmptyAlternatives,
}

/// Driver that runs an exploration function until its trail is exhausted
#[derive(Debug, Default)]
pub struct Enumerator {
    /// Configuration for this enumerator
    pub config: EnumeratorConfig,

    /// Statistics about the most recent run
    pub stats: EnumerationStats,
}

impl Enumerator {
    pub fn new(config: EnumeratorConfig) -> Self {
        Self {
            config,
            stats: EnumerationStats::default(),
        }
    }

    pub fn stats(&self) -> &EnumerationStats {
        &self.stats
    }

    /// Enumerate every path through `exploration` and collect its results.
    ///
    /// The exploration function should:
    /// - Make its decisions through the `Chooser` it is given
    /// - Return `Ok(Some(result))` for a success leaf, `Ok(None)` otherwise
    /// - Be deterministic: the same decisions must lead to the same calls
    /// - Terminate along every path
    ///
    /// Results are returned in discovery order. Replay divergence, trail
    /// corruption and errors returned by the exploration function abort the
    /// whole enumeration and discard the results gathered so far.
    pub fn run<T, R, F>(&mut self, mut exploration: F) -> Result<Vec<R>, EnumerationError>
    where
        T: Clone + PartialEq,
        F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<R>>,
    {
        let start = Instant::now();
        self.stats = EnumerationStats::default();
        log::debug!("Starting enumeration with config: {:?}", self.config);

        let mut trail = Trail::new();
        let mut results = Vec::new();

        loop {
            let (outcome, explored) = match self.execute_leaf(trail, &mut exploration) {
                Ok(leaf) => leaf,
                Err(err) => {
                    log::warn!(
                        "Enumeration aborted after {} leaves: {}",
                        self.stats.leaves_visited,
                        err
                    );
                    self.stats.elapsed = start.elapsed();
                    return Err(err);
                }
            };
            trail = explored;

            let leaf = self.stats.leaves_visited;
            match outcome {
                LeafOutcome::Success(result) => {
                    self.stats.successful_leaves += 1;
                    self.log_leaf(leaf, "produced a result", &trail);
                    results.push(result);
                }
                LeafOutcome::Empty => {
                    self.stats.empty_leaves += 1;
                    self.log_leaf(leaf, "returned no result", &trail);
                }
                LeafOutcome::EmptyAlternatives => {
                    self.stats.empty_alternative_leaves += 1;
                    self.log_leaf(leaf, "hit a decision with no alternatives", &trail);
                }
            }

            if !trail.backtrack() {
                break;
            }
        }

        self.stats.elapsed = start.elapsed();
        log::info!(
            "Enumeration finished: {} leaves, {} results in {:?}",
            self.stats.leaves_visited,
            results.len(),
            self.stats.elapsed
        );
        Ok(results)
    }

    /// Run the exploration function once against `trail` and classify the leaf.
    fn execute_leaf<T, R, F>(
        &mut self,
        trail: Trail<T>,
        exploration: &mut F,
    ) -> Result<(LeafOutcome<R>, Trail<T>), EnumerationError>
    where
        T: Clone + PartialEq,
        F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<R>>,
    {
        let mut chooser = Chooser::recording(trail, self.config.replay_check);
        let returned = exploration(&mut chooser);
        let (trail, status, counters) = chooser.conclude();

        self.stats.leaves_visited += 1;
        self.update_counters(counters, trail.len());

        let outcome = match status {
            Status::Failed(err) if err.is_local() => {
                absorb_empty_alternatives(returned)?;
                LeafOutcome::EmptyAlternatives
            }
            Status::Failed(err) => return Err(EnumerationError::from_choose(err)),
            Status::Running => match returned {
                Ok(Some(result)) => LeafOutcome::Success(result),
                Ok(None) => LeafOutcome::Empty,
                Err(err) => return Err(EnumerationError::UserFault(err)),
            },
        };
        Ok((outcome, trail))
    }

    fn update_counters(&mut self, counters: RunCounters, depth: usize) {
        self.stats.choice_points_recorded += counters.recorded as u64;
        self.stats.replayed_choices += counters.replayed as u64;
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }

    fn log_leaf<T>(&self, leaf: u64, what: &str, trail: &Trail<T>) {
        if self.config.verbose {
            log::info!("Leaf {} at depth {} {}", leaf, trail.len(), what);
        } else {
            log::debug!("Leaf {} at depth {} {}", leaf, trail.len(), what);
        }
    }
}

/// Enumerate every path through `exploration` with the default configuration.
///
/// ```
/// let results = exhaustive::apply(|chooser| {
///     let a = chooser.choose(&[1, 2])?;
///     let b = chooser.choose(&[1, 2])?;
///     Ok(if a != b { Some((a, b)) } else { None })
/// })
/// .unwrap();
/// assert_eq!(results, vec![(2, 1), (1, 2)]);
/// ```
pub fn apply<T, R, F>(exploration: F) -> Result<Vec<R>, EnumerationError>
where
    T: Clone + PartialEq,
    F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<R>>,
{
    Enumerator::default().run(exploration)
}

/// Run `exploration` once, answering every decision with its first alternative.
///
/// Nothing is enumerated. A decision with no alternatives makes the run
/// produce no result; errors from the exploration function are returned as
/// `UserFault`.
pub fn evaluate<T, R, F>(exploration: F) -> Result<Option<R>, EnumerationError>
where
    T: Clone + PartialEq,
    F: FnOnce(&mut Chooser<T>) -> anyhow::Result<Option<R>>,
{
    let mut chooser = Chooser::first_alternative();
    let returned = exploration(&mut chooser);
    match chooser.failure() {
        Some(err) if err.is_local() => absorb_empty_alternatives(returned).map(|()| None),
        Some(err) => Err(EnumerationError::from_choose(err.clone())),
        None => returned.map_err(EnumerationError::UserFault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn test_no_decisions_is_a_single_leaf() {
        let mut enumerator = Enumerator::default();
        let results = enumerator.run(|_: &mut Chooser<u8>| Ok(Some("done"))).unwrap();
        assert_eq!(results, vec!["done"]);
        assert_eq!(enumerator.stats().leaves_visited, 1);
        assert_eq!(enumerator.stats().max_depth, 0);
    }

    #[test]
    fn test_stats_count_every_leaf_kind() {
        let mut enumerator = Enumerator::default();
        let results = enumerator
            .run(|chooser: &mut Chooser<i32>| {
                let a = chooser.choose(&[0, 1, 2])?;
                match a {
                    0 => Ok(None),
                    1 => {
                        chooser.choose(&[])?;
                        Ok(Some(a))
                    }
                    _ => Ok(Some(a)),
                }
            })
            .unwrap();

        assert_eq!(results, vec![2]);
        let stats = enumerator.stats();
        assert_eq!(stats.leaves_visited, 3);
        assert_eq!(stats.successful_leaves, 1);
        assert_eq!(stats.empty_leaves, 1);
        assert_eq!(stats.empty_alternative_leaves, 1);
        assert_eq!(stats.choice_points_recorded, 1);
        assert_eq!(stats.replayed_choices, 2);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_user_fault_aborts() {
        let err = apply(|chooser: &mut Chooser<i32>| {
            let a = chooser.choose(&[1, 2, 3])?;
            if a == 2 {
                bail!("two is not allowed");
            }
            Ok(Some(a))
        })
        .unwrap_err();

        match err {
            EnumerationError::UserFault(inner) => {
                assert_eq!(inner.to_string(), "two is not allowed")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_swallowed_empty_alternatives_still_end_the_leaf() {
        let results = apply(|chooser: &mut Chooser<i32>| {
            let a = chooser.choose(&[1, 2])?;
            if a == 2 {
                let _ = chooser.choose(&[]);
            }
            Ok(Some(a))
        })
        .unwrap();
        assert_eq!(results, vec![1]);
    }

    #[test]
    fn test_own_error_after_empty_alternatives_is_a_user_fault() {
        let err = apply(|chooser: &mut Chooser<i32>| {
            let a = chooser.choose(&[1, 2])?;
            if a == 2 && chooser.choose(&[]).is_err() {
                bail!("nothing to pick after {}", a);
            }
            Ok(Some(a))
        })
        .unwrap_err();

        match err {
            EnumerationError::UserFault(inner) => {
                assert_eq!(inner.to_string(), "nothing to pick after 2")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_context_on_empty_alternatives_still_ends_the_leaf() {
        use anyhow::Context;

        let results = apply(|chooser: &mut Chooser<i32>| {
            let a = chooser.choose(&[1, 2])?;
            if a == 2 {
                chooser.choose(&[]).context("picking a partner")?;
            }
            Ok(Some(a))
        })
        .unwrap();
        assert_eq!(results, vec![1]);
    }

    #[test]
    fn test_trail_corruption_message_names_the_position() {
        let err = EnumerationError::TrailCorrupted(ChooseError::TrailCorrupted { position: 3, depth: 1 });
        let message = err.to_string();
        assert!(message.starts_with("trail bookkeeping broke: "));
        assert_eq!(message.matches("3").count(), 1);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_evaluate_uses_first_alternatives() {
        let value = evaluate(|chooser: &mut Chooser<bool>| {
            let z = chooser.choose(&[true, false])?;
            Ok(Some(if z { 1 + 2 } else { 1 - 2 }))
        })
        .unwrap();
        assert_eq!(value, Some(3));

        let nothing = evaluate(|chooser: &mut Chooser<bool>| Ok(Some(chooser.choose(&[])?))).unwrap();
        assert_eq!(nothing, None);

        let fault = evaluate(|chooser: &mut Chooser<bool>| -> anyhow::Result<Option<u8>> {
            let _ = chooser.choose(&[]);
            bail!("gave up")
        });
        assert!(matches!(fault, Err(EnumerationError::UserFault(_))));
    }
}
