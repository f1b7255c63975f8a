//! Chooser - the decision source handed to an exploration function
//!
//! A `Chooser` is bound to the trail for the duration of one run. Every call
//! to [`Chooser::choose`] is addressed by call order: calls below the trail
//! depth replay the recorded decision, the call at the trail depth records a
//! new choice point, and nothing can ever land past the frontier.
//!
//! Failures are remembered on the chooser as well as returned, so the engine
//! can classify a leaf by what the decision source actually saw even when the
//! exploration function maps or swallows the error.

use crate::choice::Trail;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Errors raised by [`Chooser::choose`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChooseError {
    /// No alternatives were offered; the current leaf ends without a result
    #[error("no alternatives offered at position {position}")]
    EmptyAlternatives { position: usize },

    /// A replayed position was offered a different number of alternatives
    #[error("replay diverged at position {position}: recorded {recorded} alternatives, offered {offered}")]
    ReplayDivergence {
        position: usize,
        recorded: usize,
        offered: usize,
    },

    /// A replayed position offered a different value at the recorded index
    #[error("replay diverged at position {position}: offered alternative {index} differs from the recorded one")]
    ValueMismatch { position: usize, index: usize },

    /// The run ended before reaching every recorded decision
    #[error("run ended after {reached} decisions but {depth} were recorded")]
    IncompleteReplay { reached: usize, depth: usize },

    /// Call order ran past the trail frontier
    #[error("trail corrupted: decision {position} requested with only {depth} recorded")]
    TrailCorrupted { position: usize, depth: usize },

    /// `choose` was called again after an earlier failure in the same run
    #[error("decision {position} requested after the run had already failed")]
    Aborted { position: usize },
}

impl ChooseError {
    /// Failures that only end the current leaf
    pub fn is_local(&self) -> bool {
        matches!(self, ChooseError::EmptyAlternatives { .. })
    }

    /// Failures caused by an exploration function that is not deterministic
    pub fn is_divergence(&self) -> bool {
        matches!(
            self,
            ChooseError::ReplayDivergence { .. }
                | ChooseError::ValueMismatch { .. }
                | ChooseError::IncompleteReplay { .. }
        )
    }
}

/// How strictly a replayed decision is compared with its first recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayCheck {
    /// Only the number of alternatives must match
    Length,
    /// The number of alternatives must match and the offered value at the
    /// recorded index must equal the recorded value
    Selected,
}

impl Default for ReplayCheck {
    fn default() -> Self {
        ReplayCheck::Selected
    }
}

/// Run status of a chooser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Decisions are being served normally
    Running,
    /// A decision failed; every later `choose` fails with `Aborted`
    Failed(ChooseError),
}

impl Default for Status {
    fn default() -> Self {
        Status::Running
    }
}

#[derive(Debug)]
enum Mode<T> {
    /// Replay and extend the trail
    Enumerate(Trail<T>),
    /// Always serve the first alternative; nothing is recorded
    FirstAlternative,
}

/// Counters gathered while a chooser serves one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Decisions served from the trail
    pub replayed: usize,
    /// Decisions recorded as new choice points
    pub recorded: usize,
}

/// Decision source bound to one run of an exploration function
#[derive(Debug)]
pub struct Chooser<T> {
    mode: Mode<T>,
    position: usize,
    replay_check: ReplayCheck,
    status: Status,
    counters: RunCounters,
}

impl<T: Clone + PartialEq> Chooser<T> {
    /// Bind a chooser to `trail` for one run.
    pub(crate) fn recording(trail: Trail<T>, replay_check: ReplayCheck) -> Self {
        Self {
            mode: Mode::Enumerate(trail),
            position: 0,
            replay_check,
            status: Status::Running,
            counters: RunCounters::default(),
        }
    }

    /// A chooser that answers every decision with the first alternative.
    pub fn first_alternative() -> Self {
        Self {
            mode: Mode::FirstAlternative,
            position: 0,
            replay_check: ReplayCheck::default(),
            status: Status::Running,
            counters: RunCounters::default(),
        }
    }

    /// Choose one of `alternatives`.
    ///
    /// During enumeration the first visit to a position returns the last
    /// alternative; later runs replay whatever the engine has advanced that
    /// position to. The returned value always comes from the recorded
    /// alternatives, which are authoritative.
    pub fn choose(&mut self, alternatives: &[T]) -> Result<T, ChooseError> {
        if let Status::Failed(_) = self.status {
            return Err(ChooseError::Aborted {
                position: self.position,
            });
        }

        match self.select(alternatives) {
            Ok(value) => {
                self.position += 1;
                Ok(value)
            }
            Err(err) => {
                log::debug!("Decision {} failed: {}", self.position, err);
                self.status = Status::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn select(&mut self, alternatives: &[T]) -> Result<T, ChooseError> {
        let position = self.position;
        let trail = match &mut self.mode {
            Mode::Enumerate(trail) => trail,
            Mode::FirstAlternative => {
                return alternatives
                    .first()
                    .cloned()
                    .ok_or(ChooseError::EmptyAlternatives { position });
            }
        };

        let depth = trail.len();
        match position.cmp(&depth) {
            Ordering::Less => {
                let point = trail
                    .get(position)
                    .ok_or(ChooseError::TrailCorrupted { position, depth })?;
                if point.width() != alternatives.len() {
                    return Err(ChooseError::ReplayDivergence {
                        position,
                        recorded: point.width(),
                        offered: alternatives.len(),
                    });
                }
                let index = point.selected_index();
                if self.replay_check == ReplayCheck::Selected
                    && alternatives[index] != *point.selected()
                {
                    return Err(ChooseError::ValueMismatch { position, index });
                }
                self.counters.replayed += 1;
                Ok(point.selected().clone())
            }
            Ordering::Equal => {
                let point = trail
                    .append(alternatives.to_vec())
                    .ok_or(ChooseError::EmptyAlternatives { position })?;
                self.counters.recorded += 1;
                Ok(point.selected().clone())
            }
            Ordering::Greater => Err(ChooseError::TrailCorrupted { position, depth }),
        }
    }
}

impl<T> Chooser<T> {
    /// Number of decisions made so far in this run
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the next decision will be served from the trail
    pub fn is_replaying(&self) -> bool {
        match &self.mode {
            Mode::Enumerate(trail) => self.position < trail.len(),
            Mode::FirstAlternative => false,
        }
    }

    /// The first failure seen in this run, if any
    pub fn failure(&self) -> Option<&ChooseError> {
        match &self.status {
            Status::Running => None,
            Status::Failed(err) => Some(err),
        }
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// End the run and hand the trail back.
    ///
    /// A run that finished normally must have replayed every recorded
    /// decision; stopping short means the exploration function took a
    /// different path through an identical prefix. That is reported as
    /// `IncompleteReplay` in the returned status.
    pub(crate) fn conclude(self) -> (Trail<T>, Status, RunCounters) {
        let trail = match self.mode {
            Mode::Enumerate(trail) => trail,
            Mode::FirstAlternative => Trail::new(),
        };
        let status = match self.status {
            Status::Running if self.position < trail.len() => {
                Status::Failed(ChooseError::IncompleteReplay {
                    reached: self.position,
                    depth: trail.len(),
                })
            }
            status => status,
        };
        (trail, status, self.counters)
    }
}
