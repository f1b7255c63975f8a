//! Trail Navigation Module
//!
//! The trail is the single root-to-frontier path currently being explored.
//! It is addressed by call order: entry `n` is the decision made by the `n`-th
//! call to `choose` within a run, wherever in the exploration function that
//! call happens to sit.
//!
//! Core concepts:
//! - Growth past the previous frontier when a run goes deeper than before
//! - Backtracking by advancing the deepest choice point, popping it once every
//!   alternative has been tried
//! - Exhaustion when there is nothing left to advance

use super::ChoicePoint;

/// Result of a single `advance_last` step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The deepest choice point moved to its next alternative
    Advanced,
    /// The deepest choice point was used up and removed; advance again
    Popped,
    /// Nothing left on the trail; enumeration is complete
    Exhausted,
}

/// Ordered record of the decisions along the current path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail<T> {
    points: Vec<ChoicePoint<T>>,
}

impl<T> Trail<T> {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Record a new choice point at the frontier, selecting the last alternative.
    ///
    /// Returns `None` and leaves the trail untouched when `alternatives` is empty.
    pub fn append(&mut self, alternatives: Vec<T>) -> Option<&ChoicePoint<T>> {
        let point = ChoicePoint::new(alternatives)?;
        log::trace!(
            "Trail grows to depth {} ({} alternatives)",
            self.points.len() + 1,
            point.width()
        );
        self.points.push(point);
        self.points.last()
    }

    /// Advance the deepest choice point to its next untried alternative.
    pub fn advance_last(&mut self) -> Advance {
        let depth = self.points.len();
        let point = match self.points.last_mut() {
            Some(point) => point,
            None => return Advance::Exhausted,
        };

        if point.advance() {
            log::trace!(
                "Advanced depth {} to alternative {}",
                depth,
                point.selected_index()
            );
            Advance::Advanced
        } else {
            self.points.pop();
            log::trace!("Popped exhausted choice point, depth now {}", self.points.len());
            Advance::Popped
        }
    }

    /// Backtrack to the next unexplored path.
    ///
    /// Repeats `advance_last` through popped points. Returns `false` when the
    /// trail has been fully explored.
    pub fn backtrack(&mut self) -> bool {
        loop {
            match self.advance_last() {
                Advance::Advanced => return true,
                Advance::Popped => continue,
                Advance::Exhausted => return false,
            }
        }
    }

    pub fn get(&self, position: usize) -> Option<&ChoicePoint<T>> {
        self.points.get(position)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The selected value at every depth, root first
    pub fn path(&self) -> impl Iterator<Item = &T> + '_ {
        self.points.iter().map(ChoicePoint::selected)
    }
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Self::new()
    }
}
