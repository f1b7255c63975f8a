//! Assignments - collections of name/value bindings harvested from flows
//!
//! An assignment binds variable names to the values a flow settled on along
//! one path. The collection supports the queries used to slice enumeration
//! results: `fix` keeps what does not contradict a set of constraints,
//! `filter` additionally requires every constrained name to be bound, and
//! `fetch` pulls out the values of a single name.

use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::ops::Mul;

/// One set of name/value bindings
pub type Assignment<V> = BTreeMap<String, V>;

/// Ordered collection of assignments
#[derive(Debug, Clone, PartialEq)]
pub struct Assignments<V> {
    assignments: Vec<Assignment<V>>,
}

impl<V> Assignments<V> {
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    pub fn push(&mut self, assignment: Assignment<V>) {
        self.assignments.push(assignment);
    }

    pub fn extend<I>(&mut self, assignments: I)
    where
        I: IntoIterator<Item = Assignment<V>>,
    {
        self.assignments.extend(assignments);
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment<V>> {
        self.assignments.iter()
    }

    pub fn as_slice(&self) -> &[Assignment<V>] {
        &self.assignments
    }
}

impl<V: Clone + PartialEq> Assignments<V> {
    /// Every left assignment updated by every right one.
    ///
    /// Right-hand bindings overwrite left-hand ones with the same name, so the
    /// operation is not commutative.
    pub fn combine(&self, other: &Assignments<V>) -> Assignments<V> {
        let mut combined = Assignments::new();
        for left in &self.assignments {
            for right in &other.assignments {
                let mut merged = left.clone();
                merged.extend(right.iter().map(|(name, value)| (name.clone(), value.clone())));
                combined.push(merged);
            }
        }
        combined
    }

    /// Keep the assignments that do not contradict any constraint.
    ///
    /// A constrained name that an assignment does not bind is not a
    /// contradiction.
    pub fn fix<I, K>(&self, constraints: I) -> Assignments<V>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let constraints = collect_constraints(constraints);
        self.fix_with(&constraints)
    }

    /// Keep the assignments that bind every constrained name to its value.
    pub fn filter<I, K>(&self, constraints: I) -> Assignments<V>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        let constraints = collect_constraints(constraints);
        let fixed = self.fix_with(&constraints);
        Assignments {
            assignments: fixed
                .assignments
                .into_iter()
                .filter(|assignment| constraints.keys().all(|name| assignment.contains_key(name)))
                .collect(),
        }
    }

    /// Values bound to `name`, skipping assignments that do not bind it
    pub fn fetch(&self, name: &str) -> Vec<V> {
        self.assignments
            .iter()
            .filter_map(|assignment| assignment.get(name).cloned())
            .collect()
    }

    fn fix_with(&self, constraints: &Assignment<V>) -> Assignments<V> {
        Assignments {
            assignments: self
                .assignments
                .iter()
                .filter(|assignment| {
                    constraints.iter().all(|(name, value)| match assignment.get(name) {
                        Some(bound) => bound == value,
                        None => true,
                    })
                })
                .cloned()
                .collect(),
        }
    }
}

fn collect_constraints<V, I, K>(constraints: I) -> Assignment<V>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
{
    constraints
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect()
}

impl<V> Default for Assignments<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Vec<Assignment<V>>> for Assignments<V> {
    fn from(assignments: Vec<Assignment<V>>) -> Self {
        Self { assignments }
    }
}

impl<V> From<Assignment<V>> for Assignments<V> {
    fn from(assignment: Assignment<V>) -> Self {
        Self {
            assignments: vec![assignment],
        }
    }
}

impl<V> FromIterator<Assignment<V>> for Assignments<V> {
    fn from_iter<I: IntoIterator<Item = Assignment<V>>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for Assignments<V> {
    type Item = Assignment<V>;
    type IntoIter = std::vec::IntoIter<Assignment<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Assignments<V> {
    type Item = &'a Assignment<V>;
    type IntoIter = std::slice::Iter<'a, Assignment<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

impl<'a, V: Clone + PartialEq> Mul for &'a Assignments<V> {
    type Output = Assignments<V>;

    fn mul(self, other: Self) -> Assignments<V> {
        self.combine(other)
    }
}
