//! Charts - named flows enumerated into one set of assignments
//!
//! A flow is an exploration function whose results are assignments. A chart
//! holds an ordered list of flows; `create` enumerates each of them and
//! gathers everything they produced so it can be sliced with `fix`, `filter`
//! and `fetch`.

use crate::assignments::{Assignment, Assignments};
use crate::data::Chooser;
use crate::engine::{EnumerationError, Enumerator, EnumeratorConfig};

/// What a flow hands back from one success leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Harvest<V> {
    /// A single assignment; dropped when it binds nothing
    One(Assignment<V>),
    /// Several assignments, kept in order
    Batch(Assignments<V>),
}

impl<V> From<Assignment<V>> for Harvest<V> {
    fn from(assignment: Assignment<V>) -> Self {
        Harvest::One(assignment)
    }
}

impl<V> From<Assignments<V>> for Harvest<V> {
    fn from(assignments: Assignments<V>) -> Self {
        Harvest::Batch(assignments)
    }
}

impl<V> From<Vec<Assignment<V>>> for Harvest<V> {
    fn from(assignments: Vec<Assignment<V>>) -> Self {
        Harvest::Batch(assignments.into())
    }
}

/// Boxed flow stored in a chart
pub type Flow<T, V> = Box<dyn FnMut(&mut Chooser<T>) -> anyhow::Result<Option<Harvest<V>>>>;

/// Errors raised while creating a chart
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("flow '{name}' failed: {source}")]
    Flow {
        name: String,
        #[source]
        source: EnumerationError,
    },
}

/// Ordered set of named flows and the assignments they produced
pub struct Chart<T, V> {
    enumerator: Enumerator,
    flows: Vec<(String, Flow<T, V>)>,
    assignments: Assignments<V>,
}

impl<T, V> Chart<T, V>
where
    T: Clone + PartialEq,
    V: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::with_config(EnumeratorConfig::default())
    }

    pub fn with_config(config: EnumeratorConfig) -> Self {
        Self {
            enumerator: Enumerator::new(config),
            flows: Vec::new(),
            assignments: Assignments::new(),
        }
    }

    /// Register a flow; flows are enumerated in registration order.
    pub fn flow<F>(mut self, name: impl Into<String>, flow: F) -> Self
    where
        F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<Harvest<V>>> + 'static,
    {
        self.add_flow(name, flow);
        self
    }

    pub fn add_flow<F>(&mut self, name: impl Into<String>, flow: F)
    where
        F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<Harvest<V>>> + 'static,
    {
        self.flows.push((name.into(), Box::new(flow)));
    }

    /// Enumerate every flow and collect what it produced.
    ///
    /// Assignments from an earlier `create` are discarded first.
    pub fn create(&mut self) -> Result<&Assignments<V>, ChartError> {
        self.assignments = Assignments::new();
        for (name, flow) in self.flows.iter_mut() {
            log::debug!("Enumerating flow '{}'", name);
            let harvests = self
                .enumerator
                .run(|chooser| flow(chooser))
                .map_err(|source| ChartError::Flow {
                    name: name.clone(),
                    source,
                })?;
            collect(harvests, &mut self.assignments);
        }
        Ok(&self.assignments)
    }

    pub fn assignments(&self) -> &Assignments<V> {
        &self.assignments
    }

    pub fn fix<I, K>(&self, constraints: I) -> Assignments<V>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        self.assignments.fix(constraints)
    }

    pub fn filter<I, K>(&self, constraints: I) -> Assignments<V>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        self.assignments.filter(constraints)
    }

    pub fn fetch(&self, name: &str) -> Vec<V> {
        self.assignments.fetch(name)
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
}

impl<T, V> Default for Chart<T, V>
where
    T: Clone + PartialEq,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V: std::fmt::Debug> std::fmt::Debug for Chart<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("flows", &self.flows.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("assignments", &self.assignments)
            .finish()
    }
}

/// Enumerate a single flow on its own and return its assignments.
///
/// The flow gets a fresh trail, so this can be called from inside another
/// flow to combine independent enumerations.
pub fn execute<T, V, F>(flow: F) -> Result<Assignments<V>, EnumerationError>
where
    T: Clone + PartialEq,
    F: FnMut(&mut Chooser<T>) -> anyhow::Result<Option<Harvest<V>>>,
{
    let harvests = Enumerator::default().run(flow)?;
    let mut assignments = Assignments::new();
    collect(harvests, &mut assignments);
    Ok(assignments)
}

fn collect<V>(harvests: Vec<Harvest<V>>, assignments: &mut Assignments<V>) {
    for harvest in harvests {
        match harvest {
            Harvest::One(assignment) if assignment.is_empty() => {}
            Harvest::One(assignment) => assignments.push(assignment),
            Harvest::Batch(batch) => assignments.extend(batch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(bindings: &[(&str, i32)]) -> Assignment<i32> {
        bindings
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_empty_assignments_are_dropped() {
        let mut chart: Chart<i32, i32> = Chart::new().flow("parity", |chooser| {
            let n = chooser.choose(&[1, 2, 3, 4])?;
            if n % 2 == 0 {
                Ok(Some(bind(&[("even", n)]).into()))
            } else {
                Ok(Some(Assignment::new().into()))
            }
        });
        chart.create().unwrap();
        assert_eq!(chart.fetch("even"), vec![4, 2]);
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn test_flow_errors_name_the_flow() {
        let mut chart: Chart<i32, i32> = Chart::new()
            .flow("fine", |chooser| Ok(Some(bind(&[("a", chooser.choose(&[1])?)]).into())))
            .flow("broken", |_| Err(anyhow::anyhow!("boom")));

        match chart.create() {
            Err(ChartError::Flow { name, source }) => {
                assert_eq!(name, "broken");
                assert!(matches!(source, EnumerationError::UserFault(_)));
            }
            Ok(_) => panic!("expected the broken flow to fail"),
        }
    }

    #[test]
    fn test_recreate_replaces_assignments() {
        let mut chart: Chart<i32, i32> =
            Chart::new().flow("one", |chooser| Ok(Some(bind(&[("n", chooser.choose(&[7])?)]).into())));
        chart.create().unwrap();
        chart.create().unwrap();
        assert_eq!(chart.fetch("n"), vec![7]);
    }
}
