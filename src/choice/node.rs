//! ChoicePoint implementation - one recorded decision on the trail

/// A single decision made while running an exploration function.
///
/// The alternatives are captured the first time the position is reached and
/// stay authoritative for every later replay of that position. Alternatives are
/// tried from the last supplied one back to the first, so `selected` starts at
/// the final index and only ever decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePoint<T> {
    alternatives: Vec<T>,
    selected: usize,
}

impl<T> ChoicePoint<T> {
    /// Create a choice point selecting the alternative listed last.
    ///
    /// Returns `None` for an empty alternatives list; there is nothing to select.
    pub fn new(alternatives: Vec<T>) -> Option<Self> {
        let selected = alternatives.len().checked_sub(1)?;
        Some(Self {
            alternatives,
            selected,
        })
    }

    /// Move to the next untried alternative in reverse order.
    ///
    /// Returns `false` once every alternative has been tried, leaving the
    /// selection on the first one.
    pub fn advance(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        true
    }

    pub fn selected(&self) -> &T {
        &self.alternatives[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Number of alternatives offered at this point
    pub fn width(&self) -> usize {
        self.alternatives.len()
    }

    /// Alternatives that still have to be tried after the current selection
    pub fn remaining(&self) -> usize {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selects_last_alternative() {
        let point = ChoicePoint::new(vec!['a', 'b', 'c']).unwrap();
        assert_eq!(*point.selected(), 'c');
        assert_eq!(point.selected_index(), 2);
        assert_eq!(point.remaining(), 2);
        assert_eq!(point.width(), 3);
    }

    #[test]
    fn test_empty_alternatives_have_no_choice_point() {
        assert!(ChoicePoint::<u8>::new(Vec::new()).is_none());
    }

    #[test]
    fn test_advance_walks_backwards_then_stops() {
        let mut point = ChoicePoint::new(vec![1, 2, 3]).unwrap();
        let mut seen = vec![*point.selected()];
        while point.advance() {
            seen.push(*point.selected());
        }
        assert_eq!(seen, vec![3, 2, 1]);
        assert!(!point.advance());
        assert_eq!(*point.selected(), 1);
        assert_eq!(point.remaining(), 0);
    }

    #[test]
    fn test_single_alternative_cannot_advance() {
        let mut point = ChoicePoint::new(vec!["only"]).unwrap();
        assert!(!point.advance());
        assert_eq!(*point.selected(), "only");
    }
}
