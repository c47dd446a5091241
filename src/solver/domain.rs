use bit_set::BitSet;

/// The candidate values still open for one cell.
///
/// Values are 1-based and bounded by the grid size, so the set is backed
/// by a bit set indexed directly by value. Duplicates are unrepresentable
/// and iteration is always ascending, which is what gives the natural
/// value ordering its behaviour for free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    values: BitSet,
}

impl Domain {
    /// The full domain `1..=size`.
    pub fn full(size: usize) -> Self {
        let mut values = BitSet::with_capacity(size + 1);
        for v in 1..=size {
            values.insert(v);
        }
        Self { values }
    }

    /// A domain holding exactly one value, the state of a clue cell.
    pub fn singleton(value: usize) -> Self {
        let mut values = BitSet::with_capacity(value + 1);
        values.insert(value);
        Self { values }
    }

    pub fn contains(&self, value: usize) -> bool {
        self.values.contains(value)
    }

    /// Adds a candidate. Returns false if it was already present.
    pub fn insert(&mut self, value: usize) -> bool {
        self.values.insert(value)
    }

    /// Removes a candidate. Returns false if it was not present.
    pub fn remove(&mut self, value: usize) -> bool {
        self.values.remove(value)
    }

    /// Shrinks the domain to exactly `value`, the effect of an assignment.
    pub fn collapse_to(&mut self, value: usize) {
        self.values.clear();
        self.values.insert(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// An empty domain means the owning cell can no longer take any value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.len() == 1
    }

    pub fn get_singleton_value(&self) -> Option<usize> {
        if self.is_singleton() {
            self.iter().next()
        } else {
            None
        }
    }

    /// Remaining candidates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_domain_holds_every_value_in_range() {
        let domain = Domain::full(9);
        assert_eq!(domain.len(), 9);
        assert!(domain.contains(1));
        assert!(domain.contains(9));
        assert!(!domain.contains(0));
        assert!(!domain.contains(10));
    }

    #[test]
    fn removal_shrinks_until_empty() {
        let mut domain = Domain::full(4);
        assert!(domain.remove(2));
        assert!(!domain.remove(2));
        assert_eq!(domain.iter().collect::<Vec<_>>(), vec![1, 3, 4]);

        domain.remove(1);
        domain.remove(3);
        assert_eq!(domain.get_singleton_value(), Some(4));

        domain.remove(4);
        assert!(domain.is_empty());
        assert_eq!(domain.get_singleton_value(), None);
    }

    #[test]
    fn collapse_keeps_only_the_assigned_value() {
        let mut domain = Domain::full(9);
        domain.collapse_to(7);
        assert!(domain.is_singleton());
        assert_eq!(domain.iter().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn equality_ignores_backing_capacity() {
        let mut wide = Domain::full(9);
        for v in 2..=9 {
            wide.remove(v);
        }
        assert_eq!(wide, Domain::singleton(1));
    }

    #[test]
    fn iteration_is_ascending() {
        let mut domain = Domain::full(9);
        domain.remove(4);
        domain.remove(8);
        assert_eq!(
            domain.iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 5, 6, 7, 9]
        );
    }
}
