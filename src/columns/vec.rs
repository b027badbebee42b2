use std::cmp::Ordering;

use super::{Column, ColumnMode};

/// A column represented by an increasing vector of the non-zero row indices.
///
/// To construct, call [`VecColumn::from`] or use [`VecColumn::new_with_dimension`]
/// together with [`VecColumn::add_entries`].
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VecColumn {
    entries: Vec<usize>,
    dimension: usize,
}

impl VecColumn {
    // Returns the index at which the next entry should start its scan.
    fn add_entry_starting_at(&mut self, entry: usize, starting_idx: usize) -> usize {
        let mut working_idx = starting_idx;
        while let Some(value_at_idx) = self.entries.iter().nth(working_idx) {
            match value_at_idx.cmp(&entry) {
                Ordering::Less => {
                    working_idx += 1;
                    continue;
                }
                Ordering::Equal => {
                    self.entries.remove(working_idx);
                    return working_idx;
                }
                Ordering::Greater => {
                    self.entries.insert(working_idx, entry);
                    return working_idx + 1;
                }
            }
        }
        // Bigger than all indices in the column - add to end.
        self.entries.push(entry);
        self.entries.len() - 1
    }
}

impl Column for VecColumn {
    fn pivot(&self) -> Option<usize> {
        self.entries.iter().last().copied()
    }

    fn add_col(&mut self, other: &Self) {
        let mut working_idx = 0;
        for entry in other.entries.iter() {
            working_idx = self.add_entry_starting_at(*entry, working_idx);
        }
    }

    fn add_entry(&mut self, entry: usize) {
        self.add_entry_starting_at(entry, 0);
    }

    fn has_entry(&self, entry: &usize) -> bool {
        self.entries.contains(entry)
    }

    type EntriesIter<'a> = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn entries<'a>(&'a self) -> Self::EntriesIter<'a> {
        self.entries.iter().copied()
    }

    type EntriesRepr = Vec<usize>;

    fn set_entries(&mut self, entries: Self::EntriesRepr) {
        self.entries = entries;
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn set_dimension(&mut self, dimension: usize) {
        self.dimension = dimension;
    }

    fn is_cycle(&self) -> bool {
        self.entries.is_empty()
    }

    fn new_with_dimension(dimension: usize) -> Self {
        Self {
            entries: vec![],
            dimension,
        }
    }

    // No difference for this representation.
    fn set_mode(&mut self, _mode: ColumnMode) {}
}

impl From<(usize, Vec<usize>)> for VecColumn {
    /// Constructs a `VecColumn` from a tuple where `entries` is the vector of
    /// non-zero indices, sorted in increasing order.
    fn from((dimension, entries): (usize, Vec<usize>)) -> Self {
        Self { entries, dimension }
    }
}
