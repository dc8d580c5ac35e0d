//! Category grouping for bar charts: gap slots between runs and midpoint labels.
//!
//! A categorical axis shows one tick per row; a second label row names each
//! group once, centered under its run. Gap slots separate the runs visually and
//! never carry data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One position on the category axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Slot<T> {
    Data(T),
    Gap,
}

impl<T> Slot<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Slot::Data(t) => Some(t),
            Slot::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Slot::Gap)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedSlot<T> {
    pub index: usize,
    pub slot: Slot<T>,
}

/// Chart-ready sequence: slots in axis order plus group labels keyed by the
/// midpoint index of each run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupedSequence<T> {
    pub slots: Vec<IndexedSlot<T>>,
    pub group_labels: BTreeMap<usize, String>,
}

impl<T> GroupedSequence<T> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Midpoint indexes, ascending.
    pub fn ticks(&self) -> Vec<usize> {
        self.group_labels.keys().copied().collect()
    }

    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.group_labels.get(&index).map(String::as_str)
    }

    /// Data rows only; gaps are skipped so aggregates never see them.
    pub fn data(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.slot.data())
    }

    pub fn gap_count(&self) -> usize {
        self.slots.iter().filter(|s| s.slot.is_gap()).count()
    }
}

/// Insert a gap at every change of `key` and label each run at its midpoint.
///
/// `items` must already be ordered so that equal keys are contiguous; this
/// function does not sort. A key that reappears later starts a new run.
pub fn group_with_gaps<T, F>(items: &[T], key: F) -> GroupedSequence<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut slots: Vec<IndexedSlot<T>> = Vec::with_capacity(items.len() * 2);
    let mut group_labels = BTreeMap::new();
    // (key, first index, last index) of the open run
    let mut run: Option<(String, usize, usize)> = None;

    for item in items {
        let k = key(item);
        let continues = matches!(&run, Some((open, _, _)) if open.as_str() == k);
        if continues {
            if let Some((_, _, end)) = run.as_mut() {
                *end = slots.len();
            }
        } else {
            if let Some((open, start, end)) = run.take() {
                group_labels.insert((start + end) / 2, open);
                slots.push(IndexedSlot {
                    index: slots.len(),
                    slot: Slot::Gap,
                });
            }
            run = Some((k.to_string(), slots.len(), slots.len()));
        }
        slots.push(IndexedSlot {
            index: slots.len(),
            slot: Slot::Data(item.clone()),
        });
    }
    if let Some((open, start, end)) = run {
        group_labels.insert((start + end) / 2, open);
    }

    GroupedSequence {
        slots,
        group_labels,
    }
}
