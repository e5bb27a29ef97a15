//! Character sets for bracket expressions.
//!
//! A [`CharSet`] is a sorted list of disjoint half-open code-point ranges.
//! Positive bracket items insert into the set; in a negated bracket
//! expression the set starts as the full alphabet and items erase from it.

use crate::{BEGIN_CHARACTER, END_CHARACTER};

/// A set of code points, stored as sorted disjoint half-open ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set covering the whole alphabet.
    #[must_use]
    pub fn full() -> Self {
        Self {
            ranges: vec![(BEGIN_CHARACTER, END_CHARACTER)],
        }
    }

    /// True when the set contains no code points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The disjoint ranges, in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// True when `character` is a member.
    #[must_use]
    pub fn contains(&self, character: u32) -> bool {
        self.ranges
            .iter()
            .any(|&(begin, end)| begin <= character && character < end)
    }

    /// Add `[begin, end)` to the set, merging overlapping and adjacent
    /// ranges.
    pub fn insert(&mut self, begin: u32, end: u32) {
        if begin >= end {
            return;
        }

        let mut merged = (begin, end);
        let mut result = Vec::with_capacity(self.ranges.len() + 1);
        for &(range_begin, range_end) in &self.ranges {
            if range_end < merged.0 || range_begin > merged.1 {
                result.push((range_begin, range_end));
            } else {
                merged.0 = merged.0.min(range_begin);
                merged.1 = merged.1.max(range_end);
            }
        }

        let position = result
            .iter()
            .position(|&(range_begin, _)| range_begin > merged.0)
            .unwrap_or(result.len());
        result.insert(position, merged);
        self.ranges = result;
    }

    /// Remove `[begin, end)` from the set, splitting ranges that straddle
    /// the erased interval.
    pub fn erase(&mut self, begin: u32, end: u32) {
        if begin >= end {
            return;
        }

        let mut result = Vec::with_capacity(self.ranges.len() + 1);
        for &(range_begin, range_end) in &self.ranges {
            if range_end <= begin || range_begin >= end {
                result.push((range_begin, range_end));
                continue;
            }
            if range_begin < begin {
                result.push((range_begin, begin));
            }
            if range_end > end {
                result.push((end, range_end));
            }
        }
        self.ranges = result;
    }
}

/// The ASCII ranges of a POSIX-style named character class, or `None` for an
/// unknown name.
#[must_use]
pub(crate) fn posix_class(name: &str) -> Option<&'static [(u32, u32)]> {
    const ALNUM: &[(u32, u32)] = &[(0x30, 0x3a), (0x41, 0x5b), (0x61, 0x7b)];
    const ALPHA: &[(u32, u32)] = &[(0x41, 0x5b), (0x61, 0x7b)];
    const BLANK: &[(u32, u32)] = &[(0x09, 0x0a), (0x20, 0x21)];
    const CNTRL: &[(u32, u32)] = &[(0x00, 0x20), (0x7f, 0x80)];
    const DIGIT: &[(u32, u32)] = &[(0x30, 0x3a)];
    const GRAPH: &[(u32, u32)] = &[(0x21, 0x7f)];
    const LOWER: &[(u32, u32)] = &[(0x61, 0x7b)];
    const PRINT: &[(u32, u32)] = &[(0x20, 0x7f)];
    const PUNCT: &[(u32, u32)] = &[(0x21, 0x30), (0x3a, 0x41), (0x5b, 0x61), (0x7b, 0x7f)];
    const SPACE: &[(u32, u32)] = &[(0x09, 0x0e), (0x20, 0x21)];
    const UPPER: &[(u32, u32)] = &[(0x41, 0x5b)];
    const WORD: &[(u32, u32)] = &[(0x30, 0x3a), (0x41, 0x5b), (0x5f, 0x60), (0x61, 0x7b)];
    const XDIGIT: &[(u32, u32)] = &[(0x30, 0x3a), (0x41, 0x47), (0x61, 0x67)];

    match name {
        "alnum" => Some(ALNUM),
        "alpha" => Some(ALPHA),
        "blank" => Some(BLANK),
        "cntrl" => Some(CNTRL),
        "digit" => Some(DIGIT),
        "graph" => Some(GRAPH),
        "lower" => Some(LOWER),
        "print" => Some(PRINT),
        "punct" => Some(PUNCT),
        "space" => Some(SPACE),
        "upper" => Some(UPPER),
        "word" => Some(WORD),
        "xdigit" => Some(XDIGIT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_disjoint() {
        let mut set = CharSet::new();
        set.insert(20, 30);
        set.insert(0, 10);
        assert_eq!(set.ranges(), &[(0, 10), (20, 30)]);
    }

    #[test]
    fn test_insert_merges_overlap() {
        let mut set = CharSet::new();
        set.insert(0, 10);
        set.insert(5, 15);
        assert_eq!(set.ranges(), &[(0, 15)]);
    }

    #[test]
    fn test_insert_merges_adjacent() {
        let mut set = CharSet::new();
        set.insert(0, 10);
        set.insert(10, 20);
        assert_eq!(set.ranges(), &[(0, 20)]);
    }

    #[test]
    fn test_insert_bridges() {
        let mut set = CharSet::new();
        set.insert(0, 5);
        set.insert(10, 15);
        set.insert(4, 11);
        assert_eq!(set.ranges(), &[(0, 15)]);
    }

    #[test]
    fn test_erase_splits() {
        let mut set = CharSet::full();
        set.erase(0x61, 0x7b);
        assert_eq!(
            set.ranges(),
            &[(BEGIN_CHARACTER, 0x61), (0x7b, END_CHARACTER)]
        );
    }

    #[test]
    fn test_erase_removes_whole_ranges() {
        let mut set = CharSet::new();
        set.insert(10, 20);
        set.insert(30, 40);
        set.erase(0, 50);
        assert!(set.is_empty());
    }

    #[test]
    fn test_erase_trims_edges() {
        let mut set = CharSet::new();
        set.insert(10, 20);
        set.erase(15, 25);
        assert_eq!(set.ranges(), &[(10, 15)]);
        set.erase(5, 12);
        assert_eq!(set.ranges(), &[(12, 15)]);
    }

    #[test]
    fn test_contains() {
        let mut set = CharSet::new();
        set.insert(u32::from('a'), u32::from('z') + 1);
        assert!(set.contains(u32::from('m')));
        assert!(!set.contains(u32::from('0')));
    }

    #[test]
    fn test_posix_classes() {
        assert!(posix_class("digit").is_some());
        assert!(posix_class("xdigit").is_some());
        assert!(posix_class("kanji").is_none());

        let mut set = CharSet::new();
        for &(begin, end) in posix_class("word").unwrap() {
            set.insert(begin, end);
        }
        assert!(set.contains(u32::from('_')));
        assert!(set.contains(u32::from('7')));
        assert!(!set.contains(u32::from('-')));
    }
}
