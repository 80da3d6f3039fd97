//! The [`MaterialSet`] bitset.

use crate::id::MaterialIndex;

/// A set of material indices implemented as a dynamically-sized bitset.
///
/// Used as the material mask of runtime-registered variables: a
/// transported scalar or reflux variable only exists for the materials in
/// its mask, and the transfer operators skip every other material.
#[derive(Clone, Debug)]
pub struct MaterialSet {
    bits: Vec<u64>,
}

impl MaterialSet {
    const BITS_PER_WORD: usize = 64;

    /// Create an empty material set.
    pub fn empty() -> Self {
        Self { bits: Vec::new() }
    }

    /// The set `{0, 1, ..., count - 1}`.
    pub fn first_n(count: u32) -> Self {
        (0..count).map(MaterialIndex).collect()
    }

    /// Insert a material into the set.
    pub fn insert(&mut self, material: MaterialIndex) {
        let word = material.0 as usize / Self::BITS_PER_WORD;
        let bit = material.0 as usize % Self::BITS_PER_WORD;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1u64 << bit;
    }

    /// Check whether the set contains a material.
    pub fn contains(&self, material: MaterialIndex) -> bool {
        let word = material.0 as usize / Self::BITS_PER_WORD;
        let bit = material.0 as usize % Self::BITS_PER_WORD;
        word < self.bits.len() && (self.bits[word] & (1u64 << bit)) != 0
    }

    /// Return the intersection of two sets (`self & other`).
    pub fn intersection(&self, other: &Self) -> Self {
        let min_len = self.bits.len().min(other.bits.len());
        let mut bits = Vec::with_capacity(min_len);
        for i in 0..min_len {
            bits.push(self.bits[i] & other.bits[i]);
        }
        while bits.last() == Some(&0) {
            bits.pop();
        }
        Self { bits }
    }

    /// Returns `true` if the set contains no materials.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Returns the number of materials in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the materials in the set, in ascending order.
    pub fn iter(&self) -> MaterialSetIter<'_> {
        MaterialSetIter {
            bits: &self.bits,
            word_idx: 0,
            bit_idx: 0,
        }
    }
}

impl PartialEq for MaterialSet {
    fn eq(&self, other: &Self) -> bool {
        let max_len = self.bits.len().max(other.bits.len());
        (0..max_len).all(|i| {
            self.bits.get(i).copied().unwrap_or(0) == other.bits.get(i).copied().unwrap_or(0)
        })
    }
}

impl Eq for MaterialSet {}

impl FromIterator<MaterialIndex> for MaterialSet {
    fn from_iter<I: IntoIterator<Item = MaterialIndex>>(iter: I) -> Self {
        let mut set = Self::empty();
        for material in iter {
            set.insert(material);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MaterialSet {
    type Item = MaterialIndex;
    type IntoIter = MaterialSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`MaterialSet`], yielding indices in ascending order.
pub struct MaterialSetIter<'a> {
    bits: &'a [u64],
    word_idx: usize,
    bit_idx: usize,
}

impl Iterator for MaterialSetIter<'_> {
    type Item = MaterialIndex;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word_idx < self.bits.len() {
            let word = self.bits[self.word_idx];
            while self.bit_idx < 64 {
                let bit = self.bit_idx;
                self.bit_idx += 1;
                if word & (1u64 << bit) != 0 {
                    return Some(MaterialIndex((self.word_idx * 64 + bit) as u32));
                }
            }
            self.word_idx += 1;
            self.bit_idx = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_material_set() -> impl Strategy<Value = MaterialSet> {
        prop::collection::vec(0u32..128, 0..32)
            .prop_map(|ids| ids.into_iter().map(MaterialIndex).collect::<MaterialSet>())
    }

    #[test]
    fn first_n_contains_prefix() {
        let set = MaterialSet::first_n(3);
        assert_eq!(set.len(), 3);
        assert!(set.contains(MaterialIndex(2)));
        assert!(!set.contains(MaterialIndex(3)));
    }

    #[test]
    fn empty_set_iterates_nothing() {
        assert_eq!(MaterialSet::empty().iter().count(), 0);
        assert!(MaterialSet::empty().is_empty());
    }

    proptest! {
        #[test]
        fn intersection_commutative(a in arb_material_set(), b in arb_material_set()) {
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn intersection_idempotent(a in arb_material_set()) {
            prop_assert_eq!(a.intersection(&a), a.clone());
        }

        #[test]
        fn insert_contains(id in 0u32..256) {
            let mut set = MaterialSet::empty();
            set.insert(MaterialIndex(id));
            prop_assert!(set.contains(MaterialIndex(id)));
            prop_assert_eq!(set.len(), 1);
        }

        #[test]
        fn len_matches_iter_count(a in arb_material_set()) {
            prop_assert_eq!(a.len(), a.iter().count());
        }

        #[test]
        fn iteration_is_ascending(a in arb_material_set()) {
            let ids: Vec<u32> = a.iter().map(|m| m.0).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
