//! Benchmark collections and utilities for polyseg.
//!
//! Provides the collections compared by the criterion benches:
//!
//! - [`BoxedProbes`]: the `Vec<Box<dyn Probe>>` baseline, one heap
//!   allocation per element
//! - [`ProbeBag`]: a `static_segments!` collection declaring every fixture
//! - `PolyCollection<dyn Probe>`: the fully dynamic segmented collection

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::any::type_name;

use polyseg::{Member, PolyCollection, SegmentVisitor};
use polyseg_test_utils::{fill_round_robin, Negate, Offset, Probe, ProbeSink, Scale};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Element counts used by the size-sweeping benches.
pub const SIZES: [u32; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Baseline: every element in its own heap allocation.
#[derive(Default)]
pub struct BoxedProbes {
    items: Vec<Box<dyn Probe>>,
}

impl BoxedProbes {
    /// Create an empty baseline collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visit every element in storage order and return the visitor.
    pub fn for_each_ref<F: FnMut(&dyn Probe)>(&self, mut f: F) -> F {
        for item in &self.items {
            f(item.as_ref());
        }
        f
    }

    /// Permute the element order so pointer chasing hits scattered memory.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.items.shuffle(&mut rng);
    }
}

impl ProbeSink for BoxedProbes {
    fn put<T: Member<dyn Probe>>(&mut self, value: T) {
        // No generic unsizing on stable: route through the known fixtures.
        let mut slot = Some(value);
        if let Some(v) = polyseg::static_segments::take_as::<T, Scale>(&mut slot) {
            self.items.push(Box::new(v));
        } else if let Some(v) = polyseg::static_segments::take_as::<T, Offset>(&mut slot) {
            self.items.push(Box::new(v));
        } else if let Some(v) = polyseg::static_segments::take_as::<T, Negate>(&mut slot) {
            self.items.push(Box::new(v));
        } else {
            unreachable!("BoxedProbes cannot box {}", type_name::<T>());
        }
    }
}

polyseg::static_segments! {
    /// Every fixture type stored in a typed segment.
    pub struct ProbeBag: dyn Probe {
        scales: Scale,
        offsets: Offset,
        negates: Negate,
    }
}

impl ProbeSink for ProbeBag {
    fn put<T: Member<dyn Probe>>(&mut self, value: T) {
        self.insert(value);
    }
}

/// Baseline with `n` round-robin fixtures, shuffled with `seed`.
pub fn boxed_probes(n: u32, seed: u64) -> BoxedProbes {
    let mut c = BoxedProbes::new();
    fill_round_robin(&mut c, n);
    c.shuffle(seed);
    c
}

/// Dynamic segmented collection with `n` round-robin fixtures.
pub fn poly_probes(n: u32, seed: u64) -> PolyCollection<dyn Probe> {
    let mut c = PolyCollection::<dyn Probe>::new();
    fill_round_robin(&mut c, n);
    c.shuffle(seed);
    c
}

/// Static-segment collection with `n` round-robin fixtures.
pub fn bag_probes(n: u32, seed: u64) -> ProbeBag {
    let mut c = ProbeBag::new();
    fill_round_robin(&mut c, n);
    c.shuffle(seed);
    c
}

/// The reference workload: sum `apply(1)` over every element.
pub fn sum_boxed(c: &BoxedProbes) -> i64 {
    let mut res = 0;
    c.for_each_ref(|p| res += p.apply(1));
    res
}

/// [`sum_boxed`] over the dynamic segmented collection.
pub fn sum_poly(c: &PolyCollection<dyn Probe>) -> i64 {
    let mut res = 0;
    c.for_each_ref(|p| res += p.apply(1));
    res
}

/// [`sum_boxed`] over the static-segment collection.
pub fn sum_bag(c: &ProbeBag) -> i64 {
    let mut res = 0;
    c.for_each_ref(|p| res += p.apply(1));
    res
}

/// Visitor summing `apply(1)`; declared fields see their concrete type.
#[derive(Default)]
pub struct SumApply(pub i64);

impl SegmentVisitor<dyn Probe> for SumApply {
    #[inline]
    fn visit_base(&mut self, item: &(dyn Probe + 'static)) {
        self.0 += item.apply(1);
    }

    #[inline]
    fn visit<T: Member<dyn Probe>>(&mut self, item: &T) {
        // The upcast inlines to a constant vtable, so this call resolves statically.
        self.0 += item.as_base().apply(1);
    }
}

/// [`sum_boxed`] over the static-segment collection with a typed visitor.
pub fn sum_bag_typed(c: &ProbeBag) -> i64 {
    c.for_each_typed_ref(SumApply::default()).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_collections_agree_on_the_workload() {
        let boxed = boxed_probes(999, 1);
        let poly = poly_probes(999, 1);
        let bag = bag_probes(999, 1);
        assert_eq!(boxed.len(), 999);
        assert_eq!(poly.len(), 999);
        assert_eq!(bag.len(), 999);
        let expected = sum_boxed(&boxed);
        assert_eq!(sum_poly(&poly), expected);
        assert_eq!(sum_bag(&bag), expected);
        assert_eq!(sum_bag_typed(&bag), expected);
    }

    #[test]
    fn boxed_shuffle_is_deterministic() {
        let ids = |c: &BoxedProbes| {
            let mut ids = Vec::new();
            c.for_each_ref(|p| ids.push(p.id()));
            ids
        };
        let a = boxed_probes(64, 5);
        let b = boxed_probes(64, 5);
        assert_eq!(ids(&a), ids(&b));
        assert_ne!(ids(&a), (0..64).collect::<Vec<_>>());
    }

    struct Stray;

    impl Probe for Stray {
        fn kind(&self) -> polyseg_test_utils::Kind {
            polyseg_test_utils::Kind::Negate
        }
        fn id(&self) -> u32 {
            0
        }
        fn apply(&self, x: i64) -> i64 {
            x
        }
        fn hits(&self) -> u32 {
            0
        }
        fn hit(&mut self) {}
    }

    polyseg::members!(dyn Probe => Stray);

    #[test]
    #[should_panic(expected = "BoxedProbes cannot box")]
    fn boxed_rejects_unknown_fixture() {
        BoxedProbes::new().put(Stray);
    }

    #[test]
    fn bag_uses_no_dynamic_segments() {
        let bag = bag_probes(30, 0);
        assert_eq!(bag.dynamic().segment_count(), 0);
        assert_eq!(bag.segment_count(), 3);
    }
}
