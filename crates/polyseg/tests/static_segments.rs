//! Collections declared with `static_segments!` behave like `PolyCollection`.

use polyseg::{Member, PolyCollection, SegmentVisitor, SegmentVisitorMut};
use polyseg_test_utils::{fill_round_robin, kind_runs, Kind, Negate, Offset, Probe, ProbeSink, Scale};

polyseg::static_segments! {
    /// Scale and Offset are static; Negate goes through the dynamic path.
    struct PartialBag: dyn Probe {
        scales: Scale,
        offsets: Offset,
    }
}

polyseg::static_segments! {
    struct FullBag: dyn Probe {
        scales: Scale,
        offsets: Offset,
        negates: Negate,
    }
}

/// Records `(id, concrete type name)`; dynamic elements are tagged "dyn".
#[derive(Default)]
struct TypeLog(Vec<(u32, &'static str)>);

impl SegmentVisitor<dyn Probe> for TypeLog {
    fn visit_base(&mut self, item: &(dyn Probe + 'static)) {
        self.0.push((item.id(), "dyn"));
    }

    fn visit<T: Member<dyn Probe>>(&mut self, item: &T) {
        self.0.push((item.as_base().id(), std::any::type_name::<T>()));
    }
}

/// Hits declared elements twice and dynamic ones once.
struct DoubleHitDeclared;

impl SegmentVisitorMut<dyn Probe> for DoubleHitDeclared {
    fn visit_base(&mut self, item: &mut (dyn Probe + 'static)) {
        item.hit();
    }

    fn visit<T: Member<dyn Probe>>(&mut self, item: &mut T) {
        item.as_base_mut().hit();
        item.as_base_mut().hit();
    }
}

/// Only overrides `visit_base`; declared elements fall back to it.
#[derive(Default)]
struct CountBase(usize);

impl SegmentVisitor<dyn Probe> for CountBase {
    fn visit_base(&mut self, _item: &(dyn Probe + 'static)) {
        self.0 += 1;
    }
}

impl ProbeSink for PartialBag {
    fn put<T: polyseg::Member<dyn Probe>>(&mut self, value: T) {
        self.insert(value);
    }
}

impl ProbeSink for FullBag {
    fn put<T: polyseg::Member<dyn Probe>>(&mut self, value: T) {
        self.insert(value);
    }
}

fn observe_partial(bag: &PartialBag) -> Vec<(Kind, u32)> {
    let mut seen = Vec::new();
    bag.for_each_ref(|p| seen.push((p.kind(), p.id())));
    seen
}

#[test]
fn declared_types_skip_the_dynamic_path() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 9);

    assert_eq!(bag.len(), 9);
    assert_eq!(bag.segment_count(), 3);
    assert_eq!(bag.dynamic().segment_count(), 1);
    assert!(bag.dynamic().contains_type::<Negate>());
    assert!(!bag.dynamic().contains_type::<Scale>());
    assert_eq!(bag.segment::<Scale>().map(|s| s.len()), Some(3));
    assert_eq!(bag.segment::<Negate>().map(|s| s.len()), Some(3));
}

#[test]
fn dynamic_segments_are_visited_before_declared_ones() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 6);
    let seen = observe_partial(&bag);
    assert_eq!(kind_runs(&seen), vec![Kind::Negate, Kind::Scale, Kind::Offset]);
    assert_eq!(
        seen.iter().map(|&(_, id)| id).collect::<Vec<_>>(),
        vec![2, 5, 0, 3, 1, 4]
    );
}

#[test]
fn same_elements_as_a_dynamic_collection() {
    let mut bag = FullBag::new();
    let mut coll = PolyCollection::<dyn Probe>::new();
    fill_round_robin(&mut bag, 60);
    fill_round_robin(&mut coll, 60);

    let mut from_bag = Vec::new();
    bag.for_each_ref(|p| from_bag.push((p.kind(), p.id(), p.apply(5))));
    let mut from_coll = Vec::new();
    coll.for_each_ref(|p| from_coll.push((p.kind(), p.id(), p.apply(5))));

    // Both group by type in declaration / first-insertion order.
    assert_eq!(from_bag, from_coll);
    assert_eq!(bag.dynamic().segment_count(), 0);
}

#[test]
fn empty_bag_reports_no_segments() {
    let bag = FullBag::default();
    assert!(bag.is_empty());
    assert_eq!(bag.segment_count(), 0);
    assert!(bag.segment::<Scale>().is_none());
    let mut visits = 0;
    bag.for_each_ref(|_| visits += 1);
    assert_eq!(visits, 0);
}

#[test]
fn mutation_reaches_static_and_dynamic_segments() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 12);
    bag.for_each(|p| p.hit());

    let mut hits = Vec::new();
    bag.for_each_ref(|p| hits.push(p.hits()));
    assert_eq!(hits, vec![1; 12]);
}

#[test]
fn try_for_each_stops_inside_static_segment() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 9);

    let mut visited = Vec::new();
    let result = bag.try_for_each(|p| {
        visited.push(p.id());
        if p.kind() == Kind::Scale && p.id() == 3 {
            Err(p.id())
        } else {
            Ok(())
        }
    });
    assert_eq!(result.err(), Some(3));
    // Negates (dynamic) first, then Scale 0, then Scale 3 fails.
    assert_eq!(visited, vec![2, 5, 8, 0, 3]);
}

#[test]
fn shuffle_keeps_grouping() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 90);
    let before = observe_partial(&bag);
    bag.shuffle(7);
    let after = observe_partial(&bag);

    assert_eq!(kind_runs(&after), kind_runs(&before));
    assert_ne!(after, before);
    let mut a = after.clone();
    let mut b = before.clone();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn typed_visitor_sees_concrete_types_of_declared_fields() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 6);
    let log = bag.for_each_typed_ref(TypeLog::default()).0;

    let ids: Vec<u32> = log.iter().map(|&(id, _)| id).collect();
    assert_eq!(ids, vec![2, 5, 0, 3, 1, 4]);
    assert_eq!(log[0].1, "dyn");
    assert_eq!(log[1].1, "dyn");
    assert!(log[2].1.ends_with("Scale"));
    assert!(log[4].1.ends_with("Offset"));
}

#[test]
fn typed_visitor_defaults_to_the_base_path() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 10);
    assert_eq!(bag.for_each_typed_ref(CountBase::default()).0, 10);
}

#[test]
fn typed_mutable_visitor_writes_through() {
    let mut bag = PartialBag::new();
    fill_round_robin(&mut bag, 6);
    bag.for_each_typed(DoubleHitDeclared);

    let mut hits = Vec::new();
    bag.for_each_ref(|p| hits.push((p.kind(), p.hits())));
    assert_eq!(
        hits,
        vec![
            (Kind::Negate, 1),
            (Kind::Negate, 1),
            (Kind::Scale, 2),
            (Kind::Scale, 2),
            (Kind::Offset, 2),
            (Kind::Offset, 2),
        ]
    );
}
