//! Shared fixtures: the `Probe` capability and its implementors.

use polyseg::{Member, PolyCollection};

/// Which concrete fixture type an element is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Scale,
    Offset,
    Negate,
}

/// Base capability used throughout the tests and benchmarks.
pub trait Probe {
    /// Concrete fixture type.
    fn kind(&self) -> Kind;
    /// Caller-assigned identifier, unique within a test.
    fn id(&self) -> u32;
    /// Type-dependent work done per element.
    fn apply(&self, x: i64) -> i64;
    /// Number of times [`Probe::hit`] was called.
    fn hits(&self) -> u32;
    /// Mutate the element.
    fn hit(&mut self);
}

/// `x * factor`.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    pub id: u32,
    pub factor: i64,
    pub hits: u32,
}

/// `x + delta`. Padded so its stride differs from [`Scale`].
#[derive(Clone, Debug, PartialEq)]
pub struct Offset {
    pub id: u32,
    pub delta: i64,
    pub hits: u32,
    pub padding: [u64; 4],
}

/// `-x`. The smallest fixture.
#[derive(Clone, Debug, PartialEq)]
pub struct Negate {
    pub id: u32,
    pub hits: u32,
}

impl Scale {
    pub fn new(id: u32, factor: i64) -> Self {
        Self { id, factor, hits: 0 }
    }
}

impl Offset {
    pub fn new(id: u32, delta: i64) -> Self {
        Self {
            id,
            delta,
            hits: 0,
            padding: [0; 4],
        }
    }
}

impl Negate {
    pub fn new(id: u32) -> Self {
        Self { id, hits: 0 }
    }
}

impl Probe for Scale {
    fn kind(&self) -> Kind {
        Kind::Scale
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn apply(&self, x: i64) -> i64 {
        x * self.factor
    }
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hit(&mut self) {
        self.hits += 1;
    }
}

impl Probe for Offset {
    fn kind(&self) -> Kind {
        Kind::Offset
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn apply(&self, x: i64) -> i64 {
        x + self.delta
    }
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hit(&mut self) {
        self.hits += 1;
    }
}

impl Probe for Negate {
    fn kind(&self) -> Kind {
        Kind::Negate
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn apply(&self, x: i64) -> i64 {
        -x
    }
    fn hits(&self) -> u32 {
        self.hits
    }
    fn hit(&mut self) {
        self.hits += 1;
    }
}

polyseg::members!(dyn Probe => Scale, Offset, Negate);

/// Anything that accepts fixture values.
pub trait ProbeSink {
    fn put<T: Member<dyn Probe>>(&mut self, value: T);
}

impl ProbeSink for PolyCollection<dyn Probe> {
    fn put<T: Member<dyn Probe>>(&mut self, value: T) {
        self.insert(value);
    }
}

/// Insert `n` elements cycling Scale, Offset, Negate; ids run `0..n`.
pub fn fill_round_robin<S: ProbeSink>(sink: &mut S, n: u32) {
    for id in 0..n {
        match id % 3 {
            0 => sink.put(Scale::new(id, i64::from(id % 7) + 1)),
            1 => sink.put(Offset::new(id, i64::from(id))),
            _ => sink.put(Negate::new(id)),
        }
    }
}

/// `(kind, id)` of every element in visiting order.
pub fn observe(coll: &PolyCollection<dyn Probe>) -> Vec<(Kind, u32)> {
    let mut seen = Vec::with_capacity(coll.len());
    coll.for_each_ref(|p| seen.push((p.kind(), p.id())));
    seen
}

/// Kinds of the maximal same-kind runs in `seen`.
pub fn kind_runs(seen: &[(Kind, u32)]) -> Vec<Kind> {
    let mut runs: Vec<Kind> = Vec::new();
    for &(kind, _) in seen {
        if runs.last() != Some(&kind) {
            runs.push(kind);
        }
    }
    runs
}
