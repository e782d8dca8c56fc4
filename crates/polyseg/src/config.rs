//! Collection configuration parameters.

/// Order in which a [`PolyCollection`](crate::PolyCollection) visits its segments.
///
/// Elements inside a segment are always visited in insertion order; this
/// only controls the order *between* segments. Either choice is stable for
/// the lifetime of a collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SegmentOrder {
    /// Segments are visited in the order their types were first inserted.
    #[default]
    FirstInsertion,
    /// Segments are kept sorted by `TypeId`. The resulting order is stable
    /// within one build but arbitrary across compilers and platforms.
    TypeKey,
}

/// Configuration for a [`PolyCollection`](crate::PolyCollection).
///
/// All values are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Capacity (in elements) reserved when a segment is lazily created.
    ///
    /// Default: 0, i.e. segments grow on demand like a plain `Vec`.
    pub initial_segment_capacity: usize,

    /// Visiting order between segments.
    pub segment_order: SegmentOrder,
}

impl CollectionConfig {
    /// Default capacity reserved for a freshly created segment.
    pub const DEFAULT_INITIAL_SEGMENT_CAPACITY: usize = 0;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            initial_segment_capacity: Self::DEFAULT_INITIAL_SEGMENT_CAPACITY,
            segment_order: SegmentOrder::default(),
        }
    }

    /// Set the capacity reserved for each new segment.
    pub fn with_initial_segment_capacity(mut self, capacity: usize) -> Self {
        self.initial_segment_capacity = capacity;
        self
    }

    /// Set the visiting order between segments.
    pub fn with_segment_order(mut self, order: SegmentOrder) -> Self {
        self.segment_order = order;
        self
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
