//! The segmented polymorphic collection.
//!
//! [`PolyCollection<B>`] routes each inserted value to the [`Segment`] of its
//! concrete type, creating the segment on first use, and offers traversal of
//! every element through the base capability `B`.
//!
//! ```text
//! PolyCollection<dyn Shape>
//! └── IndexMap<TypeId, Box<dyn ErasedSegment<dyn Shape>>>
//!     ├── Segment<Circle>   [c0, c1, c2, ...]   contiguous
//!     ├── Segment<Square>   [s0, s1, ...]       contiguous
//!     └── Segment<Polygon>  [p0, ...]           contiguous
//! ```
//!
//! Traversal is grouped by concrete type: all elements of one segment are
//! visited back to back, in insertion order, before the next segment starts.

use std::any::{type_name, TypeId};
use std::fmt;
use std::mem::size_of;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use crate::config::{CollectionConfig, SegmentOrder};
use crate::error::PolyError;
use crate::member::Member;
use crate::segment::{ErasedSegment, Segment};

/// Summary of one segment, as reported by [`PolyCollection::segments`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentInfo {
    /// `TypeId` of the concrete element type.
    pub type_id: TypeId,
    /// Name of the concrete element type.
    pub type_name: &'static str,
    /// Number of stored elements.
    pub len: usize,
    /// Storage stride of one element in bytes.
    pub element_size: usize,
}

/// A collection of heterogeneous values viewed through the base capability `B`.
///
/// Each concrete type gets exactly one contiguous segment, created lazily on
/// first insertion. Segments are never removed.
pub struct PolyCollection<B: ?Sized + 'static> {
    segments: IndexMap<TypeId, Box<dyn ErasedSegment<B>>>,
    config: CollectionConfig,
}

impl<B: ?Sized + 'static> PolyCollection<B> {
    /// Create an empty collection with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Create an empty collection with the given configuration.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            segments: IndexMap::new(),
            config,
        }
    }

    /// The configuration this collection was built with.
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Insert a value into the segment of its concrete type.
    ///
    /// The segment is created on first insertion of `T`. Only `T`'s segment
    /// may reallocate; other segments are untouched.
    pub fn insert<T: Member<B>>(&mut self, value: T) {
        self.segment_or_create::<T>().insert(value);
    }

    /// Reserve room for at least `additional` more values of type `T`.
    ///
    /// Only an existing segment is grown: segments are created by insertion
    /// alone, so reserving for a type never inserted is a no-op. Presize new
    /// segments with [`CollectionConfig::initial_segment_capacity`].
    pub fn try_reserve<T: Member<B>>(&mut self, additional: usize) -> Result<(), PolyError> {
        match self.segment_mut::<T>() {
            Some(segment) => {
                tracing::trace!(segment = type_name::<T>(), additional, "reserving");
                segment.try_reserve(additional)
            }
            None => Ok(()),
        }
    }

    /// Visit every element through the base capability and return the visitor.
    ///
    /// Segments are visited in the configured [`SegmentOrder`]; elements within
    /// a segment in insertion order. A panic in `f` propagates unchanged.
    pub fn for_each<F>(&mut self, mut f: F) -> F
    where
        F: FnMut(&mut B),
    {
        for segment in self.segments.values_mut() {
            segment.for_each_base(&mut f);
        }
        f
    }

    /// Shared-access variant of [`PolyCollection::for_each`].
    pub fn for_each_ref<F>(&self, mut f: F) -> F
    where
        F: FnMut(&B),
    {
        for segment in self.segments.values() {
            segment.for_each_base_ref(&mut f);
        }
        f
    }

    /// Visit elements until `f` returns an error.
    ///
    /// On error the traversal stops at the failing element and the error is
    /// returned as is. Effects on elements already visited are kept.
    pub fn try_for_each<E, F>(&mut self, mut f: F) -> Result<F, E>
    where
        F: FnMut(&mut B) -> Result<(), E>,
    {
        let mut failure = None;
        for segment in self.segments.values_mut() {
            let flow = segment.try_for_each_base(&mut |item| match f(item) {
                Ok(()) => ControlFlow::Continue(()),
                Err(err) => {
                    failure = Some(err);
                    ControlFlow::Break(())
                }
            });
            if flow.is_break() {
                break;
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(f),
        }
    }

    /// Shared-access variant of [`PolyCollection::try_for_each`].
    pub fn try_for_each_ref<E, F>(&self, mut f: F) -> Result<F, E>
    where
        F: FnMut(&B) -> Result<(), E>,
    {
        let mut failure = None;
        for segment in self.segments.values() {
            let flow = segment.try_for_each_base_ref(&mut |item| match f(item) {
                Ok(()) => ControlFlow::Continue(()),
                Err(err) => {
                    failure = Some(err);
                    ControlFlow::Break(())
                }
            });
            if flow.is_break() {
                break;
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(f),
        }
    }

    /// Typed access to the segment of `T`, if any value of `T` was inserted.
    pub fn segment<T: Member<B>>(&self) -> Option<&Segment<T>> {
        self.segments
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<Segment<T>>())
    }

    /// Mutable typed access to the segment of `T`.
    pub fn segment_mut<T: Member<B>>(&mut self) -> Option<&mut Segment<T>> {
        self.segments
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<Segment<T>>())
    }

    /// Whether a segment exists for the concrete type `T`.
    pub fn contains_type<T: 'static>(&self) -> bool {
        self.segments.contains_key(&TypeId::of::<T>())
    }

    /// Number of segments, i.e. distinct concrete types inserted so far.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total number of elements across all segments.
    pub fn len(&self) -> usize {
        self.segments.values().map(|s| s.len()).sum()
    }

    /// Whether the collection holds no elements.
    pub fn is_empty(&self) -> bool {
        self.segments.values().all(|s| s.is_empty())
    }

    /// Per-segment summary in visiting order.
    pub fn segments(&self) -> SmallVec<[SegmentInfo; 8]> {
        self.segments
            .iter()
            .map(|(&type_id, s)| SegmentInfo {
                type_id,
                type_name: s.type_name(),
                len: s.len(),
                element_size: s.element_size(),
            })
            .collect()
    }

    /// Deterministically permute the elements inside every segment.
    ///
    /// Each segment is shuffled independently; segment order and grouping
    /// are unchanged. The same `seed` on the same contents yields the same
    /// result.
    pub fn shuffle(&mut self, seed: u64) {
        tracing::trace!(seed, segments = self.segments.len(), "shuffling segments");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for segment in self.segments.values_mut() {
            segment.shuffle(&mut rng);
        }
    }

    fn segment_or_create<T: Member<B>>(&mut self) -> &mut Segment<T> {
        let key = TypeId::of::<T>();
        if !self.segments.contains_key(&key) {
            let segment = Segment::<T>::with_capacity(self.config.initial_segment_capacity);
            self.segments.insert(key, Box::new(segment));
            if self.config.segment_order == SegmentOrder::TypeKey {
                self.segments.sort_keys();
            }
            tracing::debug!(
                segment = type_name::<T>(),
                element_size = size_of::<T>(),
                segment_count = self.segments.len(),
                "created segment"
            );
        }
        self.segments
            .get_mut(&key)
            .and_then(|s| s.as_any_mut().downcast_mut::<Segment<T>>())
            .expect("segment keyed by TypeId::of::<T>() always stores Segment<T>")
    }
}

impl<B: ?Sized + 'static> Default for PolyCollection<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized + 'static, T: Member<B>> Extend<T> for PolyCollection<B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter().peekable();
        // No segment for an empty iterator.
        if iter.peek().is_none() {
            return;
        }
        let segment = self.segment_or_create::<T>();
        segment.reserve(iter.size_hint().0);
        for value in iter {
            segment.insert(value);
        }
    }
}

impl<B: ?Sized + 'static> fmt::Debug for PolyCollection<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyCollection")
            .field("segments", &self.segments())
            .field("config", &self.config)
            .finish()
    }
}
