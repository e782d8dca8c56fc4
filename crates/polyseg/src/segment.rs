//! Homogeneous contiguous segments and their type-erased view.
//!
//! A [`Segment<T>`] is a `Vec<T>` holding every element of one concrete
//! type. The collection keeps segments behind the object-safe
//! [`ErasedSegment<B>`] trait so it can walk them through the base
//! capability `B` without knowing `T` after creation.
//!
//! Iterating a segment is a linear scan over packed `T`s with one upcast per
//! element. Compared with a `Vec<Box<dyn B>>` this removes the per-element
//! pointer chase; the only indirect call left is the visitor itself.

use std::any::{type_name, Any, TypeId};
use std::mem::size_of;
use std::ops::ControlFlow;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::PolyError;
use crate::member::Member;

/// Contiguous storage for all elements of one concrete type `T`.
///
/// Elements are kept in insertion order. Growth may relocate the backing
/// storage, so references into a segment never outlive a borrow of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<T> {
    items: Vec<T>,
}

impl<T> Segment<T> {
    /// Create an empty segment.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty segment with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append an element. Amortized O(1).
    pub fn insert(&mut self, value: T) {
        self.items.push(value);
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the segment holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Storage stride of one element in bytes.
    pub const fn element_size(&self) -> usize {
        size_of::<T>()
    }

    /// Number of elements the segment can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The elements as a slice, in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The elements as a mutable slice, in insertion order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Iterate the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutably iterate the elements in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Reserve room for at least `additional` more elements.
    ///
    /// Returns `Err(PolyError::CapacityExceeded)` instead of aborting when
    /// the allocator refuses or the size computation overflows.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), PolyError> {
        self.items
            .try_reserve(additional)
            .map_err(|_| PolyError::CapacityExceeded {
                type_name: type_name::<T>(),
                requested: additional,
            })
    }

    /// Reserve room for at least `additional` more elements.
    ///
    /// Panics on capacity overflow like [`Vec::reserve`]; use
    /// [`Segment::try_reserve`] for untrusted sizes.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    /// Permute the elements in place.
    ///
    /// Only this segment is touched; the permutation is fully determined by
    /// the RNG state.
    pub fn shuffle(&mut self, rng: &mut ChaCha8Rng) {
        self.items.shuffle(rng);
    }
}

impl<T> Default for Segment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Segment<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Segment<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Object-safe view of a [`Segment<T>`] through the base capability `B`.
///
/// This is the only interface the collection uses after a segment has been
/// created: element count, stride, and base-typed traversal.
pub trait ErasedSegment<B: ?Sized> {
    /// Number of stored elements.
    fn len(&self) -> usize;

    /// Whether the segment holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage stride of one element in bytes.
    fn element_size(&self) -> usize;

    /// Name of the concrete element type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// `TypeId` of the concrete element type.
    fn element_type_id(&self) -> TypeId;

    /// Call `f` on every element, in insertion order.
    fn for_each_base(&mut self, f: &mut dyn FnMut(&mut B));

    /// Call `f` on every element, in insertion order, with shared access.
    fn for_each_base_ref(&self, f: &mut dyn FnMut(&B));

    /// Call `f` on elements in insertion order until it breaks.
    fn try_for_each_base(
        &mut self,
        f: &mut dyn FnMut(&mut B) -> ControlFlow<()>,
    ) -> ControlFlow<()>;

    /// Shared-access variant of [`ErasedSegment::try_for_each_base`].
    fn try_for_each_base_ref(&self, f: &mut dyn FnMut(&B) -> ControlFlow<()>) -> ControlFlow<()>;

    /// Reserve room for at least `additional` more elements.
    fn try_reserve(&mut self, additional: usize) -> Result<(), PolyError>;

    /// Permute the elements of this segment in place.
    fn shuffle(&mut self, rng: &mut ChaCha8Rng);

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcasting support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<B, T> ErasedSegment<B> for Segment<T>
where
    B: ?Sized,
    T: Member<B>,
{
    fn len(&self) -> usize {
        self.items.len()
    }

    fn element_size(&self) -> usize {
        size_of::<T>()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn for_each_base(&mut self, f: &mut dyn FnMut(&mut B)) {
        for item in &mut self.items {
            f(item.as_base_mut());
        }
    }

    fn for_each_base_ref(&self, f: &mut dyn FnMut(&B)) {
        for item in &self.items {
            f(item.as_base());
        }
    }

    fn try_for_each_base(
        &mut self,
        f: &mut dyn FnMut(&mut B) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        for item in &mut self.items {
            f(item.as_base_mut())?;
        }
        ControlFlow::Continue(())
    }

    fn try_for_each_base_ref(&self, f: &mut dyn FnMut(&B) -> ControlFlow<()>) -> ControlFlow<()> {
        for item in &self.items {
            f(item.as_base())?;
        }
        ControlFlow::Continue(())
    }

    fn try_reserve(&mut self, additional: usize) -> Result<(), PolyError> {
        Segment::try_reserve(self, additional)
    }

    fn shuffle(&mut self, rng: &mut ChaCha8Rng) {
        Segment::shuffle(self, rng);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
