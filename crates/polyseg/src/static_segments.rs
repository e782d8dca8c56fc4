//! Compile-time segments for a closed set of concrete types.
//!
//! [`static_segments!`](crate::static_segments!) declares a collection type
//! with one typed [`Segment<T>`](crate::Segment) field per listed type and a
//! dynamic [`PolyCollection`](crate::PolyCollection) for everything else.
//!
//! Routing an insert compares `TypeId`s of two concrete types, which the
//! compiler folds to a constant after monomorphization, so declared types
//! land in their field without a map lookup. Traversal of declared fields is
//! a typed loop: no erased-segment call, and the visitor call can be inlined.
//! Behaviour is identical to a plain `PolyCollection`; only dispatch differs.
//!
//! [`SegmentVisitor`] and [`SegmentVisitorMut`] go one step further: the
//! visitor is generic per concrete type, so a declared field is walked with
//! `T` known and nothing left to dispatch at runtime.

use std::any::Any;

use crate::member::Member;

/// Visitor told the concrete type of every element it can.
///
/// Used by the `for_each_typed_ref` method generated by
/// [`static_segments!`](crate::static_segments!). Declared fields call
/// [`visit`](SegmentVisitor::visit) with their element type; elements held
/// by the dynamic fallback only reach [`visit_base`](SegmentVisitor::visit_base).
pub trait SegmentVisitor<B: ?Sized> {
    /// Called for every element stored in the dynamic fallback.
    fn visit_base(&mut self, item: &B);

    /// Called for every element of a declared type.
    #[inline]
    fn visit<T: Member<B>>(&mut self, item: &T) {
        self.visit_base(item.as_base());
    }
}

/// Mutable counterpart of [`SegmentVisitor`], used by `for_each_typed`.
pub trait SegmentVisitorMut<B: ?Sized> {
    /// Called for every element stored in the dynamic fallback.
    fn visit_base(&mut self, item: &mut B);

    /// Called for every element of a declared type.
    #[inline]
    fn visit<T: Member<B>>(&mut self, item: &mut T) {
        self.visit_base(item.as_base_mut());
    }
}

/// Move the value out of `slot` if its type is `U`.
///
/// Leaves `slot` untouched and returns `None` when `T` is not `U`.
#[doc(hidden)]
#[inline]
pub fn take_as<T: 'static, U: 'static>(slot: &mut Option<T>) -> Option<U> {
    (slot as &mut dyn Any)
        .downcast_mut::<Option<U>>()
        .and_then(Option::take)
}

/// Declare a collection with static segments for a fixed list of types.
///
/// ```
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// struct Square(f64);
/// struct Circle(f64);
/// struct Blob(f64);
///
/// impl Shape for Square { fn area(&self) -> f64 { self.0 * self.0 } }
/// impl Shape for Circle { fn area(&self) -> f64 { 3.0 * self.0 * self.0 } }
/// impl Shape for Blob { fn area(&self) -> f64 { self.0 } }
///
/// polyseg::members!(dyn Shape => Square, Circle, Blob);
///
/// polyseg::static_segments! {
///     /// Squares and circles are stored without type erasure.
///     pub struct Shapes: dyn Shape {
///         squares: Square,
///         circles: Circle,
///     }
/// }
///
/// let mut shapes = Shapes::new();
/// shapes.insert(Square(2.0));
/// shapes.insert(Blob(0.5));
/// shapes.insert(Circle(1.0));
/// assert_eq!(shapes.len(), 3);
/// assert_eq!(shapes.dynamic().segment_count(), 1);
///
/// let mut total = 0.0;
/// shapes.for_each_ref(|s| total += s.area());
/// assert_eq!(total, 7.5);
/// ```
///
/// Generated methods mirror [`PolyCollection`](crate::PolyCollection):
/// `new`, `with_config`, `insert`, `for_each`, `for_each_ref`,
/// `try_for_each`, `try_for_each_ref`, `segment`, `segment_count`, `len`,
/// `is_empty`, `shuffle` and `dynamic`. `for_each_typed` and
/// `for_each_typed_ref` take a [`SegmentVisitorMut`] / [`SegmentVisitor`]
/// instead of a closure. Dynamic segments are visited first,
/// then the declared fields in declaration order. A declared segment counts
/// towards `segment_count` once it holds an element.
#[macro_export]
macro_rules! static_segments {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : dyn $base:path {
            $($field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($field: $crate::Segment<$ty>,)+
            dynamic: $crate::PolyCollection<dyn $base>,
        }

        #[allow(dead_code)]
        impl $name {
            /// Create an empty collection with the default configuration.
            pub fn new() -> Self {
                Self::with_config($crate::CollectionConfig::default())
            }

            /// Create an empty collection; `config` applies to the dynamic segments.
            pub fn with_config(config: $crate::CollectionConfig) -> Self {
                Self {
                    $($field: $crate::Segment::with_capacity(config.initial_segment_capacity),)+
                    dynamic: $crate::PolyCollection::with_config(config),
                }
            }

            /// Insert a value, routing declared types to their static segment.
            pub fn insert<T: $crate::Member<dyn $base>>(&mut self, value: T) {
                let mut slot = Some(value);
                $(
                    if let Some(v) = $crate::static_segments::take_as::<T, $ty>(&mut slot) {
                        self.$field.insert(v);
                        return;
                    }
                )+
                if let Some(v) = slot {
                    self.dynamic.insert(v);
                }
            }

            /// Visit every element through the base capability and return the visitor.
            pub fn for_each<F>(&mut self, f: F) -> F
            where
                F: FnMut(&mut (dyn $base + 'static)),
            {
                let mut f = self.dynamic.for_each(f);
                $(
                    for item in self.$field.iter_mut() {
                        f($crate::Member::<dyn $base>::as_base_mut(item));
                    }
                )+
                f
            }

            /// Shared-access variant of `for_each`.
            pub fn for_each_ref<F>(&self, f: F) -> F
            where
                F: FnMut(&(dyn $base + 'static)),
            {
                let mut f = self.dynamic.for_each_ref(f);
                $(
                    for item in self.$field.iter() {
                        f($crate::Member::<dyn $base>::as_base(item));
                    }
                )+
                f
            }

            /// Visit every element, declared fields with their concrete type.
            ///
            /// Same order as `for_each`.
            pub fn for_each_typed<V>(&mut self, mut visitor: V) -> V
            where
                V: $crate::SegmentVisitorMut<dyn $base>,
            {
                self.dynamic.for_each(|item| visitor.visit_base(item));
                $(
                    for item in self.$field.iter_mut() {
                        visitor.visit::<$ty>(item);
                    }
                )+
                visitor
            }

            /// Shared-access variant of `for_each_typed`.
            pub fn for_each_typed_ref<V>(&self, mut visitor: V) -> V
            where
                V: $crate::SegmentVisitor<dyn $base>,
            {
                self.dynamic.for_each_ref(|item| visitor.visit_base(item));
                $(
                    for item in self.$field.iter() {
                        visitor.visit::<$ty>(item);
                    }
                )+
                visitor
            }

            /// Visit elements until `f` returns an error, which is returned as is.
            pub fn try_for_each<E, F>(&mut self, f: F) -> ::core::result::Result<F, E>
            where
                F: FnMut(&mut (dyn $base + 'static)) -> ::core::result::Result<(), E>,
            {
                let mut f = self.dynamic.try_for_each(f)?;
                $(
                    for item in self.$field.iter_mut() {
                        f($crate::Member::<dyn $base>::as_base_mut(item))?;
                    }
                )+
                Ok(f)
            }

            /// Shared-access variant of `try_for_each`.
            pub fn try_for_each_ref<E, F>(&self, f: F) -> ::core::result::Result<F, E>
            where
                F: FnMut(&(dyn $base + 'static)) -> ::core::result::Result<(), E>,
            {
                let mut f = self.dynamic.try_for_each_ref(f)?;
                $(
                    for item in self.$field.iter() {
                        f($crate::Member::<dyn $base>::as_base(item))?;
                    }
                )+
                Ok(f)
            }

            /// Typed access to the segment of `T`, static or dynamic.
            pub fn segment<T: $crate::Member<dyn $base>>(&self) -> Option<&$crate::Segment<T>> {
                $(
                    if let Some(seg) = (&self.$field as &dyn ::core::any::Any)
                        .downcast_ref::<$crate::Segment<T>>()
                    {
                        return if seg.is_empty() { None } else { Some(seg) };
                    }
                )+
                self.dynamic.segment::<T>()
            }

            /// Number of segments holding at least one inserted type.
            pub fn segment_count(&self) -> usize {
                let declared = [$(!self.$field.is_empty()),+];
                self.dynamic.segment_count() + declared.iter().filter(|used| **used).count()
            }

            /// Total number of elements.
            pub fn len(&self) -> usize {
                self.dynamic.len() $(+ self.$field.len())+
            }

            /// Whether the collection holds no elements.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Deterministically permute the elements inside every segment.
            pub fn shuffle(&mut self, seed: u64) {
                use $crate::__rand::SeedableRng;
                self.dynamic.shuffle(seed);
                let mut rng = $crate::__rand::ChaCha8Rng::seed_from_u64(seed);
                $(self.$field.shuffle(&mut rng);)+
            }

            /// The dynamic fallback holding every non-declared type.
            pub fn dynamic(&self) -> &$crate::PolyCollection<dyn $base> {
                &self.dynamic
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_as_moves_matching_type() {
        let mut slot = Some(7u32);
        assert_eq!(take_as::<u32, u32>(&mut slot), Some(7));
        assert!(slot.is_none());
    }

    #[test]
    fn take_as_leaves_other_types() {
        let mut slot = Some(7u32);
        assert_eq!(take_as::<u32, i64>(&mut slot), None);
        assert_eq!(slot, Some(7));
    }
}
