//! Binding between concrete element types and a base capability.
//!
//! A collection is parameterised by its base capability `B`, usually a
//! trait object type such as `dyn Shape`. A concrete type may be stored in
//! the collection only if it implements [`Member<B>`], which is how the
//! "must satisfy the base capability" rule becomes a compile-time check.
//!
//! Stable Rust has no generic unsizing bound, so the upcast is spelled out
//! per type. [`members!`](crate::members!) writes those impls.

use std::any::Any;

/// A concrete type that can be viewed through the base capability `B`.
///
/// Implementations are almost always the identity coercion:
///
/// ```
/// use polyseg::Member;
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// struct Square(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.0 * self.0
///     }
/// }
///
/// impl Member<dyn Shape> for Square {
///     fn as_base(&self) -> &(dyn Shape + 'static) {
///         self
///     }
///     fn as_base_mut(&mut self) -> &mut (dyn Shape + 'static) {
///         self
///     }
/// }
/// ```
pub trait Member<B: ?Sized>: Any {
    /// Borrow `self` as the base capability.
    fn as_base(&self) -> &B;

    /// Mutably borrow `self` as the base capability.
    fn as_base_mut(&mut self) -> &mut B;
}

/// Implement [`Member`] for a list of concrete types by unsizing coercion.
///
/// The base capability is written as `dyn Trait`; the generated impls bind
/// to `dyn Trait + 'static`, the type a `PolyCollection<dyn Trait>` uses.
///
/// ```
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// struct Square(f64);
/// struct Circle(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 { self.0 * self.0 }
/// }
/// impl Shape for Circle {
///     fn area(&self) -> f64 { 3.0 * self.0 * self.0 }
/// }
///
/// polyseg::members!(dyn Shape => Square, Circle);
///
/// let mut shapes = polyseg::PolyCollection::<dyn Shape>::new();
/// shapes.insert(Square(2.0));
/// shapes.insert(Circle(1.0));
/// let mut total = 0.0;
/// shapes.for_each_ref(|s| total += s.area());
/// assert_eq!(total, 7.0);
/// ```
#[macro_export]
macro_rules! members {
    (dyn $base:path => $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Member<dyn $base> for $ty {
                #[inline]
                fn as_base(&self) -> &(dyn $base + 'static) {
                    self
                }

                #[inline]
                fn as_base_mut(&mut self) -> &mut (dyn $base + 'static) {
                    self
                }
            }
        )+
    };
}
