//! Segmented polymorphic collections.
//!
//! Stores heterogeneous values that share a base capability (usually a
//! trait object type such as `dyn Shape`) by value, packing every concrete
//! type into its own contiguous segment. Traversal through the base
//! capability then becomes a linear scan per segment instead of a pointer
//! chase per element, as with `Vec<Box<dyn Shape>>`.
//!
//! # Architecture
//!
//! ```text
//! PolyCollection<B> (router)
//! ├── CollectionConfig (initial segment capacity, segment order)
//! └── IndexMap<TypeId, Box<dyn ErasedSegment<B>>>
//!     └── Segment<T> (Vec<T>, one per concrete type, created lazily)
//!
//! static_segments! { struct S: dyn B { a: A, b: B2 } }
//! ├── Segment<A>, Segment<B2> (typed fields, no erasure)
//! └── PolyCollection<dyn B> (fallback for every other type)
//! ```
//!
//! # Ordering
//!
//! Elements of one type are visited contiguously and in insertion order.
//! Order across types is a per-collection choice, see [`SegmentOrder`];
//! it is never the global insertion order.
//!
//! # Example
//!
//! ```
//! use polyseg::PolyCollection;
//!
//! trait Animal {
//!     fn legs(&self) -> u32;
//! }
//!
//! struct Bird;
//! struct Dog { _name: &'static str }
//!
//! impl Animal for Bird { fn legs(&self) -> u32 { 2 } }
//! impl Animal for Dog { fn legs(&self) -> u32 { 4 } }
//!
//! polyseg::members!(dyn Animal => Bird, Dog);
//!
//! let mut zoo = PolyCollection::<dyn Animal>::new();
//! zoo.insert(Dog { _name: "rex" });
//! zoo.insert(Bird);
//! zoo.insert(Dog { _name: "fido" });
//!
//! assert_eq!(zoo.segment_count(), 2);
//! let mut legs = Vec::new();
//! zoo.for_each_ref(|a| legs.push(a.legs()));
//! assert_eq!(legs, vec![4, 4, 2]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod config;
pub mod error;
pub mod member;
pub mod segment;
pub mod static_segments;

// Public re-exports for the primary API surface.
pub use collection::{PolyCollection, SegmentInfo};
pub use config::{CollectionConfig, SegmentOrder};
pub use error::PolyError;
pub use member::Member;
pub use segment::{ErasedSegment, Segment};
pub use static_segments::{SegmentVisitor, SegmentVisitorMut};

/// RNG types used by code generated from [`static_segments!`].
#[doc(hidden)]
pub mod __rand {
    pub use rand::SeedableRng;
    pub use rand_chacha::ChaCha8Rng;
}
