//! Hashed collections backed by AHash.
//!
//! Handle-keyed lookups (drawables, geometry, materials) use these instead of the
//! SipHash-based std collections.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
