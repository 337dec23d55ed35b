//! Display provider seam and test utilities for batchmesh.
//!
//! The batching code never talks to a host engine directly. Everything it needs from
//! the host (drawables, geometry objects, material bindings, uploads) goes through the
//! [`DisplayProvider`] trait defined here.
//!
//! # Overview
//!
//! - [`DisplayProvider`] - Trait abstracting the host's display-surface operations
//! - Handle types ([`DrawableHandle`], [`GeometryHandle`], [`MaterialId`]) - opaque,
//!   `Copy`, compared by identity
//! - `MockDisplayProvider` - Recording implementation for tests (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use batchmesh_test_utils::{DisplayProvider, MockDisplayProvider};
//!
//! let mock = MockDisplayProvider::new();
//! let drawable = mock.create_drawable("scene/Mesh/0").unwrap();
//! mock.set_drawable_active(drawable, true);
//!
//! assert_eq!(mock.count_drawable_creates(), 1);
//! assert!(mock.drawable(drawable).unwrap().active);
//! # }
//! ```
//!
//! # Design
//!
//! Provider methods take `&self` and handles are plain integers, so one provider can be
//! shared behind an `Arc` by every surface of every allocator. The mock uses
//! `parking_lot::Mutex` for interior mutability to record calls.

pub mod display_provider;
pub mod handles;
#[cfg(feature = "mock")]
pub mod mock_display;

pub use display_provider::*;
pub use handles::*;
#[cfg(feature = "mock")]
pub use mock_display::*;
