//! # Core Module
//!
//! Shared-state primitives used throughout the streaming pipeline.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted value with read-write locking.
//!   Every store, queue and the observer position is built on it, one lock per
//!   logical container.
//!
//! ## Usage
//! ```rust
//! use voxel_streaming::core::MtResource;
//!
//! let observer = MtResource::new((0, 0));
//! *observer.get_mut() = (3, -2);
//! assert_eq!(observer.snapshot(), (3, -2));
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
