//! Vector math re-exported from [`glam`].
//!
//! ```
//! use astrelis_core::math::Vec2;
//!
//! let pointer = Vec2::new(10.0, 20.0);
//! let moved = pointer + Vec2::new(4.0, -2.0);
//! assert_eq!(moved, Vec2::new(14.0, 18.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{Vec2, vec2};
