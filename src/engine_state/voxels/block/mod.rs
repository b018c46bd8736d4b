//! # Block Module
//!
//! Block kinds and block faces. How a block is drawn lives in the rendering
//! module's geometry table, not here.

pub mod block_side;
pub mod block_type;

pub use block_side::BlockSide;
pub use block_type::BlockType;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;
