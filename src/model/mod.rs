// src/model/mod.rs
//! The output block schema — the domain model the converter emits and
//! the validator inspects, plus its wire serialization.

mod block;
pub mod blocks;
pub mod common;
pub mod ser;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use ser::{block_to_wire, blocks_to_payload, rich_text_to_wire};
