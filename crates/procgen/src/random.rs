//! Seeded randomness for content placement.
//!
//! Each content category of a chunk draws from its own `StdRng`, seeded from
//! the chunk coordinates and a per-category salt, so a chunk can be
//! regenerated at any time and come out identical.

use rand::{rngs::StdRng, SeedableRng};

/// Seed for one content stream of a chunk. Different `salt`s give
/// independent streams for the same chunk.
pub fn chunk_seed(cx: i32, cz: i32, salt: u64) -> u64 {
    (cx as i64 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (cz as i64 as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f)
        ^ salt
}

/// Generator for one content stream of a chunk.
pub fn chunk_rng(cx: i32, cz: i32, salt: u64) -> StdRng {
    StdRng::seed_from_u64(chunk_seed(cx, cz, salt))
}
