#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flavor color assignment driven by an explicitly supplied random source.

use std::ops::RangeInclusive;

use icecream_core::{FlavorColor, Palette};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Channel intensities drawn for each flavor; the floor keeps scoops visible
/// on a black background.
pub const CHANNEL_RANGE: RangeInclusive<u8> = 50..=255;

/// Draws one color per flavor with every channel uniform in [`CHANNEL_RANGE`].
pub fn random_palette<R>(num_flavors: u32, rng: &mut R) -> Palette
where
    R: Rng + ?Sized,
{
    let colors = (0..num_flavors)
        .map(|_| {
            FlavorColor::from_rgb(
                rng.gen_range(CHANNEL_RANGE),
                rng.gen_range(CHANNEL_RANGE),
                rng.gen_range(CHANNEL_RANGE),
            )
        })
        .collect();
    Palette::new(colors)
}

/// Draws a palette from a ChaCha generator seeded with `seed`.
///
/// Identical seeds always produce identical palettes.
#[must_use]
pub fn seeded_palette(num_flavors: u32, seed: u64) -> Palette {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_palette(num_flavors, &mut rng)
}
