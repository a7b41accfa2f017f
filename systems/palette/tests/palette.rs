use icecream_core::FlavorId;
use icecream_system_palette::{random_palette, seeded_palette, CHANNEL_RANGE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn palette_covers_every_flavor() {
    let palette = seeded_palette(12, 0x1ce_c4ea);

    assert_eq!(palette.len(), 12);
    assert!(palette.color(FlavorId::new(11)).is_some());
    assert!(palette.color(FlavorId::new(12)).is_none());
}

#[test]
fn channels_stay_within_visible_range() {
    let palette = seeded_palette(256, 7);

    for (_, color) in palette.iter() {
        for channel in [color.red(), color.green(), color.blue()] {
            assert!(CHANNEL_RANGE.contains(&channel), "channel {channel} too dark");
        }
    }
}

#[test]
fn identical_seeds_replay_identical_palettes() {
    assert_eq!(seeded_palette(8, 42), seeded_palette(8, 42));
    assert_ne!(seeded_palette(8, 42), seeded_palette(8, 43));
}

#[test]
fn caller_supplied_rng_is_advanced_in_place() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let first = random_palette(4, &mut rng);
    let second = random_palette(4, &mut rng);

    assert_ne!(first, second);
    assert_eq!(first, seeded_palette(4, 99));
}

#[test]
fn zero_flavors_produce_an_empty_palette() {
    assert!(seeded_palette(0, 1).is_empty());
}
