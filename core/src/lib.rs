#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the ice cream enumerator.
//!
//! This crate defines the data that flows between the pure systems and the
//! adapters. The enumeration system produces [`IceCream`] values and dedups
//! them through a [`Fingerprint`] chosen by a [`FingerprintPolicy`], the
//! layout system turns the surviving ice creams into [`ScoopCircle`] and
//! [`Label`] descriptors, and adapters hand those descriptors to a renderer.
//! Nothing in here depends on a display surface.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opacity applied to every scoop so overlapping circles stay legible.
pub const SCOOP_OPACITY: u8 = 128;

/// Opacity applied to the summary label.
pub const LABEL_OPACITY: u8 = 200;

/// Largest scoop count accepted for a run.
///
/// The generator holds one digit per scoop, and anything taller than this
/// leaves no room on screen for even a single stack.
pub const MAX_SCOOPS: u32 = 64;

/// Index of a flavor within `[0, num_flavors)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlavorId(u32);

impl FlavorId {
    /// Creates a new flavor identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying flavor index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ordered sequence of scoops, one flavor per scoop.
///
/// Two ice creams that are permutations of each other are the same ice cream
/// once fingerprinted; the scoop order is kept only so renderers can stack the
/// scoops in the order they were generated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IceCream {
    scoops: Vec<FlavorId>,
}

impl IceCream {
    /// Creates an ice cream from the provided scoops.
    #[must_use]
    pub fn new(scoops: Vec<FlavorId>) -> Self {
        Self { scoops }
    }

    /// Scoops composing the ice cream, bottom scoop first.
    #[must_use]
    pub fn scoops(&self) -> &[FlavorId] {
        &self.scoops
    }

    /// Number of scoops in the ice cream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scoops.len()
    }

    /// Reports whether the ice cream has no scoops at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scoops.is_empty()
    }

    /// Computes the deduplication key of the ice cream under `policy`.
    #[must_use]
    pub fn fingerprint(&self, policy: FingerprintPolicy) -> Fingerprint {
        policy.fingerprint(self)
    }
}

/// Rule deciding when two ice creams count as the same ice cream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintPolicy {
    /// Ice creams differ when any flavor appears a different number of times.
    #[default]
    MultiplicitySensitive,
    /// Ice creams differ only when their sets of distinct flavors differ.
    MultiplicityInsensitive,
}

impl FingerprintPolicy {
    /// Computes the order-independent fingerprint of `ice_cream`.
    #[must_use]
    pub fn fingerprint(self, ice_cream: &IceCream) -> Fingerprint {
        match self {
            Self::MultiplicitySensitive => {
                let mut counts = BTreeMap::new();
                for flavor in ice_cream.scoops() {
                    *counts.entry(*flavor).or_insert(0_u32) += 1;
                }
                Fingerprint::Multiset(counts)
            }
            Self::MultiplicityInsensitive => {
                Fingerprint::Set(ice_cream.scoops().iter().copied().collect())
            }
        }
    }

    /// Short human-readable name used in logs and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MultiplicitySensitive => "multiplicity_sensitive",
            Self::MultiplicityInsensitive => "multiplicity_insensitive",
        }
    }
}

/// Canonical deduplication key derived from an [`IceCream`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fingerprint {
    /// Flavor to scoop-count mapping.
    Multiset(BTreeMap<FlavorId, u32>),
    /// Distinct flavors present, counts ignored.
    Set(BTreeSet<FlavorId>),
}

/// Computes the binomial coefficient `C(n, k)`.
///
/// Returns `Some(0)` when `k > n` and `None` when the result does not fit a
/// `u64`.
#[must_use]
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut result: u128 = 1;
    for step in 1..=u128::from(k) {
        // result holds C(n - k + step - 1, step - 1); the division is exact.
        result = result.checked_mul(u128::from(n - k) + step)? / step;
        if result > u128::from(u64::MAX) {
            return None;
        }
    }

    u64::try_from(result).ok()
}

/// Number of distinct ice creams predicted without enumerating them.
///
/// Multiplicity-sensitive counting is the multiset coefficient
/// `C(num_flavors + num_scoops - 1, num_scoops)`. Multiplicity-insensitive
/// counting is the number of non-empty flavor sets holding at most
/// `num_scoops` flavors. Returns `None` on overflow.
#[must_use]
pub fn expected_unique_count(
    policy: FingerprintPolicy,
    num_flavors: u32,
    num_scoops: u32,
) -> Option<u64> {
    let flavors = u64::from(num_flavors);
    let scoops = u64::from(num_scoops);

    if scoops == 0 {
        return Some(1);
    }
    if flavors == 0 {
        return Some(0);
    }

    match policy {
        FingerprintPolicy::MultiplicitySensitive => binomial(flavors + scoops - 1, scoops),
        FingerprintPolicy::MultiplicityInsensitive => {
            (1..=flavors.min(scoops)).try_fold(0_u64, |total, size| {
                total.checked_add(binomial(flavors, size)?)
            })
        }
    }
}

/// Validated flavor and scoop counts for a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunParameters {
    num_flavors: u32,
    num_scoops: u32,
}

impl RunParameters {
    /// Validates the provided counts.
    ///
    /// Both counts must be at least one, and `num_scoops` at most
    /// [`MAX_SCOOPS`].
    pub fn new(num_flavors: u32, num_scoops: u32) -> Result<Self, UsageError> {
        if num_flavors < 1 {
            return Err(UsageError::NoFlavors);
        }
        if num_scoops < 1 {
            return Err(UsageError::NoScoops);
        }
        if num_scoops > MAX_SCOOPS {
            return Err(UsageError::TooManyScoops {
                requested: num_scoops,
                max: MAX_SCOOPS,
            });
        }

        Ok(Self {
            num_flavors,
            num_scoops,
        })
    }

    /// Number of flavors available.
    #[must_use]
    pub const fn num_flavors(&self) -> u32 {
        self.num_flavors
    }

    /// Number of scoops per ice cream.
    #[must_use]
    pub const fn num_scoops(&self) -> u32 {
        self.num_scoops
    }
}

/// Invalid run parameters supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UsageError {
    /// Zero flavors were requested.
    #[error("the number of flavors must be greater than 0")]
    NoFlavors,
    /// Zero scoops were requested.
    #[error("the number of scoops must be greater than 0")]
    NoScoops,
    /// More scoops were requested than a run supports.
    #[error("the number of scoops must be at most {max} (received {requested})")]
    TooManyScoops {
        /// Requested scoop count.
        requested: u32,
        /// Largest accepted scoop count.
        max: u32,
    },
}

/// RGB color assigned to a flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlavorColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl FlavorColor {
    /// Creates a new flavor color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Fixed flavor-to-color mapping for a run, indexed by [`FlavorId`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<FlavorColor>,
}

impl Palette {
    /// Creates a palette where flavor `i` maps to `colors[i]`.
    #[must_use]
    pub fn new(colors: Vec<FlavorColor>) -> Self {
        Self { colors }
    }

    /// Color assigned to `flavor`, if the palette covers it.
    #[must_use]
    pub fn color(&self, flavor: FlavorId) -> Option<FlavorColor> {
        let index = usize::try_from(flavor.get()).ok()?;
        self.colors.get(index).copied()
    }

    /// Number of flavors covered by the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Reports whether the palette covers no flavors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterator over `(flavor, color)` pairs in flavor order.
    pub fn iter(&self) -> impl Iterator<Item = (FlavorId, FlavorColor)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .map(|(index, color)| (FlavorId::new(index as u32), *color))
    }
}

/// A single scoop positioned on the canvas.
///
/// Coordinates use a y-up canvas space with the origin at the bottom-left
/// corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoopCircle {
    /// Horizontal position of the circle center.
    pub x: f32,
    /// Vertical position of the circle center.
    pub y: f32,
    /// Circle radius.
    pub radius: f32,
    /// Flavor of the scoop.
    pub flavor: FlavorId,
    /// Fill color of the scoop.
    pub color: FlavorColor,
    /// Opacity in `0..=255`.
    pub opacity: u8,
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAnchor {
    /// Anchor sits on the left edge of the text.
    Left,
    /// Anchor sits on the horizontal center of the text.
    Center,
    /// Anchor sits on the right edge of the text.
    Right,
}

/// Vertical alignment of a label relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAnchor {
    /// Anchor sits on the bottom edge of the text.
    Bottom,
    /// Anchor sits on the vertical center of the text.
    Center,
    /// Anchor sits on the top edge of the text.
    Top,
}

/// Text drawn on the canvas at an anchor point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Text content.
    pub text: String,
    /// Horizontal anchor position in canvas space.
    pub x: f32,
    /// Vertical anchor position in canvas space.
    pub y: f32,
    /// Horizontal alignment around `x`.
    pub anchor_x: HorizontalAnchor,
    /// Vertical alignment around `y`.
    pub anchor_y: VerticalAnchor,
    /// Opacity in `0..=255`.
    pub opacity: u8,
}

#[cfg(test)]
mod tests {
    use super::{
        binomial, expected_unique_count, FingerprintPolicy, FlavorColor, FlavorId, IceCream,
        Palette, RunParameters, UsageError, MAX_SCOOPS,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn ice_cream(flavors: &[u32]) -> IceCream {
        IceCream::new(flavors.iter().copied().map(FlavorId::new).collect())
    }

    #[test]
    fn binomial_matches_pascal_rows() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(6, 2), Some(15));
        assert_eq!(binomial(5, 3), Some(10));
        assert_eq!(binomial(52, 5), Some(2_598_960));
        assert_eq!(binomial(3, 4), Some(0));
    }

    #[test]
    fn binomial_reports_overflow() {
        assert_eq!(binomial(200, 100), None);
        assert_eq!(binomial(67, 33), Some(14_226_520_737_620_288_370));
    }

    #[test]
    fn multiset_coefficient_matches_worked_examples() {
        let policy = FingerprintPolicy::MultiplicitySensitive;
        assert_eq!(expected_unique_count(policy, 5, 2), Some(15));
        assert_eq!(expected_unique_count(policy, 3, 3), Some(10));
    }

    #[test]
    fn flavor_set_count_caps_at_available_flavors() {
        let policy = FingerprintPolicy::MultiplicityInsensitive;
        assert_eq!(expected_unique_count(policy, 3, 3), Some(7));
        assert_eq!(expected_unique_count(policy, 4, 2), Some(10));
        assert_eq!(expected_unique_count(policy, 2, 5), Some(3));
    }

    #[test]
    fn single_scoop_count_equals_flavor_count_under_both_policies() {
        for flavors in 1..10 {
            for policy in [
                FingerprintPolicy::MultiplicitySensitive,
                FingerprintPolicy::MultiplicityInsensitive,
            ] {
                assert_eq!(
                    expected_unique_count(policy, flavors, 1),
                    Some(u64::from(flavors))
                );
            }
        }
    }

    #[test]
    fn permutations_share_a_fingerprint() {
        let first = ice_cream(&[0, 1, 1, 2]);
        let second = ice_cream(&[1, 2, 0, 1]);
        for policy in [
            FingerprintPolicy::MultiplicitySensitive,
            FingerprintPolicy::MultiplicityInsensitive,
        ] {
            assert_eq!(first.fingerprint(policy), second.fingerprint(policy));
        }
    }

    #[test]
    fn scoop_counts_only_matter_when_multiplicity_sensitive() {
        let first = ice_cream(&[0, 0, 1]);
        let second = ice_cream(&[0, 1, 1]);

        assert_ne!(
            first.fingerprint(FingerprintPolicy::MultiplicitySensitive),
            second.fingerprint(FingerprintPolicy::MultiplicitySensitive)
        );
        assert_eq!(
            first.fingerprint(FingerprintPolicy::MultiplicityInsensitive),
            second.fingerprint(FingerprintPolicy::MultiplicityInsensitive)
        );
    }

    #[test]
    fn run_parameters_reject_zero_counts() {
        assert_eq!(RunParameters::new(0, 2), Err(UsageError::NoFlavors));
        assert_eq!(RunParameters::new(5, 0), Err(UsageError::NoScoops));

        let parameters = RunParameters::new(5, 2).expect("valid counts");
        assert_eq!(parameters.num_flavors(), 5);
        assert_eq!(parameters.num_scoops(), 2);
    }

    #[test]
    fn run_parameters_cap_the_scoop_count() {
        assert!(RunParameters::new(1, MAX_SCOOPS).is_ok());
        assert_eq!(
            RunParameters::new(1, MAX_SCOOPS + 1),
            Err(UsageError::TooManyScoops {
                requested: MAX_SCOOPS + 1,
                max: MAX_SCOOPS,
            })
        );
        assert!(matches!(
            RunParameters::new(1, u32::MAX),
            Err(UsageError::TooManyScoops { .. })
        ));
    }

    #[test]
    fn palette_lookup_is_bounded_by_flavor_count() {
        let palette = Palette::new(vec![
            FlavorColor::from_rgb(60, 70, 80),
            FlavorColor::from_rgb(200, 100, 50),
        ]);

        assert_eq!(
            palette.color(FlavorId::new(1)),
            Some(FlavorColor::from_rgb(200, 100, 50))
        );
        assert_eq!(palette.color(FlavorId::new(2)), None);
        assert_eq!(palette.iter().count(), 2);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn fingerprint_round_trips_through_bincode() {
        let fingerprint = ice_cream(&[2, 0, 2]).fingerprint(FingerprintPolicy::default());
        assert_round_trip(&fingerprint);
    }

    #[test]
    fn palette_round_trips_through_bincode() {
        let palette = Palette::new(vec![FlavorColor::from_rgb(50, 255, 128)]);
        assert_round_trip(&palette);
    }
}
