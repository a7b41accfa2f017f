#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure enumeration system that produces every distinct ice cream.
//!
//! [`Combinations`] walks the full Cartesian power of flavors one ice cream
//! at a time, [`UniqueIceCreams`] keeps the first ice cream seen for each
//! fingerprint, and [`Enumeration`] drives both to completion and checks the
//! result against the closed-form count.

use std::{collections::HashSet, iter::FusedIterator};

use icecream_core::{
    expected_unique_count, Fingerprint, FingerprintPolicy, FlavorId, IceCream, RunParameters,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    Fresh,
    Active,
    Exhausted,
}

/// Lazy iterator over all `num_flavors^num_scoops` ordered scoop sequences.
///
/// Sequences are produced in lexicographic order with the last scoop varying
/// fastest. Only the sequence under construction is held in memory. Cloning
/// the iterator forks it at its current position; [`Combinations::new`]
/// starts over.
#[derive(Clone, Debug)]
pub struct Combinations {
    num_flavors: u32,
    digits: Vec<u32>,
    cursor: Cursor,
    remaining: Option<u64>,
}

impl Combinations {
    /// Creates an iterator over every sequence of `num_scoops` flavors drawn
    /// from `num_flavors` flavors.
    ///
    /// Zero scoops yield a single empty sequence.
    #[must_use]
    pub fn new(num_flavors: u32, num_scoops: u32) -> Self {
        Self {
            num_flavors,
            digits: vec![0; num_scoops as usize],
            cursor: Cursor::Fresh,
            remaining: Self::total(num_flavors, num_scoops),
        }
    }

    /// Total number of sequences the iterator produces from the start, if it
    /// fits in a `u64`.
    #[must_use]
    pub fn total(num_flavors: u32, num_scoops: u32) -> Option<u64> {
        u64::from(num_flavors).checked_pow(num_scoops)
    }

    fn current(&self) -> IceCream {
        IceCream::new(self.digits.iter().copied().map(FlavorId::new).collect())
    }

    fn advance(&mut self) -> bool {
        for position in (0..self.digits.len()).rev() {
            if self.digits[position] + 1 < self.num_flavors {
                self.digits[position] += 1;
                for digit in &mut self.digits[position + 1..] {
                    *digit = 0;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = IceCream;

    fn next(&mut self) -> Option<IceCream> {
        match self.cursor {
            Cursor::Exhausted => return None,
            Cursor::Fresh => {
                if self.num_flavors == 0 && !self.digits.is_empty() {
                    self.cursor = Cursor::Exhausted;
                    return None;
                }
                self.cursor = Cursor::Active;
            }
            Cursor::Active => {
                if !self.advance() {
                    self.cursor = Cursor::Exhausted;
                    return None;
                }
            }
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        Some(self.current())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining.map(usize::try_from) {
            Some(Ok(remaining)) => (remaining, Some(remaining)),
            _ => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Combinations {}

/// Iterator adapter that yields the first ice cream seen for each fingerprint.
#[derive(Debug)]
pub struct UniqueIceCreams<I> {
    candidates: I,
    policy: FingerprintPolicy,
    seen: HashSet<Fingerprint>,
    examined: u64,
}

impl<I> UniqueIceCreams<I>
where
    I: Iterator<Item = IceCream>,
{
    /// Wraps `candidates`, deduplicating them under `policy`.
    #[must_use]
    pub fn new(candidates: I, policy: FingerprintPolicy) -> Self {
        Self {
            candidates,
            policy,
            seen: HashSet::new(),
            examined: 0,
        }
    }

    /// Number of candidates pulled from the underlying iterator so far.
    #[must_use]
    pub fn examined(&self) -> u64 {
        self.examined
    }

    /// Fingerprint policy applied by the filter.
    #[must_use]
    pub fn policy(&self) -> FingerprintPolicy {
        self.policy
    }
}

impl<I> Iterator for UniqueIceCreams<I>
where
    I: Iterator<Item = IceCream>,
{
    type Item = IceCream;

    fn next(&mut self) -> Option<IceCream> {
        for candidate in self.candidates.by_ref() {
            self.examined += 1;
            if self.seen.insert(candidate.fingerprint(self.policy)) {
                return Some(candidate);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.candidates.size_hint().1)
    }
}

/// Completed enumeration of the distinct ice creams for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumeration {
    policy: FingerprintPolicy,
    ice_creams: Vec<IceCream>,
    examined: u64,
    expected: u64,
}

impl Enumeration {
    /// Enumerates every distinct ice cream for validated run parameters.
    pub fn from_parameters(
        parameters: RunParameters,
        policy: FingerprintPolicy,
    ) -> Result<Self, ConsistencyError> {
        Self::run(parameters.num_flavors(), parameters.num_scoops(), policy)
    }

    /// Enumerates every distinct ice cream and cross-checks the count.
    ///
    /// Zero flavors or zero scoops produce an empty enumeration without
    /// running the generator. Any disagreement between the realized count and
    /// the closed form is reported as a [`ConsistencyError`].
    pub fn run(
        num_flavors: u32,
        num_scoops: u32,
        policy: FingerprintPolicy,
    ) -> Result<Self, ConsistencyError> {
        if num_flavors == 0 || num_scoops == 0 {
            return Ok(Self {
                policy,
                ice_creams: Vec::new(),
                examined: 0,
                expected: 0,
            });
        }

        let expected = expected_unique_count(policy, num_flavors, num_scoops).ok_or(
            ConsistencyError::ClosedFormOverflow {
                policy,
                num_flavors,
                num_scoops,
            },
        )?;

        Self::collect(
            Combinations::new(num_flavors, num_scoops),
            policy,
            expected,
        )
    }

    fn collect<I>(
        candidates: I,
        policy: FingerprintPolicy,
        expected: u64,
    ) -> Result<Self, ConsistencyError>
    where
        I: Iterator<Item = IceCream>,
    {
        let mut unique = UniqueIceCreams::new(candidates, policy);
        let ice_creams: Vec<IceCream> = unique.by_ref().collect();

        let realized = ice_creams.len() as u64;
        if realized != expected {
            return Err(ConsistencyError::CountMismatch {
                policy: unique.policy(),
                realized,
                expected,
            });
        }

        Ok(Self {
            policy: unique.policy(),
            ice_creams,
            examined: unique.examined(),
            expected,
        })
    }

    /// Distinct ice creams in first-seen order.
    #[must_use]
    pub fn ice_creams(&self) -> &[IceCream] {
        &self.ice_creams
    }

    /// Consumes the enumeration, yielding the distinct ice creams.
    #[must_use]
    pub fn into_ice_creams(self) -> Vec<IceCream> {
        self.ice_creams
    }

    /// Total number of candidate sequences examined.
    #[must_use]
    pub fn examined(&self) -> u64 {
        self.examined
    }

    /// Count predicted by the closed form.
    #[must_use]
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Fingerprint policy used for deduplication.
    #[must_use]
    pub fn policy(&self) -> FingerprintPolicy {
        self.policy
    }

    /// Number of distinct ice creams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ice_creams.len()
    }

    /// Reports whether no ice creams were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ice_creams.is_empty()
    }
}

/// Internal disagreement between enumeration and the closed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// The brute-force count differs from the closed-form prediction.
    #[error(
        "enumerated {realized} unique ice creams under {} but the closed form predicts {expected}",
        .policy.name()
    )]
    CountMismatch {
        /// Policy in effect.
        policy: FingerprintPolicy,
        /// Number of ice creams that survived the filter.
        realized: u64,
        /// Number predicted by the closed form.
        expected: u64,
    },
    /// The closed-form count does not fit in a `u64`.
    #[error(
        "closed-form count for {num_flavors} flavors and {num_scoops} scoops under {} overflows",
        .policy.name()
    )]
    ClosedFormOverflow {
        /// Policy in effect.
        policy: FingerprintPolicy,
        /// Requested flavor count.
        num_flavors: u32,
        /// Requested scoop count.
        num_scoops: u32,
    },
}
