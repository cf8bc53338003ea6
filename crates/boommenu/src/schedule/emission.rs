use crate::error::{BoomError, Result};
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Order in which item entrances are staggered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EmissionOrder {
    #[strum(to_string = "sequential", serialize = "natural")]
    Sequential,
    #[strum(to_string = "reversed", serialize = "reverse")]
    Reversed,
    #[default]
    #[strum(to_string = "randomized", serialize = "random")]
    Randomized,
}

impl EmissionOrder {
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map_err(|_| BoomError::InvalidEmissionOrder(s.to_string()))
    }
}

/// Start delay of each of `n` items, indexed by item.
///
/// Whatever the order, the delays are exactly the slots
/// `start + between * k` for `k` in `0..n`, each used once.
pub fn start_delays(
    n: usize,
    order: EmissionOrder,
    start: Duration,
    between: Duration,
    rng: &mut dyn RngCore,
) -> Vec<Duration> {
    let slot = |k: usize| start + between.saturating_mul(k as u32);

    match order {
        EmissionOrder::Sequential => (0..n).map(slot).collect(),
        EmissionOrder::Reversed => (0..n).map(|i| slot(n - 1 - i)).collect(),
        EmissionOrder::Randomized => {
            let mut permutation: Vec<usize> = (0..n).collect();
            permutation.shuffle(rng);

            let mut delays = vec![Duration::ZERO; n];
            for (k, &item) in permutation.iter().enumerate() {
                delays[item] = slot(k);
            }
            delays
        }
    }
}
