// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Randomized bucket selection
//!
//! These helpers generate candidate sets of buckets by drawing random permutations and keeping
//! the shortest sufficient prefix of each, then pick the candidate with the lowest penalty. They
//! don't form a [`CoinChooser`](super::CoinChooser) on their own: a chooser such as
//! [`PrivacyCoinChooser`](super::PrivacyCoinChooser) provides the bucket key and the penalty.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;

use super::{insufficient_funds, Bucket};
use crate::error::Error;

/// Upper bound on the number of random permutations tried
pub const MAX_TRIALS: usize = 100;

/// Number of random permutations tried for `bucket_count` buckets
pub fn max_trials(bucket_count: usize) -> usize {
    match bucket_count {
        0 => 0,
        n => std::cmp::min(MAX_TRIALS, (n - 1) * 10 + 1),
    }
}

/// Candidate sets of buckets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Candidates {
    /// Sorted bucket indexes of every candidate, without duplicates, in the order they were found
    pub sets: Vec<Vec<usize>>,
    /// Number of random permutations that were drawn
    pub trials: usize,
}

/// Generate candidate sets of buckets that satisfy `is_sufficient`
///
/// Every sufficient single bucket is a candidate. Then, for up to [`max_trials`] rounds, the
/// buckets are shuffled and added one at a time until they are sufficient.
///
/// Returns `None` if a permutation is exhausted before becoming sufficient, which means that not
/// even all the buckets together are enough.
pub fn bucket_candidates<R, F>(
    buckets: &[Bucket<'_>],
    is_sufficient: F,
    rng: &mut R,
) -> Option<Candidates>
where
    R: RngCore,
    F: Fn(&[&Bucket<'_>]) -> bool,
{
    let mut seen = HashSet::new();
    let mut candidates = Candidates::default();

    let mut push = |set: Vec<usize>, candidates: &mut Candidates| {
        if seen.insert(set.clone()) {
            candidates.sets.push(set);
        }
    };

    for (n, bucket) in buckets.iter().enumerate() {
        if is_sufficient(&[bucket][..]) {
            push(vec![n], &mut candidates);
        }
    }

    let mut permutation = (0..buckets.len()).collect::<Vec<_>>();
    for _ in 0..max_trials(buckets.len()) {
        permutation.shuffle(rng);
        candidates.trials += 1;

        let mut chosen = Vec::with_capacity(buckets.len());
        let mut found = false;
        for (count, &index) in permutation.iter().enumerate() {
            chosen.push(&buckets[index]);
            if is_sufficient(&chosen[..]) {
                let mut set = permutation[..=count].to_vec();
                set.sort_unstable();
                push(set, &mut candidates);
                found = true;
                break;
            }
        }

        if !found {
            return None;
        }
    }

    Some(candidates)
}

/// Choose the candidate set of buckets with the lowest `penalty`
///
/// A set is sufficient if its value covers `spend_amount` plus `fee` for its size. On equal
/// penalties the candidate found first wins.
pub fn choose_by_penalty<'a, R, P>(
    buckets: Vec<Bucket<'a>>,
    spend_amount: u64,
    fee: &dyn Fn(usize) -> u64,
    rng: &mut R,
    penalty: P,
) -> Result<Vec<Bucket<'a>>, Error>
where
    R: RngCore,
    P: Fn(&[&Bucket<'a>], u64) -> f64,
{
    let sufficient = |set: &[&Bucket<'_>]| {
        let value: u64 = set.iter().map(|b| b.value()).sum();
        let size: usize = set.iter().map(|b| b.size()).sum();
        value >= spend_amount + fee(size)
    };

    let all = buckets.iter().collect::<Vec<_>>();
    if !sufficient(&all[..]) {
        return Err(insufficient_funds(&buckets, spend_amount, fee));
    }

    let candidates = bucket_candidates(&buckets, sufficient, rng)
        .ok_or_else(|| insufficient_funds(&buckets, spend_amount, fee))?;
    log::debug!(
        "Bucket sets: {} from {} buckets",
        candidates.sets.len(),
        buckets.len()
    );

    let mut winner: Option<(f64, &Vec<usize>)> = None;
    for set in &candidates.sets {
        let members = set.iter().map(|&i| &buckets[i]).collect::<Vec<_>>();
        let score = penalty(&members[..], spend_amount);
        match winner {
            Some((best, _)) if best <= score => {}
            _ => winner = Some((score, set)),
        }
    }

    let (score, set) = match winner {
        Some(w) => w,
        // only reachable when there are no buckets and nothing to pay
        None => return Ok(vec![]),
    };
    log::debug!("Winning penalty: {}", score);

    let set = set.iter().copied().collect::<HashSet<_>>();
    Ok(buckets
        .into_iter()
        .enumerate()
        .filter_map(|(i, b)| if set.contains(&i) { Some(b) } else { None })
        .collect())
}
