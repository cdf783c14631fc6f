// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

use bitcoin::blockdata::constants::COIN_VALUE;
use bitcoin::hashes::hex::ToHex;
use rand::RngCore;

use super::{random, Bucket, CoinChooser};
use crate::error::Error;
use crate::types::Coin;

/// Coin selection that tries to leak less information about the sender
///
/// First, if any coin is spent from an address, all the coins of that address are: compared to
/// spending from other addresses to make up an amount, this reduces information leakage about
/// the sender's holdings, reduces UTXO bloat, and avoids the privacy loss that would come from
/// later reusing the address' remaining coins.
///
/// Among the random candidates from [`random::bucket_candidates`], the winner is the one with the
/// lowest [`penalty`](PrivacyCoinChooser::penalty): each extra bucket costs one point, change
/// that is not roughly equal to the spent amount is penalized, and so is large change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyCoinChooser;

impl PrivacyCoinChooser {
    /// Penalty of a candidate set of buckets, lower is better
    pub fn penalty(&self, buckets: &[&Bucket<'_>], spend_amount: u64) -> f64 {
        let mut badness = buckets.len().saturating_sub(1) as f64;
        let total_input: u64 = buckets.iter().map(|b| b.value()).sum();
        let change = total_input as f64 - spend_amount as f64;
        let spend = spend_amount as f64;

        // Penalize change not roughly equal to the spent amount
        if change < spend * 0.75 || change > spend * 1.33 {
            badness += change / (spend + 10_000.0);
        }
        // Penalize large change; 5 BTC excess ~= using 1 more input
        badness += change / (COIN_VALUE as f64 * 5.0);

        badness
    }
}

impl CoinChooser for PrivacyCoinChooser {
    fn bucket_key(&self, coin: &Coin) -> String {
        coin.script_pubkey.as_bytes().to_hex()
    }

    fn choose_buckets<'a, R: RngCore>(
        &self,
        buckets: Vec<Bucket<'a>>,
        spend_amount: u64,
        fee: &dyn Fn(usize) -> u64,
        rng: &mut R,
    ) -> Result<Vec<Bucket<'a>>, Error> {
        random::choose_by_penalty(buckets, spend_amount, fee, rng, |set, spend_amount| {
            self.penalty(set, spend_amount)
        })
    }
}
