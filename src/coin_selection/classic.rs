// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

use rand::RngCore;

use super::{insufficient_funds, Bucket, CoinChooser};
use crate::error::Error;
use crate::types::Coin;

/// Oldest-first coin selection
///
/// Every coin is its own bucket. Buckets are picked starting from the oldest ones until the
/// required amount is reached, then the ones that are not needed are removed starting with the
/// smallest in value. Unconfirmed coins are considered the youngest.
///
/// This chooser is deterministic and never uses the random number generator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassicCoinChooser;

impl CoinChooser for ClassicCoinChooser {
    fn bucket_key(&self, coin: &Coin) -> String {
        coin.outpoint.to_string()
    }

    fn choose_buckets<'a, R: RngCore>(
        &self,
        mut buckets: Vec<Bucket<'a>>,
        spend_amount: u64,
        fee: &dyn Fn(usize) -> u64,
        _: &mut R,
    ) -> Result<Vec<Bucket<'a>>, Error> {
        // stable, so buckets of the same height keep their order
        buckets.sort_by_key(Bucket::max_height);

        let mut value = 0;
        let mut size = 0;
        let mut count = 0;
        for bucket in &buckets {
            value += bucket.value();
            size += bucket.size();
            count += 1;
            if value >= spend_amount + fee(size) {
                break;
            }
        }

        if value < spend_amount + fee(size) {
            return Err(insufficient_funds(&buckets, spend_amount, fee));
        }

        buckets.truncate(count);
        buckets.sort_by_key(Bucket::value);

        // Remove unneeded buckets starting with the smallest
        let mut selected = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            if value - bucket.value() >= spend_amount + fee(size - bucket.size()) {
                log::debug!("Dropping unneeded bucket {}", bucket);
                value -= bucket.value();
                size -= bucket.size();
            } else {
                selected.push(bucket);
            }
        }

        Ok(selected)
    }
}
