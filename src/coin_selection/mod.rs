// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Coin selection
//!
//! This module provides the trait [`CoinChooser`] that can be implemented to define custom coin
//! selection strategies.
//!
//! Coins are never chosen one by one: they are first grouped into [`Bucket`]s by the chooser's
//! [`bucket_key`](CoinChooser::bucket_key), and a bucket is either spent entirely or not at all.
//! The chooser then picks a subset of buckets that covers the amount being spent plus the fee
//! for the size of the inputs it adds.
//!
//! The coin chooser is selected through the [`coin_selection`] method on [`TxBuilder`].
//! [`DefaultCoinChooser`] aliases the chooser used if it is not explicitly set.
//!
//! [`TxBuilder`]: crate::tx_builder::TxBuilder
//! [`coin_selection`]: crate::tx_builder::TxBuilder::coin_selection
//!
//! ## Example
//!
//! ```
//! # use bdk_coin_chooser::coin_selection::*;
//! # use bdk_coin_chooser::{Coin, Error};
//! # use rand::RngCore;
//! /// Spends every bucket, the largest ones first
//! #[derive(Debug)]
//! struct AlwaysSpendEverything;
//!
//! impl CoinChooser for AlwaysSpendEverything {
//!     fn bucket_key(&self, coin: &Coin) -> String {
//!         coin.outpoint.to_string()
//!     }
//!
//!     fn choose_buckets<'a, R: RngCore>(
//!         &self,
//!         mut buckets: Vec<Bucket<'a>>,
//!         spend_amount: u64,
//!         fee: &dyn Fn(usize) -> u64,
//!         _rng: &mut R,
//!     ) -> Result<Vec<Bucket<'a>>, Error> {
//!         buckets.sort_by_key(|b| std::cmp::Reverse(b.value()));
//!         let (value, size) = totals(&buckets);
//!         if value < spend_amount + fee(size) {
//!             return Err(Error::InsufficientFunds {
//!                 needed: spend_amount + fee(size),
//!                 available: value,
//!             });
//!         }
//!
//!         Ok(buckets)
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use rand::RngCore;

use crate::error::Error;
use crate::types::Coin;

mod any;
mod classic;
mod privacy;
pub mod random;

pub use any::{AnyCoinChooser, CoinChooserConfig};
pub use classic::ClassicCoinChooser;
pub use privacy::PrivacyCoinChooser;

/// Default coin chooser used by [`TxBuilder`](crate::tx_builder::TxBuilder) if not overridden
pub type DefaultCoinChooser = PrivacyCoinChooser;

/// A group of coins that are always spent together
///
/// `size` and `value` are computed once from the coins when the bucket is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<'a> {
    desc: String,
    size: usize,
    value: u64,
    coins: Vec<&'a Coin>,
}

impl<'a> Bucket<'a> {
    /// Create a bucket, summing the estimated input size and value of `coins`
    pub fn new(desc: String, coins: Vec<&'a Coin>) -> Self {
        let size = coins.iter().map(|c| c.estimated_input_size()).sum();
        let value = coins.iter().map(|c| c.value).sum();

        Bucket {
            desc,
            size,
            value,
            coins,
        }
    }

    /// Grouping key the bucket was created for
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Estimated size in bytes of all the inputs spending this bucket
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total value in satoshi
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The coins in this bucket
    pub fn coins(&self) -> &[&'a Coin] {
        &self.coins
    }

    /// Oldest-first ordering key: the height of the youngest coin, unconfirmed coins last
    pub(crate) fn max_height(&self) -> u32 {
        self.coins
            .iter()
            .map(|c| c.height.unwrap_or(u32::MAX))
            .max()
            .unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Bucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} coins, {} sat, {} bytes)",
            self.desc,
            self.coins.len(),
            self.value,
            self.size
        )
    }
}

/// Total value and size of a list of buckets
pub fn totals(buckets: &[Bucket<'_>]) -> (u64, usize) {
    buckets
        .iter()
        .fold((0, 0), |(value, size), b| (value + b.value, size + b.size))
}

/// Group `coins` into buckets by `key`
///
/// Buckets are returned in the order their key first appears in `coins`, and each bucket keeps
/// its coins in the order they were given.
pub fn bucketize<'a, F>(coins: &'a [Coin], key: F) -> Vec<Bucket<'a>>
where
    F: Fn(&Coin) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Coin>)> = Vec::new();

    for coin in coins {
        let k = key(coin);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(coin),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![coin]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(desc, coins)| Bucket::new(desc, coins))
        .collect()
}

/// Trait for coin selection strategies working on buckets
///
/// This trait can be implemented to make [`make_tx`](crate::assembler::make_tx) use a customized
/// strategy when it assembles transactions.
///
/// For an example see [this module](crate::coin_selection)'s documentation.
pub trait CoinChooser: fmt::Debug {
    /// Key used to group coins into buckets
    ///
    /// Coins sharing a key end up in the same bucket and are spent together.
    fn bucket_key(&self, coin: &Coin) -> String;

    /// Choose a subset of `buckets`
    ///
    /// - `buckets`: the available buckets
    /// - `spend_amount`: the total value of the outputs being paid
    /// - `fee`: fee required given the total size of the chosen inputs; the size of the rest of
    ///          the transaction is already accounted for
    /// - `rng`: random number generator, used by randomized strategies
    ///
    /// The returned buckets must satisfy `value >= spend_amount + fee(size)`, otherwise
    /// [`Error::InsufficientFunds`] is returned.
    fn choose_buckets<'a, R: RngCore>(
        &self,
        buckets: Vec<Bucket<'a>>,
        spend_amount: u64,
        fee: &dyn Fn(usize) -> u64,
        rng: &mut R,
    ) -> Result<Vec<Bucket<'a>>, Error>;

    /// Group `coins` into buckets using [`bucket_key`](CoinChooser::bucket_key)
    fn bucketize<'a>(&self, coins: &'a [Coin]) -> Vec<Bucket<'a>> {
        bucketize(coins, |c| self.bucket_key(c))
    }
}

/// Error for a set of buckets that, all spent together, can't pay for `spend_amount`
pub(crate) fn insufficient_funds(
    buckets: &[Bucket<'_>],
    spend_amount: u64,
    fee: &dyn Fn(usize) -> u64,
) -> Error {
    let (value, size) = totals(buckets);
    Error::InsufficientFunds {
        needed: spend_amount + fee(size),
        available: value,
    }
}
