// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Transaction builder
//!
//! ## Example
//!
//! ```
//! # use std::str::FromStr;
//! # use bitcoin::*;
//! # use bdk_coin_chooser::*;
//! # use bdk_coin_chooser::coin_selection::ClassicCoinChooser;
//! let to_address = Address::from_str("2N4eQYCbKUHCCTUjBJeHcJp9ok6J2GZsTDt").unwrap();
//! let change_address = Address::from_str("mkHS9ne12qx9pS9VojpwU5xtRd4T7X7ZUt").unwrap();
//! let coin = Coin::new(
//!     OutPoint::from_str("ebd9813ecebc57ff8f30797de7c205e3c7498ca950ea4341ee51a685ff2fa30a:0")?,
//!     100_000,
//!     Some(650_000),
//!     change_address.script_pubkey(),
//! );
//!
//! let (draft, details) = TxBuilder::with_recipients(vec![(to_address.script_pubkey(), 50_000)])
//!     .add_change_script(change_address.script_pubkey())
//!     .fee_rate(FeeRate::from_sat_per_vb(5.0))
//!     .coin_selection(ClassicCoinChooser)
//!     .make_tx(&[coin])?;
//!
//! assert_eq!(draft.inputs.len(), 1);
//! assert!(details.change.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::sync::Arc;

use bitcoin::{Script, TxOut};
use rand::RngCore;

use crate::assembler;
use crate::coin_selection::{CoinChooser, DefaultCoinChooser};
use crate::error::Error;
use crate::types::{Coin, DraftTransaction, FeeRate, SelectionDetails};

// De-facto standard "dust limit" (even though it should change based on the output type)
const DUST_LIMIT_SATOSHI: u64 = 546;

/// Source of the fee for a transaction of a given size
#[derive(Clone)]
pub enum FeeEstimator {
    /// Fixed fee rate
    Rate(FeeRate),
    /// Caller-provided function from size in bytes to fee in satoshi
    Custom(Arc<dyn Fn(usize) -> u64 + Send + Sync>),
}

impl FeeEstimator {
    /// Create a [`FeeEstimator::Custom`] from a function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize) -> u64 + Send + Sync + 'static,
    {
        FeeEstimator::Custom(Arc::new(f))
    }

    /// Fee for a transaction of `size` bytes
    pub fn fee_for_size(&self, size: usize) -> u64 {
        match self {
            FeeEstimator::Rate(rate) => rate.fee_for_size(size),
            FeeEstimator::Custom(f) => f(size),
        }
    }
}

impl Default for FeeEstimator {
    fn default() -> Self {
        FeeEstimator::Rate(FeeRate::default())
    }
}

impl fmt::Debug for FeeEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeEstimator::Rate(rate) => f.debug_tuple("Rate").field(rate).finish(),
            FeeEstimator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Parameters for [`assembler::make_tx`]
#[derive(Debug, Clone)]
pub struct TxBuilder<Cs: CoinChooser = DefaultCoinChooser> {
    pub(crate) recipients: Vec<(Script, u64)>,
    pub(crate) change_scripts: Vec<Script>,
    pub(crate) fee_estimator: FeeEstimator,
    pub(crate) dust_threshold: u64,
    pub(crate) coin_selection: Cs,
}

impl<Cs: CoinChooser + Default> Default for TxBuilder<Cs> {
    fn default() -> Self {
        TxBuilder {
            recipients: vec![],
            change_scripts: vec![],
            fee_estimator: FeeEstimator::default(),
            dust_threshold: DUST_LIMIT_SATOSHI,
            coin_selection: Cs::default(),
        }
    }
}

impl TxBuilder<DefaultCoinChooser> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder starting from a list of recipients
    pub fn with_recipients(recipients: Vec<(Script, u64)>) -> Self {
        Self::default().set_recipients(recipients)
    }
}

impl<Cs: CoinChooser> TxBuilder<Cs> {
    /// Replace the recipients already added with a new list
    pub fn set_recipients(mut self, recipients: Vec<(Script, u64)>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Add a recipient to the internal list
    pub fn add_recipient(mut self, script_pubkey: Script, amount: u64) -> Self {
        self.recipients.push((script_pubkey, amount));
        self
    }

    /// Add a script change can be sent to
    ///
    /// Only the first change script is used.
    pub fn add_change_script(mut self, script_pubkey: Script) -> Self {
        self.change_scripts.push(script_pubkey);
        self
    }

    /// Set a custom fee rate
    pub fn fee_rate(mut self, fee_rate: FeeRate) -> Self {
        self.fee_estimator = FeeEstimator::Rate(fee_rate);
        self
    }

    /// Set a custom fee estimator
    pub fn fee_estimator(mut self, fee_estimator: FeeEstimator) -> Self {
        self.fee_estimator = fee_estimator;
        self
    }

    /// Set the value at or below which change is not created
    pub fn dust_threshold(mut self, dust_threshold: u64) -> Self {
        self.dust_threshold = dust_threshold;
        self
    }

    /// Choose the coin selection algorithm
    ///
    /// Overrides the [`DefaultCoinChooser`](crate::coin_selection::DefaultCoinChooser).
    pub fn coin_selection<P: CoinChooser>(self, coin_selection: P) -> TxBuilder<P> {
        TxBuilder {
            recipients: self.recipients,
            change_scripts: self.change_scripts,
            fee_estimator: self.fee_estimator,
            dust_threshold: self.dust_threshold,
            coin_selection,
        }
    }

    /// Select from `coins` and build a draft transaction, using the thread-local random number
    /// generator
    pub fn make_tx(&self, coins: &[Coin]) -> Result<(DraftTransaction, SelectionDetails), Error> {
        self.make_tx_with_rng(coins, &mut rand::thread_rng())
    }

    /// Select from `coins` and build a draft transaction
    pub fn make_tx_with_rng<R: RngCore>(
        &self,
        coins: &[Coin],
        rng: &mut R,
    ) -> Result<(DraftTransaction, SelectionDetails), Error> {
        let outputs = self
            .recipients
            .iter()
            .map(|(script_pubkey, value)| TxOut {
                value: *value,
                script_pubkey: script_pubkey.clone(),
            })
            .collect::<Vec<_>>();

        assembler::make_tx(
            &self.coin_selection,
            coins,
            &outputs,
            &self.change_scripts,
            &|size| self.fee_estimator.fee_for_size(size),
            self.dust_threshold,
            rng,
        )
    }
}
