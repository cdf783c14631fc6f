// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

// only enables the `doc_cfg` feature when
// the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Bucketed coin selection for bitcoin wallets.
//!
//! Given the coins a wallet can spend, a list of payments, a fee estimator and a dust threshold,
//! this library picks a set of coins that pays for everything and decides whether a change
//! output is worth creating. The result is a [`DraftTransaction`] that still has to be signed.
//!
//! Coins are grouped into buckets that are spent as a whole; how they are grouped and which
//! buckets are picked is up to the [`CoinChooser`](coin_selection::CoinChooser):
//!
//! - [`ClassicCoinChooser`](coin_selection::ClassicCoinChooser) spends the oldest coins first and
//!   then drops the ones that are not needed;
//! - [`PrivacyCoinChooser`](coin_selection::PrivacyCoinChooser) spends all the coins of an
//!   address together and picks, among random candidates, the one with the least linkable change.
//!
//! See [`TxBuilder`] for an example.

pub extern crate bitcoin;
extern crate log;
pub extern crate rand;
extern crate serde;

pub mod assembler;
pub mod coin_selection;
pub(crate) mod error;
pub mod tx_builder;
pub(crate) mod types;

pub use assembler::make_tx;
pub use error::Error;
pub use tx_builder::{FeeEstimator, TxBuilder};
pub use types::*;
