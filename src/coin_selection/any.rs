// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Runtime-checked coin choosers
//!
//! [`AnyCoinChooser`] allows switching the [`CoinChooser`] at runtime, for instance from a wallet
//! setting:
//!
//! ```
//! # use bdk_coin_chooser::coin_selection::*;
//! let config: CoinChooserConfig = serde_json::from_str(r#""classic""#)?;
//! let chooser = AnyCoinChooser::from_config(&config);
//! assert_eq!(chooser, AnyCoinChooser::Classic(ClassicCoinChooser));
//!
//! let chooser: AnyCoinChooser = "Privacy".parse()?;
//! assert_eq!(chooser, AnyCoinChooser::Privacy(PrivacyCoinChooser));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{Bucket, ClassicCoinChooser, CoinChooser, PrivacyCoinChooser};
use crate::error::Error;
use crate::types::Coin;

macro_rules! impl_from {
    ( $from:ty, $to:ty, $variant:ident ) => {
        impl From<$from> for $to {
            fn from(inner: $from) -> Self {
                <$to>::$variant(inner)
            }
        }
    };
}

macro_rules! impl_inner_method {
    ( $enum_name:ident, $self:expr, $name:ident $(, $args:expr)* ) => {
        match $self {
            $enum_name::Classic(inner) => inner.$name( $($args, )* ),
            $enum_name::Privacy(inner) => inner.$name( $($args, )* ),
        }
    }
}

/// Type that can contain any of the [`CoinChooser`] types defined by the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyCoinChooser {
    /// Oldest-first deterministic selection
    Classic(ClassicCoinChooser),
    /// Address-grouping randomized selection
    Privacy(PrivacyCoinChooser),
}

impl_from!(ClassicCoinChooser, AnyCoinChooser, Classic);
impl_from!(PrivacyCoinChooser, AnyCoinChooser, Privacy);

impl Default for AnyCoinChooser {
    fn default() -> Self {
        AnyCoinChooser::Privacy(PrivacyCoinChooser)
    }
}

impl AnyCoinChooser {
    /// Build the chooser described by `config`
    pub fn from_config(config: &CoinChooserConfig) -> Self {
        match config {
            CoinChooserConfig::Classic => ClassicCoinChooser.into(),
            CoinChooserConfig::Privacy => PrivacyCoinChooser.into(),
        }
    }
}

impl FromStr for AnyCoinChooser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(ClassicCoinChooser.into()),
            "privacy" => Ok(PrivacyCoinChooser.into()),
            _ => Err(Error::UnknownCoinChooser(s.to_string())),
        }
    }
}

impl CoinChooser for AnyCoinChooser {
    fn bucket_key(&self, coin: &Coin) -> String {
        impl_inner_method!(AnyCoinChooser, self, bucket_key, coin)
    }

    fn choose_buckets<'a, R: RngCore>(
        &self,
        buckets: Vec<Bucket<'a>>,
        spend_amount: u64,
        fee: &dyn Fn(usize) -> u64,
        rng: &mut R,
    ) -> Result<Vec<Bucket<'a>>, Error> {
        impl_inner_method!(
            AnyCoinChooser,
            self,
            choose_buckets,
            buckets,
            spend_amount,
            fee,
            rng
        )
    }
}

/// Configuration for an [`AnyCoinChooser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinChooserConfig {
    /// Use [`ClassicCoinChooser`]
    Classic,
    /// Use [`PrivacyCoinChooser`]
    Privacy,
}

impl Default for CoinChooserConfig {
    fn default() -> Self {
        CoinChooserConfig::Privacy
    }
}
