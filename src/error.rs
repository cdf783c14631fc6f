// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

use std::fmt;

/// Errors that can be returned while choosing coins and assembling a draft transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The available coins are not enough to cover the requested outputs plus fee
    InsufficientFunds {
        /// Sats needed for the transaction, fee at the tried size included
        needed: u64,
        /// Sats available for spending
        available: u64,
    },
    /// No change script was provided
    NoChangeScript,
    /// The name of a coin chooser couldn't be parsed
    UnknownCoinChooser(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds { needed, available } => write!(
                f,
                "Insufficient funds: {} sat available of {} sat needed",
                available, needed
            ),
            Self::NoChangeScript => write!(f, "At least one change script is required"),
            Self::UnknownCoinChooser(name) => write!(f, "Unknown coin chooser: `{}`", name),
        }
    }
}

impl std::error::Error for Error {}
