// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

use bitcoin::consensus::encode::{serialize, VarInt};
use bitcoin::{OutPoint, Script, Transaction, TxIn, TxOut};

use serde::{Deserialize, Serialize};

// sig len (1) + sig and sighash (72) + pubkey len (1) + compressed pubkey (33)
pub(crate) const P2PKH_SATISFACTION_SIZE: usize = 1 + 72 + 1 + 33;

/// Fee rate
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
// Internally stored as satoshi/vbyte
pub struct FeeRate(f32);

impl FeeRate {
    /// Create a new instance of [`FeeRate`] given a float fee rate in btc/kvbytes
    pub fn from_btc_per_kvb(btc_per_kvb: f32) -> Self {
        FeeRate(btc_per_kvb * 1e5)
    }

    /// Create a new instance of [`FeeRate`] given a float fee rate in satoshi/vbyte
    pub const fn from_sat_per_vb(sat_per_vb: f32) -> Self {
        FeeRate(sat_per_vb)
    }

    /// Create a new [`FeeRate`] with the default min relay fee value
    pub const fn default_min_relay_fee() -> Self {
        FeeRate(1.0)
    }

    /// Return the value as satoshi/vbyte
    pub fn as_sat_vb(&self) -> f32 {
        self.0
    }

    /// Fee in satoshi for a transaction of `size` bytes, rounded up
    pub fn fee_for_size(&self, size: usize) -> u64 {
        (size as f32 * self.0).ceil() as u64
    }
}

impl std::default::Default for FeeRate {
    fn default() -> Self {
        FeeRate::default_min_relay_fee()
    }
}

/// An unspent output the caller is willing to spend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    /// Reference to the transaction output being spent
    pub outpoint: OutPoint,
    /// Value in satoshi
    pub value: u64,
    /// Confirmed in block height, `None` means unconfirmed
    pub height: Option<u32>,
    /// Script of the address that owns the coin
    pub script_pubkey: Script,
    /// Size in bytes of the `scriptSig` and witness data needed to spend the coin
    pub satisfaction_size: usize,
}

impl Coin {
    /// Create a coin spent with a P2PKH-sized satisfaction
    pub fn new(outpoint: OutPoint, value: u64, height: Option<u32>, script_pubkey: Script) -> Self {
        Coin {
            outpoint,
            value,
            height,
            script_pubkey,
            satisfaction_size: P2PKH_SATISFACTION_SIZE,
        }
    }

    /// Override the satisfaction size
    pub fn with_satisfaction_size(mut self, satisfaction_size: usize) -> Self {
        self.satisfaction_size = satisfaction_size;
        self
    }

    /// Estimated size in bytes of the input spending this coin, once signed
    pub fn estimated_input_size(&self) -> usize {
        serialize(&self.to_unsigned_txin()).len() + self.satisfaction_size
    }

    fn to_unsigned_txin(&self) -> TxIn {
        TxIn {
            previous_output: self.outpoint,
            script_sig: Script::default(),
            sequence: 0xFFFFFFFF,
            witness: vec![],
        }
    }
}

/// Estimated size of a transaction with the given outputs and no inputs
///
/// version (4) + input count (1) + output count + outputs + locktime (4)
pub(crate) fn estimated_base_size(outputs: &[TxOut]) -> usize {
    4 + 1
        + serialize(&VarInt(outputs.len() as u64)).len()
        + outputs.iter().map(|o| serialize(o).len()).sum::<usize>()
        + 4
}

/// A transaction that still has to be signed
///
/// Inputs are kept in selection order. If a change output was created it is the last output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftTransaction {
    /// Coins spent by the transaction
    pub inputs: Vec<Coin>,
    /// Requested payments, followed by the change output if any
    pub outputs: Vec<TxOut>,
}

impl DraftTransaction {
    /// Sum of the inputs' value
    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|c| c.value).sum()
    }

    /// Sum of the outputs' value
    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Fee paid by the transaction, dust absorbed from the change included
    pub fn fee(&self) -> u64 {
        self.input_total().saturating_sub(self.output_total())
    }

    /// Estimated size of the transaction once every input is signed
    pub fn estimated_size(&self) -> usize {
        estimated_base_size(&self.outputs)
            + self
                .inputs
                .iter()
                .map(Coin::estimated_input_size)
                .sum::<usize>()
    }

    /// Build the unsigned transaction handed to the signer
    pub fn to_unsigned_tx(&self) -> Transaction {
        Transaction {
            version: 1,
            lock_time: 0,
            input: self.inputs.iter().map(Coin::to_unsigned_txin).collect(),
            output: self.outputs.clone(),
        }
    }
}

/// What happened while building a [`DraftTransaction`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SelectionDetails {
    /// Description of every chosen bucket
    pub bucket_descriptions: Vec<String>,
    /// Number of inputs in the draft
    pub input_count: usize,
    /// Sum of the selected coins' value
    pub input_total: u64,
    /// Sum of the requested outputs' value
    pub output_total: u64,
    /// Fee paid, absorbed dust included
    pub fee: u64,
    /// Value of the change output, `None` if it was not created
    pub change: Option<u64>,
    /// Leftover below the dust threshold that was added to the fee
    pub absorbed_dust: u64,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    fn coin(value: u64) -> Coin {
        Coin::new(
            OutPoint::from_str(
                "ebd9813ecebc57ff8f30797de7c205e3c7498ca950ea4341ee51a685ff2fa30a:0",
            )
            .unwrap(),
            value,
            Some(100),
            Script::from(vec![0x00, 0x14]),
        )
    }

    #[test]
    fn can_store_feerate_in_const() {
        const _MY_RATE: FeeRate = FeeRate::from_sat_per_vb(10.0);
        const _MIN_RELAY: FeeRate = FeeRate::default_min_relay_fee();
    }

    #[test]
    fn test_fee_from_btc_per_kb() {
        let fee = FeeRate::from_btc_per_kvb(1e-5);
        assert!((fee.as_sat_vb() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_fee_for_size_rounds_up() {
        assert_eq!(FeeRate::from_sat_per_vb(1.5).fee_for_size(3), 5);
        assert_eq!(FeeRate::from_sat_per_vb(2.0).fee_for_size(100), 200);
        assert_eq!(FeeRate::default().fee_for_size(0), 0);
    }

    #[test]
    fn test_p2pkh_input_size() {
        // outpoint (36) + script len (1) + sequence (4) + satisfaction (107)
        assert_eq!(coin(1_000).estimated_input_size(), 148);
        assert_eq!(
            coin(1_000).with_satisfaction_size(0).estimated_input_size(),
            41
        );
    }

    #[test]
    fn test_base_size() {
        assert_eq!(estimated_base_size(&[]), 10);

        let output = TxOut {
            value: 50_000,
            script_pubkey: Script::from(vec![0xAA; 25]),
        };
        // value (8) + script len (1) + script (25)
        assert_eq!(estimated_base_size(&[output]), 10 + 34);
    }

    #[test]
    fn test_draft_totals() {
        let draft = DraftTransaction {
            inputs: vec![coin(70_000), coin(30_000)],
            outputs: vec![TxOut {
                value: 90_000,
                script_pubkey: Script::new(),
            }],
        };

        assert_eq!(draft.input_total(), 100_000);
        assert_eq!(draft.output_total(), 90_000);
        assert_eq!(draft.fee(), 10_000);

        let tx = draft.to_unsigned_tx();
        assert_eq!(tx.input.len(), 2);
        assert_eq!(tx.output, draft.outputs);
        assert!(tx.input.iter().all(|txin| txin.script_sig.is_empty()));
    }
}
