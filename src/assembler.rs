// Bitcoin Dev Kit
//
// Copyright (c) 2020-2021 Bitcoin Dev Kit Developers
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your option.
// You may not use this file except in accordance with one or both of these
// licenses.

//! Draft transaction assembly
//!
//! [`make_tx`] runs the fee feedback loop: the fee depends on the size of the inputs, which
//! depends on which buckets the [`CoinChooser`] picks, which depends on the fee.

use bitcoin::{Script, TxOut};
use rand::RngCore;

use crate::coin_selection::{totals, CoinChooser};
use crate::error::Error;
use crate::types::{estimated_base_size, Coin, DraftTransaction, SelectionDetails};

/// Serialized size of a pay-to-address change output
///
/// value (8) + script len (1) + P2PKH script (25)
pub const CHANGE_OUTPUT_SIZE: usize = 34;

/// Select coins to pay `outputs` and build a draft transaction
///
/// - `coin_chooser`: strategy that groups `coins` into buckets and picks some of them
/// - `coins`: the coins available for spending
/// - `outputs`: the requested payments
/// - `change_scripts`: where change can be sent, only the first one is used
/// - `fee_estimator`: fee required for a transaction of the given size in bytes
/// - `dust_threshold`: change at or below this value is not created and is paid as fee instead
/// - `rng`: random number generator for randomized coin choosers
///
/// If the change is greater than `dust_threshold`, after paying for the change output itself, it
/// is sent to the first change script as the last output. On failure nothing is returned.
#[allow(clippy::too_many_arguments)]
pub fn make_tx<Cs: CoinChooser, R: RngCore>(
    coin_chooser: &Cs,
    coins: &[Coin],
    outputs: &[TxOut],
    change_scripts: &[Script],
    fee_estimator: &dyn Fn(usize) -> u64,
    dust_threshold: u64,
    rng: &mut R,
) -> Result<(DraftTransaction, SelectionDetails), Error> {
    let change_script = change_scripts.first().ok_or(Error::NoChangeScript)?;
    let output_total: u64 = outputs.iter().map(|o| o.value).sum();

    // Size of the transaction with no inputs and no change
    let base_size = estimated_base_size(outputs);
    let fee = |input_size: usize| fee_estimator(base_size + input_size);

    let buckets = coin_chooser.bucketize(coins);
    log::debug!(
        "output_total = `{}`, base_size = `{}`, {} buckets from {} coins",
        output_total,
        base_size,
        buckets.len(),
        coins.len()
    );
    let buckets = coin_chooser.choose_buckets(buckets, output_total, &fee, rng)?;

    let (input_total, input_size) = totals(&buckets);
    let tx_size = base_size + input_size;

    let mut draft = DraftTransaction {
        inputs: buckets
            .iter()
            .flat_map(|b| b.coins().iter().map(|&c| c.clone()))
            .collect(),
        outputs: outputs.to_vec(),
    };
    let mut details = SelectionDetails {
        bucket_descriptions: buckets.iter().map(|b| b.desc().to_string()).collect(),
        input_count: draft.inputs.len(),
        input_total,
        output_total,
        ..Default::default()
    };

    // Keep the change only if it is above the dust threshold once it pays for its own output
    let change_fee = fee_estimator(tx_size + CHANGE_OUTPUT_SIZE);
    let change_amount = input_total as i128 - (output_total as i128 + change_fee as i128);
    if change_amount > dust_threshold as i128 {
        let change_amount = change_amount as u64;
        log::info!("Adding change output of {} sat", change_amount);
        draft.outputs.push(TxOut {
            value: change_amount,
            script_pubkey: change_script.clone(),
        });
        details.change = Some(change_amount);
    } else if change_amount > 0 {
        log::info!("Not keeping dust change of {} sat", change_amount);
        details.absorbed_dust = change_amount as u64;
    }
    details.fee = input_total - draft.output_total();

    log::debug!("Using {} inputs", details.input_count);
    log::debug!("Using buckets: {:?}", details.bucket_descriptions);

    Ok((draft, details))
}
