use std::collections::HashSet;

use assert_matches::assert_matches;
use bdk_coin_chooser::assembler::CHANGE_OUTPUT_SIZE;
use bdk_coin_chooser::coin_selection::*;
use bdk_coin_chooser::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::*;

fn flat_fee(fee: u64) -> impl Fn(usize) -> u64 {
    move |_| fee
}

#[test]
fn test_single_coin_with_change() {
    init_logger();
    let coins = vec![get_test_coin(0, 100_000, Some(100), 1)];

    for chooser in &[AnyCoinChooser::from(ClassicCoinChooser), PrivacyCoinChooser.into()] {
        let (draft, details) = make_tx(
            chooser,
            &coins,
            &[payment(50_000)],
            &change_scripts(),
            &flat_fee(1_000),
            DUST_THRESHOLD,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        assert_eq!(draft.inputs.len(), 1);
        assert_eq!(draft.outputs.len(), 2);
        assert_eq!(draft.outputs[0], payment(50_000));
        assert_eq!(draft.outputs[1].value, 49_000);
        assert_eq!(draft.outputs[1].script_pubkey, change_scripts()[0]);
        assert_eq!(details.fee, 1_000);
    }
}

#[test]
fn test_no_coins_is_insufficient() {
    init_logger();
    assert_matches!(
        make_tx(
            &ClassicCoinChooser,
            &[],
            &[payment(1)],
            &change_scripts(),
            &flat_fee(0),
            DUST_THRESHOLD,
            &mut StdRng::seed_from_u64(0),
        ),
        Err(Error::InsufficientFunds { available: 0, .. })
    );
}

#[test]
fn test_classic_spends_oldest_regardless_of_order() {
    init_logger();
    let coins = vec![
        get_test_coin(0, 100_000, Some(10), 1),
        get_test_coin(1, 100_000, Some(20), 2),
        get_test_coin(2, 100_000, None, 3),
    ];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in &orders {
        let shuffled = order.iter().map(|&i| coins[i].clone()).collect::<Vec<_>>();
        let (draft, _) = make_tx(
            &ClassicCoinChooser,
            &shuffled,
            &[payment(150_000)],
            &change_scripts(),
            &flat_fee(1_000),
            DUST_THRESHOLD,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        let heights = draft.inputs.iter().map(|c| c.height).collect::<HashSet<_>>();
        assert_eq!(heights, vec![Some(10), Some(20)].into_iter().collect());
    }
}

#[test]
fn test_privacy_penalty_band_boundary() {
    let coins = vec![
        get_test_coin(0, 175_000, Some(1), 1),
        get_test_coin(1, 174_999, Some(1), 2),
    ];
    let buckets = PrivacyCoinChooser.bucketize(&coins);

    let at_boundary = PrivacyCoinChooser.penalty(&[&buckets[0]], 100_000);
    let below_boundary = PrivacyCoinChooser.penalty(&[&buckets[1]], 100_000);

    assert!(at_boundary < 0.001);
    assert!(below_boundary > 0.6);
}

#[test]
fn test_selection_is_always_sufficient() {
    init_logger();
    let coins = get_test_wallet_coins();
    let fee_rate = FeeRate::from_sat_per_vb(3.0);
    let estimator = |size: usize| fee_rate.fee_for_size(size);

    for seed in 0..30 {
        let amount = 10_000 + 11_117 * seed;
        let outputs = vec![payment(amount)];
        let choosers = [AnyCoinChooser::from(ClassicCoinChooser), PrivacyCoinChooser.into()];

        for chooser in &choosers {
            let (draft, details) = make_tx(
                chooser,
                &coins,
                &outputs,
                &change_scripts(),
                &estimator,
                DUST_THRESHOLD,
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();

            let without_change = DraftTransaction {
                inputs: draft.inputs.clone(),
                outputs: outputs.clone(),
            };
            assert!(
                draft.input_total() >= amount + estimator(without_change.estimated_size()),
                "{:?} selection not sufficient for {}",
                chooser,
                amount
            );

            // every coin at most once
            let outpoints = draft.inputs.iter().map(|c| c.outpoint).collect::<HashSet<_>>();
            assert_eq!(outpoints.len(), draft.inputs.len());

            assert_eq!(details.input_total, draft.input_total());
            assert_eq!(details.fee, draft.fee());
            match details.change {
                Some(change) => {
                    assert!(change > DUST_THRESHOLD);
                    assert_eq!(draft.outputs.len(), 2);
                    assert_eq!(
                        draft.fee(),
                        estimator(without_change.estimated_size() + CHANGE_OUTPUT_SIZE)
                    );
                }
                None => {
                    assert_eq!(draft.outputs.len(), 1);
                    assert!(details.absorbed_dust <= DUST_THRESHOLD);
                }
            }
        }
    }
}

#[test]
fn test_privacy_spends_every_coin_of_an_address() {
    init_logger();
    let coins = get_test_wallet_coins();

    for seed in 0..20 {
        let (draft, _) = TxBuilder::with_recipients(vec![(owner_script(0xAA), 45_000)])
            .add_change_script(owner_script(0xCC))
            .fee_rate(FeeRate::from_sat_per_vb(1.0))
            .make_tx_with_rng(&coins, &mut StdRng::seed_from_u64(seed))
            .unwrap();

        let owners = draft
            .inputs
            .iter()
            .map(|c| c.script_pubkey.clone())
            .collect::<HashSet<_>>();
        for owner in owners {
            let owned = coins.iter().filter(|c| c.script_pubkey == owner).count();
            let spent = draft
                .inputs
                .iter()
                .filter(|c| c.script_pubkey == owner)
                .count();
            assert_eq!(owned, spent);
        }
    }
}

#[test]
fn test_dust_change_is_paid_as_fee() {
    init_logger();
    let coins = vec![get_test_coin(0, 51_400, Some(1), 1)];

    let (draft, details) = TxBuilder::with_recipients(vec![(owner_script(0xAA), 50_000)])
        .add_change_script(owner_script(0xCC))
        .fee_estimator(FeeEstimator::custom(|_| 1_000))
        .coin_selection(ClassicCoinChooser)
        .make_tx(&coins)
        .unwrap();

    assert_eq!(draft.outputs.len(), 1);
    assert_eq!(details.change, None);
    assert_eq!(details.absorbed_dust, 400);
    assert_eq!(draft.fee(), 1_400);
}

#[test]
fn test_same_seed_same_draft() {
    let coins = get_test_wallet_coins();
    let builder = TxBuilder::with_recipients(vec![(owner_script(0xAA), 80_000)])
        .add_change_script(owner_script(0xCC));

    let a = builder
        .make_tx_with_rng(&coins, &mut StdRng::seed_from_u64(21))
        .unwrap();
    let b = builder
        .make_tx_with_rng(&coins, &mut StdRng::seed_from_u64(21))
        .unwrap();
    assert_eq!(a, b);
}
