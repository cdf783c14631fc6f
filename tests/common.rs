#![allow(unused)]
use std::str::FromStr;

use bdk_coin_chooser::Coin;
use bitcoin::{OutPoint, Script, TxOut};

pub const DUST_THRESHOLD: u64 = 546;

pub fn init_logger() {
    let _ = env_logger::try_init();
}

/// P2PKH-looking script unique to `owner`
pub fn owner_script(owner: u8) -> Script {
    let mut bytes = vec![0x76, 0xa9, 0x14];
    bytes.extend_from_slice(&[owner; 20]);
    bytes.extend_from_slice(&[0x88, 0xac]);
    Script::from(bytes)
}

/// A coin with a distinct outpoint for every `index`
pub fn get_test_coin(index: u32, value: u64, height: Option<u32>, owner: u8) -> Coin {
    let outpoint = OutPoint::from_str(&format!(
        "65d92ddff6b6dc72c89624a6491997714b90f6004f928d875bc0fd53f264fa85:{}",
        index
    ))
    .unwrap();
    Coin::new(outpoint, value, height, owner_script(owner))
}

pub fn payment(value: u64) -> TxOut {
    TxOut {
        value,
        script_pubkey: owner_script(0xAA),
    }
}

pub fn change_scripts() -> Vec<Script> {
    vec![owner_script(0xCC), owner_script(0xDD)]
}

/// A wallet with coins of mixed value, age and owner
pub fn get_test_wallet_coins() -> Vec<Coin> {
    (0..40)
        .map(|i| {
            let height = if i % 7 == 0 { None } else { Some(600_000 + i) };
            get_test_coin(i, 2_500 + 17_333 * (i as u64 % 9), height, (i % 11) as u8)
        })
        .collect()
}
