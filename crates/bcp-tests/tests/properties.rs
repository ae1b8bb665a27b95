//! Property tests for invariants that hold across all inputs.

use std::collections::BTreeMap;

use proptest::prelude::*;

use bcp_bns::address::{AddressPrefix, decode_bns_address, encode_bns_address};
use bcp_bns::decode::decode_amount;
use bcp_bns::encode::encode_amount;
use bcp_core::swap::{AtomicSwap, AtomicSwapMerger, MergerConfig, OpenSwap, SwapData, SwapEvent};
use bcp_core::transactions::{SwapAbortTx, SwapClaimTx};
use bcp_core::types::{Amount, SwapId, SwapTimeout};
use bcp_keyring::signing::ed25519_pubkey;
use bcp_keyring::slip10::{Slip10Curve, derive_path};
use bcp_keyring::Slip10RawIndex;
use bcp_tests::helpers::*;

const SEED: [u8; 16] = [0x42; 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Open,
    Claimed,
    Aborted,
}

fn open(id: u8) -> OpenSwap {
    OpenSwap {
        data: SwapData {
            id: SwapId(vec![id]),
            sender: bns_address(1),
            recipient: bns_address(2),
            hash: vec![id; 32],
            amounts: vec![cash("1")],
            timeout: SwapTimeout::Timestamp(1_000),
            memo: None,
        },
    }
}

fn events_for(outcomes: &[Outcome]) -> Vec<SwapEvent> {
    let mut events = Vec::new();
    for (id, outcome) in outcomes.iter().enumerate() {
        let id = id as u8;
        events.push(open(id).into());
        match outcome {
            Outcome::Open => {}
            Outcome::Claimed => events.push(SwapClaimTx { swap_id: SwapId(vec![id]), preimage: vec![id] }.into()),
            Outcome::Aborted => events.push(SwapAbortTx { swap_id: SwapId(vec![id]) }.into()),
        }
    }
    events
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Open), Just(Outcome::Claimed), Just(Outcome::Aborted)]
}

proptest! {
    #[test]
    fn bns_amount_split_is_lossless(whole in 0i64..i64::MAX, fractional in 0i64..1_000_000_000) {
        let quantity = if whole == 0 { fractional.to_string() } else { format!("{whole}{fractional:09}") };
        let amount = Amount::new(quantity, 9, "CASH").unwrap();
        let coin = encode_amount(&amount).unwrap();
        prop_assert_eq!(coin.whole, whole);
        prop_assert_eq!(coin.fractional, fractional);
        prop_assert_eq!(decode_amount(&coin).unwrap(), amount);
    }

    #[test]
    fn bech32_address_round_trip(data in any::<[u8; 20]>(), mainnet in any::<bool>()) {
        let prefix = if mainnet { AddressPrefix::Iov } else { AddressPrefix::Tiov };
        let address = encode_bns_address(prefix, &data).unwrap();
        let decoded = decode_bns_address(&address).unwrap();
        prop_assert_eq!(decoded.prefix, prefix);
        prop_assert_eq!(decoded.data, data);
    }

    #[test]
    fn bech32_detects_single_substitution(data in any::<[u8; 20]>(), position in 0usize..32, replacement in 0usize..32) {
        const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
        let address = encode_bns_address(AddressPrefix::Tiov, &data).unwrap();
        let mut bytes = address.as_str().as_bytes().to_vec();
        let index = "tiov1".len() + position;
        prop_assume!(bytes[index] != CHARSET[replacement]);
        bytes[index] = CHARSET[replacement];
        let corrupted = String::from_utf8(bytes).unwrap();
        prop_assert!(!bcp_bns::address::is_valid_address(&corrupted));
    }

    #[test]
    fn slip10_ed25519_is_deterministic(path in prop::collection::vec(0u32..1_000, 0..5)) {
        let path: Vec<Slip10RawIndex> =
            path.into_iter().map(Slip10RawIndex::hardened).collect::<Result<_, _>>().unwrap();
        let a = derive_path(Slip10Curve::Ed25519, &SEED, &path).unwrap();
        let b = derive_path(Slip10Curve::Ed25519, &SEED, &path).unwrap();
        prop_assert_eq!(a.private_key, b.private_key);
        prop_assert_eq!(a.chain_code, b.chain_code);
        prop_assert_eq!(ed25519_pubkey(&a.private_key).unwrap().len(), 32);
    }

    #[test]
    fn slip10_sibling_keys_differ(index in 0u32..1_000_000) {
        let a = derive_path(Slip10Curve::Secp256k1, &SEED, &[Slip10RawIndex::normal(index).unwrap()]).unwrap();
        let b = derive_path(Slip10Curve::Secp256k1, &SEED, &[Slip10RawIndex::normal(index + 1).unwrap()]).unwrap();
        prop_assert_ne!(a.private_key, b.private_key);
    }

    #[test]
    fn merger_is_order_independent(
        (outcomes, events) in prop::collection::vec(outcome_strategy(), 1..12)
            .prop_flat_map(|outcomes| {
                let events = events_for(&outcomes);
                (Just(outcomes), Just(events).prop_shuffle())
            })
    ) {
        let mut merger = AtomicSwapMerger::new(MergerConfig::unbounded());
        let mut settled = BTreeMap::new();
        for event in events {
            if let Some(record) = merger.process(event).unwrap() {
                if record.is_settled() {
                    settled.insert(record.data().id.clone(), record);
                }
            }
        }

        prop_assert_eq!(merger.pending_settlements(), 0);
        let still_open = merger.open_swaps().len();
        prop_assert_eq!(still_open, outcomes.iter().filter(|o| **o == Outcome::Open).count());
        for (id, outcome) in outcomes.iter().enumerate() {
            let record = settled.get(&SwapId(vec![id as u8]));
            let expected = match outcome {
                Outcome::Open => record.is_none(),
                Outcome::Claimed => matches!(record, Some(AtomicSwap::Claimed { .. })),
                Outcome::Aborted => matches!(record, Some(AtomicSwap::Aborted { .. })),
            };
            prop_assert!(expected, "swap {} expected {:?}, got {:?}", id, outcome, record);
        }
    }
}
