//! Criterion benchmarks for bcp-core hot paths.
//!
//! Covers: decimal parsing, hashing and swap merging.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bcp_core::crypto::{keccak256, sha512};
use bcp_core::decimal::Decimal;
use bcp_core::swap::{AtomicSwapMerger, OpenSwap, SwapData};
use bcp_core::transactions::SwapClaimTx;
use bcp_core::types::{Address, Amount, SwapId, SwapTimeout};

fn open_swap(i: u32) -> OpenSwap {
    let mut id = vec![0u8; 32];
    id[..4].copy_from_slice(&i.to_be_bytes());
    OpenSwap {
        data: SwapData {
            id: SwapId(id),
            sender: Address::new("tiov1sender"),
            recipient: Address::new("tiov1recipient"),
            hash: vec![0xab; 32],
            amounts: vec![Amount::new("1000000000", 9, "CASH").unwrap()],
            timeout: SwapTimeout::Timestamp(1_700_000_000),
            memo: None,
        },
    }
}

fn bench_decimal(c: &mut Criterion) {
    c.bench_function("decimal_from_user_input", |b| {
        b.iter(|| Decimal::from_user_input(black_box("123456789.987654321"), 18).unwrap())
    });
}

fn bench_hashes(c: &mut Criterion) {
    let data = vec![0x5au8; 256];
    c.bench_function("sha512_256b", |b| b.iter(|| sha512(black_box(&data))));
    c.bench_function("keccak256_256b", |b| b.iter(|| keccak256(black_box(&data))));
}

fn bench_merger(c: &mut Criterion) {
    c.bench_function("merge_1000_swaps_claim_first", |b| {
        b.iter(|| {
            let mut merger = AtomicSwapMerger::default();
            for i in 0..1000u32 {
                let claim = SwapClaimTx { swap_id: open_swap(i).data.id, preimage: vec![1; 32] };
                merger.process(claim).unwrap();
            }
            for i in 0..1000u32 {
                merger.process(open_swap(i)).unwrap();
            }
            black_box(merger.open_swaps().len())
        })
    });
}

criterion_group!(benches, bench_decimal, bench_hashes, bench_merger);
criterion_main!(benches);
