//! Criterion benchmarks for the BNS codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bcp_bns::BnsCodec;
use bcp_bns::address::identity_to_address;
use bcp_core::traits::TxCodec;
use bcp_core::transactions::{SendTx, SignedTransaction, TxKind, UnsignedTransaction};
use bcp_core::types::{Amount, ChainId, Fee, FullSignature, Identity, Nonce, PubkeyBundle};

fn sample_signed() -> SignedTransaction {
    let creator = Identity::new(ChainId::new("local-iov-devnet"), PubkeyBundle::ed25519(vec![0x42; 32]));
    let sender = identity_to_address(&creator).unwrap();
    let send = SendTx {
        sender: sender.clone(),
        recipient: sender,
        amount: Amount::new("123456789000", 9, "CASH").unwrap(),
        memo: Some("benchmark".into()),
    };
    let unsigned = UnsignedTransaction::new(creator.clone(), TxKind::Send(send))
        .with_fee(Fee::tokens(Amount::new("10000000", 9, "CASH").unwrap()));
    SignedTransaction::new(
        unsigned,
        FullSignature { nonce: Nonce(5), pubkey: creator.pubkey, signature: vec![0x77; 64] },
    )
}

fn bench_codec(c: &mut Criterion) {
    let signed = sample_signed();
    let bytes = BnsCodec.bytes_to_post(&signed).unwrap();
    let chain_id = ChainId::new("local-iov-devnet");

    c.bench_function("bns_bytes_to_sign", |b| {
        b.iter(|| BnsCodec.bytes_to_sign(black_box(&signed.transaction), Nonce(5)).unwrap())
    });
    c.bench_function("bns_bytes_to_post", |b| b.iter(|| BnsCodec.bytes_to_post(black_box(&signed)).unwrap()));
    c.bench_function("bns_parse_bytes", |b| {
        b.iter(|| BnsCodec.parse_bytes(black_box(&bytes), &chain_id).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
