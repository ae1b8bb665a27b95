//! # bcp-bns
//! Transaction codec for the BNS blockchain: protobuf wire schema, bech32
//! addresses and state-object decoders.

pub mod address;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod proto;
pub mod query;

pub use codec::BnsCodec;
