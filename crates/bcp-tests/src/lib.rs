//! Integration tests spanning codecs, the swap merger and the keyring.
//!
//! The tests live in `tests/`. This library only holds shared fixtures.

pub mod helpers;
