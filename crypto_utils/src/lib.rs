//! Hash, MAC and text-encoding primitives shared by the wallet crates.

pub mod base58;
pub mod hash;
pub mod hmac;

pub use base58::Base58Error;
