//! Base58Check account addresses.
//!
//! An address is `version ‖ account_id ‖ checksum` rendered in Base58, where
//! the checksum is the first four bytes of `SHA-256(SHA-256(version ‖ id))`.
//! Chains plug in through [`AddressFormat`], which fixes the version byte and
//! how the 20-byte account id is hashed out of the public key.

use crate::{
    constants::TRON_ADDRESS_VERSION,
    error::{Error, Result},
};
use crypto_utils::{
    Base58Error,
    base58::{CHECKSUM_LEN, base58_check_encode, base58_decode, checksum},
    hash::keccak256,
};
use secp256k1::PublicKey;
use std::{fmt, marker::PhantomData, str::FromStr};

pub const ACCOUNT_ID_LEN: usize = 20;

const PAYLOAD_LEN: usize = 1 + ACCOUNT_ID_LEN;

/// Chain-specific address rule.
pub trait AddressFormat {
    const VERSION: u8;

    fn account_id(public_key: &PublicKey) -> [u8; ACCOUNT_ID_LEN];
}

/// TRON mainnet: last 20 bytes of Keccak-256 over the 64-byte `X ‖ Y`
/// public key, version byte `0x41`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tron;

impl AddressFormat for Tron {
    const VERSION: u8 = TRON_ADDRESS_VERSION;

    fn account_id(public_key: &PublicKey) -> [u8; ACCOUNT_ID_LEN] {
        let uncompressed = public_key.serialize_uncompressed();
        let digest = keccak256(&uncompressed[1..]);
        let mut id = [0u8; ACCOUNT_ID_LEN];
        id.copy_from_slice(&digest[32 - ACCOUNT_ID_LEN..]);
        id
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address<F> {
    payload: [u8; PAYLOAD_LEN],
    format: PhantomData<F>,
}

pub type TronAddress = Address<Tron>;

impl<F: AddressFormat> Address<F> {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_account_id(F::account_id(public_key))
    }

    pub fn from_account_id(account_id: [u8; ACCOUNT_ID_LEN]) -> Self {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[0] = F::VERSION;
        payload[1..].copy_from_slice(&account_id);
        Address {
            payload,
            format: PhantomData,
        }
    }

    pub fn version(&self) -> u8 {
        self.payload[0]
    }

    pub fn account_id(&self) -> &[u8] {
        &self.payload[1..]
    }

    /// Version byte followed by the account id.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.payload
    }
}

impl<F: AddressFormat> fmt::Display for Address<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58_check_encode(&self.payload))
    }
}

impl<F: AddressFormat> FromStr for Address<F> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = base58_decode(s)?;
        if raw.len() != PAYLOAD_LEN + CHECKSUM_LEN {
            return Err(Error::InvalidAddressLength(raw.len()));
        }
        let (body, sum) = raw.split_at(PAYLOAD_LEN);
        if checksum(body)[..] != *sum {
            return Err(Base58Error::InvalidChecksum.into());
        }
        if body[0] != F::VERSION {
            return Err(Error::InvalidAddressVersion {
                expected: F::VERSION,
                found: body[0],
            });
        }
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(body);
        Ok(Address {
            payload,
            format: PhantomData,
        })
    }
}
