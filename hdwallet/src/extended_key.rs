use crate::{
    constants::{
        HARDENED_OFFSET, MASTER_KEY_DOMAIN, SEED_LEN, VERSION_MAINNET_PRIVATE,
        VERSION_MAINNET_PUBLIC, VERSION_TESTNET_PRIVATE, VERSION_TESTNET_PUBLIC,
    },
    error::{Error, Result},
};
use crypto_utils::{
    base58::{base58_check_decode, base58_check_encode},
    hash::hash160,
    hmac::hmac_sha512,
};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification};
use tracing::trace;
use zeroize::Zeroizing;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    fn private_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PRIVATE,
            Network::Testnet => VERSION_TESTNET_PRIVATE,
        }
    }

    fn public_version(self) -> [u8; 4] {
        match self {
            Network::Mainnet => VERSION_MAINNET_PUBLIC,
            Network::Testnet => VERSION_TESTNET_PUBLIC,
        }
    }
}

/// Whether `index` selects a hardened child.
pub fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

/// Extended private key (xprv).
///
/// The secret is held as a [`SecretKey`], so it always lies in `[1, n-1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivKey {
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_index: u32,
    pub chain_code: [u8; 32],
    pub private_key: SecretKey,
}

/// Extended public key (xpub). Only normal children can be derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPubKey {
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_index: u32,
    pub chain_code: [u8; 32],
    pub public_key: PublicKey,
}

/// 4-byte key fingerprint: HASH160(compressed pubkey)[0..4]
fn fingerprint(public_key: &PublicKey) -> [u8; 4] {
    let id = hash160(&public_key.serialize());
    [id[0], id[1], id[2], id[3]]
}

fn child_depth(depth: u8) -> Result<u8> {
    depth.checked_add(1).ok_or(Error::MaxDepthExceeded)
}

/// HMAC-SHA512 split into (IL, IR).
fn hmac_halves(key: &[u8], data: &[u8]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let i = Zeroizing::new(hmac_sha512(key, data));
    let mut il = Zeroizing::new([0u8; 32]);
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

impl ExtendedPrivKey {
    /// Master key from a 64-byte BIP39 seed.
    pub fn new_master(seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_LEN {
            return Err(Error::InvalidSeedLength(seed.len()));
        }
        let (il, chain_code) = hmac_halves(MASTER_KEY_DOMAIN, seed);
        let private_key = SecretKey::from_slice(&il[..]).map_err(|_| Error::InvalidMasterKey)?;
        Ok(ExtendedPrivKey {
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
            chain_code,
            private_key,
        })
    }

    pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> PublicKey {
        PublicKey::from_secret_key(secp, &self.private_key)
    }

    /// Fingerprint of this key, as recorded in its children.
    pub fn fingerprint<C: Signing>(&self, secp: &Secp256k1<C>) -> [u8; 4] {
        fingerprint(&self.public_key(secp))
    }

    /// Neuter into the matching xpub.
    pub fn to_extended_pub<C: Signing>(&self, secp: &Secp256k1<C>) -> ExtendedPubKey {
        ExtendedPubKey {
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            public_key: self.public_key(secp),
        }
    }

    /// Child key derivation for private keys (CKDpriv).
    ///
    /// A degenerate child (IL >= n, or a zero key) is reported as
    /// [`Error::InvalidChildKey`]; picking another index is up to the caller.
    pub fn derive_private_child<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        index: u32,
    ) -> Result<Self> {
        let depth = child_depth(self.depth)?;
        let parent_pub = self.public_key(secp);

        // Hardened: 0x00 ‖ privkey ‖ index; normal: compressed pubkey ‖ index
        let mut data = Zeroizing::new(Vec::with_capacity(1 + 33 + 4));
        if is_hardened(index) {
            data.push(0u8);
            data.extend_from_slice(&self.private_key.secret_bytes());
        } else {
            data.extend_from_slice(&parent_pub.serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let (il, chain_code) = hmac_halves(&self.chain_code, &data);
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| Error::InvalidChildKey(index))?;
        let private_key = self
            .private_key
            .add_tweak(&tweak)
            .map_err(|_| Error::InvalidChildKey(index))?;

        trace!(depth, index, "derived private child");
        Ok(ExtendedPrivKey {
            depth,
            parent_fingerprint: fingerprint(&parent_pub),
            child_index: index,
            chain_code,
            private_key,
        })
    }

    /// Serialize as a Base58Check xprv/tprv string.
    pub fn to_base58(&self, network: Network) -> String {
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&self.private_key.secret_bytes());
        RawExtendedKey {
            version: network.private_version(),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            key_data: *key_data,
        }
        .encode()
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let raw = RawExtendedKey::decode(s)?;
        if raw.version != VERSION_MAINNET_PRIVATE && raw.version != VERSION_TESTNET_PRIVATE {
            return Err(Error::InvalidVersion(raw.version));
        }
        if raw.key_data[0] != 0 {
            return Err(Error::InvalidKeyData);
        }
        let private_key =
            SecretKey::from_slice(&raw.key_data[1..]).map_err(|_| Error::InvalidKeyData)?;
        Ok(ExtendedPrivKey {
            depth: raw.depth,
            parent_fingerprint: raw.parent_fingerprint,
            child_index: raw.child_index,
            chain_code: raw.chain_code,
            private_key,
        })
    }
}

impl ExtendedPubKey {
    /// Child key derivation for public keys (CKDpub), normal indices only.
    pub fn derive_public_child<C: Verification>(
        &self,
        secp: &Secp256k1<C>,
        index: u32,
    ) -> Result<Self> {
        if is_hardened(index) {
            return Err(Error::HardenedDerivationFromPublic(index));
        }
        let depth = child_depth(self.depth)?;

        let mut data = Vec::with_capacity(33 + 4);
        data.extend_from_slice(&self.public_key.serialize());
        data.extend_from_slice(&index.to_be_bytes());

        // child = parent + IL·G
        let (il, chain_code) = hmac_halves(&self.chain_code, &data);
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| Error::InvalidChildKey(index))?;
        let public_key = self
            .public_key
            .add_exp_tweak(secp, &tweak)
            .map_err(|_| Error::InvalidChildKey(index))?;

        Ok(ExtendedPubKey {
            depth,
            parent_fingerprint: fingerprint(&self.public_key),
            child_index: index,
            chain_code,
            public_key,
        })
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint(&self.public_key)
    }

    /// Serialize as a Base58Check xpub/tpub string.
    pub fn to_base58(&self, network: Network) -> String {
        RawExtendedKey {
            version: network.public_version(),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_index: self.child_index,
            chain_code: self.chain_code,
            key_data: self.public_key.serialize(),
        }
        .encode()
    }

    pub fn from_base58(s: &str) -> Result<Self> {
        let raw = RawExtendedKey::decode(s)?;
        if raw.version != VERSION_MAINNET_PUBLIC && raw.version != VERSION_TESTNET_PUBLIC {
            return Err(Error::InvalidVersion(raw.version));
        }
        let public_key = PublicKey::from_slice(&raw.key_data).map_err(|_| Error::InvalidKeyData)?;
        Ok(ExtendedPubKey {
            depth: raw.depth,
            parent_fingerprint: raw.parent_fingerprint,
            child_index: raw.child_index,
            chain_code: raw.chain_code,
            public_key,
        })
    }
}

/// The 78-byte BIP32 serialization:
/// version (4) | depth (1) | parent_fp (4) | child_index (4) | chain_code (32) | key_data (33)
struct RawExtendedKey {
    version: [u8; 4],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
    chain_code: [u8; 32],
    key_data: [u8; 33],
}

const SERIALIZED_LEN: usize = 78;

impl RawExtendedKey {
    fn encode(&self) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(SERIALIZED_LEN));
        payload.extend_from_slice(&self.version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_index.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.key_data);
        base58_check_encode(&payload)
    }

    fn decode(s: &str) -> Result<Self> {
        let data = Zeroizing::new(base58_check_decode(s)?);
        if data.len() != SERIALIZED_LEN {
            return Err(Error::InvalidSerializedLength(data.len()));
        }
        let mut raw = RawExtendedKey {
            version: [0u8; 4],
            depth: data[4],
            parent_fingerprint: [0u8; 4],
            child_index: u32::from_be_bytes([data[9], data[10], data[11], data[12]]),
            chain_code: [0u8; 32],
            key_data: [0u8; 33],
        };
        raw.version.copy_from_slice(&data[0..4]);
        raw.parent_fingerprint.copy_from_slice(&data[5..9]);
        raw.chain_code.copy_from_slice(&data[13..45]);
        raw.key_data.copy_from_slice(&data[45..78]);

        // a master key has no parent
        if raw.depth == 0 && (raw.parent_fingerprint != [0u8; 4] || raw.child_index != 0) {
            return Err(Error::InvalidKeyData);
        }
        Ok(raw)
    }
}
