//! Deterministic wallets: BIP39 mnemonics, BIP32/BIP44 key trees over
//! secp256k1, and Base58Check account addresses (TRON as the reference
//! format).

pub mod address;
pub mod constants;
pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod keypair;
pub mod mnemonic;
pub mod seed;
pub mod wallet;

pub use address::{Address, AddressFormat, Tron, TronAddress};
pub use derivation::{Bip44Path, DerivationPath, derive_bip44};
pub use error::{Error, ErrorKind, Result};
pub use extended_key::{ExtendedPrivKey, ExtendedPubKey, Network};
pub use keypair::KeyPair;
pub use seed::Seed;
pub use wallet::{key_pair_from_mnemonic, tron_address_from_mnemonic};
