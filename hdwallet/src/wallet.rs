//! End-to-end derivation: phrase → seed → master key → BIP44 key → address.

use crate::{
    address::TronAddress,
    constants::coin_type,
    derivation::Bip44Path,
    error::Result,
    extended_key::ExtendedPrivKey,
    keypair::KeyPair,
    mnemonic,
    seed::Seed,
};
use secp256k1::Secp256k1;
use tracing::debug;
use zeroize::Zeroizing;

/// Key pair at `path` for a checked BIP39 phrase.
///
/// Words are rejoined with single spaces before seeding, so any phrase that
/// validates derives the same wallet however its words are spaced.
pub fn key_pair_from_mnemonic(
    phrase: &str,
    passphrase: &str,
    path: &Bip44Path,
) -> Result<KeyPair> {
    mnemonic::to_entropy(phrase)?;
    let phrase = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));
    let seed = Seed::from_mnemonic(&phrase, passphrase);
    let secp = Secp256k1::new();
    let master = ExtendedPrivKey::new_master(seed.as_bytes())?;
    path.derive(&secp, &master)?.key_pair(&secp)
}

/// Receiving address `m/44'/195'/account'/0/address_index` on TRON.
pub fn tron_address_from_mnemonic(
    phrase: &str,
    passphrase: &str,
    account: u32,
    address_index: u32,
) -> Result<TronAddress> {
    let path = Bip44Path::new(coin_type::TRON, account, 0, address_index)?;
    let key_pair = key_pair_from_mnemonic(phrase, passphrase, &path)?;
    let address = TronAddress::from_public_key(key_pair.public_key());
    debug!(%path, %address, "derived tron address");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        address::{AddressFormat, Tron},
    };
    use crypto_utils::{base58::base58_decode, hash::sha256d};
    use hex_literal::hex;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon \
                                 abandon abandon abandon abandon abandon about";

    #[test]
    fn ethereum_account_id_vector() {
        // m/44'/60'/0'/0/0 of the canonical phrase is the well-known
        // 0x9858EfFD232B4033E47d90003D41EC34EcaEda94 account
        let path = Bip44Path::new(coin_type::ETHEREUM, 0, 0, 0).unwrap();
        let pair = key_pair_from_mnemonic(ABANDON_ABOUT, "", &path).unwrap();
        assert_eq!(
            Tron::account_id(pair.public_key()),
            hex!("9858effd232b4033e47d90003d41ec34ecaeda94")
        );
    }

    #[test]
    fn tron_address_is_reproducible_and_well_formed() {
        let first = tron_address_from_mnemonic(ABANDON_ABOUT, "", 0, 0).unwrap();
        assert_eq!(first.to_string(), "TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH");
        for _ in 0..3 {
            assert_eq!(tron_address_from_mnemonic(ABANDON_ABOUT, "", 0, 0).unwrap(), first);
        }

        let text = first.to_string();
        assert_eq!(text.len(), 34);
        assert!(text.starts_with('T'));
        let raw = base58_decode(&text).unwrap();
        assert_eq!(raw.len(), 25);
        assert_eq!(raw[21..], sha256d(&raw[..21])[..4]);

        let next = tron_address_from_mnemonic(ABANDON_ABOUT, "", 0, 1).unwrap();
        let other_passphrase =
            tron_address_from_mnemonic(ABANDON_ABOUT, "TREZOR", 0, 0).unwrap();
        assert_ne!(first, next);
        assert_ne!(first, other_passphrase);
    }

    #[test]
    fn invalid_phrase_stops_the_pipeline() {
        let path = Bip44Path::new(coin_type::TRON, 0, 0, 0).unwrap();
        let bad_checksum = ABANDON_ABOUT.replace("about", "abandon");
        assert_eq!(
            key_pair_from_mnemonic(&bad_checksum, "", &path).unwrap_err(),
            Error::InvalidMnemonicChecksum
        );
        assert_eq!(
            tron_address_from_mnemonic("not a mnemonic", "", 0, 0).unwrap_err(),
            Error::InvalidWordCount(3)
        );
    }

    #[test]
    fn irregular_whitespace_derives_the_same_wallet() {
        let spaced = format!("  {}\t\n", ABANDON_ABOUT.replace(' ', "   "));
        let address = tron_address_from_mnemonic(&spaced, "", 0, 0).unwrap();
        assert_eq!(address.to_string(), "TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH");
    }

    #[test]
    fn hardened_address_index_is_rejected() {
        assert!(matches!(
            tron_address_from_mnemonic(ABANDON_ABOUT, "", 0, 0x8000_0000),
            Err(Error::InvalidPathParameter { level: "address index", .. })
        ));
    }

    #[test]
    fn key_pair_matches_manual_walk() {
        let path = Bip44Path::new(coin_type::TRON, 2, 1, 9).unwrap();
        let pair = key_pair_from_mnemonic(ABANDON_ABOUT, "", &path).unwrap();

        let secp = Secp256k1::new();
        let seed = Seed::from_mnemonic(ABANDON_ABOUT, "");
        let master = ExtendedPrivKey::new_master(seed.as_bytes()).unwrap();
        let key = crate::derivation::derive_bip44(&secp, &master, 195, 2, 1, 9).unwrap();
        assert_eq!(key.key_pair(&secp).unwrap(), pair);
    }
}
