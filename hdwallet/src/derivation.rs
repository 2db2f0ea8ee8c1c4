use crate::{
    constants::{BIP44_PURPOSE, HARDENED_OFFSET},
    error::{Error, Result},
    extended_key::{ExtendedPrivKey, ExtendedPubKey, is_hardened},
};
use secp256k1::{Secp256k1, Signing, Verification};
use std::{fmt, str::FromStr};
use tracing::debug;

/// A BIP32 derivation path such as `m/44'/195'/0'/0/0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationPath(pub Vec<u32>);

impl FromStr for DerivationPath {
    type Err = Error;

    /// Accepts `m`, `m/...` or a bare index list; hardened steps are marked
    /// with `'`, `h` or `H`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDerivationPath(s.to_string());
        let rest = match s.trim() {
            "m" | "M" | "" => return Ok(DerivationPath::default()),
            t => t
                .strip_prefix("m/")
                .or_else(|| t.strip_prefix("M/"))
                .unwrap_or(t),
        };

        rest.split('/')
            .map(|part| {
                let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                    Some(digits) => (digits, true),
                    None => (part, false),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let index: u32 = digits.parse().map_err(|_| invalid())?;
                if is_hardened(index) {
                    return Err(invalid());
                }
                Ok(if hardened { index | HARDENED_OFFSET } else { index })
            })
            .collect::<Result<Vec<_>>>()
            .map(DerivationPath)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for &index in &self.0 {
            if is_hardened(index) {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{index}")?;
            }
        }
        Ok(())
    }
}

impl DerivationPath {
    /// Derive a private extended key along this path; stops at the first
    /// failing step.
    pub fn derive_private<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        master: &ExtendedPrivKey,
    ) -> Result<ExtendedPrivKey> {
        self.0
            .iter()
            .try_fold(master.clone(), |key, &index| key.derive_private_child(secp, index))
    }

    /// Derive a public extended key along this path (normal steps only).
    pub fn derive_public<C: Verification>(
        &self,
        secp: &Secp256k1<C>,
        master: &ExtendedPubKey,
    ) -> Result<ExtendedPubKey> {
        self.0
            .iter()
            .try_fold(master.clone(), |key, &index| key.derive_public_child(secp, index))
    }
}

/// The BIP44 path `m / 44' / coin_type' / account' / chain / address_index`.
///
/// All four fields hold raw, un-hardened values; hardening of the first
/// levels is applied when the path is walked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bip44Path {
    coin_type: u32,
    account: u32,
    chain: u32,
    address_index: u32,
}

impl Bip44Path {
    /// Every value must be below 2³¹. A hardened-looking `chain` or
    /// `address_index` would silently leave the BIP44 layout, and an already
    /// hardened `coin_type` or `account` cannot be hardened again.
    pub fn new(coin_type: u32, account: u32, chain: u32, address_index: u32) -> Result<Self> {
        for (level, index) in [
            ("coin type", coin_type),
            ("account", account),
            ("chain", chain),
            ("address index", address_index),
        ] {
            if is_hardened(index) {
                return Err(Error::InvalidPathParameter { level, index });
            }
        }
        Ok(Bip44Path {
            coin_type,
            account,
            chain,
            address_index,
        })
    }

    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    pub fn account(&self) -> u32 {
        self.account
    }

    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn address_index(&self) -> u32 {
        self.address_index
    }

    /// Child indices in derivation order, hardening applied.
    pub fn indices(&self) -> [u32; 5] {
        [
            BIP44_PURPOSE | HARDENED_OFFSET,
            self.coin_type | HARDENED_OFFSET,
            self.account | HARDENED_OFFSET,
            self.chain,
            self.address_index,
        ]
    }

    pub fn derive<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        master: &ExtendedPrivKey,
    ) -> Result<ExtendedPrivKey> {
        let key = DerivationPath::from(*self).derive_private(secp, master)?;
        debug!(path = %self, depth = key.depth, "derived bip44 key");
        Ok(key)
    }
}

impl From<Bip44Path> for DerivationPath {
    fn from(path: Bip44Path) -> Self {
        DerivationPath(path.indices().to_vec())
    }
}

impl fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&DerivationPath::from(*self), f)
    }
}

/// Derive `m/44'/coin_type'/account'/chain/address_index` from a master key.
pub fn derive_bip44<C: Signing>(
    secp: &Secp256k1<C>,
    master: &ExtendedPrivKey,
    coin_type: u32,
    account: u32,
    chain: u32,
    address_index: u32,
) -> Result<ExtendedPrivKey> {
    Bip44Path::new(coin_type, account, chain, address_index)?.derive(secp, master)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::coin_type, seed::Seed};
    use proptest::prelude::*;

    const H: u32 = HARDENED_OFFSET;

    fn canonical_master() -> ExtendedPrivKey {
        let seed = Seed::from_mnemonic(
            "abandon abandon abandon abandon abandon abandon \
             abandon abandon abandon abandon abandon about",
            "",
        );
        ExtendedPrivKey::new_master(seed.as_bytes()).unwrap()
    }

    #[test]
    fn parse_and_display() {
        let dp: DerivationPath = "m/0'/1/2h/2/1000000000".parse().unwrap();
        assert_eq!(dp.0, vec![H, 1, H + 2, 2, 1000000000]);
        assert_eq!(dp.to_string(), "m/0'/1/2'/2/1000000000");
        assert_eq!("m".parse::<DerivationPath>().unwrap(), DerivationPath::default());
        assert_eq!(DerivationPath::default().to_string(), "m");
        assert_eq!(
            "44H/60H".parse::<DerivationPath>().unwrap().0,
            vec![H + 44, H + 60]
        );
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        for bad in ["m//1", "m/abc", "m/1/", "m/-1", "m/+1", "m/2147483648", "m/1''"] {
            assert_eq!(
                bad.parse::<DerivationPath>().unwrap_err(),
                Error::InvalidDerivationPath(bad.to_string()),
                "{bad}"
            );
        }
    }

    #[test]
    fn bip44_indices() {
        let path = Bip44Path::new(coin_type::TRON, 0, 0, 0).unwrap();
        assert_eq!(path.indices(), [H + 44, H + 195, H, 0, 0]);
        assert_eq!(path.to_string(), "m/44'/195'/0'/0/0");
        assert_eq!(
            DerivationPath::from(path),
            "m/44'/195'/0'/0/0".parse::<DerivationPath>().unwrap()
        );
    }

    #[test]
    fn hardened_parameters_are_rejected() {
        assert_eq!(
            Bip44Path::new(H + 195, 0, 0, 0).unwrap_err(),
            Error::InvalidPathParameter {
                level: "coin type",
                index: H + 195
            }
        );
        assert_eq!(
            Bip44Path::new(195, 0, H, 0).unwrap_err(),
            Error::InvalidPathParameter {
                level: "chain",
                index: H
            }
        );
        let err = Bip44Path::new(195, 0, 0, u32::MAX).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPathParameter {
                level: "address index",
                index: u32::MAX
            }
        );
        assert_eq!(err.kind(), crate::ErrorKind::InputValidation);
    }

    #[test]
    fn derive_bip44_walks_five_levels() {
        let secp = Secp256k1::new();
        let master = canonical_master();
        let key = derive_bip44(&secp, &master, coin_type::TRON, 0, 0, 3).unwrap();
        assert_eq!(key.depth, 5);
        assert_eq!(key.child_index, 3);

        let by_string = "m/44'/195'/0'/0/3"
            .parse::<DerivationPath>()
            .unwrap()
            .derive_private(&secp, &master)
            .unwrap();
        assert_eq!(key, by_string);

        let parent = "m/44'/195'/0'/0"
            .parse::<DerivationPath>()
            .unwrap()
            .derive_private(&secp, &master)
            .unwrap();
        assert_eq!(key.parent_fingerprint, parent.fingerprint(&secp));
    }

    #[test]
    fn bip44_account_xpub_vector() {
        // BIP44 account-level xpub of the canonical phrase, m/44'/0'/0'
        let secp = Secp256k1::new();
        let account = "m/44'/0'/0'"
            .parse::<DerivationPath>()
            .unwrap()
            .derive_private(&secp, &canonical_master())
            .unwrap();
        assert_eq!(
            account
                .to_extended_pub(&secp)
                .to_base58(crate::Network::Mainnet),
            "xpub6BosfCnifzxcFwrSzQiqu2DBVTshkCXacvNsWGYJVVhhawA7d4R5WSWGFNbi8Aw6ZRc1brxMyWMzG3DSSSSoekkudhUd9yLb6qx39T9nMdj"
        );
    }

    #[test]
    fn public_walk_rejects_hardened_steps() {
        let secp = Secp256k1::new();
        let xpub = canonical_master().to_extended_pub(&secp);
        let path: DerivationPath = "m/0/1'".parse().unwrap();
        assert_eq!(
            path.derive_public(&secp, &xpub).unwrap_err(),
            Error::HardenedDerivationFromPublic(H + 1)
        );
        let normal: DerivationPath = "m/0/1".parse().unwrap();
        assert_eq!(normal.derive_public(&secp, &xpub).unwrap().depth, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn derivation_is_deterministic(
            account in 0u32..H,
            chain in 0u32..2,
            address_index in 0u32..H,
        ) {
            let secp = Secp256k1::new();
            let master = canonical_master();
            let path = Bip44Path::new(coin_type::TRON, account, chain, address_index).unwrap();
            let a = path.derive(&secp, &master).unwrap();
            let b = derive_bip44(&secp, &master, coin_type::TRON, account, chain, address_index)
                .unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
