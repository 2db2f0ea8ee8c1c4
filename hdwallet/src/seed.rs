use crate::constants::{MNEMONIC_SALT_PREFIX, PBKDF2_ROUNDS, SEED_LEN};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// 64-byte BIP39 seed, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// PBKDF2-HMAC-SHA512 over the NFKD-normalized phrase, salted with
    /// `"mnemonic" ‖ NFKD(passphrase)`.
    ///
    /// The phrase is not checked against the word list; see
    /// [`crate::mnemonic::validate`].
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Self {
        let password = Zeroizing::new(phrase.nfkd().collect::<String>());
        let mut salt = Zeroizing::new(String::from(MNEMONIC_SALT_PREFIX));
        salt.extend(passphrase.nfkd());

        let mut seed = [0u8; SEED_LEN];
        pbkdf2_hmac::<Sha512>(
            password.as_bytes(),
            salt.as_bytes(),
            PBKDF2_ROUNDS,
            &mut seed,
        );
        Seed(seed)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}
