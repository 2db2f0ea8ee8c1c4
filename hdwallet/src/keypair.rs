use crate::{
    error::{Error, Result},
    extended_key::ExtendedPrivKey,
};
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

/// A secp256k1 private scalar `d` and its public point `Q = d·G`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Build a key pair from a 32-byte big-endian scalar, which must lie in
    /// `[1, n-1]`.
    pub fn from_secret_bytes<C: Signing>(secp: &Secp256k1<C>, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidSecretLength(bytes.len()));
        }
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateScalar)?;
        Ok(Self::from_secret_key(secp, secret_key))
    }

    pub fn from_secret_key<C: Signing>(secp: &Secp256k1<C>, secret_key: SecretKey) -> Self {
        KeyPair {
            secret_key,
            public_key: PublicKey::from_secret_key(secp, &secret_key),
        }
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Big-endian private scalar.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    /// SEC1 compressed point: parity byte (0x02/0x03) ‖ X.
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    /// SEC1 uncompressed point: 0x04 ‖ X ‖ Y.
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        self.public_key.serialize_uncompressed()
    }
}

impl ExtendedPrivKey {
    /// Extract the signing key pair held by this extended key.
    pub fn key_pair<C: Signing>(&self, secp: &Secp256k1<C>) -> Result<KeyPair> {
        KeyPair::from_secret_bytes(secp, &self.private_key.secret_bytes())
    }
}
