use crypto_utils::Base58Error;
use thiserror::Error;

/// Coarse classification of [`Error`] variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied a value outside the accepted domain.
    InputValidation,
    /// A derived scalar was 0 or not below the curve order.
    CryptographicDegenerateCase,
    /// The secure randomness source failed.
    ResourceExhaustion,
    /// Text or binary encoding could not be produced or parsed.
    Encoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("entropy must be 128, 160, 192, 224 or 256 bits, got {0}")]
    InvalidEntropySize(usize),
    #[error("secure randomness source failed: {0}")]
    EntropySource(String),
    #[error("mnemonic must have 12, 15, 18, 21 or 24 words, got {0}")]
    InvalidWordCount(usize),
    /// Position (0-based) of the first word missing from the dictionary.
    #[error("mnemonic word at position {0} is not in the word list")]
    UnknownWord(usize),
    #[error("mnemonic checksum mismatch")]
    InvalidMnemonicChecksum,
    #[error("seed must be 64 bytes, got {0}")]
    InvalidSeedLength(usize),
    #[error("master key is outside the curve order")]
    InvalidMasterKey,
    /// The caller may retry with the next index.
    #[error("child key at index {0:#x} is invalid")]
    InvalidChildKey(u32),
    #[error("derivation depth would exceed 255")]
    MaxDepthExceeded,
    #[error("hardened index {0:#x} cannot be derived from a public key")]
    HardenedDerivationFromPublic(u32),
    #[error("{level} index {index:#x} is outside the non-hardened range")]
    InvalidPathParameter { level: &'static str, index: u32 },
    #[error("malformed derivation path {0:?}")]
    InvalidDerivationPath(String),
    #[error("private key must be 32 bytes, got {0}")]
    InvalidSecretLength(usize),
    #[error("private scalar must lie in [1, n-1]")]
    InvalidPrivateScalar,
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error("extended key must be 78 bytes, got {0}")]
    InvalidSerializedLength(usize),
    #[error("unknown extended key version {0:02x?}")]
    InvalidVersion([u8; 4]),
    #[error("extended key data is malformed")]
    InvalidKeyData,
    #[error("address must decode to 25 bytes, got {0}")]
    InvalidAddressLength(usize),
    #[error("address version byte {found:#04x}, expected {expected:#04x}")]
    InvalidAddressVersion { expected: u8, found: u8 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidEntropySize(_)
            | Error::InvalidWordCount(_)
            | Error::UnknownWord(_)
            | Error::InvalidMnemonicChecksum
            | Error::InvalidSeedLength(_)
            | Error::MaxDepthExceeded
            | Error::HardenedDerivationFromPublic(_)
            | Error::InvalidPathParameter { .. }
            | Error::InvalidDerivationPath(_)
            | Error::InvalidSecretLength(_) => ErrorKind::InputValidation,
            Error::InvalidMasterKey | Error::InvalidChildKey(_) | Error::InvalidPrivateScalar => {
                ErrorKind::CryptographicDegenerateCase
            }
            Error::EntropySource(_) => ErrorKind::ResourceExhaustion,
            Error::Base58(_)
            | Error::InvalidSerializedLength(_)
            | Error::InvalidVersion(_)
            | Error::InvalidKeyData
            | Error::InvalidAddressLength(_)
            | Error::InvalidAddressVersion { .. } => ErrorKind::Encoding,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
