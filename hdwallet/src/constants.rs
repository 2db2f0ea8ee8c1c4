//! Fixed protocol parameters for BIP32, BIP39, BIP44 and the TRON address
//! format.

/// Index offset for hardened children: indices in `[2³¹, 2³²)` are hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP44 purpose level, derived as `44'`.
pub const BIP44_PURPOSE: u32 = 44;

/// HMAC key used to turn a seed into the master extended key.
pub const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

/// Seed length produced by BIP39 and accepted by the master key derivation.
pub const SEED_LEN: usize = 64;

/// PBKDF2 iteration count for BIP39 seed stretching.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Prefix of the PBKDF2 salt; the passphrase is appended to it.
pub const MNEMONIC_SALT_PREFIX: &str = "mnemonic";

/// Entropy sizes (in bits) accepted for mnemonic generation.
pub const ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// Bits of dictionary index carried by one mnemonic word.
pub const BITS_PER_WORD: usize = 11;

/// Version byte of TRON mainnet addresses; renders as a leading `T`.
pub const TRON_ADDRESS_VERSION: u8 = 0x41;

// BIP32 serialization version bytes
pub const VERSION_MAINNET_PRIVATE: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
pub const VERSION_MAINNET_PUBLIC: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
pub const VERSION_TESTNET_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
pub const VERSION_TESTNET_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

/// Registered SLIP-44 coin types.
pub mod coin_type {
    pub const BITCOIN: u32 = 0;
    pub const TESTNET: u32 = 1;
    pub const LITECOIN: u32 = 2;
    pub const ETHEREUM: u32 = 60;
    pub const TRON: u32 = 195;
}
