//! SHA-256, used by the FNE peer login exchange's challenge/response authentication.

use sha2::{Digest, Sha256};

/// Hash `data` and return the 32-byte digest.
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the concatenation of a random challenge salt and a shared passphrase, as used to
/// answer a peer login challenge without sending the passphrase itself.
pub fn hash_salted(salt: &[u8], passphrase: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(passphrase);
    hasher.finalize().into()
}
