// Derived from the keys module of github.com/feeless/feeless@978eba7.
use ed25519_dalek_blake2_feeless::{ExpandedSecretKey, PublicKey, SecretKey};
use rand::RngCore;

use super::{Hash, Public, Signature};
use crate::hexify;
use crate::util::Error;

/// 256 bit private key which can generate a public key and sign block
/// hashes.
#[derive(Clone, Copy)]
pub struct Private(pub(super) [u8; 32]);

hexify!(Private, "private key");

impl Private {
    pub const LEN: usize = 32;

    pub(super) const fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn random() -> Self {
        let mut private = Private::zero();
        rand::thread_rng().fill_bytes(&mut private.0);
        private
    }

    /// Keys must be exactly 32 bytes; anything else is refused before it can
    /// reach the signer.
    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        if slice.len() != Self::LEN {
            return Err(Error::InvalidKeyLength(slice.len()));
        }
        let mut private = Private::zero();
        private.0.copy_from_slice(slice);
        Ok(private)
    }

    /// Generate the public key for this private key.
    pub fn to_public(&self) -> Public {
        Public::from(self.internal_public())
    }

    fn to_ed25519_dalek(&self) -> SecretKey {
        SecretKey::from_bytes(&self.0).unwrap()
    }

    fn internal_public(&self) -> PublicKey {
        PublicKey::from(&self.to_ed25519_dalek())
    }

    pub fn to_address(&self) -> String {
        self.to_public().to_address()
    }

    pub fn sign(&self, hash: &Hash) -> Signature {
        let dalek = self.to_ed25519_dalek();
        let public = PublicKey::from(&dalek);
        let expanded_secret = ExpandedSecretKey::from(&dalek);
        let internal_signed = expanded_secret.sign(hash.as_bytes(), &public);
        Signature::from_bytes(internal_signed.to_bytes())
    }
}
