use crate::hexify;

/// An ed25519+blake2 detached signature over a block hash. Generated with
/// [Private](crate::keys::Private) and checked with
/// [Public](crate::keys::Public).
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(align(8))]
pub struct Signature([u8; 64]);

hexify!(Signature, "signature");

impl Signature {
    pub const LEN: usize = 64;

    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; 64] {
        self.0
    }

    pub(super) fn internal(&self) -> Result<ed25519_dalek_blake2_feeless::Signature, ()> {
        ed25519_dalek_blake2_feeless::Signature::from_bytes(&self.0).or(Err(()))
    }
}
