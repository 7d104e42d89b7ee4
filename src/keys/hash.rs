use blake2b_simd::{Params, State};

use crate::hexify;

#[static_init::dynamic]
static PARAMS: Params = {
    let mut params = Params::new();
    params.hash_length(32);
    params
};

#[static_init::dynamic]
static STATE: State = {
    let mut params = Params::new();
    params.hash_length(32);
    params.to_state()
};

/// A 256-bit blake2b digest. Identifies a block and is the message its
/// signature covers. The all-zero value marks "no prior block" in the
/// `previous` position.
#[derive(Clone, Copy, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
#[repr(align(8))]
pub struct Hash([u8; 32]);

hexify!(Hash, "hash");

impl Hash {
    pub const LEN: usize = 32;

    pub fn random() -> Self {
        Self(rand::random())
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn digest(slice: &[u8]) -> Self {
        Self(PARAMS.hash(slice).as_bytes().try_into().unwrap())
    }

    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn last_byte(&self) -> u8 {
        self.0[Self::LEN - 1]
    }
}

pub struct HashBuilder(State);

impl HashBuilder {
    pub fn new() -> Self {
        Self(STATE.clone())
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub fn finish(&self) -> Hash {
        Hash(self.0.finalize().as_bytes().try_into().unwrap())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn builder_matches_digest() {
        let mut hb = HashBuilder::new();
        hb.update(&[1, 2]);
        hb.update(&[3, 4, 5]);
        assert_eq!(hb.finish(), Hash::digest(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn parsing() {
        let s = "2387767168F9453DB0ECA227C79D7E7A31B78CAFB58BD9CDEE630881C70979B8";
        let hash = Hash::from_str(s).unwrap();
        assert_eq!(hash.as_hex(), s);
        assert_eq!(hash.last_byte(), 0xb8);
        // Lowercase input is accepted too.
        assert_eq!(Hash::from_str(&s.to_lowercase()).unwrap(), hash);
        assert!(Hash::from_str("b8").is_err());
        assert!(Hash::from_str(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn zero_sentinel() {
        assert!(Hash::zero().is_zero());
        assert_eq!(Hash::zero().as_hex(), "0".repeat(64));
        assert!(!Hash::digest(b"x").is_zero());
    }
}
