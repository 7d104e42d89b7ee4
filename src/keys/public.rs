// Derived from the keys module of github.com/feeless/feeless@978eba7.
use blake2b_simd::Params;
use ed25519_dalek_blake2_feeless::{PublicKey, Verifier};
use primitive_types::U512;
use serde::{Deserialize, Deserializer, Serializer};

use super::signature::Signature;
use crate::hexify;
use crate::util::Error;

/// 256 bit public key which can be rendered as an `mdn_` account address or
/// verify a [Signature](crate::keys::Signature).
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Public(pub [u8; 32]);

hexify!(Public, "public key");

const ADDRESS_PREFIX: &str = "mdn_";
const ADDRESS_LEN: usize = 64;

fn decode_to_u512(s: &str) -> Result<U512, Error> {
    if !is_valid(s) {
        return Err(Error::InvalidFormat {
            what: "address",
            reason: "not a valid account string".to_string(),
        });
    }

    let mut number = U512::default();
    for character in s.chars().skip(ADDRESS_PREFIX.len()) {
        match decode_byte(character) {
            Some(byte) => {
                number <<= 5;
                number = number + byte;
            }
            None => {
                return Err(Error::InvalidFormat {
                    what: "address",
                    reason: format!("invalid character '{}'", character),
                })
            }
        }
    }
    Ok(number)
}

fn is_valid(s: &str) -> bool {
    s.starts_with(ADDRESS_PREFIX)
        && s.chars().count() == ADDRESS_LEN
        && matches!(s.chars().nth(ADDRESS_PREFIX.len()), Some('1') | Some('3'))
}

fn checksum_bytes(number: U512) -> [u8; 5] {
    [
        number.byte(0),
        number.byte(1),
        number.byte(2),
        number.byte(3),
        number.byte(4),
    ]
}

fn account_bytes(number: U512) -> [u8; 32] {
    let mut bytes_512 = [0u8; 64];
    (number >> 40).to_big_endian(&mut bytes_512);
    let mut bytes_256 = [0u8; 32];
    bytes_256.copy_from_slice(&bytes_512[32..]);
    bytes_256
}

fn decode_byte(character: char) -> Option<u8> {
    if character.is_ascii() {
        let character = character as u8;
        if (0x30..0x80).contains(&character) {
            let byte: u8 = account_decode(character);
            if byte != b'~' {
                return Some(byte);
            }
        }
    }

    None
}

const ACCOUNT_LOOKUP: &[char] = &[
    '1', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'w', 'x', 'y', 'z',
];

const ACCOUNT_REVERSE: &[char] = &[
    '~', '0', '~', '1', '2', '3', '4', '5', '6', '7', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '8', '9', ':', ';', '<', '=', '>', '?',
    '@', 'A', 'B', '~', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', '~', 'L', 'M', 'N', 'O', '~',
    '~', '~', '~', '~',
];

fn account_encode(value: u8) -> char {
    ACCOUNT_LOOKUP[value as usize]
}

fn account_decode(value: u8) -> u8 {
    let mut result = ACCOUNT_REVERSE[(value - 0x30) as usize] as u8;
    if result != b'~' {
        result -= 0x30;
    }
    result
}

impl Public {
    pub const LEN: usize = 32;
    const ADDRESS_CHECKSUM_LEN: usize = 5;

    /// Convert the public key to an account address string.
    pub fn to_address(&self) -> String {
        let mut number = U512::from_big_endian(&self.0);
        let check = U512::from_little_endian(&self.checksum());
        number <<= 40;
        number |= check;

        let mut result = String::with_capacity(ADDRESS_LEN + 1);

        for _i in 0..60 {
            let r = number.byte(0) & 0x1f_u8;
            number >>= 5;
            result.push(account_encode(r));
        }
        result.push_str("_ndm");
        result.chars().rev().collect()
    }

    /// Create a public key from an account address string.
    pub fn from_address(address: &str) -> Result<Self, Error> {
        let number = decode_to_u512(address)?;
        let public = Public(account_bytes(number));
        if public.checksum() != checksum_bytes(number) {
            return Err(Error::InvalidFormat {
                what: "address",
                reason: "invalid checksum".to_string(),
            });
        }
        Ok(public)
    }

    fn dalek_key(&self) -> Result<PublicKey, Error> {
        PublicKey::from_bytes(&self.0).map_err(|e| Error::InvalidFormat {
            what: "public key",
            reason: e.to_string(),
        })
    }

    fn checksum(&self) -> [u8; Self::ADDRESS_CHECKSUM_LEN] {
        let mut check = [0u8; Self::ADDRESS_CHECKSUM_LEN];
        let hash = Params::new()
            .hash_length(Self::ADDRESS_CHECKSUM_LEN)
            .hash(&self.0);
        check.copy_from_slice(hash.as_bytes());
        check
    }

    pub fn last_byte(&self) -> u8 {
        self.0[Self::LEN - 1]
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), ()> {
        let result = self.dalek_key();

        match result {
            Ok(key) => key.verify(message, &signature.internal()?).or(Err(())),
            // A value that is not a curve point can never have produced a
            // valid signature, so it simply fails verification.
            _ => Err(()),
        }
    }
}

impl From<PublicKey> for Public {
    fn from(v: PublicKey) -> Self {
        Self(*v.as_bytes())
    }
}

/// A serde serializer that renders the key as an account address instead of
/// hex. Use with #[serde(serialize_with = "...")] on the field that needs it.
pub fn to_address<S>(public: &Public, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(public.to_address().as_str())
}

pub fn from_address<'de, D>(deserializer: D) -> Result<Public, <D as Deserializer<'de>>::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Public::from_address(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::Public;
    use crate::keys::private::Private;
    use std::str::FromStr;

    #[test]
    fn empty_private_to_public() {
        let private_key_bytes = [0; Private::LEN];
        let private = Private(private_key_bytes);
        let public = private.to_public();
        // If the result is...
        // 3B6A27BCCEB6A42D62A3A8D02A6F0D73653215771DE243A63AC048A18B59DA29
        // ...it means we're using sha512 instead of blake2b for the hasher.
        assert_eq!(
            public.to_string(),
            "19D3D919475DEED4696B5D13018151D1AF88B2BD3BCFF048B45031C1F36D1858"
        )
    }

    #[test]
    fn hex() {
        let s = "19D3D919475DEED4696B5D13018151D1AF88B2BD3BCFF048B45031C1F36D1858";
        assert_eq!(s, &Public::from_str(s).unwrap().as_hex());
    }

    #[test]
    fn address_round_trip() {
        let public = Private::random().to_public();
        let address = public.to_address();
        assert_eq!(address.len(), 64);
        assert!(address.starts_with("mdn_"));
        assert_eq!(Public::from_address(&address).unwrap(), public);
    }

    #[test]
    fn address_rejects_corruption() {
        let address = Private::random().to_public().to_address();
        // Swap the last character for a different valid base32 character.
        let mut corrupted: Vec<char> = address.chars().collect();
        let last = corrupted[63];
        corrupted[63] = if last == '1' { '3' } else { '1' };
        let corrupted: String = corrupted.into_iter().collect();
        assert!(Public::from_address(&corrupted).is_err());
        assert!(Public::from_address("mdn_short").is_err());
        assert!(Public::from_address(&address.replace("mdn_", "xyz_")).is_err());
    }
}
