use crate::util::Error;

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

pub fn expect_len(got: usize, expected: usize, what: &'static str) -> Result<(), Error> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::InvalidFormat {
            what,
            reason: format!("expected length {}, got {}", expected, got),
        })
    }
}

/// Gives a fixed-width byte newtype the full hex treatment: case-insensitive
/// `FromStr`, uppercase `Display`/`Debug`, `TryFrom<&[u8]>`, and hex-string
/// serde impls. Parse failures come back as [`Error::InvalidFormat`] naming
/// the type.
#[macro_export]
macro_rules! hexify {
    ($name:ident, $description:expr) => {
        impl $name {
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn as_hex(&self) -> String {
                $crate::util::to_hex(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::util::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::util::expect_len(s.len(), Self::LEN * 2, $description)?;
                let mut bytes = [0u8; Self::LEN];
                hex::decode_to_slice(s, &mut bytes).map_err(|source| {
                    $crate::util::Error::InvalidFormat {
                        what: $description,
                        reason: source.to_string(),
                    }
                })?;
                Ok(Self(bytes))
            }
        }

        impl std::convert::TryFrom<&[u8]> for $name {
            type Error = $crate::util::Error;

            fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
                $crate::util::expect_len(slice.len(), Self::LEN, $description)?;
                let mut bytes = [0u8; Self::LEN];
                bytes.copy_from_slice(slice);
                Ok(Self(bytes))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_hex())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.as_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase() {
        assert_eq!(to_hex(&[0xde, 0xad, 0x00]), "DEAD00");
    }

    #[test]
    fn length_check() {
        assert!(expect_len(4, 4, "x").is_ok());
        assert!(matches!(
            expect_len(3, 4, "x"),
            Err(Error::InvalidFormat { what: "x", .. })
        ));
    }
}
