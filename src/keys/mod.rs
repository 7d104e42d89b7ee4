mod difficulty;
mod hash;
mod private;
mod public;
mod signature;
mod work;

pub use difficulty::{Difficulty, NetworkMode};
pub use hash::{Hash, HashBuilder};
pub use private::Private;
pub use public::{from_address, to_address, Public};
pub use signature::Signature;
pub use work::{spawn_generate, Work, WorkTask};

#[cfg(test)]
mod tests {
    use crate::keys::{Private, Public};

    use std::str::FromStr;

    #[test]
    fn conversions() {
        let private =
            Private::from_str("9F0E444C69F77A49BD0BE89DB92C38FE713E0963165CCA12FAF5712D7657120F")
                .unwrap();

        let public = private.to_public();
        assert_eq!(
            public.to_string(),
            "C008B814A7D269A1FA3C6528B19201A24D797912DB9996FF02A1FF356E45552B"
        );

        let address = public.to_address();
        assert_eq!(
            address,
            "mdn_3i1aq1cchnmbn9x5rsbap8b15akfh7wj7pwskuzi7ahz8oq6cobd99d4r3b7"
        );

        assert_eq!(Public::from_address(&address).unwrap(), public);
    }
}
