use super::Amount;
use crate::keys::{Hash, NetworkMode, Public, Signature, Work};
use crate::util::Error;

/// The mutable fields every block kind shares, plus the memoized block hash.
///
/// All hash inputs sit behind setters that drop the memo, so a caller can
/// never read or sign a hash computed from superseded values.
#[derive(Clone, Debug)]
pub struct BlockFields {
    account: Public,
    previous: Option<Hash>,
    sequence: Option<u32>,
    fee: Option<Amount>,
    work: Option<Work>,
    signature: Option<Signature>,
    cached_hash: Option<Hash>,
}

impl BlockFields {
    pub fn new(account: Public) -> Self {
        Self {
            account,
            previous: None,
            sequence: None,
            fee: None,
            work: None,
            signature: None,
            cached_hash: None,
        }
    }

    pub fn account(&self) -> Public {
        self.account
    }

    /// The public key the account address encodes.
    pub fn origin(&self) -> Public {
        self.account
    }

    pub fn previous(&self) -> Option<Hash> {
        self.previous
    }

    pub fn sequence(&self) -> Option<u32> {
        self.sequence
    }

    pub fn fee(&self) -> Option<Amount> {
        self.fee
    }

    pub fn work(&self) -> Option<Work> {
        self.work
    }

    pub fn signature(&self) -> Option<Signature> {
        self.signature
    }

    /// The memoized hash, present only while it matches the current field
    /// values.
    pub fn cached_hash(&self) -> Option<Hash> {
        self.cached_hash
    }

    pub fn set_previous(&mut self, previous: Hash) {
        self.previous = Some(previous);
        self.cached_hash = None;
    }

    pub fn set_sequence(&mut self, sequence: u32) {
        self.sequence = Some(sequence);
        self.cached_hash = None;
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fee = Some(fee);
        self.cached_hash = None;
    }

    /// Stores a nonce after running the mode's threshold check against
    /// `previous`.
    pub fn set_work(&mut self, work: Work, mode: NetworkMode) -> Result<(), Error> {
        let previous = self.previous.ok_or(Error::MissingField("previous"))?;
        if !work.check(&previous, mode) {
            return Err(Error::InvalidWork);
        }
        self.work = Some(work);
        Ok(())
    }

    /// Stored verbatim; validity is only decided by `verify`.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    pub(super) fn invalidate_hash(&mut self) {
        self.cached_hash = None;
    }

    pub(super) fn memoize_hash(&mut self, hash: Hash) {
        self.cached_hash = Some(hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{Difficulty, Private};

    #[test]
    fn setters_clear_the_memo() {
        let mut fields = BlockFields::new(Private::random().to_public());
        fields.memoize_hash(Hash::random());

        fields.set_previous(Hash::zero());
        assert!(fields.cached_hash().is_none());

        fields.memoize_hash(Hash::random());
        fields.set_sequence(1);
        assert!(fields.cached_hash().is_none());

        fields.memoize_hash(Hash::random());
        fields.set_fee(Amount::zero());
        assert!(fields.cached_hash().is_none());

        // Work and signature are not hash inputs.
        let memo = Hash::random();
        fields.memoize_hash(memo);
        fields.set_work(Work::zero(), NetworkMode::Test).unwrap();
        fields.set_signature(Private::random().sign(&memo));
        assert_eq!(fields.cached_hash(), Some(memo));
    }

    #[test]
    fn work_requires_previous() {
        let mut fields = BlockFields::new(Private::random().to_public());
        assert!(matches!(
            fields.set_work(Work::zero(), NetworkMode::Test),
            Err(Error::MissingField("previous"))
        ));
    }

    #[test]
    fn work_is_threshold_checked() {
        let mut fields = BlockFields::new(Private::random().to_public());
        let previous = Hash::random();
        fields.set_previous(previous);

        // The zero sentinel only passes on the test network.
        assert!(fields.set_work(Work::zero(), NetworkMode::Test).is_ok());
        assert!(matches!(
            fields.set_work(Work::zero(), NetworkMode::Live),
            Err(Error::InvalidWork)
        ));

        let mut weak = Work::random();
        while weak.is_zero() || weak.difficulty(&previous) >= Difficulty::LIVE {
            weak = Work::random();
        }
        assert!(matches!(
            fields.set_work(weak, NetworkMode::Live),
            Err(Error::InvalidWork)
        ));

        let good = Work::generate(&previous, Difficulty::TEST);
        assert!(fields.set_work(good, NetworkMode::Test).is_ok());
        assert_eq!(fields.work(), Some(good));
    }
}
