use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::{Amount, BlockFields, BlockKind};
use crate::keys::{spawn_generate, Hash, HashBuilder, NetworkMode, Private, Public};
use crate::keys::{Signature, Work};
use crate::util::Error;

/// How many consensus delegates share the publish load.
pub const DELEGATE_COUNT: usize = 32;

/// One destination of a send block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEntry {
    #[serde(
        serialize_with = "crate::keys::to_address",
        deserialize_with = "crate::keys::from_address"
    )]
    pub target: Public,
    pub amount: Amount,
}

/// A send block: one atomic transfer from an account to up to eight
/// destinations, chained to the account's previous block.
///
/// Fields are filled in incrementally; the canonical hash is computed on
/// demand, memoized, and dropped again whenever any hash input changes.
#[derive(Clone, Debug)]
pub struct SendBlock {
    fields: BlockFields,
    entries: Vec<SendEntry>,
}

/// The wire form a delegate accepts.
#[derive(Serialize, Deserialize)]
struct WireSend {
    previous: Hash,
    sequence: String,
    transaction_type: String,
    #[serde(
        serialize_with = "crate::keys::to_address",
        deserialize_with = "crate::keys::from_address"
    )]
    account: Public,
    transaction_fee: Amount,
    transactions: Vec<SendEntry>,
    number_transactions: usize,
    hash: Hash,
    work: Work,
    signature: Signature,
}

fn to_pretty_json<S: Serialize>(value: &S) -> Result<String, Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).unwrap())
}

impl SendBlock {
    pub const MAX_TRANSACTIONS: usize = 8;
    /// Serialization format tag for send blocks.
    pub const VERSION: u32 = 1;

    pub fn new(account: Public) -> Self {
        Self {
            fields: BlockFields::new(account),
            entries: Vec::new(),
        }
    }

    pub fn from_address(address: &str) -> Result<Self, Error> {
        Ok(Self::new(Public::from_address(address)?))
    }

    pub fn account(&self) -> Public {
        self.fields.account()
    }

    pub fn fields(&self) -> &BlockFields {
        &self.fields
    }

    pub fn entries(&self) -> &[SendEntry] {
        &self.entries
    }

    pub fn set_previous(&mut self, previous: Hash) {
        self.fields.set_previous(previous);
    }

    pub fn set_sequence(&mut self, sequence: u32) {
        self.fields.set_sequence(sequence);
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fields.set_fee(fee);
    }

    pub fn set_work(&mut self, work: Work, mode: NetworkMode) -> Result<(), Error> {
        self.fields.set_work(work, mode)
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.fields.set_signature(signature);
    }

    /// Appends a destination. The entry list is a hash input like any other
    /// field, so this drops the memoized hash too.
    pub fn push_entry(&mut self, entry: SendEntry) -> Result<usize, Error> {
        if self.entries.len() == Self::MAX_TRANSACTIONS {
            return Err(Error::CapacityExceeded);
        }
        self.entries.push(entry);
        self.fields.invalidate_hash();
        Ok(self.entries.len())
    }

    /// String-level variant of [`push_entry`] for callers holding wire or
    /// user input. A blank or unparseable part is an invalid entry.
    pub fn add_transaction(&mut self, target: &str, amount: &str) -> Result<usize, Error> {
        if self.entries.len() == Self::MAX_TRANSACTIONS {
            return Err(Error::CapacityExceeded);
        }
        if target.is_empty() || amount.is_empty() {
            return Err(Error::InvalidTransaction);
        }
        let entry = SendEntry {
            target: Public::from_address(target).map_err(|_| Error::InvalidTransaction)?,
            amount: Amount::from_str(amount).map_err(|_| Error::InvalidTransaction)?,
        };
        self.push_entry(entry)
    }

    /// Sum of every destination amount, widened past the machine word.
    pub fn total_amount(&self) -> U256 {
        Amount::sum(self.entries.iter().map(|entry| &entry.amount))
    }

    /// The canonical block hash, memoized until a hash input changes.
    ///
    /// The byte layout is a network contract: account key, previous hash,
    /// little-endian sequence, kind tag, little-endian entry count, each
    /// (target, amount) pair in list order, then the fee. Amounts and the
    /// fee are 16 bytes big-endian.
    pub fn hash(&mut self) -> Result<Hash, Error> {
        if let Some(hash) = self.fields.cached_hash() {
            return Ok(hash);
        }
        let previous = self
            .fields
            .previous()
            .ok_or(Error::MissingField("previous"))?;
        if self.entries.is_empty() {
            return Err(Error::MissingField("transactions"));
        }
        let sequence = self
            .fields
            .sequence()
            .ok_or(Error::MissingField("sequence"))?;
        let fee = self
            .fields
            .fee()
            .ok_or(Error::MissingField("transaction_fee"))?;

        let mut hb = HashBuilder::new();
        hb.update(self.fields.account().as_bytes());
        hb.update(previous.as_bytes());
        hb.update(&sequence.to_le_bytes());
        hb.update(&[BlockKind::Send as u8]);
        hb.update(&(self.entries.len() as u16).to_le_bytes());
        for entry in &self.entries {
            hb.update(entry.target.as_bytes());
            hb.update(&entry.amount.to_bytes());
        }
        hb.update(&fee.to_bytes());

        let hash = hb.finish();
        self.fields.memoize_hash(hash);
        Ok(hash)
    }

    /// Hashes, signs, stores the signature, and reports whether the stored
    /// signature verifies against the stored hash.
    pub fn sign(&mut self, key: &Private) -> Result<bool, Error> {
        let hash = self.hash()?;
        self.fields.set_signature(key.sign(&hash));
        self.verify()
    }

    /// Whether the stored signature is valid for the stored hash under the
    /// account key. Never recomputes the hash.
    pub fn verify(&self) -> Result<bool, Error> {
        let hash = self.fields.cached_hash().ok_or(Error::MissingField("hash"))?;
        let signature = self
            .fields
            .signature()
            .ok_or(Error::MissingField("signature"))?;
        Ok(self
            .fields
            .account()
            .verify(hash.as_bytes(), &signature)
            .is_ok())
    }

    /// Which of the 32 delegates publishes this block: the last byte of
    /// `previous`, or of the account key when this is the account's first
    /// block.
    pub fn delegate_index(&self) -> Result<u8, Error> {
        let previous = self
            .fields
            .previous()
            .ok_or(Error::MissingField("previous"))?;
        let byte = if previous.is_zero() {
            self.fields.account().last_byte()
        } else {
            previous.last_byte()
        };
        Ok(byte % DELEGATE_COUNT as u8)
    }

    /// Searches for a work nonce seeded with `previous` and stores it. The
    /// search runs on a blocking worker; use
    /// [`spawn_generate`](crate::keys::spawn_generate) directly when a
    /// timeout or cancellation is needed.
    pub async fn create_work(&mut self, mode: NetworkMode) -> Result<Work, Error> {
        let previous = self
            .fields
            .previous()
            .ok_or(Error::MissingField("previous"))?;
        let work = spawn_generate(previous, mode).wait().await?;
        self.fields.set_work(work, mode)?;
        Ok(work)
    }

    /// The wire representation submitted to a delegate. `pretty` only adds
    /// indentation for humans; hashing and signing never touch this output.
    pub fn to_json(&mut self, pretty: bool) -> Result<String, Error> {
        let hash = self.hash()?;
        let work = self.fields.work().ok_or(Error::MissingField("work"))?;
        let signature = self
            .fields
            .signature()
            .ok_or(Error::MissingField("signature"))?;
        // hash() has already proven these present.
        let previous = self
            .fields
            .previous()
            .ok_or(Error::MissingField("previous"))?;
        let sequence = self
            .fields
            .sequence()
            .ok_or(Error::MissingField("sequence"))?;
        let fee = self
            .fields
            .fee()
            .ok_or(Error::MissingField("transaction_fee"))?;

        let wire = WireSend {
            previous,
            sequence: sequence.to_string(),
            transaction_type: BlockKind::Send.as_str().to_string(),
            account: self.fields.account(),
            transaction_fee: fee,
            transactions: self.entries.clone(),
            number_transactions: self.entries.len(),
            hash,
            work,
            signature,
        };
        if pretty {
            to_pretty_json(&wire)
        } else {
            Ok(serde_json::to_string(&wire)?)
        }
    }

    /// Rebuilds a block from its wire form, revalidating the entry count,
    /// the hash, and the work under the given mode.
    pub fn from_json(json: &str, mode: NetworkMode) -> Result<Self, Error> {
        let wire: WireSend = serde_json::from_str(json)?;
        if wire.transaction_type != BlockKind::Send.as_str() {
            return Err(Error::InvalidFormat {
                what: "transaction_type",
                reason: wire.transaction_type,
            });
        }
        if wire.transactions.len() > Self::MAX_TRANSACTIONS {
            return Err(Error::CapacityExceeded);
        }
        if wire.number_transactions != wire.transactions.len() {
            return Err(Error::InvalidTransaction);
        }
        let sequence = wire
            .sequence
            .parse::<u32>()
            .map_err(|source| Error::InvalidFormat {
                what: "sequence",
                reason: source.to_string(),
            })?;

        let mut block = SendBlock::new(wire.account);
        block.fields.set_previous(wire.previous);
        block.fields.set_sequence(sequence);
        block.fields.set_fee(wire.transaction_fee);
        block.entries = wire.transactions;

        let computed = block.hash()?;
        if computed != wire.hash {
            return Err(Error::InvalidFormat {
                what: "hash",
                reason: "does not match block contents".to_string(),
            });
        }
        block.fields.set_work(wire.work, mode)?;
        block.fields.set_signature(wire.signature);
        Ok(block)
    }
}
