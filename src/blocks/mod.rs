mod amount;
mod fields;
mod send;

pub use amount::Amount;
pub use fields::BlockFields;
pub use send::{SendBlock, SendEntry, DELEGATE_COUNT};

use crate::keys::Hash;
use crate::util::Error;

/// Kind tag folded into every canonical block hash and named in the wire
/// `transaction_type` field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum BlockKind {
    Send = 0,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Send => "send",
        }
    }
}

/// The closed set of block variants. Dispatch is exhaustive, so adding a
/// kind forces every match below to handle it.
#[derive(Clone, Debug)]
pub enum Block {
    Send(SendBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Send(_) => BlockKind::Send,
        }
    }

    pub fn hash(&mut self) -> Result<Hash, Error> {
        match self {
            Block::Send(block) => block.hash(),
        }
    }

    pub fn to_json(&mut self, pretty: bool) -> Result<String, Error> {
        match self {
            Block::Send(block) => block.to_json(pretty),
        }
    }

    pub fn delegate_index(&self) -> Result<u8, Error> {
        match self {
            Block::Send(block) => block.delegate_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Private;

    #[test]
    fn kind_dispatch() {
        let block = Block::Send(SendBlock::new(Private::random().to_public()));
        assert_eq!(block.kind(), BlockKind::Send);
        assert_eq!(block.kind().as_str(), "send");
        assert_eq!(BlockKind::Send as u8, 0);
    }
}
