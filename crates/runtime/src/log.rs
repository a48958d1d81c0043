use relaygate_common::{event_topic, Address, Word};

/// An event emitted by a contract.
///
/// `topics[0]` is the keccak hash of the event signature, the remaining
/// topics are the indexed parameters; `data` holds the ABI-encoded
/// non-indexed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Word>,
    pub data: Vec<u8>,
}

impl Log {
    pub fn new(address: Address, signature: &str, indexed: &[Word], data: Vec<u8>) -> Self {
        let mut topics = Vec::with_capacity(indexed.len() + 1);
        topics.push(event_topic(signature));
        topics.extend_from_slice(indexed);
        Self {
            address,
            topics,
            data,
        }
    }

    /// Whether this log is an instance of the event with `signature`.
    pub fn is_event(&self, signature: &str) -> bool {
        self.topics.first() == Some(&event_topic(signature))
    }
}
