//! Head/tail ABI codec
//!
//! Static values occupy one 32-byte head word each. `bytes` and `string`
//! put an offset in the head and append `length ‖ data ‖ padding` to the
//! tail. Only the value types the gateway ABI needs are supported; `uint256`
//! values are limited to 128 bits.

use crate::{AbiError, Address, Selector, Word};

/// A single ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Bool(bool),
    Selector(Selector),
    Uint(u128),
    Bytes(Vec<u8>),
    String(String),
}

pub fn uint_word(value: u128) -> Word {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn bool_word(value: bool) -> Word {
    uint_word(u128::from(value))
}

/// Encode `tokens` as a tuple.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = 32 * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(address) => head.extend_from_slice(&address.to_word()),
            Token::Bool(value) => head.extend_from_slice(&bool_word(*value)),
            Token::Selector(selector) => head.extend_from_slice(&selector.to_word()),
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::Bytes(bytes) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                append_dynamic(&mut tail, bytes);
            }
            Token::String(text) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                append_dynamic(&mut tail, text.as_bytes());
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// `selector ‖ encode(tokens)`.
pub fn encode_call(selector: Selector, tokens: &[Token]) -> Vec<u8> {
    let mut data = selector.as_bytes().to_vec();
    data.extend_from_slice(&encode(tokens));
    data
}

fn append_dynamic(tail: &mut Vec<u8>, bytes: &[u8]) {
    tail.extend_from_slice(&uint_word(bytes.len() as u128));
    tail.extend_from_slice(bytes);
    let padding = (32 - bytes.len() % 32) % 32;
    tail.resize(tail.len() + padding, 0);
}

/// Sequential reader over an encoded tuple.
pub struct Decoder<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = offset
            .checked_add(len)
            .ok_or(AbiError::OutOfBounds { offset, len })?;
        self.data
            .get(offset..end)
            .ok_or(AbiError::OutOfBounds { offset, len })
    }

    fn word_at(&self, offset: usize) -> Result<Word, AbiError> {
        let mut word = [0u8; 32];
        word.copy_from_slice(self.slice_at(offset, 32)?);
        Ok(word)
    }

    fn next_word(&mut self) -> Result<Word, AbiError> {
        let word = self.word_at(self.cursor)?;
        self.cursor += 32;
        Ok(word)
    }

    pub fn address(&mut self) -> Result<Address, AbiError> {
        let word = self.next_word()?;
        Address::from_word(&word).ok_or(AbiError::InvalidAddress)
    }

    pub fn bool(&mut self) -> Result<bool, AbiError> {
        match word_to_u128(&self.next_word()?)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(AbiError::InvalidBool),
        }
    }

    pub fn selector(&mut self) -> Result<Selector, AbiError> {
        let word = self.next_word()?;
        Selector::from_word(&word).ok_or(AbiError::InvalidSelector)
    }

    pub fn uint(&mut self) -> Result<u128, AbiError> {
        word_to_u128(&self.next_word()?)
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>, AbiError> {
        let offset = self.offset()?;
        let len = usize::try_from(word_to_u128(&self.word_at(offset)?)?)
            .map_err(|_| AbiError::UintOverflow)?;
        Ok(self.slice_at(offset + 32, len)?.to_vec())
    }

    pub fn string(&mut self) -> Result<String, AbiError> {
        String::from_utf8(self.bytes()?).map_err(|_| AbiError::InvalidUtf8)
    }

    fn offset(&mut self) -> Result<usize, AbiError> {
        let offset = usize::try_from(self.uint()?).map_err(|_| AbiError::UintOverflow)?;
        // Offsets point past a length word, keep the addition below from wrapping
        offset.checked_add(32).ok_or(AbiError::UintOverflow)?;
        Ok(offset)
    }
}

/// Interpret a big-endian word as a `u128`.
pub fn word_to_u128(word: &Word) -> Result<u128, AbiError> {
    if word[..16].iter().any(|b| *b != 0) {
        return Err(AbiError::UintOverflow);
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

/// Decode a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    Decoder::new(data).bool()
}

/// Decode a single `address` return value.
pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    Decoder::new(data).address()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_tuple_layout() {
        let target = Address::from_label("target");
        let encoded = encode(&[
            Token::Address(target),
            Token::Selector(Selector::new([0xaa, 0xbb, 0xcc, 0xdd])),
            Token::Bool(true),
        ]);
        assert_eq!(encoded.len(), 96);
        assert_eq!(&encoded[12..32], target.as_bytes());
        assert_eq!(&encoded[32..36], &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(encoded[95], 1);

        let mut decoder = Decoder::new(&encoded);
        assert_eq!(decoder.address().unwrap(), target);
        assert_eq!(decoder.selector().unwrap(), Selector::new([0xaa, 0xbb, 0xcc, 0xdd]));
        assert!(decoder.bool().unwrap());
    }

    #[test]
    fn test_dynamic_bytes_layout() {
        // encode(bytes) of three bytes: offset 0x20, length 3, data padded to a word
        let encoded = encode(&[Token::Bytes(vec![1, 2, 3])]);
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 0x20);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[64..67], &[1, 2, 3]);
        assert!(encoded[67..].iter().all(|b| *b == 0));

        assert_eq!(Decoder::new(&encoded).bytes().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_mixed_static_and_dynamic() {
        let encoded = encode(&[
            Token::Uint(7),
            Token::String("hello".to_string()),
            Token::Bytes(Vec::new()),
        ]);
        let mut decoder = Decoder::new(&encoded);
        assert_eq!(decoder.uint().unwrap(), 7);
        assert_eq!(decoder.string().unwrap(), "hello");
        assert_eq!(decoder.bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_rejects_malformed_words() {
        assert_eq!(decode_bool(&uint_word(2)), Err(AbiError::InvalidBool));
        assert_eq!(
            decode_bool(&[0u8; 31]),
            Err(AbiError::OutOfBounds { offset: 0, len: 32 })
        );

        let mut dirty = [0u8; 32];
        dirty[0] = 1;
        assert_eq!(decode_address(&dirty), Err(AbiError::InvalidAddress));
        assert_eq!(Decoder::new(&dirty).uint(), Err(AbiError::UintOverflow));
    }

    #[test]
    fn test_bytes_length_past_end_is_out_of_bounds() {
        let mut encoded = encode(&[Token::Bytes(vec![9; 4])]);
        // Claim 64 bytes while only one padded word follows
        encoded[63] = 64;
        assert!(matches!(
            Decoder::new(&encoded).bytes(),
            Err(AbiError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_encode_call_prefixes_selector() {
        let selector = Selector::from_signature("setTarget(address)");
        let target = Address::from_label("t");
        let data = encode_call(selector, &[Token::Address(target)]);
        assert_eq!(Selector::from_calldata(&data), Some(selector));
        assert_eq!(decode_address(&data[4..]).unwrap(), target);
    }
}
