//! UTF-8 decoding of byte chunks whose boundaries may split a character.

/// Decodes a stream of byte chunks, carrying incomplete sequences over to the
/// next chunk.
///
/// Invalid sequences are replaced with U+FFFD and the position of the first one
/// is reported back to the caller.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    /// Creates a decoder with nothing carried over.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes`, returning the text and the byte offset within it of the
    /// first replacement character, if anything was invalid.
    pub fn decode(&mut self, bytes: &[u8]) -> (String, Option<usize>) {
        let mut buffer = std::mem::take(&mut self.carry);
        buffer.extend_from_slice(bytes);

        let mut text = String::with_capacity(buffer.len());
        let mut first_invalid = None;
        let mut input = buffer.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            first_invalid.get_or_insert(text.len());
                            text.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes.
                            self.carry = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        (text, first_invalid)
    }

    /// Ends the stream. Returns true if an incomplete sequence was left over.
    pub fn finish(&mut self) -> bool {
        let dangling = !self.carry.is_empty();
        self.carry.clear();
        dangling
    }

    /// Returns true if bytes are waiting for the rest of their character.
    pub fn has_carry(&self) -> bool {
        !self.carry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multibyte_character() {
        let bytes = "café,ü\n".as_bytes();
        let split = 4; // inside 'é'
        let mut decoder = Utf8Decoder::new();
        let (first, bad_first) = decoder.decode(&bytes[..split]);
        assert_eq!(first, "caf");
        assert!(decoder.has_carry());
        let (second, bad_second) = decoder.decode(&bytes[split..]);
        assert_eq!(second, "é,ü\n");
        assert_eq!(bad_first, None);
        assert_eq!(bad_second, None);
        assert!(!decoder.finish());
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut decoder = Utf8Decoder::new();
        let (text, invalid) = decoder.decode(b"ab\xffc\xfe");
        assert_eq!(text, "ab\u{FFFD}c\u{FFFD}");
        assert_eq!(invalid, Some(2));
    }

    #[test]
    fn test_dangling_sequence_at_finish() {
        let mut decoder = Utf8Decoder::new();
        let (text, invalid) = decoder.decode(&[b'x', 0xE2, 0x82]);
        assert_eq!(text, "x");
        assert_eq!(invalid, None);
        assert!(decoder.finish());
        assert!(!decoder.has_carry());
    }
}
