use tracing::{debug, trace};

use crate::bytestring::ByteString;
use crate::error::{CollectionKind, DecodeError, IntegerFault};
use crate::options::DecodeOptions;
use crate::value::{BencodeValue, Dictionary};

type Result<T> = std::result::Result<T, DecodeError>;

/// Recursive-descent decoder over one borrowed buffer. Every sub-parser
/// starts at `cursor` and leaves it just past what it consumed, so nested
/// elements are located without copying the remaining input.
pub struct BDecoder<'a> {
    bytes: &'a [u8],
    cursor: usize,
    depth: usize,
    options: &'a DecodeOptions,
}

impl<'a> BDecoder<'a> {
    pub fn new(bytes: &'a [u8], options: &'a DecodeOptions) -> BDecoder<'a> {
        BDecoder { bytes, cursor: 0, depth: 0, options }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Decodes exactly one value and reports how far it read.
    pub fn decode(&mut self) -> Result<(BencodeValue, usize)> {
        let value = self.parse_type()?;
        if !self.options.allow_trailing {
            let ws = self.options.whitespace;
            if let Some(extra) = self.bytes[self.cursor..].iter().position(|&b| !ws.skips(b)) {
                return Err(DecodeError::TrailingData { offset: self.cursor + extra });
            }
        }
        Ok((value, self.cursor))
    }

    fn parse_type(&mut self) -> Result<BencodeValue> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(DecodeError::UnexpectedEndOfInput {
                offset: self.cursor,
                needed: 1,
                available: 0,
            }),
            Some(b'i') => self.parse_int().map(BencodeValue::Integer),
            Some(b'l') => self.parse_list().map(BencodeValue::List),
            Some(b'd') => self.parse_dict().map(BencodeValue::Dictionary),
            Some(_) => self.parse_str().map(BencodeValue::ByteString),
        }
    }

    // 4:asdf
    fn parse_str(&mut self) -> Result<ByteString> {
        let start = self.cursor;
        let len = self.read_len().ok_or(DecodeError::MalformedLength { offset: start })?;
        let available = self.bytes.len() - self.cursor;
        if len > available {
            return Err(DecodeError::UnexpectedEndOfInput { offset: start, needed: len, available });
        }
        let content = &self.bytes[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(ByteString(content.to_vec()))
    }

    // i500e, i-500e
    fn parse_int(&mut self) -> Result<i64> {
        let start = self.cursor;
        self.expect_char(b'i')?;
        let body_start = self.cursor;
        let end = self.bytes[body_start..]
            .iter()
            .position(|&b| b == b'e')
            .map(|p| body_start + p)
            .ok_or(DecodeError::InvalidInteger { offset: start, fault: IntegerFault::Unterminated })?;
        let int = parse_integer_body(&self.bytes[body_start..end])
            .map_err(|fault| DecodeError::InvalidInteger { offset: start, fault })?;
        self.cursor = end + 1;
        Ok(int)
    }

    // l4:asdf4:fdsae
    fn parse_list(&mut self) -> Result<Vec<BencodeValue>> {
        let start = self.cursor;
        self.descend(start)?;
        self.expect_char(b'l')?;
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(DecodeError::UnterminatedCollection { kind: CollectionKind::List, offset: start }),
                Some(b'e') => break,
                Some(_) => list.push(self.parse_type()?),
            }
        }
        self.expect_char(b'e')?;
        self.depth -= 1;
        Ok(list)
    }

    // d4:asdf4:fdsa4:fdsa4:asdfe
    fn parse_dict(&mut self) -> Result<Dictionary> {
        let start = self.cursor;
        self.descend(start)?;
        self.expect_char(b'd')?;
        let mut dict = Dictionary::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(DecodeError::UnterminatedCollection { kind: CollectionKind::Dictionary, offset: start })
                }
                Some(b'e') => break,
                Some(_) => {}
            }
            let key_start = self.cursor;
            let key = self.parse_type()?;
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(DecodeError::UnterminatedCollection { kind: CollectionKind::Dictionary, offset: start })
                }
                Some(b'e') => return Err(DecodeError::KeyWithoutValue { offset: key_start }),
                Some(_) => {}
            }
            let value = self.parse_type()?;
            if dict.insert(key, value).is_some() {
                trace!(offset = key_start, "duplicate dictionary key, keeping the later value");
            }
        }
        self.expect_char(b'e')?;
        self.depth -= 1;
        Ok(dict)
    }

    // Digits followed by ':'. Leaves the cursor after the colon.
    fn read_len(&mut self) -> Option<usize> {
        let digits = self.bytes[self.cursor..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || self.bytes.get(self.cursor + digits) != Some(&b':') {
            return None;
        }
        let mut acc: usize = 0;
        for &d in &self.bytes[self.cursor..self.cursor + digits] {
            acc = acc.checked_mul(10)?.checked_add((d - b'0') as usize)?;
        }
        self.cursor += digits + 1;
        Some(acc)
    }

    fn descend(&mut self, offset: usize) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep { offset, limit: self.options.max_depth });
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        let ws = self.options.whitespace;
        while self.peek().filter(|&b| ws.skips(b)).is_some() {
            self.cursor += 1;
        }
    }

    // Callers peek before calling, so a mismatch means a decoder bug rather
    // than bad input. Still reported as an error instead of panicking.
    fn expect_char(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(chr) if chr == expected => {
                self.cursor += 1;
                Ok(())
            }
            _ => Err(DecodeError::UnexpectedEndOfInput {
                offset: self.cursor,
                needed: 1,
                available: self.bytes.len() - self.cursor,
            }),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }
}

/// Parses the text between `i` and `e`.
fn parse_integer_body(body: &[u8]) -> std::result::Result<i64, IntegerFault> {
    if body.is_empty() {
        return Err(IntegerFault::Empty);
    }
    let (negative, digits) = match body.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, body),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(IntegerFault::NotANumber);
    }
    if digits == b"0" && negative {
        return Err(IntegerFault::NegativeZero);
    }
    if digits[0] == b'0' && digits.len() > 1 {
        return Err(IntegerFault::LeadingZero);
    }
    // Accumulate towards the sign so i64::MIN is representable.
    let mut acc: i64 = 0;
    for &d in digits {
        let d = (d - b'0') as i64;
        acc = acc.checked_mul(10).ok_or(IntegerFault::Overflow)?;
        acc = if negative { acc.checked_sub(d) } else { acc.checked_add(d) }.ok_or(IntegerFault::Overflow)?;
    }
    Ok(acc)
}

pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<(BencodeValue, usize)> {
    let mut decoder = BDecoder::new(input, options);
    decoder.decode().map_err(|err| {
        debug!(offset = err.offset(), error = %err, "bencode decode failed");
        err
    })
}
