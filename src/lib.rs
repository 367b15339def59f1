//! Bencode codec: the length-prefixed format BitTorrent metainfo files use.
//!
//! | Form | Wire | Example |
//! |------|------|---------|
//! | byte string | `<len>:<bytes>` | `4:asdf` |
//! | integer | `i<decimal>e` | `i-3e` |
//! | list | `l<values>e` | `l4:asdf4:fdsae` |
//! | dictionary | `d(<key><value>)*e` | `d4:asdf4:fdsae` |
//!
//! ```
//! use bencodec::{decode, decode_prefix, encode, BencodeValue};
//!
//! let value = decode(b"d4:infod6:pieces8:asdffdsaee").unwrap();
//! let pieces = value.get("info").and_then(|info| info.get("pieces"));
//! assert_eq!(Some("asdffdsa"), pieces.and_then(BencodeValue::as_str));
//!
//! let (list, consumed) = decode_prefix(b"l4:asdf4:fdsaetrailing").unwrap();
//! assert_eq!(14, consumed);
//! assert_eq!(b"l4:asdf4:fdsae".to_vec(), encode(&list));
//! ```
//!
//! Dictionaries keep the order they were decoded or built in, and the
//! encoder writes them in that order. Use [`BencodeValue::encode_canonical`]
//! when the output has to be the sorted canonical form, e.g. for hashing.

mod bdecode;
mod bencode;
mod bytestring;
mod error;
mod options;
mod value;

pub use bdecode::{decode_with, BDecoder};
pub use bencode::{encode, encode_any, ToBencode};
pub use bytestring::{ByteString, ToByteString};
pub use error::{CollectionKind, DecodeError, DecodeErrorKind, EncodeError, IntegerFault};
pub use options::{DecodeOptions, Whitespace, DEFAULT_MAX_DEPTH};
pub use value::{BencodeValue, Dictionary};

/// Decodes the first value in `input`. Anything after it is ignored.
pub fn decode(input: &[u8]) -> Result<BencodeValue, DecodeError> {
    decode_prefix(input).map(|(value, _)| value)
}

/// Like [`decode`], also returning how many bytes the value took.
pub fn decode_prefix(input: &[u8]) -> Result<(BencodeValue, usize), DecodeError> {
    decode_with(input, &DecodeOptions::default())
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn bs(s: &str) -> BencodeValue {
        BencodeValue::string(s)
    }

    #[test]
    fn string_round_trip() {
        assert_eq!(b"4:asdf".to_vec(), encode(&bs("asdf")));
        assert_eq!(Ok((bs("asdf"), 6)), decode_prefix(b"4:asdf"));
    }

    #[test]
    fn integer_round_trip() {
        for (int, wire) in [(0, "i0e"), (-3, "i-3e"), (500, "i500e"), (i64::MAX, "i9223372036854775807e")] {
            assert_eq!(wire.as_bytes().to_vec(), encode(&int));
            assert_eq!(Ok((BencodeValue::Integer(int), wire.len())), decode_prefix(wire.as_bytes()));
        }
    }

    #[test]
    fn list_and_dictionary() {
        assert_eq!(
            Ok((BencodeValue::List(vec![bs("asdf"), bs("fdsa")]), 14)),
            decode_prefix(b"l4:asdf4:fdsae")
        );

        let mut dict = Dictionary::new();
        dict.insert(bs("asdf"), bs("fdsa"));
        dict.insert(bs("fdsa"), bs("asdf"));
        assert_eq!(
            Ok((BencodeValue::Dictionary(dict), 26)),
            decode_prefix(b"d4:asdf4:fdsa4:fdsa4:asdfe")
        );
    }

    #[test]
    fn malformed_inputs_report_specific_kinds() {
        let kind = |inp: &[u8]| decode(inp).map_err(|e| e.kind());

        assert_eq!(Err(DecodeErrorKind::MalformedLength), kind(b"4asdf"));
        assert_eq!(Err(DecodeErrorKind::UnterminatedCollection), kind(b"l4:asdf"));
        assert_eq!(Err(DecodeErrorKind::InvalidInteger), kind(b"i12x3e"));
        assert_eq!(Err(DecodeErrorKind::UnexpectedEndOfInput), kind(b"10:short"));
        assert_eq!(Err(DecodeErrorKind::UnterminatedCollection), kind(b"d4:asdf4:fdsa"));
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(Ok((BencodeValue::Integer(5), 3)), decode_prefix(b"i5ei6e"));
        assert_eq!(Ok(bs("ab")), decode(b"2:abXYZ"));
    }

    #[test]
    fn metainfo_fixture_with_whitespace() {
        let input = b"d
  8:announce
    41:http://bttracker.debian.org:6969/announce
  7:comment
    35:\"Debian CD from cdimage.debian.org\"
  13:creation date
    i1573903810e
  4:info
    d
      6:length
        i351272960e
      4:name
        31:debian-10.2.0-amd64-netinst.iso
      12:piece length
        i262144e
      6:pieces
        8:asdffdsa
    e
e";

        assert_eq!(Err(DecodeErrorKind::MalformedLength), decode(input).map_err(|e| e.kind()));

        let (value, consumed) = decode_with(input, &DecodeOptions::lenient()).unwrap();
        assert_eq!(input.len(), consumed);
        let info = value.get("info").unwrap();
        assert_eq!(Some(&bs("asdffdsa")), info.get("pieces"));
        assert_eq!(Some(262144), info.get("piece length").and_then(BencodeValue::as_integer));
        assert_eq!(Some(1573903810), value.get("creation date").and_then(BencodeValue::as_integer));

        // re-encoding drops the whitespace
        let compact = encode(&value);
        assert_eq!(Ok((value, compact.len())), decode_prefix(&compact));
    }

    #[test]
    fn canonical_encoding_is_opt_in() {
        let value = decode(b"d1:bi1e1:ai2ee").unwrap();
        assert_eq!(b"d1:bi1e1:ai2ee".to_vec(), encode(&value));
        assert_eq!(b"d1:ai2e1:bi1ee".to_vec(), value.encode_canonical());
    }

    fn arb_value() -> impl Strategy<Value = BencodeValue> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(BencodeValue::Integer),
            proptest::collection::vec(any::<u8>(), 0..16).prop_map(BencodeValue::from),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(BencodeValue::List),
                proptest::collection::vec((inner.clone(), inner), 0..6)
                    .prop_map(|entries| entries.into_iter().collect::<BencodeValue>()),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(value in arb_value()) {
            let wire = encode(&value);
            let (decoded, consumed) = decode_prefix(&wire).unwrap();
            prop_assert_eq!(&value, &decoded);
            prop_assert_eq!(wire.len(), consumed);
        }

        #[test]
        fn prop_trailing_bytes_do_not_change_consumed(value in arb_value(), tail in proptest::collection::vec(any::<u8>(), 0..8)) {
            let mut wire = encode(&value);
            let len = wire.len();
            wire.extend(tail);
            prop_assert_eq!(Ok((value, len)), decode_prefix(&wire));
        }

        #[test]
        fn prop_arbitrary_bytes_never_panic(input in proptest::collection::vec(any::<u8>(), 0..64)) {
            if let Ok((_, consumed)) = decode_prefix(&input) {
                prop_assert!(consumed <= input.len());
            }
        }
    }
}
