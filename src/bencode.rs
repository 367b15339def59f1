use std::any::Any;
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hash};

use linked_hash_map::LinkedHashMap;
use tracing::debug;

use crate::bytestring::ByteString;
use crate::error::EncodeError;
use crate::value::{BencodeValue, Dictionary};

/// Anything with a bencode form. Implemented for the four shapes the
/// format knows about (byte strings, integers, sequences, mappings), so
/// an unsupported input is a compile error on this path.
///
/// Mappings are written in their own iteration order; keys are not sorted.
pub trait ToBencode {
    fn write_bencode(&self, buf: &mut Vec<u8>);
}

pub fn encode<T: ToBencode + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.write_bencode(&mut buf);
    buf
}

fn encode_type(bencoding: &BencodeValue, buf: &mut Vec<u8>) {
    match bencoding {
        BencodeValue::Integer(int) => encode_int(*int, buf),
        BencodeValue::ByteString(bytes) => encode_bytestring(&bytes.0, buf),
        BencodeValue::List(list) => encode_list(list, buf),
        BencodeValue::Dictionary(dict) => encode_dict(dict, buf),
    };
}

fn encode_dict<'a, K, V, I>(entries: I, buf: &mut Vec<u8>)
where
    K: ToBencode + ?Sized + 'a,
    V: ToBencode + ?Sized + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    buf.push(b'd');
    for (key, val) in entries {
        key.write_bencode(buf);
        val.write_bencode(buf);
    }
    buf.push(b'e');
}

fn encode_list<T: ToBencode>(list: &[T], buf: &mut Vec<u8>) {
    buf.push(b'l');
    for item in list {
        item.write_bencode(buf);
    }
    buf.push(b'e')
}

fn encode_bytestring(bytes: &[u8], buf: &mut Vec<u8>) {
    encode_num(bytes.len(), buf);
    buf.push(b':');
    buf.extend_from_slice(bytes);
}

fn encode_int<N: ToString>(int: N, buf: &mut Vec<u8>) {
    buf.push(b'i');
    encode_num(int, buf);
    buf.push(b'e');
}

// Plain decimal: `0` for zero, a leading `-` only for negatives.
fn encode_num<N: ToString>(int: N, buf: &mut Vec<u8>) {
    buf.extend(int.to_string().bytes());
}

impl ToBencode for BencodeValue {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_type(self, buf)
    }
}

impl ToBencode for ByteString {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_bytestring(&self.0, buf)
    }
}

impl ToBencode for str {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_bytestring(self.as_bytes(), buf)
    }
}

impl ToBencode for String {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_bytestring(self.as_bytes(), buf)
    }
}

// u8 is left out so that byte buffers are not mistaken for integer lists.
macro_rules! int_to_bencode {
    ($($t:ty),*) => {
        $(
            impl ToBencode for $t {
                fn write_bencode(&self, buf: &mut Vec<u8>) {
                    encode_int(*self, buf)
                }
            }
        )*
    };
}

int_to_bencode!(i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);

impl<T: ToBencode> ToBencode for [T] {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_list(self, buf)
    }
}

impl<T: ToBencode, const N: usize> ToBencode for [T; N] {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_list(self, buf)
    }
}

impl<T: ToBencode> ToBencode for Vec<T> {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_list(self, buf)
    }
}

impl<K, V, S> ToBencode for LinkedHashMap<K, V, S>
where
    K: ToBencode + Hash + Eq,
    V: ToBencode,
    S: BuildHasher,
{
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_dict(self.iter(), buf)
    }
}

impl<K: ToBencode, V: ToBencode> ToBencode for BTreeMap<K, V> {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        encode_dict(self.iter(), buf)
    }
}

impl<T: ToBencode + ?Sized> ToBencode for &T {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        (**self).write_bencode(buf)
    }
}

impl<T: ToBencode + ?Sized> ToBencode for Box<T> {
    fn write_bencode(&self, buf: &mut Vec<u8>) {
        (**self).write_bencode(buf)
    }
}

/// Encodes a value whose shape is only known at runtime.
///
/// Recognized leaves: [`BencodeValue`], [`ByteString`], `String`,
/// `&'static str`, `Vec<u8>` (as a byte string) and the integer primitives
/// other than `u8`. Recognized containers: `Vec<Box<dyn Any>>` as a list and
/// `Vec<(Box<dyn Any>, Box<dyn Any>)>` as a mapping in vector order. Boxed
/// values are looked through. Anything else is rejected on the spot.
pub fn encode_any(input: &dyn Any) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_dyn(input, "$", &mut buf).map_err(|err| {
        debug!(error = %err, "bencode encode rejected input");
        err
    })?;
    Ok(buf)
}

macro_rules! try_typed {
    ($input:expr, $buf:expr, $($t:ty),*) => {
        $(
            if let Some(v) = $input.downcast_ref::<$t>() {
                v.write_bencode($buf);
                return Ok(());
            }
        )*
    };
}

fn encode_dyn(input: &dyn Any, path: &str, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    try_typed!(input, buf, BencodeValue, ByteString, String, &'static str);
    try_typed!(input, buf, i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);

    if let Some(bytes) = input.downcast_ref::<Vec<u8>>() {
        encode_bytestring(bytes, buf);
        return Ok(());
    }
    if let Some(inner) = input.downcast_ref::<Box<dyn Any>>() {
        return encode_dyn(&**inner, path, buf);
    }
    if let Some(list) = input.downcast_ref::<Vec<Box<dyn Any>>>() {
        buf.push(b'l');
        for (i, item) in list.iter().enumerate() {
            encode_dyn(&**item, &format!("{}[{}]", path, i), buf)?;
        }
        buf.push(b'e');
        return Ok(());
    }
    if let Some(entries) = input.downcast_ref::<Vec<(Box<dyn Any>, Box<dyn Any>)>>() {
        buf.push(b'd');
        for (i, (key, val)) in entries.iter().enumerate() {
            encode_dyn(&**key, &format!("{}[{}].key", path, i), buf)?;
            encode_dyn(&**val, &format!("{}[{}].value", path, i), buf)?;
        }
        buf.push(b'e');
        return Ok(());
    }
    if let Some(dict) = input.downcast_ref::<Dictionary>() {
        encode_dict(dict.iter(), buf);
        return Ok(());
    }

    Err(EncodeError::UnsupportedType { path: path.to_string() })
}
