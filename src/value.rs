use linked_hash_map::LinkedHashMap;

use crate::bytestring::ByteString;

pub type Dictionary = LinkedHashMap<BencodeValue, BencodeValue>;

/// Any decoded bencode value.
///
/// Dictionaries keep insertion order, and that order takes part in equality
/// and hashing: `d1:ai1e1:bi2ee` and `d1:bi2e1:ai1ee` are different values.
/// Keys are arbitrary values. The canonical grammar only allows byte string
/// keys, but nothing here enforces it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum BencodeValue {
    ByteString(ByteString),
    Integer(i64),
    List(Vec<BencodeValue>),
    Dictionary(Dictionary),
}

impl BencodeValue {
    pub fn string<S: AsRef<[u8]>>(s: S) -> BencodeValue {
        BencodeValue::ByteString(ByteString(s.as_ref().to_vec()))
    }

    pub fn as_byte_string(&self) -> Option<&ByteString> {
        match self {
            BencodeValue::ByteString(bs) => Some(bs),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.as_byte_string().map(ByteString::as_bytes)
    }

    /// `None` for non byte strings and for byte strings that are not UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_byte_string().and_then(ByteString::as_str)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BencodeValue::Integer(int) => Some(*int),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[BencodeValue]> {
        match self {
            BencodeValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            BencodeValue::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Looks up a byte string key. `None` if this is not a dictionary.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&BencodeValue> {
        self.get_value(&BencodeValue::string(key))
    }

    /// Looks up an arbitrary key.
    pub fn get_value(&self, key: &BencodeValue) -> Option<&BencodeValue> {
        self.as_dictionary()?.get(key)
    }

    /// Copy of this value with every dictionary, at any depth, reordered
    /// into canonical key order. Byte string keys compare by raw bytes and
    /// come before any other key; other keys compare by their encoding.
    pub fn canonicalize(&self) -> BencodeValue {
        match self {
            BencodeValue::ByteString(_) | BencodeValue::Integer(_) => self.clone(),
            BencodeValue::List(list) => {
                BencodeValue::List(list.iter().map(BencodeValue::canonicalize).collect())
            }
            BencodeValue::Dictionary(dict) => {
                let mut entries: Vec<(BencodeValue, BencodeValue)> = dict
                    .iter()
                    .map(|(k, v)| (k.canonicalize(), v.canonicalize()))
                    .collect();
                entries.sort_by_cached_key(|(k, _)| canonical_sort_key(k));
                BencodeValue::Dictionary(entries.into_iter().collect())
            }
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        crate::bencode::encode(self)
    }

    pub fn encode_canonical(&self) -> Vec<u8> {
        crate::bencode::encode(&self.canonicalize())
    }
}

fn canonical_sort_key(key: &BencodeValue) -> (u8, Vec<u8>) {
    match key {
        BencodeValue::ByteString(bs) => (0, bs.0.clone()),
        other => (1, other.encode()),
    }
}

impl From<ByteString> for BencodeValue {
    fn from(bs: ByteString) -> Self {
        BencodeValue::ByteString(bs)
    }
}

impl From<&str> for BencodeValue {
    fn from(s: &str) -> Self {
        BencodeValue::ByteString(ByteString::from(s))
    }
}

impl From<String> for BencodeValue {
    fn from(s: String) -> Self {
        BencodeValue::ByteString(ByteString::from(s))
    }
}

impl From<&[u8]> for BencodeValue {
    fn from(bytes: &[u8]) -> Self {
        BencodeValue::ByteString(ByteString::from(bytes))
    }
}

impl From<Vec<u8>> for BencodeValue {
    fn from(bytes: Vec<u8>) -> Self {
        BencodeValue::ByteString(ByteString(bytes))
    }
}

impl From<i64> for BencodeValue {
    fn from(int: i64) -> Self {
        BencodeValue::Integer(int)
    }
}

impl From<i32> for BencodeValue {
    fn from(int: i32) -> Self {
        BencodeValue::Integer(int.into())
    }
}

impl From<Vec<BencodeValue>> for BencodeValue {
    fn from(list: Vec<BencodeValue>) -> Self {
        BencodeValue::List(list)
    }
}

impl From<Dictionary> for BencodeValue {
    fn from(dict: Dictionary) -> Self {
        BencodeValue::Dictionary(dict)
    }
}

impl FromIterator<BencodeValue> for BencodeValue {
    fn from_iter<I: IntoIterator<Item = BencodeValue>>(iter: I) -> Self {
        BencodeValue::List(iter.into_iter().collect())
    }
}

impl FromIterator<(BencodeValue, BencodeValue)> for BencodeValue {
    fn from_iter<I: IntoIterator<Item = (BencodeValue, BencodeValue)>>(iter: I) -> Self {
        BencodeValue::Dictionary(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    fn dict(entries: &[(&str, BencodeValue)]) -> BencodeValue {
        entries
            .iter()
            .map(|(k, v)| (BencodeValue::from(*k), v.clone()))
            .collect()
    }

    #[test]
    fn accessors_match_variant() {
        let s = BencodeValue::from("asdf");
        assert_eq!(Some("asdf"), s.as_str());
        assert_eq!(Some(&b"asdf"[..]), s.as_bytes());
        assert_eq!(None, s.as_integer());

        let i = BencodeValue::from(-3);
        assert_eq!(Some(-3), i.as_integer());
        assert_eq!(None, i.as_list());

        let l: BencodeValue = vec![BencodeValue::from(1), BencodeValue::from("a")].into();
        assert_eq!(2, l.as_list().map(<[_]>::len).unwrap_or(0));
        assert_eq!(None, l.as_dictionary());
        assert_eq!(None, l.get("a"));
    }

    #[test]
    fn structural_equality_and_hash() {
        let a = dict(&[("x", BencodeValue::from(vec![BencodeValue::from(1)]))]);
        let b = dict(&[("x", BencodeValue::from(vec![BencodeValue::from(1)]))]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        // values work as dictionary keys, including container keys
        let mut outer = Dictionary::new();
        outer.insert(a, BencodeValue::from("found"));
        assert_eq!(Some(&BencodeValue::from("found")), outer.get(&b));
    }

    #[test]
    fn dictionary_order_matters() {
        let ab = dict(&[("a", 1.into()), ("b", 2.into())]);
        let ba = dict(&[("b", 2.into()), ("a", 1.into())]);
        assert_ne!(ab, ba);
        assert_eq!(ab.get("a"), ba.get("a"));
    }

    #[test]
    fn nested_lookup() {
        let info = dict(&[("pieces", "asdffdsa".into())]);
        let top = dict(&[("announce", "http://tracker".into()), ("info", info)]);
        assert_eq!(Some("asdffdsa"), top.get("info").and_then(|i| i.get("pieces")).and_then(BencodeValue::as_str));
        assert_eq!(None, top.get("missing"));
    }

    #[test]
    fn canonicalize_sorts_recursively() {
        let inner = dict(&[("z", 1.into()), ("aa", 2.into())]);
        let value = dict(&[("b", inner), ("a", BencodeValue::from(vec![dict(&[("y", 0.into()), ("x", 0.into())])]))]);

        let canonical = value.canonicalize();
        let keys: Vec<_> = canonical.as_dictionary().map(|d| d.keys().cloned().collect()).unwrap_or_default();
        assert_eq!(vec![BencodeValue::from("a"), BencodeValue::from("b")], keys);
        assert_eq!(b"d1:ald1:xi0e1:yi0eee1:bd2:aai2e1:zi1eee".to_vec(), value.encode_canonical());
        // original untouched
        assert_eq!(b"d1:bd1:zi1e2:aai2ee1:ald1:yi0e1:xi0eeee".to_vec(), value.encode());
    }

    #[test]
    fn canonicalize_puts_byte_string_keys_first() {
        let mut d = Dictionary::new();
        d.insert(BencodeValue::from(5), BencodeValue::from("int"));
        d.insert(BencodeValue::from("k"), BencodeValue::from("str"));
        let canonical = BencodeValue::Dictionary(d).canonicalize();
        assert_eq!(b"d1:k3:stri5e3:inte".to_vec(), canonical.encode());
    }
}
