//! Sparse edge-presence encoding of one lattice.
//!
//! A presence map is an ordered list of `"A-B"` edge keys, each flagged
//! present or absent. Order follows the source columns and duplicates are
//! kept, so this is a list of entries rather than a hash map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Whether an edge exists in a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presence {
    Present,
    #[default]
    Absent,
}

impl Presence {
    /// Exactly `1` is present; every other flag is absent.
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    /// Coerce a raw JSON value.
    ///
    /// Only numbers equal to 1 are present. Strings are absent even when
    /// they spell a number: `"1"` is not the flag `1`. Null, booleans and
    /// containers are absent too.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::from_flag(i)
                } else if n.as_f64() == Some(1.0) {
                    Presence::Present
                } else {
                    Presence::Absent
                }
            }
            _ => Presence::Absent,
        }
    }

    pub fn is_present(self) -> bool {
        self == Presence::Present
    }

    /// The 0/1 flag written back to JSON.
    pub fn as_flag(self) -> u8 {
        match self {
            Presence::Present => 1,
            Presence::Absent => 0,
        }
    }
}

/// One column of a presence map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    /// Raw edge key, possibly still carrying a `.N` suffix.
    pub key: String,
    pub presence: Presence,
}

/// Ordered edge-key to presence mapping for a single lattice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMap {
    entries: Vec<PresenceEntry>,
}

impl PresenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, flag)` pairs using [`Presence::from_flag`].
    pub fn from_flags<K, I>(flags: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, i64)>,
    {
        flags
            .into_iter()
            .map(|(key, flag)| (key, Presence::from_flag(flag)))
            .collect()
    }

    pub fn push(&mut self, key: impl Into<String>, presence: Presence) {
        self.entries.push(PresenceEntry {
            key: key.into(),
            presence,
        });
    }

    pub fn entries(&self) -> &[PresenceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PresenceEntry> {
        self.entries.iter()
    }

    /// Keys of present entries, in map order.
    pub fn present_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.presence.is_present())
            .map(|e| e.key.as_str())
    }

    pub fn present_count(&self) -> usize {
        self.present_keys().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Presence)> for PresenceMap {
    fn from_iter<I: IntoIterator<Item = (K, Presence)>>(iter: I) -> Self {
        let mut map = PresenceMap::new();
        for (key, presence) in iter {
            map.push(key, presence);
        }
        map
    }
}

impl<'a> IntoIterator for &'a PresenceMap {
    type Item = &'a PresenceEntry;
    type IntoIter = std::slice::Iter<'a, PresenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Serialized as a flat JSON object in entry order, flags written as 0/1.
impl Serialize for PresenceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.presence.as_flag())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PresenceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PresenceMapVisitor)
    }
}

struct PresenceMapVisitor;

impl<'de> Visitor<'de> for PresenceMapVisitor {
    type Value = PresenceMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat object of edge keys to presence flags")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PresenceMap::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.push(key, Presence::from_json(&value));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_flag() {
        assert_eq!(Presence::from_flag(1), Presence::Present);
        assert_eq!(Presence::from_flag(0), Presence::Absent);
        assert_eq!(Presence::from_flag(2), Presence::Absent);
        assert_eq!(Presence::from_flag(-1), Presence::Absent);
    }

    #[test]
    fn test_from_json_silently_coerces_bad_values() {
        assert!(Presence::from_json(&json!(1)).is_present());
        assert!(Presence::from_json(&json!(1.0)).is_present());

        // Data-entry mistakes are absorbed as "absent", never reported.
        assert!(!Presence::from_json(&json!(null)).is_present());
        assert!(!Presence::from_json(&json!(2)).is_present());
        assert!(!Presence::from_json(&json!(0.5)).is_present());
        assert!(!Presence::from_json(&json!("x")).is_present());
        assert!(!Presence::from_json(&json!("1")).is_present());
        assert!(!Presence::from_json(&json!(" 1 ")).is_present());
        assert!(!Presence::from_json(&json!("1.0")).is_present());
        assert!(!Presence::from_json(&json!(true)).is_present());
        assert!(!Presence::from_json(&json!([1])).is_present());
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let map: PresenceMap =
            serde_json::from_str(r#"{"9-8": 1, "1-2": 0, "3-4.1": 1, "5-6": null}"#).unwrap();
        let keys: Vec<&str> = map.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["9-8", "1-2", "3-4.1", "5-6"]);
        let present: Vec<&str> = map.present_keys().collect();
        assert_eq!(present, vec!["9-8", "3-4.1"]);
    }

    #[test]
    fn test_deserialize_keeps_duplicate_keys() {
        let map: PresenceMap = serde_json::from_str(r#"{"1-2": 1, "1-2": 1}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.present_count(), 2);
    }

    #[test]
    fn test_serialize_writes_flags() {
        let map: PresenceMap = [("1-2", Presence::Present), ("2-3", Presence::Absent)]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"1-2":1,"2-3":0}"#
        );
    }

    #[test]
    fn test_string_flags_load_as_absent() {
        let map: PresenceMap = serde_json::from_str(r#"{"1-2": "1", "2-3": 1}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.present_keys().collect::<Vec<_>>(), vec!["2-3"]);
    }

    #[test]
    fn test_from_flags() {
        let map = PresenceMap::from_flags([("1-2", 1), ("2-3", 0), ("3-4", 7)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.present_keys().collect::<Vec<_>>(), vec!["1-2"]);
    }
}
