/// User-defined object metadata
use std::collections::HashMap;

/// Header prefix S3 uses for user metadata on the wire
pub const USER_METADATA_PREFIX: &str = "x-amz-meta-";

/// User metadata attached to a stored object.
///
/// S3 lower-cases metadata names and some clients keep the `x-amz-meta-`
/// header prefix, so names are normalized on insert and lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    entries: HashMap<String, String>,
}

impl ObjectMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries.insert(normalize(name.as_ref()), value.into());
    }

    /// Look up a metadata value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over normalized `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn normalize(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase();
    match lowered.strip_prefix(USER_METADATA_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

impl From<HashMap<String, String>> for ObjectMetadata {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ObjectMetadata
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = ObjectMetadata::new();
        for (name, value) in iter {
            metadata.insert(name, value);
        }
        metadata
    }
}
