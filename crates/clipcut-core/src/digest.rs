//! Stable, seed-independent 64-bit content hashing.
//!
//! Used for scheduler artifact digests (step name + upstream digests + step
//! config) and for the caption content fingerprint returned by the semantic
//! analyzer port. `xxh3` is deterministic across platforms and does not
//! depend on a random seed, unlike `std::hash::RandomState`.

use xxhash_rust::xxh3::xxh3_64;

/// Opaque stable digest, serialized as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(u64);

impl Digest {
    /// Hash a single byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(xxh3_64(bytes))
    }

    /// Hash an ordered sequence of string-like parts, joined with `|` the
    /// way the caption fingerprint is defined.
    pub fn of_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("|");
        Self::of_bytes(joined.as_bytes())
    }

    /// Combine this digest with another, producing a new stable digest.
    /// Used to fold a step's own config digest together with each of its
    /// dependencies' digests into one input digest.
    pub fn combine(&self, other: &Digest) -> Self {
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(&self.0.to_le_bytes());
        buf.extend_from_slice(&other.0.to_le_bytes());
        Self::of_bytes(&buf)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl serde::Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let v = u64::from_str_radix(&s, 16).map_err(serde::de::Error::custom)?;
        Ok(Digest(v))
    }
}

/// Hash an arbitrary serde-serializable value by its canonical JSON form.
/// Used to digest step configuration blocks.
pub fn digest_value<T: serde::Serialize>(value: &T) -> crate::Result<Digest> {
    let bytes = serde_json::to_vec(value)?;
    Ok(Digest::of_bytes(&bytes))
}
