use serde::{
    de::{Deserializer, Error as DeError, Unexpected, Visitor},
    Deserialize, Serialize,
};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    marker::PhantomData,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct AssetId(pub u64);

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct GroupId(pub u64);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct UserId(pub u64);

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for AssetId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for GroupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// The assets API is inconsistent about ids: some payloads carry them as JSON
// numbers, others (notably the operation result envelope) as decimal strings.
struct IdVisitor<V> {
    _p: PhantomData<V>,
}

impl<'de, V> Visitor<'de> for IdVisitor<V>
where
    V: From<u64>,
{
    type Value = V;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("a roblox id")
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Self::Value::from(v))
    }

    fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        #[allow(clippy::cast_sign_loss)]
        let val = v as u64;
        self.visit_u64(val)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(IdVisitor { _p: PhantomData })
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        let value = v.parse().map_err(|_| {
            let unexpected = Unexpected::Str(v);
            DeError::invalid_value(unexpected, &"a u64 string")
        })?;

        self.visit_u64(value)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor { _p: PhantomData })
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor { _p: PhantomData })
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor { _p: PhantomData })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_number() {
        let id = serde_json::from_str::<AssetId>("7132858975").unwrap();
        assert_eq!(id, AssetId(7_132_858_975));
    }

    #[test]
    fn id_from_string() {
        let id = serde_json::from_str::<AssetId>("\"7132858975\"").unwrap();
        assert_eq!(id, AssetId(7_132_858_975));
    }

    #[test]
    fn id_rejects_garbage() {
        assert!(serde_json::from_str::<UserId>("\"seven\"").is_err());
    }
}
