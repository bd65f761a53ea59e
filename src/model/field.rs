use serde::{ser::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// A persisted value with an optional default.
///
/// Encodes as the bare resolved value (value, else default). Decoding sets
/// both value and default from the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    value: Option<T>,
    default: Option<T>,
}

impl<T> Field<T> {
    /// A field whose value falls back to `default` until set.
    pub fn new(default: T) -> Self {
        Self {
            value: None,
            default: Some(default),
        }
    }

    /// A field with no value and no default, as found in fault shells.
    pub fn unloaded() -> Self {
        Self {
            value: None,
            default: None,
        }
    }

    /// The resolved value: value, else default.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref().or(self.default.as_ref())
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Whether the field can be encoded.
    pub fn is_resolved(&self) -> bool {
        self.get().is_some()
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::unloaded()
    }
}

impl<T> From<T> for Field<T> {
    fn from(default: T) -> Self {
        Self::new(default)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => value.serialize(serializer),
            None => Err(S::Error::custom("field has neither a value nor a default")),
        }
    }
}

impl<'de, T: Deserialize<'de> + Clone> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = T::deserialize(deserializer)?;
        Ok(Self {
            value: Some(stored.clone()),
            default: Some(stored),
        })
    }
}
