use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Payment methods, card tokens and similar values that must stay out of logs.
///
/// `Debug` and `Display` only ever show the last four characters of long values.
/// Serialization writes the real value, since requests are forwarded to partners verbatim.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

fn mask(raw: &str) -> String {
    let len = raw.chars().count();
    if len <= 8 {
        return "********".to_string();
    }
    let tail: String = raw.chars().skip(len - 4).collect();
    format!("****{}", tail)
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(self.0.as_ref()))
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask(self.0.as_ref()))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}
