use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Credential string that never leaks through `Debug`, `Display` or
/// serialization. Deserializes from a plain string.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_expose_returns_inner() {
        let secret = Secret::new("rest-key");
        assert_eq!(secret.expose(), "rest-key");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("rest-key");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
    }

    #[test]
    fn secret_display_is_redacted() {
        let secret = Secret::new("rest-key");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn secret_deserializes_from_plain_string() {
        #[derive(Deserialize)]
        struct Holder {
            key: Secret,
        }
        let holder: Holder = toml::from_str(r#"key = "abc""#).unwrap();
        assert_eq!(holder.key.expose(), "abc");
    }

    #[test]
    fn secret_serializes_redacted() {
        #[derive(Serialize)]
        struct Holder {
            key: Secret,
        }
        let out = toml::to_string(&Holder {
            key: Secret::new("abc"),
        })
        .unwrap();
        assert_eq!(out.trim(), r#"key = "[REDACTED]""#);
    }

    #[test]
    fn default_secret_is_empty() {
        assert!(Secret::default().is_empty());
    }
}
