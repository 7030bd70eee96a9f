//! Media kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of binary content a media asset holds.
///
/// The kind is part of the storage addressing scheme, so identical bytes
/// uploaded as different kinds are stored twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Audio clip.
    Audio,
}

impl MediaKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = catalog_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            _ => Err(catalog_core::AppError::unsupported_kind(format!(
                "Unsupported media kind: '{s}'. Expected one of: image, audio"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::ErrorKind;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Image".parse::<MediaKind>().unwrap(), MediaKind::Image);
        assert_eq!(" AUDIO ".parse::<MediaKind>().unwrap(), MediaKind::Audio);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let err = "video".parse::<MediaKind>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedKind);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&MediaKind::Audio).unwrap();
        assert_eq!(json, "\"audio\"");
    }
}
