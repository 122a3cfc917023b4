use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which prediction the inference service should run on an uploaded sample.
///
/// Sent as the `model_type` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Absorbance,
    Concentration,
    #[default]
    Both,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Absorbance => "absorbance",
            RequestKind::Concentration => "concentration",
            RequestKind::Both => "both",
        }
    }

    /// Whether a successful response must carry a concentration value.
    pub fn expects_concentration(&self) -> bool {
        matches!(self, RequestKind::Concentration | RequestKind::Both)
    }

    /// Whether a successful response must carry an absorbance value.
    pub fn expects_absorbance(&self) -> bool {
        matches!(self, RequestKind::Absorbance | RequestKind::Both)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request kind {0:?} (expected absorbance, concentration or both)")]
pub struct UnknownRequestKind(pub String);

impl FromStr for RequestKind {
    type Err = UnknownRequestKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absorbance" => Ok(RequestKind::Absorbance),
            "concentration" => Ok(RequestKind::Concentration),
            "both" => Ok(RequestKind::Both),
            _ => Err(UnknownRequestKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags() {
        assert_eq!(RequestKind::Absorbance.as_str(), "absorbance");
        assert_eq!(RequestKind::Concentration.as_str(), "concentration");
        assert_eq!(RequestKind::Both.to_string(), "both");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("BOTH".parse::<RequestKind>(), Ok(RequestKind::Both));
        assert_eq!(" absorbance ".parse::<RequestKind>(), Ok(RequestKind::Absorbance));
        assert!("ph".parse::<RequestKind>().is_err());
    }

    #[test]
    fn required_fields_follow_kind() {
        assert!(RequestKind::Both.expects_absorbance());
        assert!(RequestKind::Both.expects_concentration());
        assert!(!RequestKind::Absorbance.expects_concentration());
        assert!(!RequestKind::Concentration.expects_absorbance());
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&RequestKind::Concentration).unwrap();
        assert_eq!(json, "\"concentration\"");
        let back: RequestKind = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(back, RequestKind::Both);
    }
}
