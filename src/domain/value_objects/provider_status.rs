use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider-side processing status of a media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderStatus {
    /// Provider finished processing; the media can be served
    Ok,
    /// Content is being sent to a remote backend
    Sending,
    /// Nothing has been processed yet
    Pending,
    /// Processing failed
    Error,
    /// Content is being encoded (video transcoding and similar)
    Encoding,
}

impl ProviderStatus {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Check if the provider still has work to do
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Sending | Self::Pending | Self::Encoding)
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Sending => write!(f, "SENDING"),
            Self::Pending => write!(f, "PENDING"),
            Self::Error => write!(f, "ERROR"),
            Self::Encoding => write!(f, "ENCODING"),
        }
    }
}

impl FromStr for ProviderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "SENDING" => Ok(Self::Sending),
            "PENDING" => Ok(Self::Pending),
            "ERROR" => Ok(Self::Error),
            "ENCODING" => Ok(Self::Encoding),
            _ => Err(format!("Invalid provider status: {s}")),
        }
    }
}
