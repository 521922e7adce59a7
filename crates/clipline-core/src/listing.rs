use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Marker that terminates the pid segment of a listing URL path.
const EXTENSION_MARKER: &str = ".htm";

const PID_LENGTH: usize = 10;

/// A validated listing identifier: exactly ten ASCII digits.
///
/// The pid is the primary key for archive records and is extracted from
/// the last path segment of a listing URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(String);

impl Pid {
    /// Creates a `Pid` after validating the candidate.
    pub fn new(candidate: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let candidate = candidate.into();
        if !Self::is_valid(&candidate) {
            return Err(CoreError::InvalidListing(format!(
                "pid must be exactly {} digits, got '{}'",
                PID_LENGTH, candidate
            )));
        }
        Ok(Self(candidate))
    }

    /// Returns true iff the candidate is exactly a 10-digit numeric token.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == PID_LENGTH && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns the pid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stable identity for a listing URL.
///
/// The `uuid` is a v5 UUID of the full URL under the URL namespace, so the
/// same URL always yields the same UUID regardless of pid extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingId {
    pid: Pid,
    uuid: Uuid,
    url: String,
}

impl ListingId {
    /// Derives a `ListingId` from a listing URL.
    ///
    /// The pid is the last path segment before the `.htm` extension marker
    /// and must be a valid 10-digit token. Fails with `InvalidListing`
    /// before any cache or network access happens.
    pub fn parse(url: &str) -> std::result::Result<Self, CoreError> {
        let marker = url.rfind(EXTENSION_MARKER).ok_or_else(|| {
            CoreError::InvalidListing(format!("no '{}' segment in '{}'", EXTENSION_MARKER, url))
        })?;
        let head = &url[..marker];
        let segment = head.rsplit('/').next().unwrap_or(head);
        let pid = Pid::new(segment)?;
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes());

        Ok(Self {
            pid,
            uuid,
            url: url.to_string(),
        })
    }

    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
