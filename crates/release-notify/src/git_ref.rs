//! Parsing of version-control ref strings such as `refs/heads/main`.
//!
//! The "Built from" field shows the human-readable part of the ref that
//! triggered the build. Refs are split on `/` and the category segment is
//! dispatched through [`RefKind`]; everything after it is the name, so
//! `refs/heads/feature/login` shortens to `feature/login`.

use thiserror::Error;
use tracing::{debug, warn};

const REFS_PREFIX: &str = "refs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefKind {
    Branch,
    Tag,
    PullRequest,
    Remote,
    Other(String),
}

impl RefKind {
    fn from_segment(segment: &str) -> Self {
        match segment {
            "heads" => RefKind::Branch,
            "tags" => RefKind::Tag,
            "pull" => RefKind::PullRequest,
            "remotes" => RefKind::Remote,
            other => RefKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRef {
    pub kind: RefKind,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefParseError {
    #[error("ref is empty")]
    Empty,
    #[error("ref '{0}' does not start with 'refs/'")]
    MissingPrefix(String),
    #[error("ref '{0}' has no name after its kind")]
    MissingName(String),
}

impl GitRef {
    /// Parse a fully-qualified ref (`refs/<kind>/<name>...`).
    pub fn parse(raw: &str) -> Result<Self, RefParseError> {
        if raw.is_empty() {
            return Err(RefParseError::Empty);
        }

        let mut segments = raw.splitn(3, '/');
        if segments.next() != Some(REFS_PREFIX) {
            return Err(RefParseError::MissingPrefix(raw.to_string()));
        }
        let kind = match segments.next() {
            Some(k) if !k.is_empty() => RefKind::from_segment(k),
            _ => return Err(RefParseError::MissingName(raw.to_string())),
        };
        let name = match segments.next() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Err(RefParseError::MissingName(raw.to_string())),
        };

        Ok(GitRef { kind, name })
    }
}

/// Value shown in the "Built from" field.
///
/// An unset ref yields an empty string. A ref that is not of the
/// `refs/<kind>/<name>` shape is passed through verbatim.
pub fn shorten(raw: &str) -> String {
    match GitRef::parse(raw) {
        Ok(r) => {
            debug!(kind = ?r.kind, name = %r.name, "built from ref");
            r.name
        }
        Err(RefParseError::Empty) => String::new(),
        Err(e) => {
            warn!(error = %e, "using ref verbatim");
            raw.to_string()
        }
    }
}
