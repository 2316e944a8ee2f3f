// Release tag parsing and version comparison

use std::fmt;

/// Firmware version encoded as `MAJOR * 100 + MINOR`.
///
/// Derived from release tags of the form `vMAJOR.MINOR` (the leading `v` is
/// optional). The encoding is intentionally flat: a minor component of 100 or
/// more shifts into the major digits, so `v1.100` and `v2.0` collide to the
/// same code. That ambiguity comes with the tag scheme and is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    MalformedTag,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedTag => write!(f, "tag is not of the form vMAJOR.MINOR"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Version {
    /// Wraps a version code the host compiled in (e.g. `102` for v1.2).
    pub const fn from_code(code: u32) -> Self {
        Version(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    /// Parses a release tag like `v1.23` or `1.23` into a version code.
    pub fn parse(tag: &str) -> Result<Self, ParseError> {
        let tag = tag.strip_prefix('v').unwrap_or(tag);
        let (major, minor) = tag.split_once('.').ok_or(ParseError::MalformedTag)?;
        if major.is_empty() || minor.is_empty() {
            return Err(ParseError::MalformedTag);
        }
        if !is_digits(major) || !is_digits(minor) {
            return Err(ParseError::MalformedTag);
        }
        let major: u32 = major.parse().map_err(|_| ParseError::MalformedTag)?;
        let minor: u32 = minor.parse().map_err(|_| ParseError::MalformedTag)?;
        let code = major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .ok_or(ParseError::MalformedTag)?;
        Ok(Version(code))
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Version {
    // MAJOR.MINOR with the minor zero-padded to two digits. Display-only:
    // lossy when the original minor had three or more digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
