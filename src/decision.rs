// Update-or-not comparison

use crate::release::ReleaseDescriptor;
use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    UpToDate,
    Available { version: Version, tag: String },
}

/// Strictly-greater comparison: an equal or lower registry version is never
/// an update, so test builds running ahead of the registry stay put.
pub fn evaluate(running: Version, release: &ReleaseDescriptor) -> Decision {
    if release.version > running {
        Decision::Available {
            version: release.version,
            tag: release.tag.clone(),
        }
    } else {
        Decision::UpToDate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn release(code: u32) -> ReleaseDescriptor {
        ReleaseDescriptor {
            tag: Version::from_code(code).to_string(),
            version: Version::from_code(code),
            assets: BTreeMap::new(),
        }
    }

    #[test]
    fn test_equal_version_is_up_to_date() {
        assert_eq!(
            evaluate(Version::from_code(100), &release(100)),
            Decision::UpToDate
        );
    }

    #[test]
    fn test_newer_release_is_available() {
        match evaluate(Version::from_code(100), &release(101)) {
            Decision::Available { version, .. } => assert_eq!(version, Version::from_code(101)),
            other => panic!("expected Available, got {other:?}"),
        }
    }

    #[test]
    fn test_no_downgrade_path() {
        assert_eq!(
            evaluate(Version::from_code(150), &release(100)),
            Decision::UpToDate
        );
    }
}
