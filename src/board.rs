// Board variant to firmware asset mapping

use std::fmt;

use crate::release::ReleaseDescriptor;

/// Fallback asset name used for boards without a dedicated build.
pub const GENERIC_ASSET_NAME: &str = "firmware.bin";

/// Sentinel variant for hosts that never configured a board; always maps to
/// the generic asset.
pub const UNKNOWN_VARIANT: &str = "UNKNOWN";

// Variant identifier -> release asset filename. Adding a board is one new
// row here; call sites go through asset_name_for.
const BOARD_ASSETS: &[(&str, &str)] = &[
    ("ESP32_DEVKIT", "firmware-esp32-devkit.bin"),
    ("ESP32_S2", "firmware-esp32-s2.bin"),
    ("ESP32_S3", "firmware-esp32-s3.bin"),
    ("ESP32_C3", "firmware-esp32-c3.bin"),
    ("ESP32_PICO", "firmware-esp32-pico.bin"),
];

/// The release carried no asset under the name selected for this board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetNotFound {
    pub asset: &'static str,
}

impl fmt::Display for AssetNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "release has no asset named {:?}", self.asset)
    }
}

impl std::error::Error for AssetNotFound {}

/// Maps a board variant to the asset filename expected in a release.
/// Unrecognized variants (including [`UNKNOWN_VARIANT`]) get the generic name.
pub fn asset_name_for(variant: &str) -> &'static str {
    BOARD_ASSETS
        .iter()
        .find(|(board, _)| *board == variant)
        .map(|(_, asset)| *asset)
        .unwrap_or(GENERIC_ASSET_NAME)
}

/// Looks up the download URL for this board's asset in a release.
///
/// The lookup is exact: a recognized board whose dedicated asset is missing
/// gets `AssetNotFound` even when `firmware.bin` is present. Whether that is
/// fatal for the check cycle is the caller's call.
pub fn resolve_asset_url<'a>(
    release: &'a ReleaseDescriptor,
    variant: &str,
) -> Result<&'a str, AssetNotFound> {
    let asset = asset_name_for(variant);
    release
        .assets
        .get(asset)
        .map(String::as_str)
        .ok_or(AssetNotFound { asset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use std::collections::BTreeMap;

    fn release_with(assets: &[(&str, &str)]) -> ReleaseDescriptor {
        ReleaseDescriptor {
            tag: "v1.1".to_string(),
            version: Version::from_code(101),
            assets: assets
                .iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_known_board_gets_dedicated_asset() {
        assert_eq!(asset_name_for("ESP32_DEVKIT"), "firmware-esp32-devkit.bin");
        assert_eq!(asset_name_for("ESP32_S3"), "firmware-esp32-s3.bin");
    }

    #[test]
    fn test_unknown_board_gets_generic_asset() {
        assert_eq!(asset_name_for("UNKNOWN_BOARD"), GENERIC_ASSET_NAME);
        assert_eq!(asset_name_for(UNKNOWN_VARIANT), GENERIC_ASSET_NAME);
    }

    #[test]
    fn test_resolve_url_for_known_board() {
        let release = release_with(&[(
            "firmware-esp32-devkit.bin",
            "https://example.com/fw-devkit.bin",
        )]);
        assert_eq!(
            resolve_asset_url(&release, "ESP32_DEVKIT").unwrap(),
            "https://example.com/fw-devkit.bin"
        );
    }

    #[test]
    fn test_no_silent_fallback_to_generic_asset() {
        // Generic asset present, but the board-specific one is what we asked for
        let release = release_with(&[("firmware.bin", "https://example.com/fw.bin")]);
        let err = resolve_asset_url(&release, "ESP32_DEVKIT").unwrap_err();
        assert_eq!(err.asset, "firmware-esp32-devkit.bin");
    }

    #[test]
    fn test_missing_generic_asset_is_not_found() {
        let release = release_with(&[]);
        let err = resolve_asset_url(&release, UNKNOWN_VARIANT).unwrap_err();
        assert_eq!(err.asset, GENERIC_ASSET_NAME);
    }
}
