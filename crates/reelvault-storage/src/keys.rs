//! Storage key generation.
//!
//! Basenames are collision-resistant by randomness (32 bytes, never checked
//! against existing keys) and carry a file extension derived from the media
//! type. Naming never fails: unusable media types fall back to `.bin`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

const RANDOM_BYTES: usize = 32;
const FALLBACK_EXTENSION: &str = "bin";

/// Generate a random, URL-safe basename for an uploaded asset:
/// base64url (no padding) over 32 random bytes, plus a media-type extension.
pub fn random_asset_name(media_type: &str) -> String {
    let mut raw = [0u8; RANDOM_BYTES];
    rand::rng().fill_bytes(&mut raw);
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(raw),
        extension_for(media_type)
    )
}

/// File extension for a `type/subtype` media type; `bin` for anything that
/// does not split into exactly two non-empty parts.
pub fn extension_for(media_type: &str) -> &str {
    let mut parts = media_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(subtype), None) if !kind.is_empty() && !subtype.is_empty() => subtype,
        _ => FALLBACK_EXTENSION,
    }
}

/// Join a classification prefix and a basename into a storage key.
pub fn prefixed_key(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_media_type() {
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpeg");
    }

    #[test]
    fn test_extension_falls_back_to_bin() {
        assert_eq!(extension_for("notamediatype"), "bin");
        assert_eq!(extension_for("a/b/c"), "bin");
        assert_eq!(extension_for("video/"), "bin");
        assert_eq!(extension_for("/mp4"), "bin");
        assert_eq!(extension_for(""), "bin");
    }

    #[test]
    fn test_asset_name_shape() {
        let name = random_asset_name("video/mp4");
        let (base, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "mp4");
        // 32 bytes base64-encoded without padding is 43 characters.
        assert_eq!(base.len(), 43);
        assert!(base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_asset_names_are_unique() {
        let a = random_asset_name("video/mp4");
        let b = random_asset_name("video/mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("landscape", "abc.mp4"), "landscape/abc.mp4");
    }
}
