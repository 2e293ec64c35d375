//! Path utilities for uploaded filenames.
//!
//! Uploaded files keep only their original extension; everything else about
//! the client-supplied name is discarded. Stored names are checked to be a
//! single plain path component before they are joined onto a directory.

use std::path::{Component, Path};

/// Longest extension kept from an uploaded filename.
const MAX_EXTENSION_LEN: usize = 10;

/// Extract the extension of an uploaded filename, lower-cased.
///
/// Returns `None` when the name has no extension or when the extension
/// contains anything other than ASCII letters and digits.
///
/// # Examples
///
/// ```
/// use menagerie_common::paths::normalized_extension;
///
/// assert_eq!(normalized_extension("aria.png").as_deref(), Some("png"));
/// assert_eq!(normalized_extension("C:\\photos\\ARIA.JPEG").as_deref(), Some("jpeg"));
/// assert_eq!(normalized_extension("README"), None);
/// assert_eq!(normalized_extension("evil.p/ng"), None);
/// ```
pub fn normalized_extension(original_name: &str) -> Option<String> {
    // Browsers on Windows may send the full client path.
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check that `name` is exactly one normal path component.
///
/// # Examples
///
/// ```
/// use menagerie_common::paths::is_plain_file_name;
///
/// assert!(is_plain_file_name("image-abc.png"));
/// assert!(!is_plain_file_name("../metadata.json"));
/// assert!(!is_plain_file_name("nested/image.png"));
/// assert!(!is_plain_file_name(""));
/// ```
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
