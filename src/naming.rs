//! Output file naming.
//!
//! Every branded image is written as PNG, so the display name of an image is
//! its original file name with the final extension swapped for `.png`:
//!
//! - `IMG_0042.JPG` → `IMG_0042.png`
//! - `archive.tar.gz` → `archive.tar.png` (only the last extension goes)
//! - `README` → `README.png`
//! - `.hidden` → `.png` (the whole name counts as an extension)
//! - `trailing.` → `trailing..png` (an empty extension is not an extension)

use std::collections::HashSet;

/// Extension of every exported file.
pub const OUTPUT_EXTENSION: &str = "png";

/// Original name with its final extension replaced by `.png`.
pub fn display_name(original_name: &str) -> String {
    format!("{}.{OUTPUT_EXTENSION}", strip_extension(original_name))
}

/// Strip a trailing `.ext` where `ext` is non-empty and has no `/` or `.`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    }
}

/// `name`, or `name` with a `-2`, `-3`, ... suffix before the extension if it
/// is already in `used`. The returned name is recorded in `used`.
///
/// Two inputs from different folders can share a file name; in a flat output
/// directory the later one must not overwrite the earlier.
pub fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let stem = strip_extension(name);
    let ext = &name[stem.len()..];
    let mut n = 2u32;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
