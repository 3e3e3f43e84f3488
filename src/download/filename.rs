// src/download/filename.rs
// =============================================================================
// Destination file names for downloaded images.
//
// Format: {index, zero-padded}-{basename}.{extension}
//
// - the index keeps same-named images from different hosts apart
// - the basename is the last path segment, cut to its last 200 characters
// - the extension always agrees with the validated image type: an existing
//   image extension is kept or replaced, anything else gets one appended
// =============================================================================

use crate::location::Location;
use crate::media;
use std::path::Path;

pub const MAX_BASENAME_CHARS: usize = 200;

const FALLBACK_BASENAME: &str = "image";

// Digits needed for the largest index
pub fn pad_width(total: usize) -> usize {
    total.max(1).to_string().len()
}

// Builds the file name for one image
//
// Parameters:
//   index: position of the image in the (sorted) image set
//   width: zero-padding width, see pad_width
//   location: where the image came from
//   extension: validated canonical extension ("jpg", "png", ...)
//
// Example:
//   (3, 2, "https://a.example/pics/cat.jpeg", "jpg") -> "03-cat.jpeg"
//   (3, 2, "https://a.example/show.php", "png")      -> "03-show.php.png"
pub fn destination_name(
    index: usize,
    width: usize,
    location: &Location,
    extension: &str,
) -> String {
    let basename = location
        .basename()
        .map(|name| sanitize(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_BASENAME.to_string());

    let (stem, ext) = split_extension(&basename, extension);
    let stem = truncate_tail(stem, MAX_BASENAME_CHARS);
    format!("{:0width$}-{}.{}", index, stem, ext, width = width)
}

fn split_extension<'a>(basename: &'a str, validated: &str) -> (&'a str, String) {
    let path = Path::new(basename);
    let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
        return (basename, validated.to_string());
    };
    let (Some(stem), Some(ext)) = (stem.to_str(), ext.to_str()) else {
        return (basename, validated.to_string());
    };

    match media::canonical_extension(ext) {
        // Same type under another spelling (".jpeg" for "jpg"): keep it
        Some(canonical) if canonical == validated => (stem, ext.to_string()),
        // Another image type: replace
        Some(_) => (stem, validated.to_string()),
        // Not an image extension at all: append
        None => (basename, validated.to_string()),
    }
}

// Keeps the last `max` characters
pub fn truncate_tail(name: &str, max: usize) -> &str {
    let count = name.chars().count();
    if count <= max {
        return name;
    }
    let skip = count - max;
    let start = name
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &name[start..]
}

// Characters that are not valid in file names on common filesystems
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
