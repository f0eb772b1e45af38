//! Cache slot naming.

/// Multi-part extensions, checked before the trailing extension.
const COMPOUND_EXTENSIONS: &[&str] = &[".tar.gz", ".tar.xz", ".tar.bz2", ".tar.zst"];

/// Single extensions kept on cache slots. Anything else (e.g. the `.0` in
/// `node-v20.11.0`) is part of a version string, not a format.
const KNOWN_EXTENSIONS: &[&str] = &[
    "zip", "tgz", "tbz", "tbz2", "txz", "tar", "gz", "xz", "bz2", "zst", "jar", "7z", "msi",
    "pkg", "dmg", "exe",
];

/// Cache slot file name for one artifact: `<type>-<version><ext>`.
pub fn cache_key(sdk_type: &str, version: &str, url: &str) -> String {
    format!("{}-{}{}", sdk_type, version, infer_extension(url))
}

/// Infer an archive extension (with leading dot) from a download URL.
///
/// Query string and fragment are ignored. Returns an empty string when the
/// last path segment carries no recognized extension.
pub fn infer_extension(url: &str) -> String {
    let file_name = url_file_name(url).to_ascii_lowercase();

    if let Some(ext) = COMPOUND_EXTENSIONS
        .iter()
        .find(|ext| file_name.len() > ext.len() && file_name.ends_with(*ext))
    {
        return (*ext).to_string();
    }

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && KNOWN_EXTENSIONS.contains(&ext) => {
            format!(".{}", ext)
        }
        _ => String::new(),
    }
}

/// Last path segment of a URL, without query or fragment.
fn url_file_name(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    path.rsplit('/').next().unwrap_or(path)
}
