/// Reduce a server-supplied image path to its final component.
///
/// The service may answer with `uploads/processed_x.jpg` or a bare name; only
/// the last segment addresses the processed image endpoint. Empty names and
/// `.`/`..` are rejected so the result is always safe to use as a local file
/// name.
pub fn remote_file_name(name: &str) -> Option<&str> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        other => Some(other),
    }
}

/// `base` joined with `file_name`, with exactly one `/` between them.
pub fn processed_image_url(base: &str, file_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file_name)
}
