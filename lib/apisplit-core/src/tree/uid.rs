/// Joins uid segments with `/`.
///
/// Segments are trimmed of leading and trailing slashes; empty ones are skipped.
///
/// ```rust
/// use apisplit_core::tree::join_uid;
///
/// assert_eq!(join_uid(["petstore.io", "/v1/", "Petstore"]), "petstore.io/v1/Petstore");
/// assert_eq!(join_uid(["", "/", "Petstore"]), "Petstore");
/// ```
pub fn join_uid<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// The anchor id of an item with that uid.
pub fn html_id(uid: &str) -> String {
    slug::slugify(uid)
}
