mod reference;

pub use self::reference::ModReference;

/// Strips every whitespace character, not just the ends: listing anchors wrap
/// the package name across several indented lines.
fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().chars().filter(|c| !c.is_whitespace()).collect()
}
