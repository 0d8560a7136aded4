//! Lexical path canonicalization.
//!
//! `clean_path` is used by the router before attempting a case-insensitive
//! fixed-path correction: superfluous elements like `..` and `//` are removed
//! first, so the tree walk only ever sees a normalized path.

/// Canonicalize a URL path without touching the filesystem or the tree.
///
/// The returned path always starts with `/`. Repeated separators are
/// collapsed, `.` segments are dropped, and `..` segments remove the previous
/// segment (never climbing above the root). A trailing slash is preserved,
/// including one implied by a final `.` segment.
///
/// ```
/// use radix_mux::clean_path;
///
/// assert_eq!(clean_path("/abc//def"), "/abc/def");
/// assert_eq!(clean_path("/abc/def/../ghi/"), "/abc/ghi/");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(p: &str) -> String {
    if p.is_empty() {
        return "/".to_string();
    }

    // A final "." only asks for the directory index, so it keeps the slash.
    let trailing = (p.len() > 1 && p.ends_with('/')) || p.ends_with("/.");

    let mut segments: Vec<&str> = Vec::new();
    for segment in p.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(p.len() + 1);
    for s in &segments {
        out.push('/');
        out.push_str(s);
    }
    if out.is_empty() {
        out.push('/');
    }
    if trailing && out.len() > 1 {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_table() {
        let cases = [
            // Already clean
            ("/", "/"),
            ("/abc", "/abc"),
            ("/a/b/c", "/a/b/c"),
            ("/abc/", "/abc/"),
            ("/a/b/c/", "/a/b/c/"),
            // Missing root
            ("", "/"),
            ("a/", "/a/"),
            ("abc", "/abc"),
            ("abc/def", "/abc/def"),
            // Remove doubled slash
            ("//", "/"),
            ("/abc//", "/abc/"),
            ("/abc/def//", "/abc/def/"),
            ("/abc//def//ghi", "/abc/def/ghi"),
            ("//abc", "/abc"),
            ("///abc", "/abc"),
            ("//abc//", "/abc/"),
            // Remove . elements
            (".", "/"),
            ("./", "/"),
            ("/abc/./def", "/abc/def"),
            ("/./abc/def", "/abc/def"),
            ("/abc/.", "/abc/"),
            // Remove .. elements
            ("..", "/"),
            ("../", "/"),
            ("../../", "/"),
            ("../..", "/"),
            ("../../abc", "/abc"),
            ("/abc/def/ghi/../jkl", "/abc/def/jkl"),
            ("/abc/def/../ghi/../jkl", "/abc/jkl"),
            ("/abc/def/..", "/abc"),
            ("/abc/def/../..", "/"),
            ("/abc/def/../../..", "/"),
            ("/abc/def/../../../ghi/jkl/../../../mno", "/mno"),
            // Combinations
            ("abc/./../def", "/def"),
            ("abc//./../def", "/def"),
            ("abc/../../././../def", "/def"),
        ];

        for (input, expected) in cases {
            assert_eq!(clean_path(input), expected, "clean_path({input:?})");
        }
    }

    #[test]
    fn test_clean_path_idempotent() {
        for p in ["/abc//def/../ghi/", "abc/..", "/./", "/a/b/c"] {
            let once = clean_path(p);
            assert_eq!(clean_path(&once), once);
        }
    }
}
