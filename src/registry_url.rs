//! Registry URL handling.
//!
//! Parses submitted URLs, converts them into the canonical registry form and
//! answers "is this repository under that organization" questions. Only the
//! parts of a URL the registry compares (scheme, host, path) are kept.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;
use std::fmt;

/// Scheme every normalized URL uses.
pub const CANONICAL_SCHEME: &str = "https";

/// Suffix appended to every non-root normalized path.
pub const GIT_SUFFIX: &str = ".git";

/// Bytes escaped when a decoded path is written back out.
const PATH_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Error returned for a string that cannot be read as a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse \"{input}\": {reason}")]
pub struct UrlParseError {
    input: String,
    reason: &'static str,
}

/// A URL split into the components the registry cares about.
///
/// Query and fragment are discarded. The host keeps any port and the path
/// keeps its leading slash when present. The path is stored percent-decoded
/// and re-escaped on display. Relative references (no scheme,
/// no host) are accepted, the way a lenient URL parser would.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl ParsedUrl {
    /// Parse `input` into scheme, host and path.
    pub fn parse(input: &str) -> Result<Self, UrlParseError> {
        let fail = |reason| UrlParseError {
            input: input.to_string(),
            reason,
        };

        if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(fail("invalid character in URL"));
        }

        let without_fragment = input.split('#').next().unwrap_or_default();
        let rest = without_fragment.split('?').next().unwrap_or_default();

        let (scheme, rest) = split_scheme(rest).map_err(fail)?;

        let Some(after_slashes) = rest.strip_prefix("//") else {
            return Ok(Self {
                scheme,
                host: String::new(),
                path: decode_path(rest).map_err(fail)?,
            });
        };

        let (authority, path) = match after_slashes.find('/') {
            Some(index) => after_slashes.split_at(index),
            None => (after_slashes, ""),
        };
        let host = match authority.rsplit_once('@') {
            Some((_userinfo, host)) => host,
            None => authority,
        };
        if host.contains(['/', '\\']) {
            return Err(fail("invalid host"));
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            path: decode_path(path).map_err(fail)?,
        })
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.scheme.is_empty() || !self.host.is_empty() {
            write!(f, "//{}", self.host)?;
        }
        write!(f, "{}", utf8_percent_encode(&self.path, PATH_ESCAPE))
    }
}

/// Percent-decode a raw path. Every `%` must start a two-digit hex escape.
fn decode_path(raw: &str) -> Result<String, &'static str> {
    let bytes = raw.as_bytes();
    for (index, _) in raw.match_indices('%') {
        let escape = bytes.get(index + 1..index + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err("invalid URL escape");
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| "invalid UTF-8 in URL path")
}

/// Split a leading `scheme:` off `input`.
///
/// A colon before the first slash must terminate a valid scheme name.
fn split_scheme(input: &str) -> Result<(String, &str), &'static str> {
    let Some(colon) = input.find(':') else {
        return Ok((String::new(), input));
    };
    if input.find('/').is_some_and(|slash| slash < colon) {
        return Ok((String::new(), input));
    }

    let (scheme, rest) = input.split_at(colon);
    let mut chars = scheme.chars();
    match chars.next() {
        None => return Err("missing protocol scheme"),
        Some(first) if !first.is_ascii_alphabetic() => {
            return Err("first path segment in URL cannot contain colon");
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return Err("invalid character in scheme");
    }

    Ok((scheme.to_ascii_lowercase(), &rest[1..]))
}

/// Canonical registry form of a repository URL: `https://host/path[.git]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl NormalizedUrl {
    /// Last path segment without the `.git` suffix (empty for root URLs).
    pub fn repository_name(&self) -> &str {
        let base = self.path.rsplit('/').next().unwrap_or_default();
        base.strip_suffix(GIT_SUFFIX).unwrap_or(base)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}",
            self.scheme,
            self.host,
            utf8_percent_encode(&self.path, PATH_ESCAPE)
        )
    }
}

/// Convert a URL into the standardized form used in the registry.
///
/// - the scheme is always `https`
/// - the host is kept as is
/// - `.` and `..` segments are resolved and empty segments dropped, which
///   also strips trailing slashes; an empty path becomes `/`
/// - any other path gets a `.git` suffix unless it already has one
pub fn normalize(url: &ParsedUrl) -> NormalizedUrl {
    let segments = resolved_segments(&url.path);
    let path = if segments.is_empty() {
        // A suffix on a bare host makes no sense.
        "/".to_string()
    } else {
        let leading = if url.path.starts_with('/') { "/" } else { "" };
        let joined = format!("{}{}", leading, segments.join("/"));
        if joined.ends_with(GIT_SUFFIX) {
            joined
        } else {
            joined + GIT_SUFFIX
        }
    };

    NormalizedUrl {
        scheme: CANONICAL_SCHEME.to_string(),
        host: url.host.clone(),
        path,
    }
}

/// Whether `child` lives at or below any of `candidates`.
///
/// Each candidate is a `host[/path]` prefix such as `github.com/arduino`.
/// Containment is by host equality and whole path segments, so
/// `github.com/foo` contains `/foo/bar.git` but not `/foobar.git`.
pub fn is_under<S: AsRef<str>>(child: &NormalizedUrl, candidates: &[S]) -> bool {
    candidates.iter().any(|candidate| {
        let candidate = candidate.as_ref();
        let prefix = if candidate.ends_with('/') {
            format!("https://{}", candidate)
        } else {
            format!("https://{}/", candidate)
        };

        match ParsedUrl::parse(&prefix) {
            Ok(parent) => child.host == parent.host && path_within(&child.path, &parent.path),
            Err(e) => {
                log::warn!("ignoring unusable organization prefix '{}': {}", candidate, e);
                false
            }
        }
    })
}

/// Directory containment: `child` equals `parent` or descends from it,
/// compared after resolving both paths.
fn path_within(child: &str, parent: &str) -> bool {
    resolved_segments(child).starts_with(&resolved_segments(parent))
}

/// Path segments with empty and `.` segments dropped and `..` applied.
///
/// `..` never climbs above the root.
fn resolved_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(input: &str) -> NormalizedUrl {
        normalize(&ParsedUrl::parse(input).unwrap())
    }

    #[test]
    fn test_parse_components() {
        let url = ParsedUrl::parse("https://user@github.com:443/foo/bar?x=1#readme").unwrap();
        assert_eq!(url.scheme, "https");
        assert_eq!(url.host, "github.com:443");
        assert_eq!(url.path, "/foo/bar");
    }

    #[test]
    fn test_parse_relative_reference() {
        let url = ParsedUrl::parse("foo").unwrap();
        assert_eq!(url.scheme, "");
        assert_eq!(url.host, "");
        assert_eq!(url.path, "foo");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ParsedUrl::parse("https://github.com/foo bar").is_err());
        assert!(ParsedUrl::parse("://github.com/foo").is_err());
        assert!(ParsedUrl::parse("1http://github.com/foo").is_err());
    }

    #[test]
    fn test_parse_error_message_names_input() {
        let err = ParsedUrl::parse("://x").unwrap_err();
        assert_eq!(err.to_string(), "parse \"://x\": missing protocol scheme");
    }

    #[test]
    fn test_parsed_url_display() {
        let url = ParsedUrl::parse("git://github.com/foo/bar").unwrap();
        assert_eq!(url.to_string(), "git://github.com/foo/bar");
        assert_eq!(ParsedUrl::parse("foo").unwrap().to_string(), "foo");
    }

    #[test]
    fn test_normalize_cases() {
        let cases = [
            ("https://github.com/foo/bar/", "https://github.com/foo/bar.git"),
            ("https://github.com/foo/bar.git", "https://github.com/foo/bar.git"),
            ("http://github.com/foo/bar", "https://github.com/foo/bar.git"),
            ("git://github.com/foo/bar", "https://github.com/foo/bar.git"),
            ("https://github.com", "https://github.com/"),
            ("https://github.com/", "https://github.com/"),
            ("https://github.com//", "https://github.com/"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalized(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_is_scheme_and_slash_invariant() {
        let forms = [
            "https://github.com/foo/bar",
            "http://github.com/foo/bar/",
            "git://github.com/foo/bar.git",
            "https://github.com/foo/bar.git/",
        ];
        let expected = normalized(forms[0]);
        for form in forms {
            assert_eq!(normalized(form), expected, "form: {}", form);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [
            "https://github.com/foo/bar",
            "https://github.com",
            "git://gitlab.com/group/sub/project.git/",
        ] {
            let once = normalized(input);
            let reparsed = normalized(&once.to_string());
            assert_eq!(once, reparsed, "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_never_doubles_suffix() {
        let url = normalized("https://github.com/foo/bar.git");
        assert!(url.path.ends_with(".git"));
        assert!(!url.path.ends_with(".git.git"));
    }

    #[test]
    fn test_repository_name() {
        assert_eq!(normalized("https://github.com/foo/Servo").repository_name(), "Servo");
        assert_eq!(normalized("https://gitlab.com/a/b/c.git").repository_name(), "c");
        assert_eq!(normalized("https://github.com").repository_name(), "");
    }

    #[test]
    fn test_is_under_root_path() {
        let child = normalized("https://github.com/foo/bar");
        assert!(is_under(&child, &["example.com", "github.com"]));
        assert!(!is_under(&child, &["example.com", "example.org"]));
    }

    #[test]
    fn test_is_under_subfolder() {
        let child = normalized("https://github.com/foo/bar");
        assert!(is_under(&child, &["example.com/foo", "github.com/foo"]));
        assert!(!is_under(&child, &["example.com/foo", "github.org/bar"]));
    }

    #[test]
    fn test_is_under_root_child() {
        let child = normalized("https://github.com/");
        assert!(is_under(&child, &["example.com", "github.com"]));
        assert!(!is_under(&child, &["example.com", "github.org"]));
    }

    #[test]
    fn test_is_under_respects_segment_boundary() {
        let child = normalized("https://github.com/foobar");
        assert!(!is_under(&child, &["github.com/foo"]));

        let child = normalized("https://github.com/foo");
        assert!(!is_under(&child, &["github.com/foo"]), "suffix makes it foo.git");
    }

    #[test]
    fn test_is_under_same_path_matches() {
        let child = NormalizedUrl {
            scheme: "https".to_string(),
            host: "example.com".to_string(),
            path: "/foo".to_string(),
        };
        assert!(is_under(&child, &["example.com/foo"]));
        assert!(is_under(&child, &["example.com/foo/"]));
    }

    #[test]
    fn test_is_under_different_host_never_matches() {
        let child = normalized("https://github.com/foo/bar");
        assert!(!is_under(&child, &["example.com/foo"]));
    }

    #[test]
    fn test_is_under_is_case_sensitive() {
        let child = normalized("https://github.com/Azure/iot");
        assert!(is_under(&child, &["github.com/Azure"]));
        assert!(!is_under(&child, &["github.com/azure"]));
    }

    #[test]
    fn test_is_under_empty_candidates() {
        let child = normalized("https://github.com/foo/bar");
        let none: [&str; 0] = [];
        assert!(!is_under(&child, &none));
    }

    #[test]
    fn test_is_under_warns_on_unusable_prefix() {
        let mut logger = logtest::Logger::start();
        let child = normalized("https://github.com/foo/bar");

        assert!(!is_under(&child, &["github .com/foo"]));

        let mut warned = false;
        while let Some(record) = logger.pop() {
            if record.args().to_string().contains("'github .com/foo'") {
                warned = true;
                break;
            }
        }
        assert!(warned, "expected unusable prefix warning to be logged");
    }

    #[test]
    fn test_parse_decodes_path() {
        let url = ParsedUrl::parse("https://github.com/foo/b%61r%20baz").unwrap();
        assert_eq!(url.path, "/foo/bar baz");
        assert_eq!(url.to_string(), "https://github.com/foo/bar%20baz");
    }

    #[test]
    fn test_parse_rejects_bad_escapes() {
        for input in [
            "https://github.com/foo/%zz",
            "https://github.com/foo/bar%",
            "https://github.com/foo/%4",
            "https://github.com/foo/%ff",
        ] {
            assert!(ParsedUrl::parse(input).is_err(), "input: {}", input);
        }
        let err = ParsedUrl::parse("https://github.com/%zz").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse \"https://github.com/%zz\": invalid URL escape"
        );
    }

    #[test]
    fn test_normalize_matches_encoded_form() {
        assert_eq!(
            normalized("https://github.com/foo/b%61r"),
            normalized("https://github.com/foo/bar")
        );
        assert_eq!(
            normalized("https://github.com/foo/my%20lib").to_string(),
            "https://github.com/foo/my%20lib.git"
        );
    }

    #[test]
    fn test_normalize_resolves_dot_segments() {
        let cases = [
            ("https://github.com/foo/../sparkfun/Lib", "https://github.com/sparkfun/Lib.git"),
            ("https://github.com/foo/./bar", "https://github.com/foo/bar.git"),
            ("https://github.com/../../foo/bar", "https://github.com/foo/bar.git"),
            ("https://github.com/foo/..", "https://github.com/"),
            ("https://github.com//foo//bar", "https://github.com/foo/bar.git"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalized(input).to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_is_under_resolves_dot_segments() {
        let raw = |path: &str| NormalizedUrl {
            scheme: "https".to_string(),
            host: "github.com".to_string(),
            path: path.to_string(),
        };

        assert!(is_under(&raw("/foo/../sparkfun/Lib.git"), &["github.com/sparkfun"]));
        assert!(!is_under(&raw("/sparkfun/../foo/Lib.git"), &["github.com/sparkfun"]));
        assert!(is_under(&raw("/sparkfun/../foo/Lib.git"), &["github.com/foo"]));
        assert!(!is_under(&raw("/../sparkfunny/Lib.git"), &["github.com/sparkfun"]));
        assert!(is_under(&raw("/a/b.git"), &["github.com/x/../a"]));
    }
}
