//! Classification of remote URL values
//!
//! A remote value takes one of four shapes: a scheme-qualified URL, SCP-like
//! shorthand, a local path, or something unrecognized. Classification is total:
//! malformed input is `Unrecognized`, never an error.

use crate::domain::RemoteKind;

/// A classified remote value, borrowing the host from the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteUrl<'a> {
    /// `scheme://[user[:pass]@]host[:port]/path`
    Url { scheme: &'a str, host: &'a str },
    /// `[user@]host:path`
    ScpLike { host: &'a str },
    /// Filesystem path or `file://` URL
    Local,
    /// No host could be read
    Unrecognized,
}

impl<'a> RemoteUrl<'a> {
    /// Classify a remote value
    pub fn parse(value: &'a str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::Unrecognized;
        }

        if let Some((scheme, rest)) = value.split_once("://") {
            return Self::parse_scheme_url(scheme, rest);
        }

        if is_local_path(value) {
            return Self::Local;
        }

        Self::parse_scp_like(value)
    }

    fn parse_scheme_url(scheme: &'a str, rest: &'a str) -> Self {
        if !is_valid_scheme(scheme) {
            return Self::Unrecognized;
        }
        if scheme.eq_ignore_ascii_case("file") {
            return Self::Local;
        }

        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];
        let host_port = match authority.rfind('@') {
            Some(at) => &authority[at + 1..],
            None => authority,
        };

        match split_host(host_port) {
            Some((host, _)) => Self::Url { scheme, host },
            None => Self::Unrecognized,
        }
    }

    fn parse_scp_like(value: &'a str) -> Self {
        // The user part may not contain ':' or '/', so the first '@' before
        // any of those ends it.
        let after_user = match value.find(['@', ':', '/']) {
            Some(at) if value.as_bytes()[at] == b'@' => &value[at + 1..],
            _ => value,
        };

        let (host, rest) = match split_host(after_user) {
            Some(split) => split,
            None => return Self::Unrecognized,
        };

        // SCP-like requires `host:` with no '/' ahead of the colon
        if !rest.starts_with(':') || host.contains('/') {
            return Self::Unrecognized;
        }

        Self::ScpLike { host }
    }

    /// Host part, for shapes that carry one
    pub fn host(&self) -> Option<&'a str> {
        match self {
            Self::Url { host, .. } | Self::ScpLike { host } => Some(host),
            Self::Local | Self::Unrecognized => None,
        }
    }

    /// Registrable domain of the host, for shapes that carry one
    pub fn domain(&self) -> Option<&'a str> {
        self.host().and_then(registrable_domain)
    }

    pub fn kind(&self) -> RemoteKind {
        match self {
            Self::Url { .. } => RemoteKind::Url,
            Self::ScpLike { .. } => RemoteKind::ScpLike,
            Self::Local => RemoteKind::Local,
            Self::Unrecognized => RemoteKind::Unrecognized,
        }
    }
}

/// Reduce a host to its last two dot-separated labels.
///
/// Not public-suffix aware: `git.example.co.uk` reduces to `co.uk`. Hosts with
/// fewer than two labels come back unchanged, as do IP literals. Returns
/// `None` for an empty host.
pub fn registrable_domain(host: &str) -> Option<&str> {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    if host.starts_with('[') || is_ipv4(host) {
        return Some(host);
    }

    let mut dots = host.rmatch_indices('.').map(|(i, _)| i);
    let _last = dots.next();
    match dots.next() {
        Some(second_last) => Some(&host[second_last + 1..]),
        None => Some(host),
    }
}

/// Split `host[:rest]`, keeping bracketed IPv6 literals whole.
///
/// Returns the host and whatever follows it (starting at ':' if present).
fn split_host(input: &str) -> Option<(&str, &str)> {
    let (host, rest) = if input.starts_with('[') {
        let close = input.find(']')?;
        input.split_at(close + 1)
    } else {
        let end = input.find(':').unwrap_or(input.len());
        input.split_at(end)
    };

    if host.is_empty() || host == "[]" {
        None
    } else {
        Some((host, rest))
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_local_path(value: &str) -> bool {
    if value.starts_with('/') || value.starts_with("./") || value.starts_with("../") {
        return true;
    }
    if value == "." || value == ".." {
        return true;
    }

    // Drive-letter paths such as `C:/repo` or `C:\repo`
    let bytes = value.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'/' | b'\\')
}

fn is_ipv4(host: &str) -> bool {
    host.split('.').count() == 4 && host.split('.').all(|part| part.parse::<u8>().is_ok())
}
