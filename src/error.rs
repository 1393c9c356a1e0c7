use thiserror::Error;

/// Errors surfaced to the caller of the extraction pipeline.
///
/// Every variant carries a fixed, user-presentable message; the machine-readable
/// category comes from [`ExtractError::kind`]. Extractor-internal failures
/// (malformed markup, segmentation errors, missing fields) never show up here;
/// they degrade to "no result" inside the tier that hit them.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// URL scheme is not http or https
    #[error("Only http and https URLs are supported.")]
    UnsupportedScheme,

    /// URL has no usable hostname
    #[error("That doesn't look like a valid URL.")]
    MalformedUrl,

    /// URL resolves to a private, loopback, or link-local address
    #[error("Requests to private or internal addresses are not allowed.")]
    PrivateAddress,

    /// Hostname did not resolve
    #[error("Could not resolve the site's address. Check the URL.")]
    DnsFailure,

    /// Request exceeded the fetch timeout
    #[error("Request timed out. The site may be slow or down.")]
    Timeout,

    /// Connection refused or unreachable
    #[error("Could not connect to the site. Check the URL.")]
    Connect,

    /// Upstream returned a non-2xx status
    #[error("{}", http_status_message(*status))]
    HttpStatus { status: u16 },

    /// Any other transport failure
    #[error("Could not fetch the URL. Check the URL and try again.")]
    Network,

    /// Every tier declined to produce a recipe
    #[error("No recipe found on that page. Try a different URL.")]
    NoRecipeFound,
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Http,
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Http => "http",
            ErrorKind::Parse => "parse",
        }
    }
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::UnsupportedScheme
            | ExtractError::MalformedUrl
            | ExtractError::PrivateAddress => ErrorKind::Validation,
            ExtractError::DnsFailure
            | ExtractError::Timeout
            | ExtractError::Connect
            | ExtractError::Network => ErrorKind::Network,
            ExtractError::HttpStatus { .. } => ErrorKind::Http,
            ExtractError::NoRecipeFound => ErrorKind::Parse,
        }
    }
}

fn http_status_message(status: u16) -> String {
    match status {
        401 | 403 => format!("The site blocked automated access (HTTP {status})."),
        404 => "That page was not found (HTTP 404).".to_string(),
        500..=599 => format!("The site had a server problem (HTTP {status}). Try again later."),
        _ => format!("The site returned an error (HTTP {status})."),
    }
}
