//! Routing client error types.

use std::fmt;

/// Errors from the routing HTTP client.
///
/// Recalculation absorbs all of these uniformly: a failed lookup leaves
/// the affected leg without a travel time, it never aborts the
/// operation that triggered it.
#[derive(Debug)]
pub enum RoutingError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider returned an error HTTP status code
    Api { status: u16, message: String },

    /// Provider answered but its payload status was not OK
    Provider {
        status: String,
        message: Option<String>,
    },

    /// No route between the two points (empty route list or a response
    /// missing the duration field)
    NoRoute,
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::Http(e) => write!(f, "HTTP error: {e}"),
            RoutingError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RoutingError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            RoutingError::Provider { status, message } => {
                write!(f, "provider status {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            RoutingError::NoRoute => write!(f, "no route found between the given points"),
        }
    }
}

impl std::error::Error for RoutingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoutingError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        RoutingError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RoutingError::NoRoute;
        assert_eq!(err.to_string(), "no route found between the given points");

        let err = RoutingError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = RoutingError::Provider {
            status: "OVER_QUERY_LIMIT".into(),
            message: Some("quota exceeded".into()),
        };
        assert_eq!(
            err.to_string(),
            "provider status OVER_QUERY_LIMIT: quota exceeded"
        );

        let err = RoutingError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));
    }
}
