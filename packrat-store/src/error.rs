//! Error types for packrat-store.

use thiserror::Error;

/// All errors that can arise from object-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected our credentials (HTTP 401/403). Fatal.
    #[error("authentication rejected by the object store (HTTP {status})")]
    Auth { status: u16 },

    /// The store returned a non-success status for a well-formed request.
    #[error("object store API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Connection / DNS / TLS failure before any status was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store's response could not be decoded.
    #[error("malformed object store response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for StoreError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status @ (401 | 403), _) => StoreError::Auth { status },
            ureq::Error::Status(status, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "<unreadable body>".to_owned());
                StoreError::Api {
                    status,
                    message: truncate(&message, 200),
                }
            }
            ureq::Error::Transport(t) => StoreError::Transport(t.to_string()),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "aé".repeat(100);
        let t = truncate(&s, 5);
        assert!(t.len() <= 8);
        assert!(t.ends_with('…'));
    }

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate("ok", 200), "ok");
    }
}
