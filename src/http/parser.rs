//! Incremental request tokenizer boundary.
//!
//! # Responsibilities
//! - Drive `httparse` over the bytes received in one cycle
//! - Report the interpreted byte count, upgrade flag, and last method
//! - Feed each URL / header-field token to an observation hook
//!
//! # Design Decisions
//! - Parser state is private to one connection's cycle and never reused
//! - Token hooks are diagnostic only; they perform no semantic
//!   accumulation and never influence the response
//! - A partial parse reports zero interpreted bytes, so a truncated
//!   request fails the interpreted == received check downstream while
//!   empty input (end-of-input convention) passes it

/// Header table capacity for one request.
pub const MAX_HEADERS: usize = 32;

/// Observation hook for tokens seen while parsing.
///
/// Implementations receive each token opaquely; they must not build
/// request state that the cycle depends on.
pub trait TokenSink: Send {
    /// Called with the request target once the request line is parsed.
    fn on_url(&mut self, raw: &[u8]);

    /// Called with each header field name.
    fn on_header_field(&mut self, name: &[u8]);
}

/// Default sink: logs tokens at trace level.
#[derive(Debug, Default)]
pub struct TraceSink;

impl TokenSink for TraceSink {
    fn on_url(&mut self, raw: &[u8]) {
        tracing::trace!(url = %String::from_utf8_lossy(raw), "URL token");
    }

    fn on_header_field(&mut self, name: &[u8]) {
        tracing::trace!(header = %String::from_utf8_lossy(name), "Header field token");
    }
}

/// What one execute step interpreted.
#[derive(Debug)]
pub struct ParseReport {
    /// Bytes successfully interpreted. Zero for a partial parse.
    pub consumed: usize,
    /// Whether the request head was fully parsed.
    pub complete: bool,
    /// The client asked to switch protocols (an `Upgrade` header).
    pub upgrade: bool,
    /// Last observed request method, if the request line was parsed.
    pub method: Option<String>,
}

/// Execute the tokenizer over the bytes received so far.
///
/// Returns a report on success, or the tokenizer's error for malformed
/// input. Each URL and header-field token is handed to `sink` as it is
/// observed.
pub fn execute(input: &[u8], sink: &mut dyn TokenSink) -> Result<ParseReport, httparse::Error> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut request = httparse::Request::new(&mut headers);

    match request.parse(input)? {
        httparse::Status::Complete(consumed) => {
            if let Some(path) = request.path {
                sink.on_url(path.as_bytes());
            }

            let mut upgrade = false;
            for header in request.headers.iter() {
                sink.on_header_field(header.name.as_bytes());
                if header.name.eq_ignore_ascii_case("upgrade") {
                    upgrade = true;
                }
            }

            Ok(ParseReport {
                consumed,
                complete: true,
                upgrade,
                method: request.method.map(str::to_owned),
            })
        }
        httparse::Status::Partial => Ok(ParseReport {
            consumed: 0,
            complete: false,
            upgrade: false,
            method: request.method.map(str::to_owned),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records tokens for assertions.
    #[derive(Default)]
    struct RecordingSink {
        urls: Vec<String>,
        header_fields: Vec<String>,
    }

    impl TokenSink for RecordingSink {
        fn on_url(&mut self, raw: &[u8]) {
            self.urls.push(String::from_utf8_lossy(raw).into_owned());
        }

        fn on_header_field(&mut self, name: &[u8]) {
            self.header_fields
                .push(String::from_utf8_lossy(name).into_owned());
        }
    }

    #[test]
    fn complete_request_consumes_everything() {
        let input = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut sink = RecordingSink::default();

        let report = execute(input, &mut sink).unwrap();

        assert!(report.complete);
        assert_eq!(report.consumed, input.len());
        assert!(!report.upgrade);
        assert_eq!(report.method.as_deref(), Some("GET"));
        assert_eq!(sink.urls, vec!["/"]);
        assert_eq!(sink.header_fields, vec!["Host"]);
    }

    #[test]
    fn partial_request_reports_zero_consumed() {
        let input = b"GET / HTTP/1.1\r\nHost: local";
        let mut sink = RecordingSink::default();

        let report = execute(input, &mut sink).unwrap();

        assert!(!report.complete);
        assert_eq!(report.consumed, 0);
        assert!(sink.urls.is_empty());
    }

    #[test]
    fn empty_input_is_partial_with_zero_consumed() {
        let mut sink = TraceSink;
        let report = execute(b"", &mut sink).unwrap();
        assert!(!report.complete);
        assert_eq!(report.consumed, 0);
    }

    #[test]
    fn upgrade_header_sets_flag() {
        let input = b"GET /chat HTTP/1.1\r\nHost: localhost\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\r\n";
        let mut sink = RecordingSink::default();

        let report = execute(input, &mut sink).unwrap();

        assert!(report.complete);
        assert!(report.upgrade);
        assert_eq!(sink.urls, vec!["/chat"]);
        assert_eq!(
            sink.header_fields,
            vec!["Host", "Upgrade", "Connection"]
        );
    }

    #[test]
    fn malformed_input_is_a_tokenizer_error() {
        let mut sink = TraceSink;
        assert!(execute(b"\x00\x01\x02 nonsense\r\n\r\n", &mut sink).is_err());
    }
}
