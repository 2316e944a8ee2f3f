// HTTP transport seam
//
// The agent never owns a socket. The embedding firmware supplies whatever
// client its platform has (EspHttpConnection, reqwest, a test mock) behind
// this trait; the agent only needs GET with a streamed body.

use std::io::Read;

/// A single streamed GET response.
pub struct HttpResponse<B> {
    /// HTTP status code as received.
    pub status: u16,
    /// Declared body length from the Content-Length header, if any.
    pub content_length: Option<u64>,
    /// Body stream; read in bounded chunks, never buffered whole by the agent.
    pub body: B,
}

/// Blocking HTTP GET capability provided by the host.
///
/// Implementations report transport-level failures (DNS, TLS, timeouts)
/// through the `anyhow::Error`; non-2xx statuses are returned as a normal
/// response and judged by the caller.
pub trait HttpClient {
    type Body: Read;

    fn get(&mut self, url: &str) -> anyhow::Result<HttpResponse<Self::Body>>;
}

impl<B> HttpResponse<B> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
