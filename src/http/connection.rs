use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use crate::files::error_page::error_response;
use crate::files::resolver::{DocumentRoot, ResolvedTarget, ServableFile};
use crate::files::sanitize::sanitize;
use crate::http::parser::{ParseError, discard_headers, parse_request_line};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::{HTTP_VERSION, ResponseWriter};
use crate::logging::AccessLog;

/// One client connection, driven from request line to close.
///
/// The stream is owned here and dropped when the connection is, so it is
/// closed exactly once whichever state the handling ends in.
pub struct Connection<S> {
    stream: BufReader<S>,
    peer: String,
    root: DocumentRoot,
    log: AccessLog,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    ReadingRequestLine,
    ReadingHeaders(Request),
    Resolving(Request),
    Writing(Request, Response),
    Logging(Request, StatusCode),
    /// Unparsable input: dropped without a response or log entry.
    Rejected(ParseError),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, root: DocumentRoot, log: AccessLog) -> Self {
        Self {
            stream: BufReader::new(stream),
            peer: peer.into(),
            root,
            log,
            state: ConnectionState::ReadingRequestLine,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub async fn run(&mut self) {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::ReadingRequestLine => {
                    match parse_request_line(&mut self.stream).await {
                        Ok(req) => ConnectionState::ReadingHeaders(req),
                        Err(e) => ConnectionState::Rejected(e),
                    }
                }

                ConnectionState::ReadingHeaders(req) => {
                    match discard_headers(&mut self.stream).await {
                        Ok(()) => ConnectionState::Resolving(req),
                        Err(e) => ConnectionState::Rejected(e),
                    }
                }

                ConnectionState::Resolving(req) => {
                    let response = self.respond(&req).await;
                    ConnectionState::Writing(req, response)
                }

                ConnectionState::Writing(req, response) => {
                    // Error pages are always HTTP/1.1; 200 and 405 echo the client.
                    let version = match response.status {
                        StatusCode::Ok | StatusCode::MethodNotAllowed => req.version.as_str(),
                        _ => HTTP_VERSION,
                    };

                    let mut writer = ResponseWriter::new(version, &response);
                    match writer.write_to_stream(&mut self.stream).await {
                        Ok(()) => ConnectionState::Logging(req, response.status),
                        Err(e) => {
                            tracing::debug!(peer = %self.peer, error = %e, "Write failed");
                            // A half-sent 200 is abandoned; error responses are still logged.
                            if response.status.is_success() {
                                ConnectionState::Closed
                            } else {
                                ConnectionState::Logging(req, response.status)
                            }
                        }
                    }
                }

                ConnectionState::Logging(req, status) => {
                    self.log.request(&self.peer, &req.line, status);
                    ConnectionState::Closed
                }

                ConnectionState::Rejected(e) => {
                    tracing::debug!(peer = %self.peer, error = %e, "Dropping connection");
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }
    }

    /// Decides the full response for a parsed request.
    async fn respond(&self, req: &Request) -> Response {
        if !req.method.is_get() {
            return Response::fallback(StatusCode::MethodNotAllowed);
        }

        let clean = match sanitize(&req.path) {
            Ok(clean) => clean,
            Err(e) => {
                tracing::debug!(peer = %self.peer, path = %req.path, error = %e, "Rejected path");
                return error_response(&self.root, StatusCode::Forbidden).await;
            }
        };

        let file = match self.root.resolve(&clean).await {
            ResolvedTarget::File(file) | ResolvedTarget::DirectoryIndex(file) => file,
            ResolvedTarget::NotFound => {
                return error_response(&self.root, StatusCode::NotFound).await;
            }
            ResolvedTarget::Forbidden => {
                return error_response(&self.root, StatusCode::Forbidden).await;
            }
        };

        self.serve_file(file).await
    }

    /// Reads a resolved file into a 200 response, or a 500 if reading fails.
    async fn serve_file(&self, file: ServableFile) -> Response {
        let content_type = file.content_type;
        let path = file.path.clone();
        match file.read_body().await {
            Ok(body) => Response::ok(content_type, body),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Read error");
                error_response(&self.root, StatusCode::InternalServerError).await
            }
        }
    }
}
