use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::http::request::Request;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The request line was missing or not exactly three tokens.
    #[error("malformed request line")]
    Malformed,
    /// The stream ended before the blank line closing the header block.
    #[error("connection closed before end of headers")]
    UnexpectedEof,
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one LF-terminated line and strips every trailing CR and LF.
///
/// A stream that ends before the line feed counts as a malformed request,
/// mirroring a client that hung up mid-request.
pub async fn read_request_line<R>(reader: &mut R) -> Result<String, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf).await?;

    if buf.last() != Some(&b'\n') {
        return Err(ParseError::Malformed);
    }

    // Invalid UTF-8 is replaced rather than rejected; the token count decides.
    let line = String::from_utf8_lossy(&buf);
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads the request line and splits it into a [`Request`].
pub async fn parse_request_line<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_request_line(reader).await?;
    Request::from_line(&line).ok_or(ParseError::Malformed)
}

/// Consumes header lines until a line that is exactly CRLF.
///
/// Header contents are ignored. Header bytes need not be UTF-8.
pub async fn discard_headers<R>(reader: &mut R) -> Result<(), ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line).await?;

        if n == 0 || line.last() != Some(&b'\n') {
            return Err(ParseError::UnexpectedEof);
        }

        if line == b"\r\n" {
            return Ok(());
        }
    }
}
