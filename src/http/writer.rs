use std::time::SystemTime;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Version used for error responses, which are not tied to a parsed request.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line, the fixed header block and the body.
pub fn serialize_response(version: &str, resp: &Response, date: SystemTime) -> Bytes {
    let head = format!(
        "{} {} {}\r\nDate: {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        version,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        httpdate::fmt_http_date(date),
        resp.content_type,
        resp.content_length(),
    );

    let mut buf = BytesMut::with_capacity(head.len() + resp.body.len());
    buf.put_slice(head.as_bytes());
    buf.put_slice(&resp.body);
    buf.freeze()
}

pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(version: &str, response: &Response) -> Self {
        Self {
            buffer: serialize_response(version, response, SystemTime::now()),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
