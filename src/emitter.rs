//! Response emission.
//!
//! [`WriterEmitter`] serializes a [`Response`] to any [`io::Write`]: the
//! status line, one line per header value, a blank line and the body.
//! An emitter sends headers once; a second `emit` fails.

use std::io::{self, Write};

use crate::core::{Error, Response, Result};

/// Sends responses to the client.
pub trait Emitter {
    fn emit(&mut self, response: &Response) -> Result<()>;
}

/// [`Emitter`] writing raw HTTP/1.x to a writer.
#[derive(Debug)]
pub struct WriterEmitter<W: Write> {
    writer: W,
    headers_sent: bool,
}

impl<W: Write> WriterEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers_sent: false,
        }
    }

    #[inline]
    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit_status_line(&mut self, response: &Response) -> io::Result<()> {
        let reason = response.reason_phrase();
        write!(
            self.writer,
            "HTTP/{} {}",
            response.protocol_version(),
            response.status_code()
        )?;
        if !reason.is_empty() {
            write!(self.writer, " {}", reason)?;
        }
        self.writer.write_all(b"\r\n")
    }

    fn emit_headers(&mut self, response: &Response) -> io::Result<()> {
        let headers = response.headers();
        for name in headers.keys() {
            let title = title_case(name.as_str());
            for value in headers.get_all(name) {
                self.writer.write_all(title.as_bytes())?;
                self.writer.write_all(b": ")?;
                self.writer.write_all(value.as_bytes())?;
                self.writer.write_all(b"\r\n")?;
            }
        }
        self.writer.write_all(b"\r\n")
    }

    fn emit_body(&mut self, response: &Response) -> io::Result<()> {
        let body = response.body();
        if !body.is_empty() {
            self.writer.write_all(body)?;
        }
        self.writer.flush()
    }
}

impl<W: Write> Emitter for WriterEmitter<W> {
    fn emit(&mut self, response: &Response) -> Result<()> {
        if self.headers_sent {
            return Err(Error::HeadersAlreadySent);
        }
        self.headers_sent = true;

        self.emit_status_line(response)?;
        self.emit_headers(response)?;
        self.emit_body(response)?;

        tracing::debug!(
            status = response.status_code(),
            body_len = response.body().len(),
            "response emitted"
        );
        Ok(())
    }
}

/// `content-type` → `Content-Type`.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for ch in name.chars() {
        if upper {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper = ch == '-';
    }
    out
}
