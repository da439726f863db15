use bytes::Bytes;
use std::{
    io::Write,
    time::{SystemTime, UNIX_EPOCH},
};

/// A `multipart/form-data` (RFC 7578) body under construction.
///
/// The generic encoder cannot know the exotic binary types the assets API
/// expects, so file parts take an explicit content type; when none is given
/// the header is omitted and the receiver's default applies.
pub struct MultipartForm {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::with_boundary(format!("----rbxassetform{nanos:032x}"))
    }

    pub(crate) fn with_boundary(boundary: String) -> Self {
        Self {
            boundary,
            buf: Vec::new(),
        }
    }

    /// Append a JSON-valued field.
    #[must_use]
    pub fn json_part(mut self, name: &str, contents: &[u8]) -> Self {
        let name = sanitize(name);
        let _ = write!(self.buf, "--{}\r\n", self.boundary);
        let _ = write!(
            self.buf,
            "Content-Disposition: form-data; name=\"{name}\"\r\n"
        );
        let _ = write!(self.buf, "Content-Type: application/json\r\n\r\n");
        self.buf.extend_from_slice(contents);
        let _ = write!(self.buf, "\r\n");
        self
    }

    /// Append a file field with an optional content type.
    #[must_use]
    pub fn file_part(
        mut self,
        name: &str,
        file_name: &str,
        contents: &[u8],
        content_type: Option<&str>,
    ) -> Self {
        let name = sanitize(name);
        let file_name = sanitize(file_name);
        let _ = write!(self.buf, "--{}\r\n", self.boundary);
        let _ = write!(
            self.buf,
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
        );
        if let Some(content_type) = content_type {
            let _ = write!(self.buf, "Content-Type: {content_type}\r\n");
        }
        let _ = write!(self.buf, "\r\n");
        self.buf.extend_from_slice(contents);
        let _ = write!(self.buf, "\r\n");
        self
    }

    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the form and return the encoded body.
    #[must_use]
    pub fn finish(mut self) -> Bytes {
        let _ = write!(self.buf, "--{}--\r\n", self.boundary);
        Bytes::from(self.buf)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

// Quotes and line breaks in a field or file name would terminate the
// Content-Disposition value early and corrupt the part headers.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '"' | '\r' | '\n'))
        .collect()
}
