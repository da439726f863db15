use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
    HeaderMap, Method, Request as HyperRequest,
};

use crate::multipart::MultipartForm;

#[derive(Clone)]
pub struct Request {
    uri: Option<String>,
    method: Option<Method>,
    headers: HeaderMap,
    body: Option<Full<Bytes>>,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uri: None,
            method: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<HeaderName>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Full<Bytes>) -> Self {
        self.body = Some(body);
        self
    }

    /// Install an encoded multipart form as the body, along with its
    /// content-type and content-length headers.
    #[must_use]
    pub fn multipart_body(mut self, form: MultipartForm) -> Self {
        let content_type = form.content_type();
        let bytes = form.finish();
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type).unwrap(),
        );
        self.headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
        self.body = Some(Full::new(bytes));
        self
    }

    pub fn build(self) -> Result<HyperRequest<Full<Bytes>>, hyper::http::Error> {
        let mut builder = HyperRequest::builder().uri(self.uri.unwrap_or_default());
        if let Some(method) = self.method {
            builder = builder.method(method);
        }
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        if let Some(body) = self.body {
            builder.body(body)
        } else {
            builder.body(Full::default())
        }
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_request_carries_method_uri_and_headers() {
        let request = Request::new()
            .uri("https://apis.roblox.com/assets/user-auth/v1/assets/123")
            .method(Method::PATCH)
            .header(
                HeaderName::from_static("x-csrf-token"),
                HeaderValue::from_static("token"),
            )
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(
            request.uri().to_string(),
            "https://apis.roblox.com/assets/user-auth/v1/assets/123"
        );
        assert_eq!(
            request.headers().get("x-csrf-token").unwrap(),
            HeaderValue::from_static("token")
        );
    }

    #[test]
    fn multipart_body_sets_content_headers() {
        let form = MultipartForm::with_boundary("test".into()).json_part("request", b"{}");
        let request = Request::new()
            .uri("https://apis.roblox.com/assets/user-auth/v1/assets")
            .method(Method::POST)
            .multipart_body(form)
            .build()
            .unwrap();

        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            HeaderValue::from_static("multipart/form-data; boundary=test")
        );
        assert!(request.headers().contains_key(CONTENT_LENGTH));
    }
}
