//! Replayable request description.
//!
//! A request that hit 401 is sent a second time after the session is
//! renewed. [`ApiRequest`] keeps the method, URL, headers and an already
//! serialised body so the second send is byte-identical to the first.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use url::Url;

/// A fully materialised HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// A DELETE request.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// A POST request without a body.
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// A PUT request without a body.
    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    /// A request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialised.
    pub fn json<B: Serialize + ?Sized>(
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(body)?;
        Ok(Self::new(method, url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(bytes))
    }

    /// A request with an `application/x-www-form-urlencoded` body.
    pub fn form<K, V>(method: Method, url: Url, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        Self::new(method, url)
            .with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .with_body(body)
    }

    /// Add or replace a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append query parameters to the URL.
    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Build a reqwest request on `client`. Cloning the body is a refcount bump.
    pub(crate) fn to_builder(&self, client: &Client) -> RequestBuilder {
        let mut builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());
        if let Some(ref body) = self.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_json_request() {
        let req = ApiRequest::json(
            Method::POST,
            url("http://localhost:8000/notes/"),
            &serde_json::json!({"content": "hi"}),
        )
        .unwrap();

        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(&req.body().unwrap()[..], br#"{"content":"hi"}"#);
    }

    #[test]
    fn test_clone_is_identical() {
        let req = ApiRequest::json(Method::PUT, url("http://h/notes/1"), &[1, 2, 3]).unwrap();
        let copy = req.clone();
        assert_eq!(copy.method(), req.method());
        assert_eq!(copy.url(), req.url());
        assert_eq!(copy.headers(), req.headers());
        assert_eq!(copy.body(), req.body());
    }

    #[test]
    fn test_form_request() {
        let req = ApiRequest::form(
            Method::POST,
            url("http://h/auth/token"),
            [("username", "ada"), ("password", "p&ss word")],
        );

        assert_eq!(req.headers()[CONTENT_TYPE], "application/x-www-form-urlencoded");
        assert_eq!(&req.body().unwrap()[..], b"username=ada&password=p%26ss+word");
    }

    #[test]
    fn test_with_query() {
        let req = ApiRequest::get(url("http://h/events"))
            .with_query([("calendar_id", "primary"), ("max_results", "10")]);
        assert_eq!(req.url().as_str(), "http://h/events?calendar_id=primary&max_results=10");

        let untouched = ApiRequest::get(url("http://h/events")).with_query(Vec::<(&str, &str)>::new());
        assert_eq!(untouched.url().as_str(), "http://h/events");
    }
}
