//! Interaction descriptors.
//!
//! An interaction binds a provider-state label to a request descriptor and
//! the response the provider must serve for it. Interactions are built with
//! the `given` / `with_request` / `will_respond_with` chain, staged on a
//! session, and enforced only while the session scope is active.

use crate::factory::HeadersTemplate;
use crate::matcher::Matcher;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Canonical uppercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request the consumer is expected to issue.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, without query string.
    pub path: String,
    /// Required query parameters.
    pub query: Vec<(String, String)>,
    /// Required request headers.
    pub headers: Vec<(String, String)>,
    /// Required JSON body.
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Request descriptor for an arbitrary method.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// GET request descriptor.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// POST request descriptor.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// DELETE request descriptor.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Require a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Require a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Require a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The query as a wire-format string, for the contract file.
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        Some(
            self.query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
        )
    }
}

/// The response the mock provider serves for a matching request.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, each with its matching rule.
    pub headers: BTreeMap<String, Matcher>,
    /// Response body rule; the mock serves its example value.
    pub body: Option<Matcher>,
}

impl ResponseSpec {
    /// Response descriptor with the given status and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set a response header rule.
    pub fn with_header(mut self, name: impl Into<String>, matcher: Matcher) -> Self {
        self.headers.insert(name.into(), matcher);
        self
    }

    /// Merge in a headers template.
    pub fn with_headers(mut self, template: HeadersTemplate) -> Self {
        self.headers.extend(template.entries());
        self
    }

    /// Set the body rule.
    pub fn with_body(mut self, body: Matcher) -> Self {
        self.body = Some(body);
        self
    }

    /// Concrete header values the mock serves, from each rule's example.
    pub fn header_examples(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(name, matcher)| (name.clone(), header_example(matcher)))
            .collect()
    }
}

fn header_example(matcher: &Matcher) -> String {
    match matcher.example() {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// A complete staged expectation.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// What the consumer is doing, e.g. "a request for a product".
    pub description: String,
    /// Provider precondition, e.g. "there is a product with ID 1".
    pub provider_state: Option<String>,
    /// Expected request.
    pub request: RequestSpec,
    /// Response to serve.
    pub response: ResponseSpec,
}

impl Interaction {
    /// Start an interaction description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            provider_state: None,
            request: RequestSpec::get("/"),
            response: ResponseSpec::new(200),
        }
    }

    /// Attach the provider-state precondition.
    pub fn given(mut self, state: impl Into<String>) -> Self {
        self.provider_state = Some(state.into());
        self
    }

    /// Set the expected request.
    pub fn with_request(mut self, request: RequestSpec) -> Self {
        self.request = request;
        self
    }

    /// Set the response to serve.
    pub fn will_respond_with(mut self, response: ResponseSpec) -> Self {
        self.response = response;
        self
    }
}
