//! Scripted in-memory `HttpClient` for unit tests.

use super::{HttpClient, HttpRequest, HttpResponse, ResponseHeaders};
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Verb {
    Get,
    Head,
    Post,
}

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub verb: Verb,
    pub request: HttpRequest,
    pub form: Vec<(String, String)>,
}

/// Canned responses keyed by (verb, url). Unscripted calls fail with a transport-like error.
#[derive(Default)]
pub(crate) struct FakeClient {
    routes: HashMap<(Verb, String), HttpResponse>,
    calls: RefCell<Vec<Recorded>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        verb: Verb,
        url: &str,
        status: u32,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Self {
        let mut h = ResponseHeaders::default();
        for (k, v) in headers {
            h.push(*k, *v);
        }
        self.routes.insert(
            (verb, url.to_string()),
            HttpResponse {
                status,
                effective_url: url.to_string(),
                headers: h,
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, verb: Verb) -> usize {
        self.calls.borrow().iter().filter(|c| c.verb == verb).count()
    }

    fn answer(&self, verb: Verb, req: &HttpRequest, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.calls.borrow_mut().push(Recorded {
            verb,
            request: req.clone(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.routes
            .get(&(verb, req.url.clone()))
            .cloned()
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no scripted response for {:?} {}", verb, req.url),
                ))
            })
    }
}

impl HttpClient for FakeClient {
    fn get(&self, req: &HttpRequest) -> Result<HttpResponse> {
        self.answer(Verb::Get, req, &[])
    }

    fn head(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let mut resp = self.answer(Verb::Head, req, &[])?;
        resp.body.clear();
        Ok(resp)
    }

    fn post_form(&self, req: &HttpRequest, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.answer(Verb::Post, req, form)
    }

    fn download_to(&self, req: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse> {
        let mut resp = self.answer(Verb::Get, req, &[])?;
        if resp.is_success() {
            sink.write_all(&resp.body)?;
        }
        resp.body.clear();
        Ok(resp)
    }
}
