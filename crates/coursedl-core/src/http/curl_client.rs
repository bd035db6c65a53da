//! libcurl-backed `HttpClient`.
//!
//! One easy handle per request, run on the calling thread. Redirects are
//! followed; header lines are collected through `header_function` and reset
//! on every status line so the result describes the final hop.

use super::headers::{parse_status_line, ResponseHeaders};
use super::{HttpClient, HttpRequest, HttpResponse};
use crate::error::Result;
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::str;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Head,
    Post,
}

/// Where a response body goes.
enum Body<'a> {
    Buffer(&'a mut Vec<u8>),
    /// Streams only when the final status is 2xx.
    Sink(&'a mut dyn Write),
    Discard,
}

#[derive(Debug, Clone)]
pub struct CurlClient {
    pub connect_timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for CurlClient {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            max_redirections: 10,
            user_agent: concat!("coursedl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CurlClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn perform(
        &self,
        method: Method,
        req: &HttpRequest,
        post_body: Option<&[u8]>,
        mut body: Body<'_>,
    ) -> Result<HttpResponse> {
        tracing::debug!(?method, url = %req.url, "http request");

        let mut easy = curl::easy::Easy::new();
        easy.url(&req.url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.useragent(&self.user_agent)?;

        match method {
            Method::Get => {}
            Method::Head => easy.nobody(true)?,
            Method::Post => {
                easy.post(true)?;
                easy.post_fields_copy(post_body.unwrap_or_default())?;
            }
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &req.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !req.headers.is_empty() {
            easy.http_headers(list)?;
        }
        for line in &req.cookies {
            easy.cookie_list(line)?;
        }

        let lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let status = Cell::new(0u32);
        let mut write_err: Option<io::Error> = None;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    if let Some(code) = parse_status_line(s) {
                        status.set(code);
                        lines.borrow_mut().clear();
                    }
                    lines.borrow_mut().push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                let ok = (200..300).contains(&status.get());
                let res = match &mut body {
                    Body::Buffer(buf) => {
                        buf.extend_from_slice(data);
                        Ok(())
                    }
                    Body::Sink(sink) if ok => sink.write_all(data),
                    Body::Sink(_) | Body::Discard => Ok(()),
                };
                match res {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        tracing::warn!("body write failed: {}", e);
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            let performed = transfer.perform();
            drop(transfer);
            if let Some(e) = write_err.take() {
                return Err(e.into());
            }
            performed?;
        }

        let code = easy.response_code()?;
        let effective_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| req.url.clone());

        tracing::debug!(status = code, url = %effective_url, "http response");

        Ok(HttpResponse {
            status: code,
            effective_url,
            headers: ResponseHeaders::from_lines(&lines.into_inner()),
            body: Vec::new(),
        })
    }
}

impl HttpClient for CurlClient {
    fn get(&self, req: &HttpRequest) -> Result<HttpResponse> {
        let mut buf = Vec::new();
        let mut resp = self.perform(Method::Get, req, None, Body::Buffer(&mut buf))?;
        resp.body = buf;
        Ok(resp)
    }

    fn head(&self, req: &HttpRequest) -> Result<HttpResponse> {
        self.perform(Method::Head, req, None, Body::Discard)
    }

    fn post_form(&self, req: &HttpRequest, form: &[(&str, &str)]) -> Result<HttpResponse> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form.iter().copied())
            .finish();
        let req = req
            .clone()
            .header("Content-Type", "application/x-www-form-urlencoded");
        let mut buf = Vec::new();
        let mut resp = self.perform(
            Method::Post,
            &req,
            Some(encoded.as_bytes()),
            Body::Buffer(&mut buf),
        )?;
        resp.body = buf;
        Ok(resp)
    }

    fn download_to(&self, req: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse> {
        self.perform(Method::Get, req, None, Body::Sink(sink))
    }
}
