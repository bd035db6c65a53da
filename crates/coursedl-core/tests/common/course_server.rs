//! Minimal HTTP/1.1 server imitating a course platform for integration tests.
//!
//! Routes:
//! - `GET /{course}`: sets the `csrftoken` cookie.
//! - `POST /api/v1/login`: checks the CSRF header/cookie and form, sets `CAUTH`.
//! - `GET /{course}/lecture/index`: lecture page, only with the `CAUTH` cookie.
//! - `HEAD|GET /files/...`: resources; `locked*` answers 403, `broken*` answers
//!   500 on GET. Every request is recorded.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const CSRF: &str = "tok123";
pub const CAUTH: &str = "cauth-abc";
pub const EMAIL: &str = "student@example.com";
pub const PASSWORD: &str = "pa ss&word";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct CourseServer {
    pub base: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl CourseServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. `resources` are the file paths
/// (under `/files/`) listed on the lecture page, in order.
pub fn start(course: &str, resources: &[&str]) -> CourseServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);
    let requests = Arc::new(Mutex::new(Vec::new()));

    let page = lecture_page(&base, resources);
    let course = course.to_string();
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &course, &page, &log);
        }
    });
    CourseServer { base, requests }
}

fn lecture_page(base: &str, resources: &[&str]) -> String {
    let mut html = String::from("<html><body><ul>");
    for r in resources {
        html.push_str(&format!(
            "<li><div class=\"course-lecture-item-resource\"><a href=\"{}/files/{}\">r</a></div></li>",
            base, r
        ));
    }
    html.push_str("<div class=\"course-lecture-item-resource\"><a href=\"forum:42\">discuss</a></div>");
    html.push_str("</ul></body></html>");
    html
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let len = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < header_end + len {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = String::from_utf8_lossy(&data[header_end..]).into_owned();
    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, headers: &[String], body: &[u8], head: bool) {
    let mut out = format!("HTTP/1.1 {}\r\nConnection: close\r\nContent-Length: {}\r\n", status, body.len());
    for h in headers {
        out.push_str(h);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    let _ = stream.write_all(out.as_bytes());
    if !head {
        let _ = stream.write_all(body);
    }
}

fn handle(mut stream: TcpStream, course: &str, page: &str, log: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    log.lock().unwrap().push(req.clone());

    let head = req.method.eq_ignore_ascii_case("HEAD");
    let cookie = req.header("cookie").unwrap_or("").to_string();
    let authed = cookie.contains(&format!("CAUTH={}", CAUTH));
    let course_root = format!("/{}", course);
    let lecture_index = format!("/{}/lecture/index", course);

    if req.method == "GET" && req.path == course_root {
        let set = format!("Set-Cookie: csrftoken={}; Path=/", CSRF);
        respond(&mut stream, "200 OK", &[set], b"<html>course</html>", false);
    } else if req.method == "POST" && req.path == "/api/v1/login" {
        let token_ok = req.header("x-csrftoken") == Some(CSRF)
            && cookie == format!("csrftoken={}", CSRF);
        let form_ok = req.body.contains("email=student%40example.com")
            && req.body.contains("password=pa+ss%26word");
        if token_ok && form_ok {
            let set = format!("Set-Cookie: CAUTH={}; Path=/; HttpOnly", CAUTH);
            respond(&mut stream, "200 OK", &[set], b"{}", false);
        } else {
            respond(&mut stream, "401 Unauthorized", &[], b"{}", false);
        }
    } else if req.method == "GET" && req.path == lecture_index {
        let body = if authed { page.as_bytes() } else { &b""[..] };
        respond(&mut stream, "200 OK", &[], body, false);
    } else if let Some(name) = req.path.strip_prefix("/files/") {
        if !authed || name.starts_with("locked") {
            let cd = format!("Content-Disposition: attachment; filename=\"{}\"", name);
            respond(&mut stream, "403 Forbidden", &[cd], b"forbidden", head);
        } else if name.starts_with("broken") && !head {
            respond(&mut stream, "500 Internal Server Error", &[], b"boom", false);
        } else {
            let body = format!("content of {}", name);
            let cd = format!(
                "Content-Disposition: attachment; filename=\"Lecture: {}\"",
                name
            );
            respond(&mut stream, "200 OK", &[cd], body.as_bytes(), head);
        }
    } else {
        respond(&mut stream, "404 Not Found", &[], b"", head);
    }
}
