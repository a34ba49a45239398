//! `reqwest` transport and terminal alerts for the CLI.
//!
//! The client keeps a cookie jar for the life of the process so a `--user`
//! login carries its session cookie into the command that follows.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use lps2_client::net::body::{FormData, FormValue, RequestBody};
use lps2_client::net::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use lps2_client::util::alert::Alert;
use reqwest::multipart::{Form, Part};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Client with a cookie store and the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url;
        let mut builder = self.client.request(reqwest_method(request.method), &url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Form(form)) => builder.multipart(multipart_form(&form).map_err(|e| {
                TransportError::Build {
                    url: url.clone(),
                    message: e.to_string(),
                }
            })?),
            Some(body) => builder.body(body.to_text().unwrap_or_default()),
        };

        tracing::debug!(%url, "sending request");
        let resp = builder.send().await.map_err(|e| classify(&url, &e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| classify(&url, &e))?;
        tracing::debug!(%url, status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(form: &FormData) -> Result<Form, reqwest::Error> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match &part.value {
            FormValue::Text(value) => out.text(part.name.clone(), value.clone()),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)?;
                out.part(part.name.clone(), file)
            }
        };
    }
    Ok(out)
}

fn classify(url: &str, error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout { url: url.to_owned() }
    } else if error.is_builder() {
        TransportError::Build {
            url: url.to_owned(),
            message: error.to_string(),
        }
    } else {
        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Prints alerts on stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalAlert;

impl Alert for TerminalAlert {
    fn alert(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}
