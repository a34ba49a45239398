//! `fetch`-backed transport for the browser build.
//!
//! Requests go out with the browser's default same-origin credentials so the
//! session cookie rides along; multipart bodies are rebuilt as a DOM
//! `FormData` so the browser writes the boundary itself.

use gloo_net::http::{Method as GlooMethod, RequestBuilder};
use wasm_bindgen::JsValue;

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::net::body::{FormData, FormValue, RequestBody};

/// Transport over `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        let mut builder = RequestBuilder::new(&request.url).method(gloo_method(request.method));
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let built = match &request.body {
            None => builder.build(),
            Some(RequestBody::Form(form)) => {
                let form = dom_form_data(form).map_err(|message| TransportError::Build {
                    url: url.clone(),
                    message,
                })?;
                builder.body(form)
            }
            Some(body) => builder.body(body.to_text().unwrap_or_default()),
        };
        let built = built.map_err(|e| TransportError::Build {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let resp = built.send().await.map_err(|e| TransportError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let status = resp.status();
        let body = resp.binary().await.map_err(|e| TransportError::body_read(&url, e))?;
        Ok(HttpResponse { status, body })
    }
}

fn gloo_method(method: Method) -> GlooMethod {
    match method {
        Method::Get => GlooMethod::GET,
        Method::Post => GlooMethod::POST,
        Method::Put => GlooMethod::PUT,
        Method::Patch => GlooMethod::PATCH,
        Method::Delete => GlooMethod::DELETE,
    }
}

fn dom_form_data(form: &FormData) -> Result<web_sys::FormData, String> {
    let out = web_sys::FormData::new().map_err(js_message)?;
    for part in form.parts() {
        match &part.value {
            FormValue::Text(value) => out.append_with_str(&part.name, value).map_err(js_message)?,
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let parts = js_sys::Array::of1(&array);
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                    .map_err(js_message)?;
                out.append_with_blob_and_filename(&part.name, &blob, file_name)
                    .map_err(js_message)?;
            }
        }
    }
    Ok(out)
}

fn js_message(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
