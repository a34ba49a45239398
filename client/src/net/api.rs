//! Typed helpers for the LPS2 server endpoints.
//!
//! Every helper goes through [`Dispatcher`], so the credential and CSRF rules
//! apply uniformly. Reads are sent as safe calls; anything that changes server
//! state is sent as a mutating call (one auth refresh first).
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses become [`ApiError::Status`] carrying the server's
//! `error`/`message` text. Inputs are validated locally first so an obviously
//! bad form never reaches the network.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{AuthCache, AuthState};
use super::body::{FormData, RequestBody};
use super::config::ClientConfig;
use super::dispatcher::{Dispatcher, RequestOptions};
use super::error::ApiError;
use super::transport::{HttpResponse, Transport};
use super::types::*;
use crate::util::alert::Alert;
use crate::util::validation::{
    ATTACHMENT_MAX_BYTES, INGEST_MAX_BYTES, validate_chat_prompt, validate_endpoint, validate_file_size,
    validate_doc_id, validate_login, validate_profile_name, validate_reingest, validate_search,
};

fn search_path(base: &str, query: &str, top_k: u32) -> String {
    format!("{base}?q={}&k={top_k}", urlencoding::encode(query))
}

fn memory_list_path(limit: u32) -> String {
    format!("/memory/list?limit={limit}")
}

fn audit_path(limit: u32) -> String {
    format!("/security/audit?limit={limit}")
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Endpoint client over a [`Dispatcher`].
#[derive(Clone, Debug)]
pub struct ApiClient<T, A> {
    dispatcher: Dispatcher<T, A>,
}

impl<T: Transport, A: Alert> ApiClient<T, A> {
    pub fn new(transport: T, alert: A, config: ClientConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, alert, config),
        }
    }

    pub fn from_dispatcher(dispatcher: Dispatcher<T, A>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T, A> {
        &self.dispatcher
    }

    pub fn auth(&self) -> &AuthCache {
        self.dispatcher.auth()
    }

    /// Refresh and return the session status.
    pub async fn auth_status(&self) -> AuthState {
        self.dispatcher.refresh().await;
        self.auth().snapshot()
    }

    /// Start a session, then refresh so the CSRF token is cached.
    ///
    /// # Errors
    ///
    /// Invalid input, transport failure, or rejected credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let (username, password) = validate_login(username, password)?;
        let body = RequestBody::json(&LoginRequest { username, password })?;
        let resp: LoginResponse = self
            .send("/login", RequestOptions::post(Some(body)), false)
            .await?;
        self.dispatcher.refresh().await;
        Ok(resp)
    }

    /// End the session and forget the cached token.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: OkResponse = self.send("/logout", RequestOptions::post(None), true).await?;
        self.auth().clear();
        Ok(())
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.read("/health").await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn full_health(&self) -> Result<FullHealth, ApiError> {
        self.read("/health/full").await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn model(&self) -> Result<ModelInfo, ApiError> {
        self.read("/model").await
    }

    /// Send one chat turn. With an attachment the request is multipart.
    ///
    /// # Errors
    ///
    /// Invalid input, transport failure, or a non-success response.
    pub async fn chat(
        &self,
        prompt: &str,
        extended: bool,
        attachment: Option<Attachment>,
    ) -> Result<ChatResponse, ApiError> {
        validate_chat_prompt(prompt, attachment.is_some())?;
        let body = match attachment {
            Some(file) => {
                validate_file_size(file.bytes.len(), ATTACHMENT_MAX_BYTES)?;
                RequestBody::Form(
                    FormData::new()
                        .text("prompt", prompt)
                        .text("extended", flag(extended))
                        .file("file", &file.file_name, &file.content_type, file.bytes),
                )
            }
            None => RequestBody::json(&ChatRequest {
                prompt: prompt.to_owned(),
                extended,
            })?,
        };
        self.write("/chat", Some(body)).await
    }

    /// Drop the conversation history the server keeps for this session.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn clear_conversation(&self) -> Result<ConversationCleared, ApiError> {
        self.write_json("/conversation/clear", &serde_json::json!({})).await
    }

    /// # Errors
    ///
    /// Invalid input, transport failure, or a non-success response.
    pub async fn memory_search(&self, query: &str, top_k: u32) -> Result<SearchResponse<Value>, ApiError> {
        let query = validate_search(query, top_k)?;
        self.read(&search_path("/memory/search", &query, top_k)).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn memory_list(&self, limit: u32) -> Result<MemoryList, ApiError> {
        self.read(&memory_list_path(limit)).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn memory_delete(&self, ids: Vec<String>) -> Result<DeleteResult, ApiError> {
        self.write_json("/memory/delete", &DeleteMemories { ids }).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_stats(&self) -> Result<KbStats, ApiError> {
        self.read("/kb/stats").await
    }

    /// # Errors
    ///
    /// Invalid input, transport failure, or a non-success response.
    pub async fn kb_search(&self, query: &str, top_k: u32) -> Result<SearchResponse<KbHit>, ApiError> {
        let query = validate_search(query, top_k)?;
        self.read(&search_path("/kb/search", &query, top_k)).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_documents(&self) -> Result<KbDocuments, ApiError> {
        self.read("/kb/documents").await
    }

    /// Ingest inline text.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success response (including quarantine
    /// rejections reported as 400).
    pub async fn kb_ingest_text(&self, text: &str, source: &str) -> Result<IngestResult, ApiError> {
        self.write_json(
            "/kb/ingest",
            &IngestText {
                text: text.to_owned(),
                source: source.to_owned(),
            },
        )
        .await
    }

    /// Upload a file for ingestion; `ocr` asks the server to OCR scanned PDFs.
    ///
    /// # Errors
    ///
    /// Oversized file, transport failure, or a non-success response.
    pub async fn kb_ingest_file(&self, file: Attachment, ocr: bool) -> Result<IngestResult, ApiError> {
        validate_file_size(file.bytes.len(), INGEST_MAX_BYTES)?;
        let form = FormData::new()
            .file("file", &file.file_name, &file.content_type, file.bytes)
            .text("ocr", flag(ocr));
        self.write("/kb/ingest", Some(RequestBody::Form(form))).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_delete(&self, doc_ids: Vec<String>) -> Result<DeleteResult, ApiError> {
        self.write_json("/kb/delete", &DeleteDocuments { doc_ids }).await
    }

    /// Replace a document's content under the same id.
    ///
    /// # Errors
    ///
    /// Blank id or text, transport failure, or a non-success response.
    pub async fn kb_reingest(&self, doc_id: &str, text: &str, source: Option<&str>) -> Result<IngestResult, ApiError> {
        let doc_id = validate_reingest(doc_id, text)?;
        self.write_json(
            "/kb/reingest",
            &Reingest {
                doc_id,
                text: text.to_owned(),
                source: source.map(str::to_owned),
            },
        )
        .await
    }

    /// Re-embed the knowledge base; `force` re-embeds chunks that are
    /// already current.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_rebuild(&self, force: bool) -> Result<Value, ApiError> {
        self.write_json("/kb/rebuild", &KbRebuild { force }).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_rebuild_status(&self) -> Result<Value, ApiError> {
        self.read("/kb/rebuild/status").await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn kb_quarantine(&self) -> Result<QuarantineList, ApiError> {
        self.read("/kb/quarantine").await
    }

    /// Release a quarantined document. Its content must be re-ingested.
    ///
    /// # Errors
    ///
    /// Blank id, transport failure, or a non-success response (404 when the
    /// id is not quarantined).
    pub async fn kb_quarantine_approve(&self, doc_id: &str) -> Result<QuarantineApproved, ApiError> {
        let doc_id = validate_doc_id(doc_id)?;
        self.write_json("/kb/quarantine/approve", &QuarantineTarget { doc_id })
            .await
    }

    /// # Errors
    ///
    /// Blank id, transport failure, or a non-success response.
    pub async fn kb_quarantine_discard(&self, doc_id: &str) -> Result<QuarantineDiscarded, ApiError> {
        let doc_id = validate_doc_id(doc_id)?;
        self.write_json("/kb/quarantine/discard", &QuarantineTarget { doc_id })
            .await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn security_stats(&self) -> Result<SecurityStats, ApiError> {
        self.read("/security/stats").await
    }

    /// The most recent `limit` audit events.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn security_audit(&self, limit: u32) -> Result<AuditLog, ApiError> {
        self.read(&audit_path(limit)).await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn llm_endpoint(&self) -> Result<LlmEndpoint, ApiError> {
        self.read("/admin/llm-endpoint").await
    }

    /// # Errors
    ///
    /// Invalid URL, transport failure, or a non-success response.
    pub async fn set_llm_endpoint(&self, endpoint: &str, persist: bool) -> Result<LlmEndpointUpdate, ApiError> {
        let endpoint = validate_endpoint(endpoint)?;
        self.write_json("/admin/llm-endpoint", &SetLlmEndpoint { endpoint, persist })
            .await
    }

    /// # Errors
    ///
    /// Transport failure or a non-success response.
    pub async fn list_profiles(&self) -> Result<Value, ApiError> {
        self.read("/admin/llm-endpoints/profiles").await
    }

    /// Check that an endpoint answers, without saving it.
    ///
    /// # Errors
    ///
    /// Invalid URL, transport failure, or an unreachable endpoint (400).
    pub async fn test_profile_endpoint(&self, endpoint: &str) -> Result<Value, ApiError> {
        let endpoint = validate_endpoint(endpoint)?;
        self.write_json("/admin/llm-endpoints/profiles/test", &TestEndpoint { endpoint })
            .await
    }

    /// # Errors
    ///
    /// Invalid input, transport failure, or a non-success response.
    pub async fn save_profile(&self, name: &str, endpoint: &str, persist: bool) -> Result<Value, ApiError> {
        let name = validate_profile_name(name)?;
        let endpoint = validate_endpoint(endpoint)?;
        self.write_json(
            "/admin/llm-endpoints/profiles",
            &UpsertProfile { name, endpoint, persist },
        )
        .await
    }

    /// # Errors
    ///
    /// Invalid name, transport failure, or a non-success response.
    pub async fn activate_profile(&self, name: &str, persist: bool) -> Result<Value, ApiError> {
        let name = validate_profile_name(name)?;
        self.write_json("/admin/llm-endpoints/profiles/activate", &NamedProfile { name, persist })
            .await
    }

    /// # Errors
    ///
    /// Invalid name, transport failure, or a non-success response (the
    /// active profile cannot be deleted).
    pub async fn delete_profile(&self, name: &str, persist: bool) -> Result<Value, ApiError> {
        let name = validate_profile_name(name)?;
        self.write_json("/admin/llm-endpoints/profiles/delete", &NamedProfile { name, persist })
            .await
    }

    async fn read<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(path, RequestOptions::get(), false).await
    }

    async fn write<R: DeserializeOwned>(&self, path: &str, body: Option<RequestBody>) -> Result<R, ApiError> {
        self.send(path, RequestOptions::post(body), true).await
    }

    async fn write_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        self.write(path, Some(RequestBody::json(body)?)).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        mutating: bool,
    ) -> Result<R, ApiError> {
        let resp = self.dispatcher.fetch(path, options, mutating).await?;
        decode(&resp)
    }
}

fn decode<R: DeserializeOwned>(resp: &HttpResponse) -> Result<R, ApiError> {
    if !resp.ok() {
        return Err(ApiError::from_response(resp));
    }
    Ok(resp.json()?)
}

