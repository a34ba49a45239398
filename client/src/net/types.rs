//! Wire DTOs for the LPS2 server endpoints.
//!
//! DESIGN
//! ======
//! Several responses change shape with server configuration (stores may be
//! disabled, optional metrics may be absent), so most fields default and
//! open-ended parts are kept as `serde_json::Value` or flattened maps.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

/// `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
}

/// `GET /health/full`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FullHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub upstream: UpstreamHealth,
    #[serde(default)]
    pub memory: StoreHealth,
    #[serde(default)]
    pub knowledge: StoreHealth,
    #[serde(default)]
    pub avg_latency: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamHealth {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub reachable: bool,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub documents: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// JSON form of `POST /chat`. Attachments go as multipart instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub extended: bool,
}

/// File attached to a chat turn or a knowledge-base upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// `POST /chat` reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub tool_results: Vec<Value>,
    #[serde(default)]
    pub memory_used: Vec<Value>,
    #[serde(default)]
    pub knowledge_used: Vec<Value>,
    #[serde(default)]
    pub citations: Vec<Value>,
    #[serde(default)]
    pub knowledge_confidence: Option<Value>,
    #[serde(default)]
    pub refusal: bool,
    #[serde(default)]
    pub continuation_rounds: Option<u32>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub extended: bool,
    #[serde(default)]
    pub image_sanitized: Option<bool>,
    #[serde(default)]
    pub metrics: Option<Value>,
}

/// `GET /model`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub llm_endpoint: Option<String>,
    #[serde(default)]
    pub avg_latency: Option<f64>,
}

/// `GET /memory/search` and `GET /kb/search` wrapper.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub enabled: bool,
}

/// `GET /memory/list`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryList {
    #[serde(default)]
    pub memories: Vec<MemoryEntry>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_summary: bool,
    #[serde(default)]
    pub created: Option<f64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub source_ids: Option<Vec<String>>,
    #[serde(default)]
    pub suspicious: bool,
    #[serde(default)]
    pub pii_redacted: Option<Value>,
}

/// Knowledge-base search hit: a text preview plus whatever scoring fields the
/// store reports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KbHit {
    #[serde(default)]
    pub preview: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// `GET /kb/stats`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KbStats {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub documents: Option<u64>,
    #[serde(default)]
    pub embedding_models: Vec<String>,
    #[serde(default)]
    pub active_embedding_model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /kb/documents`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KbDocuments {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub documents: Vec<Value>,
}

/// JSON form of `POST /kb/ingest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngestText {
    pub text: String,
    pub source: String,
}

/// `POST /kb/ingest` reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestResult {
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub chunks: Option<u64>,
    #[serde(default)]
    pub quarantined: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /kb/reingest`. The server derives a source when none is given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reingest {
    pub doc_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Body of `POST /kb/rebuild`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KbRebuild {
    pub force: bool,
}

/// `GET /kb/quarantine`. Records are the raw quarantine entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarantineList {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub records: Vec<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body for quarantine approve/discard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuarantineTarget {
    pub doc_id: String,
}

/// `POST /kb/quarantine/approve` reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineApproved {
    #[serde(default)]
    pub approved: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// `POST /kb/quarantine/discard` reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineDiscarded {
    #[serde(default)]
    pub discarded: String,
}

/// Body of `POST /memory/delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteMemories {
    pub ids: Vec<String>,
}

/// Body of `POST /kb/delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteDocuments {
    pub doc_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(default)]
    pub deleted: u64,
}

/// `GET /admin/llm-endpoint`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmEndpoint {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetLlmEndpoint {
    pub endpoint: String,
    pub persist: bool,
}

/// `POST /admin/llm-endpoint` reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmEndpointUpdate {
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub persisted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestEndpoint {
    pub endpoint: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpsertProfile {
    pub name: String,
    pub endpoint: String,
    pub persist: bool,
}

/// Body for profile activate/delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedProfile {
    pub name: String,
    pub persist: bool,
}

/// `GET /security/stats`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityStats {
    #[serde(default)]
    pub memory: MemorySecurity,
    #[serde(default)]
    pub knowledge: KnowledgeSecurity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySecurity {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub suspicious: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSecurity {
    #[serde(default)]
    pub documents: u64,
    #[serde(default)]
    pub chunks: u64,
    #[serde(default)]
    pub suspicious_chunks: u64,
}

/// `GET /security/audit`, newest events as the server logged them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(default)]
    pub count: u64,
}

/// `POST /conversation/clear` reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationCleared {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
