// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Cohere v2 chat and embed APIs.

use serde::{Deserialize, Serialize};

// --- Chat ---

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<ApiDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

/// A grounding document in Cohere's `{id, data}` shape.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDocument {
    pub id: String,
    pub data: DocumentData,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    #[serde(default)]
    pub content: Vec<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

// --- Embed ---

#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    pub model: String,
    pub texts: Vec<String>,
    pub input_type: String,
    pub embedding_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: EmbedVectors,
}

#[derive(Debug, Deserialize)]
pub struct EmbedVectors {
    #[serde(default)]
    pub float: Vec<Vec<f32>>,
}

// --- Errors ---

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
