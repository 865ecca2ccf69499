use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::Json;

use super::chat::ReplyBody;
use crate::doc_processor;
use crate::error::ServiceError;
use crate::llm::ChatMessage;
use crate::state::AppState;

/// Characters of extracted text embedded into the prompt.
pub const MAX_DOCUMENT_CHARS: usize = 4000;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Temporary copy of an upload; removed from disk when dropped.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub async fn persist(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let path = dir.join(format!("temp_{}_{}", uuid::Uuid::new_v4(), file_name));
        let upload = Self { path };
        tokio::fs::write(&upload.path, bytes).await?;
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove temp upload: {e}"),
        }
    }
}

pub fn document_prompt(document_text: &str) -> String {
    format!(
        "You are an AI assistant analyzing a document.
The user uploaded a file and has a question related to it.
Your goal is to:
1. Read and understand the document.
2. Answer the user's question based on the document.
3. Provide additional insights if relevant.

Document Content:
{document_text}
"
    )
}

/// Final path component of a client-supplied name; never empty.
fn base_name(file_name: &str) -> &str {
    match file_name.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => "upload",
    }
}

/// Suffix after the last `.`, so a bare `.txt` still counts as text.
fn declared_extension(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Extract the uploaded document, add it and the question to the transcript,
/// and ask upstream.
pub async fn handle_upload(
    state: &AppState,
    file: UploadedFile,
    question: String,
) -> Result<String, ServiceError> {
    let upstream = state.upstream()?;

    let file_name = base_name(&file.file_name).to_string();
    let extension = declared_extension(&file_name).to_string();

    let temp = TempUpload::persist(&state.config.upload_dir, &file_name, &file.bytes).await?;
    tracing::info!(file_name = %file_name, extension = %extension, bytes = file.bytes.len(), "received upload");

    let path = temp.path().to_path_buf();
    let ext = extension.clone();
    let extracted =
        tokio::task::spawn_blocking(move || doc_processor::extract_text(&path, &ext)).await??;
    let excerpt = doc_processor::truncate_chars(&extracted, MAX_DOCUMENT_CHARS);
    tracing::debug!(
        text_len = extracted.chars().count(),
        embedded = excerpt.chars().count(),
        "extracted document text"
    );

    let mut turn = state.conversation.begin_turn().await;
    turn.append(ChatMessage::system(document_prompt(excerpt)));
    turn.append(ChatMessage::user(question));
    let history = turn.snapshot();

    let reply = state.complete(&upstream, history).await?;
    turn.append(ChatMessage::assistant(reply.clone()));

    Ok(reply)
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReplyBody>, ServiceError> {
    let mut file = None;
    let mut question = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                file = Some(UploadedFile { file_name, bytes });
            }
            Some("question") => question = Some(field.text().await?),
            _ => {}
        }
    }

    let file = file.ok_or(ServiceError::MissingField("file"))?;
    let question = question.ok_or(ServiceError::MissingField("question"))?;

    let reply = handle_upload(&state, file, question).await?;
    Ok(Json(ReplyBody { reply }))
}
