use std::path::{Component, Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::message::{Message, MessageRecord};

const HISTORY_FILE_NAME: &str = "history.jsonl";

/// A persisted conversation: `<conversations_dir>/<id>/history.jsonl`.
#[derive(Clone, Debug)]
pub struct Conversation {
    pub id: String,
    pub dir: PathBuf,
    pub history_file: PathBuf,
    pub resumed: bool,
}

impl Conversation {
    /// Opens the conversation named by `resume_id`, or starts a new one.
    ///
    /// An unknown `resume_id` creates a fresh conversation under that id.
    pub async fn open(
        conversations_dir: &Path,
        resume_id: Option<&str>,
    ) -> Result<Conversation, ChatError> {
        if let Some(id) = resume_id.map(str::trim).filter(|id| !id.is_empty()) {
            validate_conversation_id(id)?;
            if let Some(conversation) = Conversation::find(conversations_dir, id).await {
                info!("Resuming conversation: {}", conversation.id);
                return Ok(conversation);
            }
            info!("Conversation {} not found, creating new conversation", id);
            return Conversation::create(conversations_dir, Some(id.to_string())).await;
        }
        Conversation::create(conversations_dir, None).await
    }

    pub async fn create(
        conversations_dir: &Path,
        id: Option<String>,
    ) -> Result<Conversation, ChatError> {
        let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        validate_conversation_id(&id)?;
        let dir = conversations_dir.join(&id);
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            ChatError::storage(
                format!("Failed to create conversation dir {}", dir.display()),
                err,
            )
        })?;
        let history_file = dir.join(HISTORY_FILE_NAME);
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&history_file)
            .await
            .map_err(|err| {
                ChatError::storage(
                    format!("Failed to create history file {}", history_file.display()),
                    err,
                )
            })?;
        info!("Created new conversation: {}", id);
        Ok(Conversation {
            id,
            dir,
            history_file,
            resumed: false,
        })
    }

    pub async fn find(conversations_dir: &Path, id: &str) -> Option<Conversation> {
        if validate_conversation_id(id).is_err() {
            debug!("Refusing to look up conversation id: {}", id);
            return None;
        }
        let dir = conversations_dir.join(id);
        let history_file = dir.join(HISTORY_FILE_NAME);
        if tokio::fs::metadata(&history_file).await.is_err() {
            debug!("History file not found: {}", history_file.display());
            return None;
        }
        Some(Conversation {
            id: id.to_string(),
            dir,
            history_file,
            resumed: true,
        })
    }

    /// Reads every stored message, skipping lines that fail to parse.
    pub async fn messages(&self) -> Result<Vec<Message>, ChatError> {
        let file = match tokio::fs::File::open(&self.history_file).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ChatError::storage(
                    format!("Failed to open history file {}", self.history_file.display()),
                    err,
                ));
            }
        };

        let mut messages = Vec::new();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await.map_err(|err| {
            ChatError::storage(
                format!("Failed to read history file {}", self.history_file.display()),
                err,
            )
        })? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<MessageRecord>(line) {
                Ok(record) => messages.push(record.message),
                Err(err) => warn!(
                    error = %err,
                    "Skipping malformed line in {}",
                    self.history_file.display()
                ),
            }
        }
        Ok(messages)
    }

    pub async fn append(&self, message: &Message) -> Result<(), ChatError> {
        let record = MessageRecord::now(message.clone());
        let mut line = serde_json::to_string(&record).map_err(|err| {
            ChatError::storage("Failed to serialize message", std::io::Error::other(err))
        })?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_file)
            .await
            .map_err(|err| {
                ChatError::storage(
                    format!("Failed to open history file {}", self.history_file.display()),
                    err,
                )
            })?;
        file.write_all(line.as_bytes()).await.map_err(|err| {
            ChatError::storage(
                format!("Failed to write history file {}", self.history_file.display()),
                err,
            )
        })?;
        file.flush().await.map_err(|err| {
            ChatError::storage(
                format!("Failed to flush history file {}", self.history_file.display()),
                err,
            )
        })?;
        Ok(())
    }
}

/// Ids name a directory under the conversations dir, so they must be a single
/// plain path component.
pub fn validate_conversation_id(id: &str) -> Result<(), ChatError> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == std::ffi::OsStr::new(id) => Ok(()),
        _ => Err(ChatError::InvalidConversationId(id.to_string())),
    }
}
