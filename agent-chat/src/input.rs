//! Where user turns come from: a rustyline editor on a terminal, or any
//! buffered byte stream (pipes, tests).

use std::path::PathBuf;

use async_trait::async_trait;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{ChatError, InterruptKind};

#[async_trait]
pub trait LineReader: Send {
    /// True when the reader draws the prompt itself.
    fn shows_prompt(&self) -> bool {
        false
    }

    /// Reads one line without its terminator. End of input and Ctrl-C come
    /// back as [`ChatError::Interrupted`].
    async fn read_line(&mut self, prompt: &str) -> Result<String, ChatError>;
}

/// Reads newline-delimited input; invalid UTF-8 is replaced, not fatal.
pub struct BufReadLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R> BufReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R> LineReader for BufReadLines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read_line(&mut self, _prompt: &str) -> Result<String, ChatError> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Err(ChatError::Interrupted(InterruptKind::Eof));
        }
        let text = String::from_utf8_lossy(&self.buf);
        if std::str::from_utf8(&self.buf).is_err() {
            warn!("Input line is not valid UTF-8, replacing invalid bytes");
        }
        Ok(text.trim_end_matches(['\n', '\r']).to_string())
    }
}

struct ReadRequest {
    prompt: String,
    reply: oneshot::Sender<TerminalRead>,
}

enum TerminalRead {
    Line(String),
    Interrupted(InterruptKind),
    Failed(std::io::Error),
}

/// Line editing and history via rustyline, driven from a blocking task.
pub struct TerminalLines {
    requests: mpsc::Sender<ReadRequest>,
}

impl TerminalLines {
    /// Starts the editor task. Entered lines are saved to `history_file` when given.
    pub fn spawn(history_file: Option<PathBuf>) -> Self {
        let (requests, mut incoming) = mpsc::channel::<ReadRequest>(1);
        tokio::task::spawn_blocking(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(err) => {
                    let message = format!("Failed to start line editor: {err}");
                    while let Some(request) = incoming.blocking_recv() {
                        let _ = request
                            .reply
                            .send(TerminalRead::Failed(std::io::Error::other(message.clone())));
                    }
                    return;
                }
            };
            if let Some(path) = history_file.as_ref() {
                if let Err(err) = editor.load_history(path) {
                    debug!("No input history loaded from {}: {err}", path.display());
                }
            }

            while let Some(request) = incoming.blocking_recv() {
                let result = match editor.readline(&request.prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                            if let Some(path) = history_file.as_ref() {
                                if let Err(err) = editor.save_history(path) {
                                    warn!("Failed to save input history {}: {err}", path.display());
                                }
                            }
                        }
                        TerminalRead::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => TerminalRead::Interrupted(InterruptKind::CtrlC),
                    Err(ReadlineError::Eof) => TerminalRead::Interrupted(InterruptKind::Eof),
                    Err(ReadlineError::Io(err)) => TerminalRead::Failed(err),
                    Err(err) => TerminalRead::Failed(std::io::Error::other(err.to_string())),
                };
                if request.reply.send(result).is_err() {
                    break;
                }
            }
        });
        Self { requests }
    }
}

#[async_trait]
impl LineReader for TerminalLines {
    fn shows_prompt(&self) -> bool {
        true
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String, ChatError> {
        let (reply, response) = oneshot::channel();
        let request = ReadRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.requests.send(request).await.is_err() {
            return Err(editor_gone());
        }
        match response.await.map_err(|_| editor_gone())? {
            TerminalRead::Line(line) => Ok(line),
            TerminalRead::Interrupted(kind) => Err(ChatError::Interrupted(kind)),
            TerminalRead::Failed(err) => Err(ChatError::Io(err)),
        }
    }
}

fn editor_gone() -> ChatError {
    ChatError::Io(std::io::Error::other("line editor stopped"))
}
