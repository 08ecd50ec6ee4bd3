use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::input::LineReader;
use crate::message::{Message, Role};
use crate::provider::ChatProvider;
use crate::slashcmd::{SLASH_COMMANDS, find_command, parse_slash_command_call};

/// Line-oriented chat loop over an arbitrary input/output pair.
pub struct ChatSession<I, W> {
    provider: Box<dyn ChatProvider>,
    conversation: Conversation,
    history: Vec<Message>,
    prompt: String,
    input: I,
    output: W,
}

impl<I, W> ChatSession<I, W>
where
    I: LineReader,
    W: AsyncWrite + Unpin,
{
    pub async fn new(
        provider: Box<dyn ChatProvider>,
        conversation: Conversation,
        prompt: impl Into<String>,
        input: I,
        output: W,
    ) -> Result<Self, ChatError> {
        let history = conversation.messages().await?;
        debug!(
            conversation = %conversation.id,
            messages = history.len(),
            provider = provider.name(),
            "Loaded conversation history"
        );
        Ok(Self {
            provider,
            conversation,
            history,
            prompt: prompt.into(),
            input,
            output,
        })
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub async fn print_banner(&mut self, replay_history: bool) -> Result<(), ChatError> {
        let verb = if self.conversation.resumed {
            "Resumed"
        } else {
            "Started"
        };
        let line = format!(
            "{verb} conversation {} (provider: {}). Type /help for commands.\n",
            self.conversation.id,
            self.provider.name()
        );
        self.write(&line).await?;
        if replay_history && self.conversation.resumed && !self.history.is_empty() {
            self.print_history().await?;
        }
        Ok(())
    }

    pub async fn print_history(&mut self) -> Result<(), ChatError> {
        if self.history.is_empty() {
            return self.write("(no messages yet)\n").await;
        }
        let mut text = String::new();
        for message in &self.history {
            text.push_str(&format_message(message));
        }
        self.write(&text).await
    }

    /// Runs one user turn and returns the assistant reply.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let user = Message::user(text);
        self.conversation.append(&user).await?;
        self.history.push(user);

        let reply = self.provider.reply(&self.history).await?;
        let assistant = Message::assistant(reply.clone());
        self.conversation.append(&assistant).await?;
        let line = format_message(&assistant);
        self.history.push(assistant);
        self.write(&line).await?;
        Ok(reply)
    }

    /// Sends `initial_message` first, then reads turns until `/exit` or end of input.
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<(), ChatError> {
        if let Some(initial_message) = initial_message {
            info!("Sending initial message ({} bytes)", initial_message.len());
            self.send(&initial_message).await?;
        }

        loop {
            let prompt = self.prompt.clone();
            if !self.input.shows_prompt() {
                self.write(&prompt).await?;
            }
            let line = match self.input.read_line(&prompt).await {
                Ok(line) => line,
                Err(err @ ChatError::Interrupted(_)) => {
                    self.write("\n").await?;
                    return Err(err);
                }
                Err(err) => return Err(err),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(call) = parse_slash_command_call(line) {
                if self.handle_command(&call.name).await? {
                    info!("Session ended by /{}", call.name);
                    return Ok(());
                }
                continue;
            }

            self.send(line).await?;
        }
    }

    /// Returns true when the command ends the session.
    async fn handle_command(&mut self, name: &str) -> Result<bool, ChatError> {
        let Some(command) = find_command(name) else {
            self.write(&format!(
                "Unknown command: /{name}. Type /help for commands.\n"
            ))
            .await?;
            return Ok(false);
        };
        match command.name {
            "exit" => Ok(true),
            "history" => {
                self.print_history().await?;
                Ok(false)
            }
            _ => {
                let mut text = String::from("Available commands:\n");
                for command in SLASH_COMMANDS {
                    text.push_str(&format!(
                        "  {:<16} {}\n",
                        command.slash_name(),
                        command.description
                    ));
                }
                self.write(&text).await?;
                Ok(false)
            }
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), ChatError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

fn format_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Agent",
        Role::System => "System",
    };
    format!("{speaker}: {}\n", message.content)
}
