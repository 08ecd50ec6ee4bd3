use std::path::Path;

use tracing::warn;

/// Builds the first user message from `--file` / `--task`.
///
/// `--file` wins over `--task`; an empty path counts as not given. An
/// unreadable file degrades to a message describing the failure instead of an error.
pub async fn build_initial_message(file: Option<&Path>, task: Option<&str>) -> Option<String> {
    if let Some(file) = file.filter(|file| !file.as_os_str().is_empty()) {
        let message = match tokio::fs::read_to_string(file).await {
            Ok(content) => tagged_file_message(file, &content),
            Err(err) => {
                warn!(error = %err, "Failed to read tagged file {}", file.display());
                unreadable_file_message(file, &err)
            }
        };
        return Some(message);
    }
    task.map(str::to_string)
}

pub fn tagged_file_message(file: &Path, content: &str) -> String {
    format!(
        "The user has tagged a file '{}'.\n\
         Please read and understand the following file content first:\n\n\
         ```\n\
         {content}\n\
         ```\n\n\
         After reviewing the file, please ask the user what they would like to do with it.",
        file.display()
    )
}

pub fn unreadable_file_message(file: &Path, err: &std::io::Error) -> String {
    format!(
        "The user attempted to share file '{}', but it could not be read: {err}",
        file.display()
    )
}
