use std::path::Path;

use openhands_cli::cli::build_initial_message;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

#[tokio::test]
async fn test_file_content_is_embedded() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "notes.txt", b"Buy milk");

    let message = build_initial_message(Some(&path), None)
        .await
        .expect("initial message");
    assert!(message.contains(&format!("tagged a file '{}'", path.display())));
    assert!(message.contains("```\nBuy milk\n```"));
    assert!(message.ends_with("please ask the user what they would like to do with it."));
}

#[tokio::test]
async fn test_relative_file_name_is_kept_verbatim() {
    let message = build_initial_message(Some(Path::new("Cargo.toml")), None)
        .await
        .expect("initial message");
    assert!(message.starts_with("The user has tagged a file 'Cargo.toml'."));
    assert!(message.contains("name = \"openhands-cli\""));
}

#[tokio::test]
async fn test_file_overrides_task() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "todo.md", b"- ship it\n- celebrate\n");

    let message = build_initial_message(Some(&path), Some("UNIQUE-TASK-MARKER"))
        .await
        .expect("initial message");
    assert!(message.contains("- ship it\n- celebrate\n"));
    assert!(!message.contains("UNIQUE-TASK-MARKER"));
}

#[tokio::test]
async fn test_missing_file_degrades_to_description() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("missing.txt");

    let message = build_initial_message(Some(&path), Some("ignored"))
        .await
        .expect("fallback message");
    assert!(message.starts_with(&format!(
        "The user attempted to share file '{}', but it could not be read: ",
        path.display()
    )));
    let detail = message.rsplit(": ").next().expect("error detail");
    assert!(!detail.is_empty());
    assert!(!message.contains("ignored"));
}

#[tokio::test]
async fn test_non_utf8_file_degrades_to_description() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "blob.bin", &[0xff, 0xfe, 0x00, 0x80]);

    let message = build_initial_message(Some(&path), None)
        .await
        .expect("fallback message");
    assert!(message.contains("could not be read"));
    assert!(message.contains(&path.display().to_string()));
}

#[tokio::test]
async fn test_directory_degrades_to_description() {
    let dir = TempDir::new().expect("tempdir");
    let message = build_initial_message(Some(dir.path()), None)
        .await
        .expect("fallback message");
    assert!(message.contains("could not be read"));
}

#[tokio::test]
async fn test_task_is_used_verbatim() {
    let message = build_initial_message(None, Some("summarize this repo")).await;
    assert_eq!(message.as_deref(), Some("summarize this repo"));

    let message = build_initial_message(None, Some("  spaced\n<b>markup</b>  ")).await;
    assert_eq!(message.as_deref(), Some("  spaced\n<b>markup</b>  "));
}

#[tokio::test]
async fn test_no_arguments_means_no_message() {
    assert_eq!(build_initial_message(None, None).await, None);
}

#[tokio::test]
async fn test_empty_file_path_counts_as_unset() {
    let message = build_initial_message(Some(Path::new("")), Some("summarize this repo")).await;
    assert_eq!(message.as_deref(), Some("summarize this repo"));

    assert_eq!(build_initial_message(Some(Path::new("")), None).await, None);
}
