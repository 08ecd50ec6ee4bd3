use agent_chat::ChatError;
use agent_chat::conversation::{Conversation, validate_conversation_id};
use agent_chat::message::{Message, Role};
use tempfile::TempDir;

#[tokio::test]
async fn test_new_conversation_gets_uuid() {
    let dir = TempDir::new().expect("tempdir");
    let conversation = Conversation::open(dir.path(), None)
        .await
        .expect("open conversation");
    assert!(uuid_like(&conversation.id), "id: {}", conversation.id);
    assert!(!conversation.resumed);
    assert!(conversation.history_file.exists());
    assert!(conversation.messages().await.expect("messages").is_empty());
}

#[tokio::test]
async fn test_unknown_resume_id_creates_conversation_with_that_id() {
    let dir = TempDir::new().expect("tempdir");
    let conversation = Conversation::open(dir.path(), Some("abc123"))
        .await
        .expect("open conversation");
    assert_eq!(conversation.id, "abc123");
    assert!(!conversation.resumed);
    assert!(dir.path().join("abc123").join("history.jsonl").exists());
}

#[tokio::test]
async fn test_resume_loads_existing_history() {
    let dir = TempDir::new().expect("tempdir");
    let first = Conversation::open(dir.path(), Some("conv"))
        .await
        .expect("open conversation");
    first
        .append(&Message::user("hello"))
        .await
        .expect("append user");
    first
        .append(&Message::assistant("hi there"))
        .await
        .expect("append assistant");

    let resumed = Conversation::open(dir.path(), Some("  conv "))
        .await
        .expect("resume conversation");
    assert!(resumed.resumed);
    let messages = resumed.messages().await.expect("messages");
    assert_eq!(
        messages,
        vec![
            Message::new(Role::User, "hello"),
            Message::new(Role::Assistant, "hi there"),
        ]
    );
}

#[tokio::test]
async fn test_malformed_lines_are_skipped() {
    let dir = TempDir::new().expect("tempdir");
    let conversation = Conversation::open(dir.path(), Some("conv"))
        .await
        .expect("open conversation");
    conversation
        .append(&Message::user("kept"))
        .await
        .expect("append");
    let mut text = std::fs::read_to_string(&conversation.history_file).expect("read history");
    text.push_str("not json\n\n");
    std::fs::write(&conversation.history_file, text).expect("write history");

    let messages = conversation.messages().await.expect("messages");
    assert_eq!(messages, vec![Message::user("kept")]);
}

#[tokio::test]
async fn test_history_record_format() {
    let dir = TempDir::new().expect("tempdir");
    let conversation = Conversation::open(dir.path(), Some("conv"))
        .await
        .expect("open conversation");
    conversation
        .append(&Message::user("hello"))
        .await
        .expect("append");
    let text = std::fs::read_to_string(&conversation.history_file).expect("read history");
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).expect("history line is json");
    assert_eq!(
        value["message"],
        serde_json::json!({"role": "user", "content": "hello"})
    );
    assert!(value["timestamp"].as_f64().expect("timestamp") > 0.0);
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test]
async fn test_absolute_resume_id_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let conversations_dir = dir.path().join("conversations");
    let other = TempDir::new().expect("other tempdir");
    let target = other.path().join("stolen");

    let result = Conversation::open(&conversations_dir, Some(target.to_str().expect("utf8 path"))).await;
    assert!(matches!(result, Err(ChatError::InvalidConversationId(_))));
    assert!(!target.exists());
    assert!(Conversation::find(&conversations_dir, target.to_str().expect("utf8 path")).await.is_none());
}

#[tokio::test]
async fn test_parent_dir_resume_id_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let conversations_dir = dir.path().join("conversations");

    for id in ["..", "../..", "../outside", "a/../b"] {
        let result = Conversation::open(&conversations_dir, Some(id)).await;
        assert!(
            matches!(result, Err(ChatError::InvalidConversationId(_))),
            "id {id:?} should be rejected"
        );
    }
    assert!(!dir.path().join("outside").exists());
    assert!(!dir.path().join("history.jsonl").exists());
    assert!(!conversations_dir.exists());
}

#[tokio::test]
async fn test_create_rejects_nested_id() {
    let dir = TempDir::new().expect("tempdir");
    let result = Conversation::create(dir.path(), Some("a/b".to_string())).await;
    assert!(matches!(result, Err(ChatError::InvalidConversationId(_))));
    assert!(!dir.path().join("a").exists());
}

#[test]
fn test_validate_conversation_id() {
    assert!(validate_conversation_id("conv-42").is_ok());
    assert!(validate_conversation_id("2f1c0e6a-8a8b-4c1e-9d7a-0c6d5b3e2f10").is_ok());
    assert!(validate_conversation_id("notes.v2").is_ok());
    for id in ["", ".", "..", "/", "/tmp/x", "a/b", "a/", "./a", "../a"] {
        assert!(validate_conversation_id(id).is_err(), "id {id:?} should be rejected");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_history_write_failure_is_reported_as_storage_error() {
    let dir = TempDir::new().expect("tempdir");
    let conversation = Conversation::open(dir.path(), Some("conv"))
        .await
        .expect("open conversation");
    std::fs::remove_file(&conversation.history_file).expect("remove history");
    std::fs::create_dir(&conversation.history_file).expect("replace history with dir");

    let err = conversation
        .append(&Message::user("hello"))
        .await
        .expect_err("append into a directory fails");
    assert!(matches!(err, ChatError::Storage { .. }), "unexpected error: {err:?}");
}
