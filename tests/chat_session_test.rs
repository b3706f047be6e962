//! Integration tests for chat sessions
//!
//! Drives `ChatController` through its public event API with a scripted
//! provider and checks the conversation invariants.

mod common;

use chatflow::config::ModeConfig;
use chatflow::controller::{ChatController, ChatEvent};
use chatflow::error::{error_kind, ErrorKind};
use chatflow::providers::Role;
use chatflow::session::ChatSession;
use common::{scripted_factory, RecordingSink, ScriptedProvider};
use std::sync::Arc;

fn chat_with(provider: &Arc<ScriptedProvider>) -> ChatController {
    let session = ChatSession::new(scripted_factory(Arc::clone(provider)));
    ChatController::new(session, ModeConfig::chat_defaults().generation_options())
}

async fn configured_chat(provider: &Arc<ScriptedProvider>, sink: &mut RecordingSink) -> ChatController {
    let mut chat = chat_with(provider);
    chat.handle(ChatEvent::CredentialEntered("sk-ant-test".to_string()), sink)
        .await;
    assert!(chat.is_ready());
    chat
}

#[tokio::test]
async fn test_submit_without_credential_leaves_conversation_empty() {
    let provider = ScriptedProvider::new();
    let mut chat = chat_with(&provider);
    let mut sink = RecordingSink::default();

    let err = chat.submit("hi", &mut sink).await.unwrap_err();
    assert_eq!(error_kind(&err), ErrorKind::Credential);
    assert!(chat.conversation().is_empty());
    assert_eq!(provider.request_count(), 0);

    chat.handle(ChatEvent::UserSubmitted("hi".to_string()), &mut sink)
        .await;
    assert!(chat.conversation().is_empty());
    assert_eq!(sink.errors.len(), 1);
    assert!(sink.errors[0].contains("API key"));
}

#[tokio::test]
async fn test_hi_hello_exchange() {
    let provider = ScriptedProvider::new();
    provider.reply("hello");
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    chat.handle(ChatEvent::UserSubmitted("hi".to_string()), &mut sink)
        .await;

    let messages = chat.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!((messages[0].role, messages[0].content.as_str()), (Role::User, "hi"));
    assert_eq!(
        (messages[1].role, messages[1].content.as_str()),
        (Role::Assistant, "hello")
    );
    assert_eq!(sink.texts, vec!["hello".to_string()]);
    assert!(sink.errors.is_empty());
    assert_eq!(sink.notices.len(), 1);
}

#[tokio::test]
async fn test_n_successful_submits_alternate_roles() {
    let provider = ScriptedProvider::new();
    let turns = 5;
    for i in 0..turns {
        provider.reply(&format!("reply {}", i));
    }
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    for i in 0..turns {
        chat.handle(ChatEvent::UserSubmitted(format!("message {}", i)), &mut sink)
            .await;
    }

    let messages = chat.conversation().messages();
    assert_eq!(messages.len(), 2 * turns);
    for (index, message) in messages.iter().enumerate() {
        let expected = if index % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role, expected, "message {} has wrong role", index);
    }
}

#[tokio::test]
async fn test_full_history_is_resent_each_turn() {
    let provider = ScriptedProvider::new();
    provider.reply("first");
    provider.reply("second");
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    chat.submit("one", &mut sink).await.unwrap();
    chat.submit("two", &mut sink).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[1].messages.len(), 3);
    assert_eq!(requests[1].messages[1].content, "first");
    assert!(requests.iter().all(|r| r.options.system.is_none()));
}

#[tokio::test]
async fn test_failed_generation_keeps_only_user_turn() {
    let provider = ScriptedProvider::new();
    provider.reply("ok");
    provider.fail("network unreachable");
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    chat.submit("first", &mut sink).await.unwrap();
    let before = chat.conversation().len();

    chat.handle(ChatEvent::UserSubmitted("second".to_string()), &mut sink)
        .await;

    assert_eq!(chat.conversation().len(), before + 1);
    let last = chat.conversation().last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "second");
    assert_eq!(sink.errors.len(), 1);
    assert!(sink.errors[0].contains("network unreachable"));
}

#[tokio::test]
async fn test_session_usable_after_failure() {
    let provider = ScriptedProvider::new();
    provider.fail("timeout");
    provider.reply("recovered");
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    chat.handle(ChatEvent::UserSubmitted("a".to_string()), &mut sink)
        .await;
    chat.handle(ChatEvent::UserSubmitted("b".to_string()), &mut sink)
        .await;

    // a (failed), b, recovered
    assert_eq!(chat.conversation().len(), 3);
    assert_eq!(chat.conversation().last().unwrap().content, "recovered");
}

#[tokio::test]
async fn test_clear_always_empties() {
    let provider = ScriptedProvider::new();
    provider.reply("x");
    provider.fail("boom");
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    chat.handle(ChatEvent::ClearRequested, &mut sink).await;
    assert!(chat.conversation().is_empty());

    chat.submit("one", &mut sink).await.unwrap();
    let _ = chat.submit("two", &mut sink).await;
    assert_eq!(chat.conversation().len(), 3);

    chat.handle(ChatEvent::ClearRequested, &mut sink).await;
    assert!(chat.conversation().is_empty());
    assert_eq!(sink.conversation_lens.last(), Some(&0));
}

#[tokio::test]
async fn test_empty_credential_is_rejected() {
    let provider = ScriptedProvider::new();
    let mut chat = chat_with(&provider);
    let mut sink = RecordingSink::default();

    assert!(!chat.credential_entered("  ", &mut sink));
    assert!(!chat.is_ready());
    assert_eq!(sink.errors.len(), 1);
}

#[tokio::test]
async fn test_reentering_same_credential_is_silent() {
    let provider = ScriptedProvider::new();
    let mut sink = RecordingSink::default();
    let mut chat = configured_chat(&provider, &mut sink).await;

    assert!(chat.credential_entered("sk-ant-test", &mut sink));
    assert_eq!(sink.notices.len(), 1);
}
