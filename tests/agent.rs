mod common;

use common::{ agent_with, unconfigured_agent, Behaviour, MockChatClient };
use finchat::error::ChatError;
use std::io::Write;

#[tokio::test]
async fn unconfigured_agent_refuses_before_any_call() {
    let agent = unconfigured_agent();
    assert!(!agent.is_configured());
    match agent.answer("What is a bond?").await {
        Err(ChatError::NotConfigured(provider)) => assert_eq!(provider, "Gemini"),
        other => panic!("expected NotConfigured, got {:?}", other),
    }
}

#[tokio::test]
async fn blank_questions_never_reach_the_provider() {
    let client = MockChatClient::replying("unused");
    let agent = agent_with(&client, true);

    for question in ["", "   ", "\n\t "] {
        assert!(matches!(agent.answer(question).await, Err(ChatError::EmptyPrompt)));
    }
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn question_is_forwarded_verbatim() {
    let client = MockChatClient::replying("ok");
    let agent = agent_with(&client, true);

    agent.answer("  How much *should* I save?  ").await.unwrap();
    assert_eq!(client.last_question().as_deref(), Some("  How much *should* I save?  "));
}

#[tokio::test]
async fn replies_are_cleaned_when_enabled() {
    let client = MockChatClient::replying("**Tips**\n- Save\n\n\n- Invest");
    let agent = agent_with(&client, true);
    assert_eq!(agent.answer("tips?").await.unwrap(), "Tips\n\n• Save\n\n• Invest");
}

#[tokio::test]
async fn replies_are_untouched_when_cleaning_is_off() {
    let client = MockChatClient::replying("**Tips**\n- Save");
    let agent = agent_with(&client, false);
    assert_eq!(agent.answer("tips?").await.unwrap(), "**Tips**\n- Save");
}

#[tokio::test]
async fn provider_errors_propagate_unchanged() {
    let client = MockChatClient::new(Behaviour::Fail(503));
    let agent = agent_with(&client, true);
    assert!(matches!(agent.answer("q").await, Err(ChatError::Upstream { status: 503, .. })));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn prompts_reload_from_file() {
    let client = MockChatClient::replying("ok");
    let agent = agent_with(&client, true);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"instructions": "Answer in one sentence."}}"#).unwrap();

    assert!(agent.reload_prompts_if_changed(file.path()).await.unwrap());
    assert_eq!(agent.prompt_config().await.instructions, "Answer in one sentence.");
    assert!(!agent.reload_prompts_if_changed(file.path()).await.unwrap());
}
