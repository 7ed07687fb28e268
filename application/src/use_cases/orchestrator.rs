//! Response orchestration use case.
//!
//! [`ResponseOrchestrator`] watches a [`ConversationSession`] for User
//! messages that still owe a response and produces exactly one response
//! for each of them, one at a time.
//!
//! # Turn flow
//!
//! 1. Claim the owed turn (appends the empty Assistant placeholder)
//! 2. Build the prompt for the turn's mode (retrieving context in RAG mode)
//! 3. Stream the completion, rewriting the placeholder as text accumulates
//! 4. Settle: on failure the placeholder shows the mode's error text
//!
//! After every settle the trigger is evaluated again, so a message sent
//! while a response was streaming is answered next.

use super::generation::GenerationClient;
use super::prompt_builder::PromptBuilder;
use super::session::ConversationSession;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::observer::TurnOutcome;
use ragchat_domain::PendingTurn;
use ragchat_domain::util::preview;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ResponseOrchestrator {
    session: ConversationSession,
    prompt_builder: PromptBuilder,
    generation: GenerationClient,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ResponseOrchestrator {
    pub fn new(
        session: ConversationSession,
        prompt_builder: PromptBuilder,
        generation: GenerationClient,
    ) -> Self {
        Self {
            session,
            prompt_builder,
            generation,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompt_builder
    }

    /// Append a User message and answer whatever is owed.
    ///
    /// Returns the index of the appended message. If another call is
    /// already generating, this returns once the message is appended and
    /// that call answers it.
    pub async fn submit(&self, text: impl Into<String>) -> usize {
        let index = self.session.append_user(text);
        self.respond_pending().await;
        index
    }

    /// Empty the conversation.
    ///
    /// A turn already generating runs to completion but nothing it produces
    /// is kept.
    pub fn clear(&self) {
        let generating = self.session.is_generating();
        self.session.clear();
        info!("Conversation cleared");
        self.conversation_logger.log(ConversationEvent::new(
            "conversation_cleared",
            serde_json::json!({ "while_generating": generating }),
        ));
    }

    /// Answer owed turns until none is left. Returns how many ran.
    ///
    /// Safe to call at any time, any number of times: a turn is claimed
    /// atomically, so concurrent callers never answer the same message twice
    /// and a call made while generating returns immediately.
    pub async fn respond_pending(&self) -> usize {
        let mut turns = 0;
        while let Some(turn) = self.session.try_begin_turn() {
            self.run_turn(turn).await;
            turns += 1;
        }
        turns
    }

    async fn run_turn(&self, turn: PendingTurn) -> TurnOutcome {
        info!(
            "Responding to message {} ({} mode): {}",
            turn.user_index,
            turn.mode,
            preview(&turn.user_text, 80)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_started",
            serde_json::json!({
                "user_index": turn.user_index,
                "mode": turn.mode.as_str(),
                "text": turn.user_text,
            }),
        ));

        let failure = match self.prompt_builder.build(turn.mode, &turn.user_text).await {
            Ok(prompt) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "prompt_built",
                    serde_json::json!({
                        "user_index": turn.user_index,
                        "bytes": prompt.len(),
                        "prompt": prompt,
                    }),
                ));
                let result = self
                    .generation
                    .generate(&prompt, |text| {
                        self.session.write_response(&turn, text);
                    })
                    .await;
                match result.error {
                    None => {
                        self.conversation_logger.log(ConversationEvent::new(
                            "turn_completed",
                            serde_json::json!({
                                "user_index": turn.user_index,
                                "bytes": result.text.len(),
                                "text": result.text,
                            }),
                        ));
                        None
                    }
                    Some(error) => Some(error),
                }
            }
            Err(e) => Some(e.to_string()),
        };

        if let Some(error) = &failure {
            warn!("Turn {} failed: {}", turn.user_index, error);
            self.conversation_logger.log(ConversationEvent::new(
                "turn_failed",
                serde_json::json!({
                    "user_index": turn.user_index,
                    "mode": turn.mode.as_str(),
                    "error": error,
                }),
            ));
        }

        let outcome = self
            .session
            .settle(&turn, failure.map(|error| (turn.mode.error_message(), error)));
        if outcome == TurnOutcome::Discarded {
            info!("Conversation cleared during turn {}; response discarded", turn.user_index);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::{ChannelObserver, SessionEvent};
    use crate::ports::service_error::ServiceError;
    use crate::testing::{
        ScriptedEmbedding, ScriptedGeneration, ScriptedVectorStore, StaticTemplates, StreamScript,
    };
    use crate::use_cases::retrieval::RetrievalPipeline;
    use ragchat_domain::{ChatMode, Message, TemplateName};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    struct Fixture {
        orchestrator: Arc<ResponseOrchestrator>,
        generation: Arc<ScriptedGeneration>,
        store: Arc<ScriptedVectorStore>,
    }

    fn fixture(
        mode: ChatMode,
        embedding: ScriptedEmbedding,
        store: ScriptedVectorStore,
        scripts: Vec<StreamScript>,
    ) -> Fixture {
        let store = Arc::new(store);
        let generation = Arc::new(ScriptedGeneration::new(scripts));
        let templates = StaticTemplates::new()
            .with(TemplateName::Chat, "chat:{{userQuestion}}")
            .with(TemplateName::Rag, "rag:{{userQuestion}}{{context}}");
        let prompt_builder = PromptBuilder::new(
            Arc::new(templates),
            RetrievalPipeline::new(Arc::new(embedding), store.clone()),
        );
        let orchestrator = ResponseOrchestrator::new(
            ConversationSession::new(mode),
            prompt_builder,
            GenerationClient::new(generation.clone()),
        );
        Fixture {
            orchestrator: Arc::new(orchestrator),
            generation,
            store,
        }
    }

    fn plain(scripts: Vec<StreamScript>) -> Fixture {
        fixture(
            ChatMode::Plain,
            ScriptedEmbedding::ok(vec![1.0]),
            ScriptedVectorStore::ok(vec!["doc"]),
            scripts,
        )
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl RecordingLogger {
        fn types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_empty_conversation_does_nothing() {
        let f = plain(vec![]);
        assert_eq!(f.orchestrator.respond_pending().await, 0);
        assert!(f.generation.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_plain_turn_is_answered() {
        let f = plain(vec![StreamScript::deliveries(vec![
            "{\"response\":\"Hel\"}\n",
            "{\"response\":\"lo\"}\n",
        ])]);

        f.orchestrator.submit("hi").await;

        assert_eq!(
            f.orchestrator.session().messages(),
            vec![Message::user("hi"), Message::assistant("Hello")]
        );
        assert_eq!(f.generation.prompts(), vec!["chat:hi"]);
        assert!(!f.orchestrator.session().is_generating());
        assert!(f.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rag_turn_includes_context() {
        let f = fixture(
            ChatMode::Rag,
            ScriptedEmbedding::ok(vec![0.5]),
            ScriptedVectorStore::ok(vec!["Rust is fast."]),
            vec![StreamScript::answer("Yes.")],
        );

        f.orchestrator.submit("Is Rust fast?").await;

        assert_eq!(
            f.generation.prompts(),
            vec!["rag:Is Rust fast?\n\nRelevant context:\nRust is fast."]
        );
        assert_eq!(f.store.calls(), vec![(vec![0.5], 3)]);
        assert_eq!(
            f.orchestrator.session().messages()[1],
            Message::assistant("Yes.")
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_shows_rag_error() {
        let f = fixture(
            ChatMode::Rag,
            ScriptedEmbedding::failing(ServiceError::status(500, "down")),
            ScriptedVectorStore::ok(vec!["never"]),
            vec![StreamScript::answer("never")],
        );

        f.orchestrator.submit("q").await;

        assert_eq!(
            f.orchestrator.session().messages(),
            vec![
                Message::user("q"),
                Message::assistant("Error getting response from RAG system."),
            ]
        );
        assert!(f.store.calls().is_empty());
        assert!(f.generation.prompts().is_empty());
        assert!(!f.orchestrator.session().is_generating());
    }

    #[tokio::test]
    async fn test_stream_failure_replaces_partial_text() {
        let f = plain(vec![StreamScript::Deliveries(vec![
            Ok(b"{\"response\":\"half\"}\n".to_vec()),
            Err(ServiceError::Transport("reset".to_string())),
        ])]);

        f.orchestrator.submit("q").await;

        assert_eq!(
            f.orchestrator.session().messages()[1],
            Message::assistant("Error getting response from Ollama.")
        );
    }

    #[tokio::test]
    async fn test_failed_turn_is_not_retried() {
        let f = plain(vec![
            StreamScript::Refuse(ServiceError::Transport("refused".to_string())),
            StreamScript::answer("second"),
        ]);

        f.orchestrator.submit("first").await;
        assert_eq!(f.orchestrator.respond_pending().await, 0);
        assert_eq!(f.orchestrator.session().unanswered_turn(), None);

        f.orchestrator.submit("again").await;
        let messages = f.orchestrator.session().messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3], Message::assistant("second"));
    }

    #[tokio::test]
    async fn test_each_message_answered_exactly_once() {
        let f = plain(vec![
            StreamScript::answer("r1"),
            StreamScript::answer("r2"),
            StreamScript::answer("r3"),
        ]);

        for text in ["a", "b", "c"] {
            f.orchestrator.submit(text).await;
            f.orchestrator.respond_pending().await;
        }

        let messages = f.orchestrator.session().messages();
        assert_eq!(
            messages,
            vec![
                Message::user("a"),
                Message::assistant("r1"),
                Message::user("b"),
                Message::assistant("r2"),
                Message::user("c"),
                Message::assistant("r3"),
            ]
        );
        assert_eq!(f.generation.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_message_sent_while_generating_is_answered_next() {
        let (release, gate) = oneshot::channel();
        let f = plain(vec![
            StreamScript::gated(gate, "first answer"),
            StreamScript::answer("second answer"),
        ]);

        let orchestrator = f.orchestrator.clone();
        let running = tokio::spawn(async move { orchestrator.submit("first").await });

        while !f.orchestrator.session().is_generating() {
            tokio::task::yield_now().await;
        }
        // The in-flight call picks this up after it settles.
        f.orchestrator.submit("second").await;
        release.send(()).unwrap();
        running.await.unwrap();

        assert_eq!(
            f.orchestrator.session().messages(),
            vec![
                Message::user("first"),
                Message::assistant("first answer"),
                Message::user("second"),
                Message::assistant("second answer"),
            ]
        );
    }

    #[tokio::test]
    async fn test_clear_during_generation_discards_response() {
        let (release, gate) = oneshot::channel();
        let (observer, mut rx) = ChannelObserver::channel();
        let generation = Arc::new(ScriptedGeneration::new(vec![StreamScript::gated(
            gate, "stale",
        )]));
        let orchestrator = Arc::new(ResponseOrchestrator::new(
            ConversationSession::new(ChatMode::Plain).with_observer(Arc::new(observer)),
            PromptBuilder::new(
                Arc::new(StaticTemplates::new().with(TemplateName::Chat, "{{userQuestion}}")),
                RetrievalPipeline::new(
                    Arc::new(ScriptedEmbedding::ok(vec![1.0])),
                    Arc::new(ScriptedVectorStore::ok(vec!["x"])),
                ),
            ),
            GenerationClient::new(generation),
        ));

        let running = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit("question").await })
        };
        while !orchestrator.session().is_generating() {
            tokio::task::yield_now().await;
        }

        orchestrator.session().clear();
        release.send(()).unwrap();
        running.await.unwrap();

        assert!(orchestrator.session().is_empty());
        assert!(!orchestrator.session().is_generating());

        let events: Vec<SessionEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(
            events.last(),
            Some(&SessionEvent::TurnSettled {
                user_index: 0,
                outcome: TurnOutcome::Discarded,
            })
        );
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, SessionEvent::MessageUpdated { .. }))
        );
    }

    #[tokio::test]
    async fn test_message_after_clear_waits_for_stale_run() {
        let (release, gate) = oneshot::channel();
        let f = plain(vec![
            StreamScript::gated(gate, "stale"),
            StreamScript::answer("fresh"),
        ]);

        let running = {
            let orchestrator = f.orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit("old").await })
        };
        while !f.orchestrator.session().is_generating() {
            tokio::task::yield_now().await;
        }

        f.orchestrator.session().clear();
        f.orchestrator.submit("new").await;
        assert_eq!(f.orchestrator.session().messages(), vec![Message::user("new")]);

        release.send(()).unwrap();
        running.await.unwrap();

        assert_eq!(
            f.orchestrator.session().messages(),
            vec![Message::user("new"), Message::assistant("fresh")]
        );
    }

    #[tokio::test]
    async fn test_mode_change_applies_to_next_turn() {
        let f = fixture(
            ChatMode::Plain,
            ScriptedEmbedding::ok(vec![1.0]),
            ScriptedVectorStore::ok(vec!["ctx"]),
            vec![StreamScript::answer("a"), StreamScript::answer("b")],
        );

        f.orchestrator.submit("one").await;
        f.orchestrator.session().set_mode(ChatMode::Rag);
        f.orchestrator.submit("two").await;

        assert_eq!(
            f.generation.prompts(),
            vec!["chat:one", "rag:two\n\nRelevant context:\nctx"]
        );
    }

    #[tokio::test]
    async fn test_manual_assistant_message_suppresses_response() {
        let f = plain(vec![StreamScript::answer("unused")]);

        f.orchestrator.session().append_user("hello");
        f.orchestrator.session().append(Message::assistant("canned"));

        assert_eq!(f.orchestrator.respond_pending().await, 0);
        assert!(f.generation.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_log_events() {
        let logger = Arc::new(RecordingLogger::default());
        let f = plain(vec![
            StreamScript::answer("ok"),
            StreamScript::Refuse(ServiceError::Transport("refused".to_string())),
        ]);
        let orchestrator = Arc::try_unwrap(f.orchestrator)
            .ok()
            .unwrap()
            .with_conversation_logger(logger.clone());

        orchestrator.submit("one").await;
        orchestrator.submit("two").await;
        orchestrator.clear();

        assert_eq!(
            logger.types(),
            vec![
                "turn_started",
                "prompt_built",
                "turn_completed",
                "turn_started",
                "prompt_built",
                "turn_failed",
                "conversation_cleared",
            ]
        );
        assert!(orchestrator.session().is_empty());
    }
}
