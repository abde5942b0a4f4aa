use crate::config::prompt::HISTORY_FOR_PROMPT_LEN;
use crate::models::api::{ GenerateRequest, GenerateResponse };
use crate::models::chat::{ ChatMessage, ConversationMessage, Role };

use super::preview::PreviewDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    IdleWithError,
}

/// In-memory state of one chat session. Messages are append-only; the preview
/// is replaced wholesale on every successful generation.
#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
    preview: PreviewDocument,
    input: String,
    submitting: bool,
    error: Option<String>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (self.submitting, &self.error) {
            (true, _) => SessionState::Submitting,
            (false, Some(_)) => SessionState::IdleWithError,
            (false, None) => SessionState::Idle,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn preview(&self) -> &PreviewDocument {
        &self.preview
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Starts a turn from the current input. Returns `None`, changing nothing,
    /// when the input is blank or a turn is already in flight.
    pub fn begin_submit(&mut self) -> Option<GenerateRequest> {
        if self.submitting {
            return None;
        }
        let prompt = self.input.trim();
        if prompt.is_empty() {
            return None;
        }
        let prompt = prompt.to_string();

        // History sent alongside the prompt excludes the turn being submitted.
        let start = self.messages.len().saturating_sub(HISTORY_FOR_PROMPT_LEN);
        let conversation = self.messages[start..]
            .iter()
            .map(ConversationMessage::from)
            .collect();

        self.messages.push(ChatMessage::new(Role::User, prompt.clone()));
        self.input.clear();
        self.error = None;
        self.submitting = true;

        Some(GenerateRequest { prompt: Some(prompt), conversation })
    }

    /// Applies the outcome of the in-flight turn. Outcomes arriving while no
    /// turn is pending are dropped and `false` is returned.
    pub fn complete(&mut self, outcome: Result<GenerateResponse, String>) -> bool {
        if !self.submitting {
            return false;
        }
        self.submitting = false;
        match outcome {
            Ok(resp) => {
                self.messages.push(ChatMessage::new(Role::Assistant, resp.reply));
                self.preview = PreviewDocument::Game(resp.game);
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(reply: &str, game: &str) -> Result<GenerateResponse, String> {
        Ok(GenerateResponse { reply: reply.into(), game: game.into() })
    }

    fn submit(session: &mut ConversationSession, text: &str) -> Option<GenerateRequest> {
        session.set_input(text);
        session.begin_submit()
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut session = ConversationSession::new();
        assert!(submit(&mut session, "   \n").is_none());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.messages().is_empty());
        assert_eq!(session.input(), "   \n");
    }

    #[test]
    fn submit_appends_user_turn_and_clears_input() {
        let mut session = ConversationSession::new();
        let req = submit(&mut session, "  make breakout ").unwrap();

        assert_eq!(req.prompt.as_deref(), Some("make breakout"));
        assert!(req.conversation.is_empty());
        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(session.input(), "");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(session.messages()[0].content, "make breakout");
    }

    #[test]
    fn second_submit_is_ignored_while_pending() {
        let mut session = ConversationSession::new();
        submit(&mut session, "first").unwrap();

        assert!(submit(&mut session, "second").is_none());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.input(), "second");

        assert!(session.complete(ok("done", "<html>1</html>")));
        let req = session.begin_submit().unwrap();
        assert_eq!(req.prompt.as_deref(), Some("second"));
    }

    #[test]
    fn success_appends_reply_and_replaces_preview() {
        let mut session = ConversationSession::new();
        assert!(session.preview().is_placeholder());

        submit(&mut session, "pong").unwrap();
        session.complete(ok("Here is pong", "<html>pong</html>"));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert_eq!(session.messages()[1].content, "Here is pong");
        assert_eq!(session.preview(), &PreviewDocument::Game("<html>pong</html>".into()));

        submit(&mut session, "make it 3d").unwrap();
        session.complete(ok("Now in 3d", "<html>3d</html>"));
        assert_eq!(session.preview().html(), "<html>3d</html>");
    }

    #[test]
    fn failure_keeps_user_turn_and_preview() {
        let mut session = ConversationSession::new();
        submit(&mut session, "pong").unwrap();
        session.complete(ok("pong", "<html>pong</html>"));

        submit(&mut session, "break it").unwrap();
        session.complete(Err("The model returned an empty response".into()));

        assert_eq!(session.state(), SessionState::IdleWithError);
        assert_eq!(session.error(), Some("The model returned an empty response"));
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].content, "break it");
        assert_eq!(session.preview().html(), "<html>pong</html>");

        submit(&mut session, "try again").unwrap();
        assert_eq!(session.error(), None);
        assert_eq!(session.state(), SessionState::Submitting);
    }

    #[test]
    fn failure_before_first_game_keeps_placeholder() {
        let mut session = ConversationSession::new();
        submit(&mut session, "pong").unwrap();
        session.complete(Err("boom".into()));
        assert!(session.preview().is_placeholder());
    }

    #[test]
    fn stray_completion_is_dropped() {
        let mut session = ConversationSession::new();
        assert!(!session.complete(ok("x", "<html></html>")));
        assert!(session.messages().is_empty());
        assert!(session.preview().is_placeholder());
    }

    #[test]
    fn request_carries_at_most_six_prior_turns() {
        let mut session = ConversationSession::new();
        for i in 0..4 {
            submit(&mut session, &format!("ask {}", i)).unwrap();
            session.complete(ok(&format!("answer {}", i), "<html></html>"));
        }
        let req = submit(&mut session, "ask 4").unwrap();

        assert_eq!(req.conversation.len(), HISTORY_FOR_PROMPT_LEN);
        assert_eq!(req.conversation[0].content, "ask 1");
        assert_eq!(req.conversation[5].content, "answer 3");
        assert_eq!(session.messages().len(), 9);
    }
}
