pub mod preview;
pub mod repl;
pub mod session;
pub mod transport;

use log::warn;

use self::session::ConversationSession;
use self::transport::RelayTransport;

/// Drives a [`ConversationSession`] against a relay. Taking `&mut self` for a
/// whole turn keeps at most one request in flight per session.
pub struct ConversationClient<T: RelayTransport> {
    session: ConversationSession,
    transport: T,
}

impl<T: RelayTransport> ConversationClient<T> {
    pub fn new(transport: T) -> Self {
        Self { session: ConversationSession::new(), transport }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Runs one turn. Returns `false` when the input was blank and nothing happened.
    pub async fn submit(&mut self, input: &str) -> bool {
        self.session.set_input(input);
        let Some(request) = self.session.begin_submit() else {
            return false;
        };

        let outcome = self.transport.generate(&request).await.map_err(|e| {
            warn!("Generation turn failed: {}", e);
            e.to_string()
        });
        self.session.complete(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::SessionState;
    use crate::client::transport::TransportError;
    use crate::models::api::{ GenerateRequest, GenerateResponse };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedRelay {
        replies: Mutex<VecDeque<Result<GenerateResponse, TransportError>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedRelay {
        fn new(replies: Vec<Result<GenerateResponse, TransportError>>) -> Self {
            Self { replies: Mutex::new(replies.into()), requests: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl RelayTransport for ScriptedRelay {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies.lock().unwrap().pop_front().unwrap_or(Err(TransportError::Status(500)))
        }
    }

    #[tokio::test]
    async fn turns_flow_through_transport() {
        let relay = ScriptedRelay::new(vec![
            Ok(GenerateResponse { reply: "Snake is ready".into(), game: "<html>snake</html>".into() }),
            Err(TransportError::Rejected("The model response was not valid JSON".into())),
        ]);
        let mut client = ConversationClient::new(relay);

        assert!(!client.submit("  ").await);
        assert!(client.submit("snake").await);
        assert_eq!(client.session().state(), SessionState::Idle);
        assert_eq!(client.session().preview().html(), "<html>snake</html>");

        assert!(client.submit("add walls").await);
        assert_eq!(client.session().state(), SessionState::IdleWithError);
        assert_eq!(client.session().error(), Some("The model response was not valid JSON"));
        assert_eq!(client.session().messages().len(), 3);

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].prompt.as_deref(), Some("add walls"));
        assert_eq!(requests[1].conversation.len(), 2);
    }
}
