//! In-memory doubles for the ports, shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::GatewayError;
use crate::ports::generative_model::{
    Candidate, ContentFuture, ContentRequest, ContentResponse, InlineData, ResponsePart,
};
use crate::ports::{CredentialAuthority, GenerativeModel, Notifier};

/// What the scripted model does on its next call.
pub enum Script {
    /// Return this response.
    Respond(ContentResponse),
    /// Fail with an API error carrying this message.
    Fail(u16, String),
    /// Never resolve.
    Hang,
}

/// Response with one inline image part.
pub fn image_response(payload: &str) -> ContentResponse {
    ContentResponse {
        candidates: vec![Candidate {
            parts: vec![ResponsePart {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: "image/png".into(),
                    data: payload.into(),
                }),
            }],
        }],
    }
}

/// Response with one text part.
pub fn text_response(text: &str) -> ContentResponse {
    ContentResponse {
        candidates: vec![Candidate {
            parts: vec![ResponsePart { text: Some(text.into()), inline_data: None }],
        }],
    }
}

/// Model double that plays back a script and records every request.
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ContentRequest>>,
}

impl ScriptedModel {
    pub fn new(script: impl IntoIterator<Item = Script>) -> Self {
        Self { script: Mutex::new(script.into_iter().collect()), requests: Mutex::default() }
    }

    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl GenerativeModel for ScriptedModel {
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        Box::pin(async move {
            match next {
                Some(Script::Respond(response)) => Ok(response),
                Some(Script::Fail(status, message)) => Err(GatewayError::Api { status, message }),
                Some(Script::Hang) => std::future::pending().await,
                None => panic!("scripted model exhausted"),
            }
        })
    }
}

/// Credential authority double with a fixed answer and a selector call counter.
pub struct FakeCredentials {
    selected: bool,
    opened: AtomicUsize,
}

impl FakeCredentials {
    pub fn new(selected: bool) -> Self {
        Self { selected, opened: AtomicUsize::new(0) }
    }

    pub fn selector_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl CredentialAuthority for FakeCredentials {
    fn has_selected_credential(&self) -> bool {
        self.selected
    }

    fn open_credential_selector(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier double that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_failure(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
