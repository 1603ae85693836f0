//! Replaying adapter for the `GenerativeModel` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GatewayError;
use crate::ports::generative_model::{
    ContentFuture, ContentRequest, ContentResponse, GenerativeModel,
};

/// Serves recorded model responses from a cassette.
pub struct ReplayingGenerativeModel {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGenerativeModel {
    /// Create a replaying model backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl GenerativeModel for ReplayingGenerativeModel {
    fn generate_content(&self, _request: &ContentRequest) -> ContentFuture<'_> {
        let output = next_output(&self.replayer, "generative_model", "generate_content");
        Box::pin(async move {
            let output = output.map_err(|message| GatewayError::Api { status: 0, message })?;
            replay_result::<ContentResponse>(output)
        })
    }
}
