// src/service.rs

use crate::client::{ChatMessage, LlmClient};
use crate::error::MapLlmError;
use crate::interpreter::interpret_model_reply;
use crate::ops::{parse_operations, MapOperation, MapScene};
use crate::prompt;
use crate::safety;
use crate::types::{MapCommandReply, MapCommandRequest};

/// Drives one natural-language map request through the full pipeline:
/// prompt construction, the provider call, reply interpretation, the safety
/// filter and operation validation.
///
/// The provider client is built once and held for the service's lifetime
/// rather than re-created per request. Requests are otherwise independent:
/// there is no queueing or cancellation of overlapping calls, so callers
/// that allow concurrent submissions must serialize application of the
/// resulting operations themselves.
#[derive(Debug, Clone)]
pub struct MapCommandService {
    client: LlmClient,
}

impl MapCommandService {
    pub fn new(client: LlmClient) -> Self {
        MapCommandService { client }
    }

    /// Builds the service with a client configured from the process
    /// environment (see [`LlmClient::from_env`]).
    pub fn from_env() -> Result<Self, MapLlmError> {
        Ok(MapCommandService {
            client: LlmClient::from_env()?,
        })
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Handles one map-command request and returns the validated reply.
    ///
    /// The reply's `code` payload has passed the safety filter and parses
    /// into known, schema-valid operations; its `explanation` is always
    /// filled. Failures map to HTTP-equivalent statuses via
    /// [`MapLlmError::status_code`].
    pub async fn handle(
        &self,
        request: &MapCommandRequest,
    ) -> Result<MapCommandReply, MapLlmError> {
        log::info!("Received prompt: {}", request.prompt);
        log::debug!("Current map state: {:?}", request.map_state);

        let messages = [
            ChatMessage::system(prompt::SYSTEM_PROMPT),
            ChatMessage::user(prompt::user_message(&request.prompt, &request.map_state)),
        ];

        let raw_reply = self.client.complete(&messages).await?;
        log::debug!("Raw model reply: {}", raw_reply);

        let result = interpret_model_reply(&raw_reply)?;
        log::debug!("Interpreted reply: {:?}", result);

        safety::check_code(&result.code)?;

        let operations = parse_operations(&result.code)?;
        log::info!("Validated {} map operations", operations.len());

        Ok(MapCommandReply {
            code: result.code,
            explanation: result.explanation,
        })
    }

    /// Like [`handle`](Self::handle), but also applies the operations and
    /// returns the resulting scene for front ends that render server-side
    /// state instead of forwarding the payload.
    pub async fn handle_to_scene(
        &self,
        request: &MapCommandRequest,
    ) -> Result<(MapCommandReply, Vec<MapOperation>, MapScene), MapLlmError> {
        let reply = self.handle(request).await?;
        let operations = reply.operations()?;
        let scene = MapScene::from_operations(&operations);
        Ok((reply, operations, scene))
    }
}
