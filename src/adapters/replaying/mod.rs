//! Replaying adapters that serve recorded interactions from cassettes.

pub mod generative_model;

use std::sync::{Arc, Mutex};

use crate::cassette::format::RecordedError;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GatewayError;

/// Retrieve the next recorded output for a given port and method.
///
/// # Errors
///
/// Returns an error if the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.next_interaction(port, method).map(|i| i.output.clone())
}

/// Turn a recorded `{"Ok": ..}` / `{"Err": ..}` output back into a result.
///
/// Outputs without either key are treated as a bare `Ok` value. An `Err`
/// holding a plain string is replayed as an untyped error with that message.
///
/// # Errors
///
/// Returns the recorded error, or [`GatewayError::Decode`] if the output
/// does not match the expected shape.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, GatewayError> {
    let serde_json::Value::Object(mut fields) = output else {
        return serde_json::from_value(output).map_err(bad_output);
    };
    if let Some(err) = fields.remove("Err") {
        let recorded = match err {
            serde_json::Value::String(message) => RecordedError::Other { message },
            other => serde_json::from_value(other).map_err(bad_output)?,
        };
        return Err(recorded.into());
    }
    let value = fields.remove("Ok").unwrap_or(serde_json::Value::Object(fields));
    serde_json::from_value(value).map_err(bad_output)
}

fn bad_output(e: serde_json::Error) -> GatewayError {
    GatewayError::Decode(format!("Bad replayed output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_value_is_deserialized() {
        let value: Vec<u8> = replay_result(json!({"Ok": [1, 2, 3]})).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn typed_err_is_rebuilt() {
        let err = replay_result::<Vec<u8>>(json!({"Err": {"kind": "missing_api_key", "env_var": "GEMINI_API_KEY"}}))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingApiKey { ref env_var } if env_var == "GEMINI_API_KEY"));

        let err = replay_result::<Vec<u8>>(json!({"Err": {"kind": "api", "status": 403, "message": "Permission denied"}}))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 403, .. }));
    }

    #[test]
    fn plain_err_string_keeps_message() {
        let err = replay_result::<Vec<u8>>(json!({"Err": "Permission denied"})).unwrap_err();
        assert_eq!(err.to_string(), "API error (0): Permission denied");
    }

    #[test]
    fn unknown_err_kind_is_a_decode_error() {
        let err = replay_result::<Vec<u8>>(json!({"Err": {"kind": "solar_flare"}})).unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn bare_object_is_ok() {
        let value: std::collections::HashMap<String, u8> = replay_result(json!({"a": 1})).unwrap();
        assert_eq!(value["a"], 1);
    }
}
