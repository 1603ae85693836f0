//! Recording adapters that capture interactions to cassettes.

pub mod generative_model;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::format::RecordedError;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::GatewayError;

/// Record a call's result using the Ok/Err JSON convention.
///
/// Errors are stored as a typed [`RecordedError`]. Interactions that cannot
/// be serialized are skipped with a warning.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, GatewayError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = match serde_json::to_value(input) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, port, method, "skipping recording: input not serializable");
            return;
        }
    };

    let output_json = match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => {
                warn!(error = %e, port, method, "skipping recording: output not serializable");
                return;
            }
        },
        Err(e) => match serde_json::to_value(RecordedError::from(e)) {
            Ok(inner) => serde_json::json!({ "Err": inner }),
            Err(e) => {
                warn!(error = %e, port, method, "skipping recording: error not serializable");
                return;
            }
        },
    };

    let mut guard = recorder.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.record(port, method, input_json, output_json);
}
