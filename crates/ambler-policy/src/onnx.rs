//! ONNX policy inference via the `ort` crate.
//!
//! Requires the `onnx` feature flag.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use thiserror::Error;

use ambler_core::traits::Policy;
use ambler_core::types::{Action, Observation, JOINT_COUNT, OBSERVATION_DIM};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an ONNX policy.
///
/// All of these are fatal at startup: the controller cannot run without a
/// usable model, and loading is never retried.
#[derive(Debug, Error)]
pub enum OnnxPolicyError {
    /// Failed to load an ONNX model from disk.
    #[error("failed to load ONNX model from {path}: {source}")]
    LoadFailed {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying ort error.
        source: ort::Error,
    },
    /// No observation input tensor found in the model.
    #[error("no observation input tensor found (expected 'obs' or 'observation')")]
    MissingObsInput,
    /// No action output tensor found in the model.
    #[error("no action output tensor found (expected 'action' or 'actions')")]
    MissingActionOutput,
    /// Could not determine observation dimension from the model input shape.
    #[error("could not determine observation dimension from model input shape")]
    UnknownObsDim,
    /// Could not determine action dimension from the model output shape.
    #[error("could not determine action dimension from model output shape")]
    UnknownActionDim,
    /// The model's observation width does not match the feature layout.
    #[error("incompatible model: expects {got}-wide observations, controller emits {expected}")]
    ObsDimMismatch {
        /// Dimension the controller produces.
        expected: usize,
        /// Dimension the model expects.
        got: usize,
    },
    /// The model emits fewer values than there are joints to command.
    #[error("incompatible model: emits {got} action values, need at least {expected}")]
    ActionDimTooSmall {
        /// Minimum usable action width.
        expected: usize,
        /// Width the model produces.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// OnnxPolicy
// ---------------------------------------------------------------------------

/// A locomotion policy backed by an ONNX Runtime session.
///
/// Wraps an [`ort::session::Session`] and implements the
/// [`Policy`](ambler_core::traits::Policy) trait. The session is protected
/// by a [`Mutex`] because `Session::run` requires `&mut self`.
pub struct OnnxPolicy {
    session: Mutex<Session>,
    obs_dim: usize,
    action_dim: usize,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPolicy")
            .field("obs_dim", &self.obs_dim)
            .field("action_dim", &self.action_dim)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxPolicy {
    /// Load an ONNX model from a file and create a new `OnnxPolicy`.
    ///
    /// The model must have:
    /// - An input tensor named `"obs"` or `"observation"` with shape
    ///   `[1, OBSERVATION_DIM]`.
    /// - An output tensor named `"action"` or `"actions"` with shape
    ///   `[1, n]`, `n >= JOINT_COUNT`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OnnxPolicyError> {
        let path = path.as_ref();

        let session: Session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| OnnxPolicyError::LoadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let input_name = find_tensor_name(
            session.inputs().iter().map(|i| i.name()),
            &["obs", "observation"],
        )
        .ok_or(OnnxPolicyError::MissingObsInput)?;

        let output_name = find_tensor_name(
            session.outputs().iter().map(|o| o.name()),
            &["action", "actions"],
        )
        .ok_or(OnnxPolicyError::MissingActionOutput)?;

        let obs_dim = extract_input_dim(&session, &input_name)?;
        let action_dim = extract_output_dim(&session, &output_name)?;

        // An artifact trained against a different feature layout would run
        // but command garbage; refuse it up front.
        if obs_dim != OBSERVATION_DIM {
            return Err(OnnxPolicyError::ObsDimMismatch {
                expected: OBSERVATION_DIM,
                got: obs_dim,
            });
        }
        if action_dim < JOINT_COUNT {
            return Err(OnnxPolicyError::ActionDimTooSmall {
                expected: JOINT_COUNT,
                got: action_dim,
            });
        }

        Ok(Self {
            session: Mutex::new(session),
            obs_dim,
            action_dim,
            input_name,
            output_name,
        })
    }

    /// Returns the observation dimension expected by the model.
    #[must_use]
    pub const fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    /// Returns the action dimension produced by the model.
    #[must_use]
    pub const fn action_dim(&self) -> usize {
        self.action_dim
    }
}

// ---------------------------------------------------------------------------
// Policy trait implementation
// ---------------------------------------------------------------------------

impl Policy for OnnxPolicy {
    fn get_action(&self, obs: &Observation) -> Action {
        let obs_slice = obs.as_slice();
        let obs_len = obs_slice.len().min(self.obs_dim);

        // Build a zero-padded [1, obs_dim] input buffer.
        let mut input_data = vec![0.0f32; self.obs_dim];
        input_data[..obs_len].copy_from_slice(&obs_slice[..obs_len]);

        let input_tensor =
            TensorRef::<f32>::from_array_view(([1_usize, self.obs_dim], &*input_data))
                .expect("failed to create input tensor");

        let mut session = self.session.lock().expect("session lock poisoned");
        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .expect("ONNX inference failed");

        let (_shape, output_data) = outputs[&*self.output_name]
            .try_extract_tensor::<f32>()
            .expect("failed to extract action tensor");

        let mut action_data: Vec<f32> = output_data.iter().copied().collect();
        action_data.truncate(self.action_dim);
        Action::from(action_data)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "OnnxPolicy"
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Return the first candidate name present among the session's tensors.
fn find_tensor_name<'a>(
    names: impl Iterator<Item = &'a str>,
    candidates: &[&str],
) -> Option<String> {
    let name_vec: Vec<&str> = names.collect();
    candidates
        .iter()
        .find(|candidate| name_vec.contains(*candidate))
        .map(|candidate| (*candidate).to_string())
}

/// Extract the observation dimension from the named input tensor.
///
/// Expects shape `[batch, obs_dim]` and returns `obs_dim`.
fn extract_input_dim(session: &Session, name: &str) -> Result<usize, OnnxPolicyError> {
    for input in session.inputs() {
        if input.name() == name {
            if let ValueType::Tensor { shape, .. } = input.dtype() {
                if shape.len() >= 2 {
                    let dim = shape[1];
                    if dim > 0 {
                        return Ok(dim as usize);
                    }
                }
            }
        }
    }
    Err(OnnxPolicyError::UnknownObsDim)
}

/// Extract the action dimension from the named output tensor.
///
/// Expects shape `[batch, action_dim]` and returns `action_dim`.
fn extract_output_dim(session: &Session, name: &str) -> Result<usize, OnnxPolicyError> {
    for output in session.outputs() {
        if output.name() == name {
            if let ValueType::Tensor { shape, .. } = output.dtype() {
                if shape.len() >= 2 {
                    let dim = shape[1];
                    if dim > 0 {
                        return Ok(dim as usize);
                    }
                }
            }
        }
    }
    Err(OnnxPolicyError::UnknownActionDim)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_on_missing_file() {
        let result = OnnxPolicy::from_file("/nonexistent/model.onnx");
        assert!(matches!(
            result.unwrap_err(),
            OnnxPolicyError::LoadFailed { .. }
        ));
    }

    #[test]
    fn find_tensor_name_prefers_first_candidate() {
        let names = ["actions", "action"];
        let found = find_tensor_name(names.into_iter(), &["action", "actions"]);
        assert_eq!(found.as_deref(), Some("action"));
    }

    #[test]
    fn find_tensor_name_none_when_absent() {
        let names = ["logits"];
        assert!(find_tensor_name(names.into_iter(), &["action", "actions"]).is_none());
    }

    #[test]
    fn error_display_mentions_dims() {
        let err = OnnxPolicyError::ObsDimMismatch {
            expected: OBSERVATION_DIM,
            got: 48,
        };
        assert!(err.to_string().contains("48"));
    }

    #[test]
    fn onnx_policy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OnnxPolicy>();
    }
}
