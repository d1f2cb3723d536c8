//! Uniform success/failure result returned by every repository call.
//!
//! An [`Operation`] is either a success carrying a payload and an optional
//! message, or a failure carrying a classified [`ErrorKind`] and message.
//! The two shapes are distinct enum states, so a success can never carry a
//! failure kind and a failure can never carry a payload.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error_kind::ErrorKind;
use super::error_strategy::ErrorStrategy;
use super::failure::Failure;

/// Classified failure carried by an unsuccessful [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    kind: ErrorKind,
    message: String,
}

impl OperationFailure {
    fn classify(failure: &Failure, strategy: &dyn ErrorStrategy) -> Self {
        let (kind, message) = strategy.classify(failure).into_parts();
        if kind.is_failure() {
            return Self { kind, message };
        }
        warn!(
            failure = failure.type_name(),
            "classification strategy returned None for a failure; using Unexpected"
        );
        Self {
            kind: ErrorKind::Unexpected,
            message,
        }
    }

    /// Failure category; never [`ErrorKind::None`].
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Rendered failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for OperationFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State<T> {
    Succeeded { data: T, message: String },
    Failed(OperationFailure),
}

/// Result of a repository or service call.
///
/// # Example
///
/// ```
/// use tenant_backend::domain::{BusinessStrategy, ErrorKind, Failure, Operation};
///
/// let found = Operation::success(42);
/// assert!(found.is_successful());
/// assert_eq!(found.error_kind(), ErrorKind::None);
///
/// let missing: Operation<u32> =
///     Operation::fail(&Failure::rule("User not found"), &BusinessStrategy::rule());
/// assert!(!missing.is_successful());
/// assert_eq!(missing.data(), None);
/// assert_eq!(missing.error_kind(), ErrorKind::BusinessValidation);
/// assert_eq!(missing.message(), "User not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation<T> {
    state: State<T>,
}

impl<T> Operation<T> {
    /// Successful result with an empty message.
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, String::new())
    }

    /// Successful result with an informational message.
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            state: State::Succeeded {
                data,
                message: message.into(),
            },
        }
    }

    /// Failed result classified by `strategy`.
    ///
    /// A strategy that answers [`ErrorKind::None`] is treated as having
    /// answered [`ErrorKind::Unexpected`].
    pub fn fail(failure: &Failure, strategy: &dyn ErrorStrategy) -> Self {
        Self {
            state: State::Failed(OperationFailure::classify(failure, strategy)),
        }
    }

    /// Whether the call succeeded.
    pub fn is_successful(&self) -> bool {
        matches!(self.state, State::Succeeded { .. })
    }

    /// Payload of a successful call.
    pub fn data(&self) -> Option<&T> {
        match &self.state {
            State::Succeeded { data, .. } => Some(data),
            State::Failed(_) => None,
        }
    }

    /// Take the payload of a successful call.
    pub fn into_data(self) -> Option<T> {
        match self.state {
            State::Succeeded { data, .. } => Some(data),
            State::Failed(_) => None,
        }
    }

    /// Success or failure message; empty for a plain success.
    pub fn message(&self) -> &str {
        match &self.state {
            State::Succeeded { message, .. } => message,
            State::Failed(failure) => failure.message(),
        }
    }

    /// [`ErrorKind::None`] on success, the classified kind otherwise.
    pub fn error_kind(&self) -> ErrorKind {
        match &self.state {
            State::Succeeded { .. } => ErrorKind::None,
            State::Failed(failure) => failure.kind(),
        }
    }

    /// Failure details, if the call failed.
    pub fn failure(&self) -> Option<&OperationFailure> {
        match &self.state {
            State::Succeeded { .. } => None,
            State::Failed(failure) => Some(failure),
        }
    }

    /// Transform a successful payload, keeping the message; failures pass
    /// through unchanged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Operation<U> {
        let state = match self.state {
            State::Succeeded { data, message } => State::Succeeded {
                data: f(data),
                message,
            },
            State::Failed(failure) => State::Failed(failure),
        };
        Operation { state }
    }

    /// Chain a further call on success; failures short-circuit.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Operation<U>) -> Operation<U> {
        match self.state {
            State::Succeeded { data, .. } => f(data),
            State::Failed(failure) => Operation::from(failure),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, OperationFailure> {
        match self.state {
            State::Succeeded { data, .. } => Ok(data),
            State::Failed(failure) => Err(failure),
        }
    }
}

impl<T: Default> Operation<T> {
    /// Payload on success, the type's zero value on failure.
    pub fn into_data_or_default(self) -> T {
        self.into_data().unwrap_or_default()
    }
}

impl<T> From<OperationFailure> for Operation<T> {
    fn from(failure: OperationFailure) -> Self {
        Self {
            state: State::Failed(failure),
        }
    }
}

impl<T: Serialize> Serialize for Operation<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Operation", 4)?;
        state.serialize_field("isSuccessful", &self.is_successful())?;
        state.serialize_field("data", &self.data())?;
        state.serialize_field("message", self.message())?;
        state.serialize_field("errorKind", &self.error_kind())?;
        state.end()
    }
}

/// Reasons a serialised operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationDecodeError {
    /// A success declared a failure kind.
    #[error("successful operation must have errorKind None, found {kind}")]
    SuccessWithErrorKind {
        /// The declared kind.
        kind: ErrorKind,
    },
    /// A success carried no payload.
    #[error("successful operation is missing data")]
    MissingData,
    /// A failure declared `None` as its kind.
    #[error("failed operation must have a failure errorKind")]
    FailureWithoutErrorKind,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationDto<T> {
    is_successful: bool,
    data: Option<T>,
    #[serde(default)]
    message: String,
    error_kind: ErrorKind,
}

impl<T> TryFrom<OperationDto<T>> for Operation<T> {
    type Error = OperationDecodeError;

    fn try_from(dto: OperationDto<T>) -> Result<Self, Self::Error> {
        let OperationDto {
            is_successful,
            data,
            message,
            error_kind,
        } = dto;

        if is_successful {
            if error_kind.is_failure() {
                return Err(OperationDecodeError::SuccessWithErrorKind { kind: error_kind });
            }
            let data = data.ok_or(OperationDecodeError::MissingData)?;
            return Ok(Self::success_with_message(data, message));
        }

        if !error_kind.is_failure() {
            return Err(OperationDecodeError::FailureWithoutErrorKind);
        }
        Ok(Self::from(OperationFailure {
            kind: error_kind,
            message,
        }))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Operation<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dto = OperationDto::<T>::deserialize(deserializer)?;
        Self::try_from(dto).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
