//! Registration outcome events.
//!
//! Exactly one event is produced per registration attempt. The set of
//! outcomes is closed, and each outcome carries its own typed payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{User, UserId};

/// Wire tag of an outcome, as seen by downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "RegisterUserSuccess")]
    UserSuccess,
    #[serde(rename = "RegisterLimitExceeded")]
    LimitExceeded,
    #[serde(rename = "RegisterUserLookupFailed")]
    UserLookupFailed,
    #[serde(rename = "RegisterUserAlreadyExists")]
    UserAlreadyExists,
    #[serde(rename = "RegisterUserCreationFailed")]
    UserCreationFailed,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserSuccess => "RegisterUserSuccess",
            Self::LimitExceeded => "RegisterLimitExceeded",
            Self::UserLookupFailed => "RegisterUserLookupFailed",
            Self::UserAlreadyExists => "RegisterUserAlreadyExists",
            Self::UserCreationFailed => "RegisterUserCreationFailed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user: User,
}

/// Payload of a failed registration whose cause is an upstream error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRejected {
    pub user: User,
    pub cause: String,
}

/// Where a duplicate email was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum DetectedBy {
    Lookup { existing_user_id: UserId },
    CreateConflict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateUser {
    pub user: User,
    pub detected_by: DetectedBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RegistrationOutcome {
    #[serde(rename = "RegisterUserSuccess")]
    Succeeded(UserRegistered),
    #[serde(rename = "RegisterLimitExceeded")]
    LimitExceeded(RegistrationRejected),
    #[serde(rename = "RegisterUserLookupFailed")]
    LookupFailed(RegistrationRejected),
    #[serde(rename = "RegisterUserAlreadyExists")]
    AlreadyExists(DuplicateUser),
    #[serde(rename = "RegisterUserCreationFailed")]
    CreationFailed(RegistrationRejected),
}

impl RegistrationOutcome {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Succeeded(_) => EventKind::UserSuccess,
            Self::LimitExceeded(_) => EventKind::LimitExceeded,
            Self::LookupFailed(_) => EventKind::UserLookupFailed,
            Self::AlreadyExists(_) => EventKind::UserAlreadyExists,
            Self::CreationFailed(_) => EventKind::UserCreationFailed,
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Self::Succeeded(payload) => &payload.user,
            Self::LimitExceeded(payload)
            | Self::LookupFailed(payload)
            | Self::CreationFailed(payload) => &payload.user,
            Self::AlreadyExists(payload) => &payload.user,
        }
    }
}

/// An immutable record of one registration outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    id: Uuid,
    occurred_at: DateTime<Utc>,
    outcome: RegistrationOutcome,
}

impl RegistrationEvent {
    pub fn new(outcome: RegistrationOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            outcome,
        }
    }

    pub fn succeeded(user: User) -> Self {
        Self::new(RegistrationOutcome::Succeeded(UserRegistered { user }))
    }

    pub fn limit_exceeded(user: User, cause: impl ToString) -> Self {
        Self::new(RegistrationOutcome::LimitExceeded(RegistrationRejected {
            user,
            cause: cause.to_string(),
        }))
    }

    pub fn lookup_failed(user: User, cause: impl ToString) -> Self {
        Self::new(RegistrationOutcome::LookupFailed(RegistrationRejected {
            user,
            cause: cause.to_string(),
        }))
    }

    pub fn already_exists(user: User, detected_by: DetectedBy) -> Self {
        Self::new(RegistrationOutcome::AlreadyExists(DuplicateUser {
            user,
            detected_by,
        }))
    }

    pub fn creation_failed(user: User, cause: impl ToString) -> Self {
        Self::new(RegistrationOutcome::CreationFailed(RegistrationRejected {
            user,
            cause: cause.to_string(),
        }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn outcome(&self) -> &RegistrationOutcome {
        &self.outcome
    }

    pub fn kind(&self) -> EventKind {
        self.outcome.kind()
    }

    pub fn user(&self) -> &User {
        self.outcome.user()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RegistrationOutcome::Succeeded(_))
    }
}
