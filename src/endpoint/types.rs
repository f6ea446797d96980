use tokio::sync::oneshot;

use crate::ceremony::{CeremonyMessage, SessionState};
use crate::correlation::{CorrelationToken, RegistrationOutcome};
use crate::error::Result;
use crate::store::User;

#[derive(Debug, Clone)]
pub enum Request {
    RegisterStart {
        name: String,
    },
    RegisterFinish {
        name: String,
        response: CeremonyMessage,
        correlation: Option<CorrelationToken>,
    },
    LoginStart {
        name: Option<String>,
    },
    LoginFinish {
        name: Option<String>,
        response: CeremonyMessage,
    },
    CheckStart,
    CheckFinish {
        response: CeremonyMessage,
    },
}

impl Request {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::RegisterStart { .. } => "register-start",
            Self::RegisterFinish { .. } => "register-finish",
            Self::LoginStart { .. } => "login-start",
            Self::LoginFinish { .. } => "login-finish",
            Self::CheckStart => "check-start",
            Self::CheckFinish { .. } => "check-finish",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Challenge options for the client, from any `*-start` endpoint.
    Challenge(CeremonyMessage),
    Registered(RegistrationOutcome),
    /// Identity resolved by `login-finish` or `check-finish`.
    Identified(User),
}

pub struct Envelope {
    pub request: Request,
    pub session: SessionState,
    pub reply: oneshot::Sender<Reply>,
}

/// Result of one request, with the session bag as the ceremony left it.
pub struct Reply {
    pub session: SessionState,
    pub result: Result<Response>,
}
