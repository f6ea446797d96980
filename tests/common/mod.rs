#![allow(dead_code)]

use passlink::ceremony::{AuthenticatorStore, Ceremony, CeremonyError, CeremonyMessage, SessionState};
use passlink::store::{Authenticator, NewAuthenticator, User};
use rand::Rng;
use serde::{Deserialize, Serialize};

const CHALLENGE_KEY: &str = "fake.challenge";
const USER_HANDLE_KEY: &str = "fake.user";

/// What the scripted ceremony does on a verified registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    Once,
    Skip,
    Twice,
}

/// Scripted stand-in for the WebAuthn library: the challenge lives in the
/// session bag and a client response just echoes it with a credential id.
pub struct FakeCeremony {
    pub persist: Persist,
}

impl FakeCeremony {
    pub fn new() -> Self {
        Self { persist: Persist::Once }
    }

    pub fn with_persist(persist: Persist) -> Self {
        Self { persist }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FakeResponse {
    pub challenge: Vec<u8>,
    pub id: Vec<u8>,
    pub sign_count: u32,
    pub valid_signature: bool,
}

fn issue(session: &mut SessionState) -> Result<CeremonyMessage, CeremonyError> {
    let challenge: [u8; 16] = rand::thread_rng().r#gen();
    session.set(CHALLENGE_KEY, &challenge.to_vec())?;
    Ok(CeremonyMessage(challenge.to_vec()))
}

fn verify(session: &mut SessionState, response: &CeremonyMessage) -> Result<FakeResponse, CeremonyError> {
    let expected: Vec<u8> = session
        .take(CHALLENGE_KEY)?
        .ok_or(CeremonyError::MissingChallenge)?;
    let resp: FakeResponse = ciborium::from_reader(response.0.as_slice())
        .map_err(|e| CeremonyError::Malformed(e.to_string()))?;
    if resp.challenge != expected {
        return Err(CeremonyError::ChallengeMismatch);
    }
    if !resp.valid_signature {
        return Err(CeremonyError::InvalidSignature);
    }
    Ok(resp)
}

fn fields(id: &[u8], sign_count: u32) -> NewAuthenticator {
    NewAuthenticator {
        id: id.to_vec(),
        credential_id: id.to_vec(),
        public_key: vec![0x04; 65],
        aaguid: vec![0xA0; 16],
        sign_count,
    }
}

impl Ceremony for FakeCeremony {
    fn begin_registration(
        &self,
        user: &User,
        session: &mut SessionState,
    ) -> Result<CeremonyMessage, CeremonyError> {
        session.set(USER_HANDLE_KEY, &user.webauthn_id().to_vec())?;
        issue(session)
    }

    fn complete_registration(
        &self,
        user: &User,
        session: &mut SessionState,
        response: &CeremonyMessage,
        store: &mut dyn AuthenticatorStore,
    ) -> Result<(), CeremonyError> {
        let resp = verify(session, response)?;
        let handle: Option<Vec<u8>> = session.take(USER_HANDLE_KEY)?;
        if handle.as_deref() != Some(user.webauthn_id()) {
            return Err(CeremonyError::Other("registration was started for another user".into()));
        }
        match self.persist {
            Persist::Skip => {}
            Persist::Once => {
                store.persist_new_authenticator(user, fields(&resp.id, resp.sign_count))?;
            }
            Persist::Twice => {
                store.persist_new_authenticator(user, fields(&resp.id, resp.sign_count))?;
                let mut twin = resp.id.clone();
                twin.push(0xFF);
                store.persist_new_authenticator(user, fields(&twin, resp.sign_count))?;
            }
        }
        Ok(())
    }

    fn begin_login(
        &self,
        _user: Option<&User>,
        session: &mut SessionState,
        _store: &dyn AuthenticatorStore,
    ) -> Result<CeremonyMessage, CeremonyError> {
        issue(session)
    }

    fn complete_login(
        &self,
        user: Option<&User>,
        session: &mut SessionState,
        response: &CeremonyMessage,
        store: &mut dyn AuthenticatorStore,
    ) -> Result<Authenticator, CeremonyError> {
        let resp = verify(session, response)?;
        let mut authr = store.find_authenticator_by_id(&resp.id)?;
        if let Some(user) = user {
            if authr.owner != user.name() {
                return Err(CeremonyError::UnknownCredential);
            }
        }
        if resp.sign_count != 0 && resp.sign_count <= authr.sign_count {
            return Err(CeremonyError::CounterRegression {
                stored: authr.sign_count,
                received: resp.sign_count,
            });
        }
        store.update_sign_count(&resp.id, resp.sign_count)?;
        authr.sign_count = resp.sign_count;
        Ok(authr)
    }
}

/// Client side: answer `challenge` with authenticator `id`.
pub fn respond(challenge: &CeremonyMessage, id: &[u8], sign_count: u32) -> CeremonyMessage {
    encode(FakeResponse {
        challenge: challenge.0.clone(),
        id: id.to_vec(),
        sign_count,
        valid_signature: true,
    })
}

pub fn respond_forged(challenge: &CeremonyMessage, id: &[u8]) -> CeremonyMessage {
    encode(FakeResponse {
        challenge: challenge.0.clone(),
        id: id.to_vec(),
        sign_count: 0,
        valid_signature: false,
    })
}

fn encode(resp: FakeResponse) -> CeremonyMessage {
    let mut buf = Vec::new();
    ciborium::into_writer(&resp, &mut buf).unwrap();
    CeremonyMessage(buf)
}
