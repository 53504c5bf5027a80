//! Invitation tokens and redemption links.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

/// Invitation identifier prefix.
pub const INVITATION_PREFIX: &str = "inv";

/// Number of random bytes behind each invitation id.
pub const INVITATION_SECRET_BYTES: usize = 32;

/// Bearer capability that doubles as the invitation's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvitationId(String);

impl InvitationId {
    /// Generate a fresh, unguessable id.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0_u8; INVITATION_SECRET_BYTES];

        OsRng.fill_bytes(&mut secret);

        Self(format!(
            "{INVITATION_PREFIX}_{}",
            URL_SAFE_NO_PAD.encode(secret)
        ))
    }

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InvitationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for InvitationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Build the redemption link handed to the invitee.
///
/// Format: `{base_url}/share?accessCode={invitation_id}`
#[must_use]
pub fn share_url(base_url: &str, invitation: &InvitationId) -> String {
    format!(
        "{}/share?accessCode={invitation}",
        base_url.trim_end_matches('/')
    )
}
