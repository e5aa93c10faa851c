// Discord interaction signatures - ed25519 over `timestamp || body`
use crate::domain::error::InteractionAuthError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Checks that interaction callbacks were signed with the application's key.
///
/// Without a key every callback is refused: Discord will not enable an
/// interactions endpoint that accepts unsigned requests.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: Option<VerifyingKey>,
}

impl InteractionVerifier {
    pub fn new(key: Option<VerifyingKey>) -> Self {
        Self { key }
    }

    /// Parses the hex public key shown on the application's settings page.
    pub fn from_public_key(public_key: Option<&str>) -> Result<Self, InteractionAuthError> {
        let Some(hex_key) = public_key.map(str::trim).filter(|k| !k.is_empty()) else {
            return Ok(Self::new(None));
        };

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_key, &mut bytes).map_err(|source| {
            InteractionAuthError::Encoding {
                what: "public key",
                source,
            }
        })?;
        Ok(Self::new(Some(VerifyingKey::from_bytes(&bytes)?)))
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    pub fn verify(
        &self,
        signature_hex: &str,
        timestamp: &str,
        body: &[u8],
    ) -> Result<(), InteractionAuthError> {
        let key = self.key.as_ref().ok_or(InteractionAuthError::NotConfigured)?;

        let mut signature = [0u8; 64];
        hex::decode_to_slice(signature_hex, &mut signature).map_err(|source| {
            InteractionAuthError::Encoding {
                what: "signature",
                source,
            }
        })?;

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        key.verify(&message, &Signature::from_bytes(&signature))?;
        Ok(())
    }
}
