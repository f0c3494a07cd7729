//! `FIL-SPID-V0` credentials.
//!
//! A credential is `FIL-SPID-V0 <epoch>;<provider>;<b64 signature>[;<b64 payload>]`
//! where the signature is made by the provider's worker key over three spaces,
//! the drand beacon data for `epoch`, and the raw payload bytes.

use std::{fmt, future::Future, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use spade_chain::{ChainEpoch, ChainError, ChainFacade};

pub const AUTH_SCHEME: &str = "FIL-SPID-V0";

const SIGNING_PADDING: &[u8] = b"   ";

/// Bytes the worker key signs for a credential.
pub fn signing_message(beacon: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(SIGNING_PADDING.len() + beacon.len() + payload.len());
    message.extend_from_slice(SIGNING_PADDING);
    message.extend_from_slice(beacon);
    message.extend_from_slice(payload);
    message
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCredential {
    pub epoch: ChainEpoch,
    pub provider_address: String,
    pub signature: Vec<u8>,
    /// Never `Some` with an empty vector.
    pub payload: Option<Vec<u8>>,
}

impl AuthCredential {
    /// Sign `beacon ++ payload` with `sign` and assemble the credential.
    ///
    /// An empty payload is treated as no payload.
    pub async fn build<F, Fut>(
        epoch: ChainEpoch,
        beacon: &[u8],
        provider_address: &str,
        payload: Option<&[u8]>,
        sign: F,
    ) -> Result<Self, ChainError>
    where
        F: FnOnce(Vec<u8>) -> Fut,
        Fut: Future<Output = Result<Vec<u8>, ChainError>>,
    {
        let payload = payload.filter(|bytes| !bytes.is_empty());
        let message = signing_message(beacon, payload.unwrap_or_default());
        let signature = sign(message).await?;

        Ok(Self {
            epoch,
            provider_address: provider_address.to_string(),
            signature,
            payload: payload.map(<[u8]>::to_vec),
        })
    }
}

impl fmt::Display for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{AUTH_SCHEME} {};{};{}",
            self.epoch,
            self.provider_address,
            STANDARD.encode(&self.signature)
        )?;
        if let Some(payload) = &self.payload {
            write!(f, ";{}", STANDARD.encode(payload))?;
        }
        Ok(())
    }
}

/// Builds a fresh credential per request from the current chain head.
#[derive(Clone)]
pub struct AuthTokenBuilder {
    chain: Arc<dyn ChainFacade>,
}

impl AuthTokenBuilder {
    pub fn new(chain: Arc<dyn ChainFacade>) -> Self {
        Self { chain }
    }

    pub fn provider_address(&self) -> &str {
        self.chain.provider_address()
    }

    /// Credential for the current epoch, optionally bound to `payload`.
    pub async fn credential(&self, payload: Option<&str>) -> Result<AuthCredential, ChainError> {
        let chain = &self.chain;
        let epoch = chain.current_epoch().await?;
        let beacon = chain.beacon_entry(epoch).await?;

        AuthCredential::build(
            epoch,
            &beacon,
            chain.provider_address(),
            payload.map(str::as_bytes),
            |message| async move { chain.sign_as_worker(&message).await },
        )
        .await
    }
}
