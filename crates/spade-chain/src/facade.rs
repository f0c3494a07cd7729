use async_trait::async_trait;

use crate::ChainError;

/// Filecoin chain epoch (`abi.ChainEpoch`).
pub type ChainEpoch = i64;

/// The chain operations needed to prove control of a storage provider.
///
/// Implementations are expected to be cheap to share (`Arc<dyn ChainFacade>`)
/// and stateless from the caller's point of view: every signature is computed
/// over a freshly supplied message.
#[async_trait]
pub trait ChainFacade: Send + Sync {
    /// Current head epoch as seen by the chain node.
    async fn current_epoch(&self) -> Result<ChainEpoch, ChainError>;

    /// Randomness beacon data published for `epoch`.
    async fn beacon_entry(&self, epoch: ChainEpoch) -> Result<Vec<u8>, ChainError>;

    /// Sign `message` with the provider's worker key.
    async fn sign_as_worker(&self, message: &[u8]) -> Result<Vec<u8>, ChainError>;

    /// Storage provider actor address (e.g. `f01234`).
    fn provider_address(&self) -> &str;
}
