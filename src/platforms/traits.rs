use async_trait::async_trait;

use crate::models::media::Outcome;
use crate::platforms::Platform;

/// One self-contained extraction attempt. Implementations must absorb every
/// fault (network, parse, tool) into the returned [`Outcome`] instead of
/// propagating it.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    async fn extract(&self, url: &str, platform: Platform) -> Outcome;
}
