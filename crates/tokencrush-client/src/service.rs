use std::sync::Arc;

use async_trait::async_trait;
use tokencrush_core::{CrushRequest, CrushResponse, Result};

use crate::CrushClient;

/// Anything that can crush a prompt.
///
/// [`CrushClient`] is the production implementation; the workflow is generic
/// over this trait so it can run against other backends.
#[async_trait]
pub trait CrushService: Send + Sync {
    async fn crush(&self, request: &CrushRequest) -> Result<CrushResponse>;
}

#[async_trait]
impl CrushService for CrushClient {
    async fn crush(&self, request: &CrushRequest) -> Result<CrushResponse> {
        CrushClient::crush(self, request).await
    }
}

#[async_trait]
impl<T: CrushService + ?Sized> CrushService for Arc<T> {
    async fn crush(&self, request: &CrushRequest) -> Result<CrushResponse> {
        (**self).crush(request).await
    }
}
