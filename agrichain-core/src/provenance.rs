//! Provenance assembly
//!
//! Reconstructs the full custody chain for a product from its public
//! identifier: the product record plus every log entry for it, oldest
//! first. Unconfirmed entries are included so a viewer sees in-flight
//! shipments as part of the chain.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::storage::{ProductStore, TransferLogStore};
use crate::types::{Product, TransferLogEntry};

/// A product and its ordered custody chain
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub product: Product,
    /// Timestamp ascending; the creation entry comes first
    pub chain: Vec<TransferLogEntry>,
}

/// Assembles provenance chains from the product and log stores
pub struct ProvenanceAssembler<P, L>
where
    P: ProductStore,
    L: TransferLogStore,
{
    products: Arc<P>,
    log: Arc<L>,
}

impl<P, L> ProvenanceAssembler<P, L>
where
    P: ProductStore,
    L: TransferLogStore,
{
    pub fn new(products: Arc<P>, log: Arc<L>) -> Self {
        Self { products, log }
    }

    /// Look up a product by public id and return its full chain.
    ///
    /// Unknown public ids are `NotFound`; no partial result is ever
    /// returned.
    pub async fn assemble(&self, public_id: Uuid) -> CoreResult<Provenance> {
        let product = self
            .products
            .find_by_public_id(public_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Product not found: {}", public_id)))?;

        let mut chain = self.log.find_by_product(product.id).await?;
        chain.sort_by_key(|e| e.timestamp);

        debug!(product = %product.id, entries = chain.len(), "Assembled provenance chain");
        Ok(Provenance { product, chain })
    }
}
