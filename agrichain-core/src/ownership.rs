//! Ownership resolution
//!
//! Derives current custody from the append-only transfer log. The log
//! is an unordered collection with no global sequence numbers, so
//! timestamps are the ordering key: for each product, the latest
//! confirmed entry involving a holder decides whether that holder still
//! has it (inbound) or has passed it on (outbound).
//!
//! Timestamp ties are broken in favor of the outbound entry, so a
//! holder who receives and re-sends a product at the same instant is
//! not reported as holding it.
//!
//! Pending entries (`confirmed = false`) never establish custody; they
//! are surfaced separately as incoming shipments.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::CoreResult;
use crate::storage::TransferLogStore;
use crate::types::{ProductId, TransferLogEntry, UserId};

/// Decide which products the holder currently has, given the
/// holder-filtered log (every entry where the holder appears on either
/// side; entries not involving the holder are ignored).
pub fn resolve_held(entries: &[TransferLogEntry], holder: UserId) -> Vec<ProductId> {
    // Latest confirmed entry per product, outbound winning ties.
    let mut latest: HashMap<ProductId, &TransferLogEntry> = HashMap::new();
    for entry in entries {
        if !entry.confirmed {
            continue;
        }
        if entry.to_holder != Some(holder) && entry.from_holder != Some(holder) {
            continue;
        }
        match latest.get(&entry.product_id) {
            Some(current) if entry.timestamp < current.timestamp => {}
            Some(current)
                if entry.timestamp == current.timestamp
                    && !entry.is_confirmed_outbound(holder)
                    && current.is_confirmed_outbound(holder) => {}
            _ => {
                latest.insert(entry.product_id, entry);
            }
        }
    }

    let mut held: Vec<ProductId> = latest
        .into_iter()
        .filter(|(_, entry)| entry.is_confirmed_inbound(holder))
        .map(|(product, _)| product)
        .collect();
    held.sort();
    held
}

/// Resolver over a transfer log store
pub struct OwnershipResolver<S: TransferLogStore> {
    log: Arc<S>,
}

impl<S: TransferLogStore> OwnershipResolver<S> {
    pub fn new(log: Arc<S>) -> Self {
        Self { log }
    }

    /// Products currently held by the holder
    pub async fn held_products(&self, holder: UserId) -> CoreResult<Vec<ProductId>> {
        let entries = self.log.find_by_holder(holder).await?;
        let held = resolve_held(&entries, holder);
        debug!(holder = %holder, held = held.len(), "Resolved current holdings");
        Ok(held)
    }

    /// Confirmed inbound entry for each held product, used by inventory
    /// views that need the receipt metadata (supplier, timestamp).
    pub async fn held_receipts(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        let entries = self.log.find_by_holder(holder).await?;
        let held = resolve_held(&entries, holder);

        let mut receipts = Vec::with_capacity(held.len());
        for product in held {
            // The deciding entry for a held product is inbound by construction.
            let receipt = entries
                .iter()
                .filter(|e| e.product_id == product && e.is_confirmed_inbound(holder))
                .max_by_key(|e| e.timestamp);
            if let Some(receipt) = receipt {
                receipts.push(receipt.clone());
            }
        }
        Ok(receipts)
    }

    /// Pending (unconfirmed) shipments addressed to the holder
    pub async fn incoming_shipments(&self, holder: UserId) -> CoreResult<Vec<TransferLogEntry>> {
        let entries = self.log.find_by_to_holder(holder).await?;
        let mut pending: Vec<_> = entries
            .into_iter()
            .filter(|e| e.is_pending_inbound(holder))
            .collect();
        pending.sort_by_key(|e| e.timestamp);
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, NewTransferLogEntry};
    use crate::types::TransferAction;
    use chrono::{TimeZone, Utc};

    fn entry(
        id: u64,
        product: u64,
        from: Option<u64>,
        to: Option<u64>,
        day: u32,
        confirmed: bool,
    ) -> TransferLogEntry {
        TransferLogEntry {
            id: crate::types::LogId(id),
            product_id: ProductId(product),
            from_holder: from.map(UserId),
            to_holder: to.map(UserId),
            action: TransferAction::Shipped,
            timestamp: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            confirmed,
            location: None,
            notes: None,
            created_by: None,
        }
    }

    #[test]
    fn test_received_and_kept_is_held() {
        let log = vec![entry(1, 1, Some(1), Some(2), 1, true)];
        assert_eq!(resolve_held(&log, UserId(2)), vec![ProductId(1)]);
    }

    #[test]
    fn test_received_then_sent_is_not_held() {
        // A->B day1, B->C day3: held by C, not B
        let log = vec![
            entry(1, 1, Some(1), Some(2), 1, true),
            entry(2, 1, Some(2), Some(3), 3, true),
        ];
        assert!(resolve_held(&log, UserId(2)).is_empty());
        assert_eq!(resolve_held(&log, UserId(3)), vec![ProductId(1)]);
    }

    #[test]
    fn test_no_holding_with_later_outbound() {
        // Property: a reported holding never has a later confirmed outbound entry.
        let log = vec![
            entry(1, 1, None, Some(5), 1, true),
            entry(2, 1, Some(5), None, 2, true),
            entry(3, 2, Some(1), Some(5), 2, true),
        ];
        let held = resolve_held(&log, UserId(5));
        for product in &held {
            assert!(!log.iter().any(|e| {
                e.product_id == *product
                    && e.is_confirmed_outbound(UserId(5))
                    && log
                        .iter()
                        .filter(|i| i.product_id == *product && i.is_confirmed_inbound(UserId(5)))
                        .all(|i| i.timestamp <= e.timestamp)
            }));
        }
        assert_eq!(held, vec![ProductId(2)]);
    }

    #[test]
    fn test_same_instant_receive_and_resend_excluded() {
        let log = vec![
            entry(1, 1, Some(1), Some(2), 4, true),
            entry(2, 1, Some(2), Some(3), 4, true),
        ];
        assert!(resolve_held(&log, UserId(2)).is_empty());
    }

    #[test]
    fn test_pending_entries_ignored() {
        let log = vec![entry(1, 1, Some(1), Some(2), 1, false)];
        assert!(resolve_held(&log, UserId(2)).is_empty());
    }

    #[test]
    fn test_reacquired_product_is_held_again() {
        // Sold to C, bought back later: the latest entry decides.
        let log = vec![
            entry(1, 1, Some(1), Some(2), 1, true),
            entry(2, 1, Some(2), Some(3), 2, true),
            entry(3, 1, Some(3), Some(2), 5, true),
        ];
        assert_eq!(resolve_held(&log, UserId(2)), vec![ProductId(1)]);
    }

    #[test]
    fn test_sold_out_of_chain() {
        // to_holder = None: product left the chain, nobody holds it.
        let log = vec![
            entry(1, 1, None, Some(2), 1, true),
            entry(2, 1, Some(2), None, 3, true),
        ];
        assert!(resolve_held(&log, UserId(2)).is_empty());
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let rows = [
            // product 1: held by retailer 9
            (1u64, Some(1u64), Some(9u64), 1u32, true),
            // product 2: received then sold on
            (2, Some(1), Some(9), 1, true),
            (2, Some(9), None, 2, true),
            // product 3: pending shipment to retailer 9
            (3, Some(1), Some(9), 3, false),
        ];
        for (product, from, to, day, confirmed) in rows {
            store
                .append(NewTransferLogEntry {
                    product_id: ProductId(product),
                    from_holder: from.map(UserId),
                    to_holder: to.map(UserId),
                    action: TransferAction::Shipped,
                    timestamp: Utc.with_ymd_and_hms(2025, 6, day, 8, 0, 0).unwrap(),
                    confirmed,
                    location: None,
                    notes: None,
                    created_by: Some("Farm A".to_string()),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_resolver_against_store() {
        let resolver = OwnershipResolver::new(seeded_store().await);
        let held = resolver.held_products(UserId(9)).await.unwrap();
        assert_eq!(held, vec![ProductId(1)]);

        let incoming = resolver.incoming_shipments(UserId(9)).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].product_id, ProductId(3));
    }

    #[tokio::test]
    async fn test_held_receipts_carry_metadata() {
        let resolver = OwnershipResolver::new(seeded_store().await);
        let receipts = resolver.held_receipts(UserId(9)).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].product_id, ProductId(1));
        assert_eq!(receipts[0].created_by.as_deref(), Some("Farm A"));
    }
}
