//! Bulk operation record and its state machine.
//!
//! ```text
//! Pending --start--> Processing --complete--> Completed
//!                               \--fail-----> Failed
//! ```
//!
//! Progress is the exact fractional percentage of items processed
//! (`processed / total * 100`). It only moves forward while processing and is
//! pinned to 100 on completion. A failed operation keeps the progress it had
//! reached, which tells observers how much was applied before the failure.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::types::{OperationId, OperationKind, OperationStatus, ProductId};

/// Rejected state machine step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move bulk operation from {from} to {to}")]
    InvalidTransition {
        from: OperationStatus,
        to: OperationStatus,
    },

    #[error("bulk operation is {0}, progress can only be recorded while processing")]
    NotProcessing(OperationStatus),

    #[error("all {0} items have already been processed")]
    AllItemsProcessed(usize),
}

/// A batch action over an ordered list of product IDs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
    id: OperationId,
    #[serde(rename = "type")]
    kind: OperationKind,
    items: Vec<ProductId>,
    status: OperationStatus,
    progress: f64,
    processed_items: usize,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BulkOperation {
    /// Create a pending operation with a fresh ID.
    #[must_use]
    pub fn new(kind: OperationKind, items: Vec<ProductId>) -> Self {
        Self {
            id: OperationId::new_v4(),
            kind,
            items,
            status: OperationStatus::Pending,
            progress: 0.0,
            processed_items: 0,
            created_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> OperationId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Target product IDs, in processing order.
    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    #[must_use]
    pub const fn status(&self) -> OperationStatus {
        self.status
    }

    /// Percentage of items processed, from 0 to 100.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub const fn processed_items(&self) -> usize {
        self.processed_items
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Message of the error that failed the operation.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// `Pending -> Processing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the operation is not pending.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(OperationStatus::Pending, OperationStatus::Processing)
    }

    /// Record one more item as processed and return the new progress.
    ///
    /// # Errors
    ///
    /// Returns `NotProcessing` outside the processing state and
    /// `AllItemsProcessed` once every item has been counted.
    pub fn advance(&mut self) -> Result<f64, TransitionError> {
        if self.status != OperationStatus::Processing {
            return Err(TransitionError::NotProcessing(self.status));
        }
        let total = self.items.len();
        if self.processed_items >= total {
            return Err(TransitionError::AllItemsProcessed(total));
        }

        self.processed_items += 1;
        #[allow(clippy::cast_precision_loss)] // Selections never approach 2^52 items
        let progress = self.processed_items as f64 / total as f64 * 100.0;
        self.progress = progress;
        Ok(progress)
    }

    /// `Processing -> Completed`, pinning progress to 100.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the operation is not processing.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(OperationStatus::Processing, OperationStatus::Completed)?;
        self.progress = 100.0;
        self.processed_items = self.items.len();
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// `Processing -> Failed`, capturing the error message.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the operation is not processing.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(OperationStatus::Processing, OperationStatus::Failed)?;
        self.error = Some(message.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(
        &mut self,
        expected: OperationStatus,
        to: OperationStatus,
    ) -> Result<(), TransitionError> {
        if self.status != expected {
            return Err(TransitionError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
