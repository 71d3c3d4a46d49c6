//! Status machines for supplier applications and quote requests.
//!
//! Both are pure: they decide the next state and leave persistence to the
//! services.

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SupplierStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "blocked")]
    Blocked,
}

/// Something an admin (or, for `Resubmit`, the owning seller) does to a supplier application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplierAction {
    Approve,
    Reject { reason: String },
    Block,
    Unblock,
    Resubmit,
}

impl SupplierAction {
    pub fn name(&self) -> &'static str {
        match self {
            SupplierAction::Approve => "approve",
            SupplierAction::Reject { .. } => "reject",
            SupplierAction::Block => "block",
            SupplierAction::Unblock => "unblock",
            SupplierAction::Resubmit => "resubmit",
        }
    }
}

/// Result of applying a [`SupplierAction`]: the fields to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierTransition {
    pub status: SupplierStatus,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot {action} a supplier that is {from}")]
    InvalidSupplierTransition {
        from: SupplierStatus,
        action: &'static str,
    },

    #[error("a rejection reason is required")]
    MissingReason,

    #[error("quote request cannot move from {from} to {to}")]
    InvalidQuoteTransition { from: QuoteStatus, to: QuoteStatus },
}

impl SupplierStatus {
    /// Only approved suppliers may log in as sellers and manage listings.
    pub fn can_sell(self) -> bool {
        self == SupplierStatus::Approved
    }

    pub fn apply(self, action: &SupplierAction) -> Result<SupplierTransition, WorkflowError> {
        use SupplierStatus::*;

        let to = match (self, action) {
            // Re-approving only clears a stale rejection reason.
            (Pending | Approved, SupplierAction::Approve) => Approved,
            (Pending, SupplierAction::Reject { reason }) => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(WorkflowError::MissingReason);
                }
                return Ok(SupplierTransition {
                    status: Rejected,
                    rejection_reason: Some(reason.to_string()),
                });
            }
            (Approved, SupplierAction::Block) => Blocked,
            (Blocked, SupplierAction::Unblock) => Approved,
            (Rejected, SupplierAction::Resubmit) => Pending,
            (from, action) => {
                return Err(WorkflowError::InvalidSupplierTransition {
                    from,
                    action: action.name(),
                });
            }
        };

        Ok(SupplierTransition {
            status: to,
            rejection_reason: None,
        })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "responded")]
    Responded,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl QuoteStatus {
    fn rank(self) -> u8 {
        match self {
            QuoteStatus::Pending => 0,
            QuoteStatus::Responded => 1,
            QuoteStatus::Completed => 2,
        }
    }

    /// Status only moves forward; skipping `responded` is allowed.
    pub fn advance_to(self, next: QuoteStatus) -> Result<QuoteStatus, WorkflowError> {
        if next.rank() > self.rank() {
            Ok(next)
        } else {
            Err(WorkflowError::InvalidQuoteTransition {
                from: self,
                to: next,
            })
        }
    }
}
