use wholesale_marketplace_api::{
    error::AppError,
    workflow::{QuoteStatus, SupplierAction, SupplierStatus, WorkflowError},
};

fn reject(reason: &str) -> SupplierAction {
    SupplierAction::Reject {
        reason: reason.to_string(),
    }
}

#[test]
fn pending_supplier_can_be_approved() {
    let next = SupplierStatus::Pending
        .apply(&SupplierAction::Approve)
        .expect("approve");
    assert_eq!(next.status, SupplierStatus::Approved);
    assert_eq!(next.rejection_reason, None);
    assert!(next.status.can_sell());
}

#[test]
fn approving_twice_is_idempotent() {
    let next = SupplierStatus::Approved
        .apply(&SupplierAction::Approve)
        .expect("re-approve");
    assert_eq!(next.status, SupplierStatus::Approved);
}

#[test]
fn reject_requires_a_reason() {
    assert_eq!(
        SupplierStatus::Pending.apply(&reject("")),
        Err(WorkflowError::MissingReason)
    );
    assert_eq!(
        SupplierStatus::Pending.apply(&reject("   ")),
        Err(WorkflowError::MissingReason)
    );
}

#[test]
fn reject_stores_trimmed_reason() {
    let next = SupplierStatus::Pending
        .apply(&reject("  PAN does not match  "))
        .expect("reject");
    assert_eq!(next.status, SupplierStatus::Rejected);
    assert_eq!(next.rejection_reason.as_deref(), Some("PAN does not match"));
}

#[test]
fn only_pending_suppliers_can_be_rejected() {
    for from in [
        SupplierStatus::Approved,
        SupplierStatus::Rejected,
        SupplierStatus::Blocked,
    ] {
        let err = from.apply(&reject("late")).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidSupplierTransition {
                from,
                action: "reject"
            }
        );
    }
}

#[test]
fn block_and_unblock_round_trip_through_approved() {
    let blocked = SupplierStatus::Approved
        .apply(&SupplierAction::Block)
        .expect("block");
    assert_eq!(blocked.status, SupplierStatus::Blocked);
    assert!(!blocked.status.can_sell());

    let unblocked = blocked
        .status
        .apply(&SupplierAction::Unblock)
        .expect("unblock");
    assert_eq!(unblocked.status, SupplierStatus::Approved);
}

#[test]
fn pending_supplier_cannot_be_blocked_or_unblocked() {
    assert!(SupplierStatus::Pending.apply(&SupplierAction::Block).is_err());
    assert!(SupplierStatus::Pending.apply(&SupplierAction::Unblock).is_err());
    assert!(SupplierStatus::Approved.apply(&SupplierAction::Unblock).is_err());
}

#[test]
fn rejected_supplier_must_resubmit_before_approval() {
    assert!(SupplierStatus::Rejected.apply(&SupplierAction::Approve).is_err());

    let resubmitted = SupplierStatus::Rejected
        .apply(&SupplierAction::Resubmit)
        .expect("resubmit");
    assert_eq!(resubmitted.status, SupplierStatus::Pending);
    assert_eq!(resubmitted.rejection_reason, None);

    let approved = resubmitted
        .status
        .apply(&SupplierAction::Approve)
        .expect("approve after resubmit");
    assert_eq!(approved.status, SupplierStatus::Approved);
}

#[test]
fn only_rejected_suppliers_can_resubmit() {
    for from in [
        SupplierStatus::Pending,
        SupplierStatus::Approved,
        SupplierStatus::Blocked,
    ] {
        assert!(from.apply(&SupplierAction::Resubmit).is_err());
    }
}

#[test]
fn only_approved_suppliers_can_sell() {
    assert!(SupplierStatus::Approved.can_sell());
    assert!(!SupplierStatus::Pending.can_sell());
    assert!(!SupplierStatus::Rejected.can_sell());
    assert!(!SupplierStatus::Blocked.can_sell());
}

#[test]
fn workflow_errors_surface_as_bad_request() {
    let err: AppError = SupplierStatus::Blocked
        .apply(&SupplierAction::Approve)
        .unwrap_err()
        .into();
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("blocked"));
}

#[test]
fn quote_status_moves_forward() {
    assert_eq!(
        QuoteStatus::Pending.advance_to(QuoteStatus::Responded),
        Ok(QuoteStatus::Responded)
    );
    assert_eq!(
        QuoteStatus::Responded.advance_to(QuoteStatus::Completed),
        Ok(QuoteStatus::Completed)
    );
    assert_eq!(
        QuoteStatus::Pending.advance_to(QuoteStatus::Completed),
        Ok(QuoteStatus::Completed)
    );
}

#[test]
fn quote_status_never_moves_backward_or_stays() {
    for (from, to) in [
        (QuoteStatus::Responded, QuoteStatus::Pending),
        (QuoteStatus::Completed, QuoteStatus::Responded),
        (QuoteStatus::Completed, QuoteStatus::Pending),
        (QuoteStatus::Pending, QuoteStatus::Pending),
    ] {
        assert_eq!(
            from.advance_to(to),
            Err(WorkflowError::InvalidQuoteTransition { from, to })
        );
    }
}

#[test]
fn statuses_use_snake_case_strings() {
    assert_eq!(SupplierStatus::Pending.to_string(), "pending");
    assert_eq!(QuoteStatus::Responded.as_ref(), "responded");
    assert_eq!(
        "blocked".parse::<SupplierStatus>().expect("parse"),
        SupplierStatus::Blocked
    );
}
