use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use loan_servicing_core::origination::{self, Borrower, LoanApplication};
use loan_servicing_core::scoring::{derive_credit_score, CreditScoreJob, LedgerTransaction, TransactionKind};
use loan_servicing_core::servicing::{build_statement, LoanAccount};
use loan_servicing_core::types::{LoanTerms, LoanType};
use loan_servicing_core::LoanServicingError;

fn sample_application() -> LoanApplication {
    LoanApplication {
        borrower: Borrower {
            borrower_ref: "482913756204".into(),
            annual_income: dec!(1200000),
            credit_score: 700,
        },
        loan_type: LoanType::Personal,
        terms: LoanTerms {
            principal: dec!(500000),
            annual_rate_percent: dec!(14),
            term_months: 12,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        },
    }
}

fn open_account() -> LoanAccount {
    origination::originate(&sample_application()).unwrap().result.account
}

// ===========================================================================
// Full lifecycle: originate, pay every month, close
// ===========================================================================

#[test]
fn test_lifecycle_originate_pay_all_close() {
    let mut account = open_account();
    assert_eq!(account.schedule.len(), 12);

    for month in 0..12 {
        let head = account.schedule.first().unwrap().clone();
        account = account.register_payment(head.due_date, head.amount_due).unwrap();
        assert_eq!(account.payments.len(), month + 1);
    }

    assert!(account.closed);
    assert!(account.schedule.is_empty());
    assert_eq!(account.outstanding(), dec!(0));

    let err = account
        .register_payment(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), dec!(100))
        .unwrap_err();
    assert!(matches!(err, LoanServicingError::Sequencing(_)));
}

#[test]
fn test_prepayment_shortens_the_loan() {
    let mut account = open_account();
    let head = account.schedule.first().unwrap().clone();

    // Pay three months' worth up front
    account = account
        .register_payment(head.due_date, head.amount_due * dec!(3))
        .unwrap();
    assert_eq!(account.schedule.len(), 9);
    assert_eq!(
        account.schedule.first().unwrap().due_date,
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    );
}

#[test]
fn test_arrears_block_later_payments() {
    let account = open_account();
    let err = account
        .register_payment(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), dec!(45000))
        .unwrap_err();
    assert!(matches!(err, LoanServicingError::Sequencing(_)));
}

// ===========================================================================
// Statement
// ===========================================================================

#[test]
fn test_statement_reflects_payment_history() {
    let mut account = open_account();
    for _ in 0..2 {
        let head = account.schedule.first().unwrap().clone();
        account = account.register_payment(head.due_date, head.amount_due).unwrap();
    }

    let statement = build_statement(&account).unwrap().result;
    assert_eq!(statement.loan_id, account.loan_id);
    assert_eq!(statement.past_transactions.len(), 2);
    assert_eq!(statement.upcoming_transactions.len(), 10);

    // First month interest: 500000 * 14% / 12 = 5833.33
    let first = &statement.past_transactions[0];
    assert!((first.interest_component - dec!(5833.33)).abs() <= dec!(0.01));
    // Interest declines, principal grows
    let second = &statement.past_transactions[1];
    assert!(second.interest_component < first.interest_component);
    assert!(second.principal_component > first.principal_component);
}

// ===========================================================================
// Scoring feeding origination
// ===========================================================================

#[test]
fn test_derived_score_gates_origination() {
    let ledger = vec![
        LedgerTransaction {
            user_ref: "482913756204".into(),
            kind: TransactionKind::Credit,
            amount: dec!(250000),
        },
        LedgerTransaction {
            user_ref: "482913756204".into(),
            kind: TransactionKind::Debit,
            amount: dec!(120000),
        },
    ];
    let job = CreditScoreJob {
        user_ref: "482913756204".into(),
    };
    let score = derive_credit_score(&job, &ledger).unwrap().result;
    // Net 130k: two full 15k steps above the floor
    assert_eq!(score.score, 320);

    let mut app = sample_application();
    app.borrower.credit_score = score.score;
    let err = origination::originate(&app).unwrap_err();
    assert!(matches!(
        err,
        LoanServicingError::Policy { ref rule, .. } if rule == "minimum credit score"
    ));
}
