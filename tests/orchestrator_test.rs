//! Integration Tests - Orchestrator Contracts over Mock Ports
//!
//! Tests the submission and cancellation orchestrators against mocked
//! execution, dispatch and history ports. Uses mockall for trait
//! mocking and tokio::test for async tests.

use std::sync::Arc;

use alloy::primitives::{address, b256, Address, U256};
use mockall::mock;
use rust_decimal_macros::dec;

use limit_order_desk::domain::draft::{DerivedAmounts, Field, OrderDraft, Side};
use limit_order_desk::domain::error::DeskError;
use limit_order_desk::domain::order::{
    OrderKind, OrderRecord, OrderStatus, ProtocolOrder,
};
use limit_order_desk::domain::token::Token;
use limit_order_desk::ports::dispatch::{TxHandle, TxOverrides, TxPayload};
use limit_order_desk::ports::execution::{EncodedSubmission, SubmissionRequest};
use limit_order_desk::ports::history::RecordPatch;
use limit_order_desk::usecases::cancel::CancelOrchestrator;
use limit_order_desk::usecases::flight::SingleFlight;
use limit_order_desk::usecases::submit::SubmitOrchestrator;
use limit_order_desk::usecases::ChainContext;

// ---- Mock Definitions ----

mock! {
    pub ExecClient {}

    #[async_trait::async_trait]
    impl limit_order_desk::ports::execution::ExecutionClient for ExecClient {
        fn is_ready(&self) -> bool;

        async fn fee_adjusted_min_return(
            &self,
            output_amount: U256,
            slippage_bps: u32,
        ) -> Result<U256, DeskError>;

        async fn encode_submission(
            &self,
            request: &SubmissionRequest,
        ) -> Result<EncodedSubmission, DeskError>;

        async fn encode_cancellation(
            &self,
            order: &ProtocolOrder,
            exists_on_chain: bool,
        ) -> Result<TxPayload, DeskError>;
    }
}

mock! {
    pub PriceFeed {}

    #[async_trait::async_trait]
    impl limit_order_desk::ports::price_feed::PriceSource for PriceFeed {
        async fn current_market_rate(
            &self,
            input: &Token,
            output: &Token,
        ) -> Option<rust_decimal::Decimal>;
    }
}

mock! {
    pub Dispatcher {}

    #[async_trait::async_trait]
    impl limit_order_desk::ports::dispatch::TxDispatcher for Dispatcher {
        async fn send_transaction(
            &self,
            payload: &TxPayload,
            overrides: TxOverrides,
        ) -> Result<TxHandle, DeskError>;
    }
}

mock! {
    pub History {}

    #[async_trait::async_trait]
    impl limit_order_desk::ports::history::HistoryStore for History {
        async fn append(&self, record: OrderRecord) -> Result<(), DeskError>;

        async fn patch(
            &self,
            id: &str,
            patch: RecordPatch,
        ) -> Result<OrderRecord, DeskError>;

        async fn find(&self, id: &str) -> Result<Option<OrderRecord>, DeskError>;

        async fn all(&self) -> Result<Vec<OrderRecord>, DeskError>;
    }
}

// ---- Fixtures ----

const WITNESS: Address = address!("1111111111111111111111111111111111111111");
const OWNER: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
const CORE: Address = address!("36049d479a97cde1fc6e2a5d2cae30b666ebf92b");

fn usdc() -> Token {
    Token::new(
        address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
        6,
        "USDC",
    )
}

fn weth() -> Token {
    Token::new(
        address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        18,
        "WETH",
    )
}

/// 1000 USDC in, typed MUL price 0.0005 → 0.5 WETH out.
fn valid_draft() -> (OrderDraft, DerivedAmounts) {
    let mut draft = OrderDraft::new(100);
    draft.select_token(Side::Input, usdc());
    draft.select_token(Side::Output, weth());
    draft.set_independent_field(Field::Input, "1000.0");
    draft.set_independent_field(Field::Price, "0.0005");
    let derived = limit_order_desk::domain::draft::derive(&draft, Some(dec!(0.0004)));
    (draft, derived)
}

fn encoded_submission() -> EncodedSubmission {
    EncodedSubmission {
        order: ProtocolOrder {
            module: Some(address!("037fc8e71445910e1e0bbb2a0896d5e9a7485318")),
            handler: None,
            input_token: Some(usdc().address),
            output_token: Some(weth().address),
            owner: Some(OWNER),
            witness: Some(WITNESS),
            data: Some("0xdeadbeef".to_string()),
            secret: Some("aa".repeat(32)),
        },
        payload: TxPayload {
            to: CORE,
            data: alloy::primitives::Bytes::from(vec![1, 2, 3]),
            value: U256::ZERO,
        },
    }
}

fn open_record(id: &str) -> OrderRecord {
    let now = chrono::Utc::now();
    OrderRecord {
        id: id.to_string(),
        owner: OWNER,
        input_token: usdc(),
        output_token: weth(),
        input_amount: "1000000000".to_string(),
        min_return: "500000000000000000".to_string(),
        kind: OrderKind::Limit,
        protocol: encoded_submission().order,
        status: OrderStatus::Open,
        created_tx_hash: "0x01".to_string(),
        cancelled_tx_hash: None,
        created_at: now,
        updated_at: now,
    }
}

fn context() -> ChainContext {
    ChainContext::new(1, OWNER)
}

// ---- Submission Tests ----

#[tokio::test]
async fn test_successful_submission_appends_one_open_record() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_fee_adjusted_min_return()
        .withf(|output, slippage| {
            // Fixed-point output for 0.5 WETH at 18 decimals.
            *output == U256::from(500_000_000_000_000_000u64) && *slippage == 100
        })
        .returning(|output, _| Ok(output));
    exec.expect_encode_submission()
        .withf(|req| {
            req.kind == OrderKind::Limit
                && req.input_amount == U256::from(1_000_000_000u64)
                && req.owner == OWNER
        })
        .returning(|_| Ok(encoded_submission()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_send_transaction()
        .times(1)
        .returning(|_, _| {
            Ok(TxHandle {
                hash: b256!(
                    "00000000000000000000000000000000000000000000000000000000DEADBEEF"
                ),
            })
        });

    let mut history = MockHistory::new();
    history
        .expect_append()
        .times(1)
        .withf(|record| {
            record.status == OrderStatus::Open
                && record.created_tx_hash
                    == "0x00000000000000000000000000000000000000000000000000000000deadbeef"
                && record.id == format!("{WITNESS:#x}")
                && record.input_amount == "1000000000"
                && record.cancelled_tx_hash.is_none()
        })
        .returning(|_| Ok(()));

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        None,
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    let record = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap();

    assert_eq!(record.status, OrderStatus::Open);
    assert_eq!(record.min_return, "500000000000000000");
}

#[tokio::test]
async fn test_failed_dispatch_appends_nothing() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_fee_adjusted_min_return()
        .returning(|output, _| Ok(output));
    exec.expect_encode_submission()
        .returning(|_| Ok(encoded_submission()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_send_transaction().returning(|_, _| {
        Err(DeskError::TransactionRejected(
            "user rejected signature".to_string(),
        ))
    });

    let mut history = MockHistory::new();
    history.expect_append().times(0);

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        None,
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    let err = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap_err();

    // Transport message preserved verbatim.
    assert_eq!(
        err,
        DeskError::TransactionRejected("user rejected signature".to_string())
    );
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_dispatch() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_send_transaction().times(0);

    let mut history = MockHistory::new();
    history.expect_append().times(0);

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        None,
        Arc::new(SingleFlight::new()),
    );

    // Identical tokens on both sides.
    let mut draft = OrderDraft::new(100);
    draft.input_token = Some(usdc());
    draft.output_token = Some(usdc());
    draft.set_independent_field(Field::Input, "1000");
    let derived = limit_order_desk::domain::draft::derive(&draft, Some(dec!(1)));

    let err = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(1)), None)
        .await
        .unwrap_err();
    assert_eq!(err, DeskError::IdenticalTokens);
}

#[tokio::test]
async fn test_missing_context_blocks_submission() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(MockDispatcher::new()),
        Arc::new(MockHistory::new()),
        ChainContext::default(),
        None,
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    let err = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap_err();
    assert_eq!(err, DeskError::MissingContext("chain id"));
}

#[tokio::test]
async fn test_unreachable_client_blocks_submission() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(false);

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(MockDispatcher::new()),
        Arc::new(MockHistory::new()),
        context(),
        None,
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    let err = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap_err();
    assert_eq!(err, DeskError::ClientUnreachable);
}

#[tokio::test]
async fn test_concurrent_submission_rejected() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);

    let flight = Arc::new(SingleFlight::new());
    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(MockDispatcher::new()),
        Arc::new(MockHistory::new()),
        context(),
        None,
        Arc::clone(&flight),
    );

    // Another operation holds the single-flight slot.
    let _permit = flight.acquire().unwrap();

    let (draft, derived) = valid_draft();
    let err = orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap_err();
    assert_eq!(err, DeskError::AlreadyInFlight);
}

#[tokio::test]
async fn test_stop_limit_skips_fee_adjustment() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_fee_adjusted_min_return().times(0);
    exec.expect_encode_submission()
        .withf(|req| {
            req.kind == OrderKind::StopLimit
                && req.min_return == U256::from(500_000_000_000_000_000u64)
        })
        .returning(|_| Ok(encoded_submission()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_send_transaction()
        .returning(|_, _| Ok(TxHandle { hash: alloy::primitives::B256::ZERO }));

    let mut history = MockHistory::new();
    history.expect_append().returning(|_| Ok(()));

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        None,
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    orchestrator
        .submit(OrderKind::StopLimit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_default_gas_price_fills_missing_override() {
    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_fee_adjusted_min_return()
        .returning(|output, _| Ok(output));
    exec.expect_encode_submission()
        .returning(|_| Ok(encoded_submission()));

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_send_transaction()
        .withf(|_, overrides| overrides.gas_price == Some(30_000_000_000))
        .returning(|_, _| Ok(TxHandle { hash: alloy::primitives::B256::ZERO }));

    let mut history = MockHistory::new();
    history.expect_append().returning(|_| Ok(()));

    let orchestrator = SubmitOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        Some(30_000_000_000),
        Arc::new(SingleFlight::new()),
    );

    let (draft, derived) = valid_draft();
    orchestrator
        .submit(OrderKind::Limit, &draft, &derived, Some(dec!(0.0004)), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_market_rate_flows_from_price_source_into_validation() {
    use limit_order_desk::ports::price_feed::PriceSource;
    use limit_order_desk::usecases::session::OrderEntrySession;

    let mut feed = MockPriceFeed::new();
    feed.expect_current_market_rate()
        .returning(|_, _| Some(dec!(0.0004)));

    let mut session = OrderEntrySession::new(100);
    session.select_token(Side::Input, usdc());
    session.select_token(Side::Output, weth());
    session.set_independent_field(Field::Input, "1000");

    let market = feed.current_market_rate(&usdc(), &weth()).await;
    assert_eq!(session.validate(market), None);
    let derived = session.derive(market);
    assert_eq!(derived.output, Some(dec!(0.4)));

    // An unavailable rate leaves the order underivable, not zeroed.
    let derived = session.derive(None);
    assert_eq!(derived.output, None);
}

// ---- Cancellation Tests ----

#[tokio::test]
async fn test_cancellation_patches_target_record() {
    let record = open_record("0xaaa");

    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_encode_cancellation()
        .withf(|order, exists| *exists && order.witness.is_some())
        .returning(|_, _| {
            Ok(TxPayload {
                to: CORE,
                data: alloy::primitives::Bytes::from(vec![9]),
                value: U256::ZERO,
            })
        });

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_send_transaction().returning(|_, _| {
        Ok(TxHandle {
            hash: b256!(
                "000000000000000000000000000000000000000000000000000000000000c0de"
            ),
        })
    });

    let mut history = MockHistory::new();
    history
        .expect_patch()
        .times(1)
        .withf(|id, patch| {
            id == "0xaaa"
                && patch.status == Some(OrderStatus::Cancelled)
                && patch.cancelled_tx_hash.as_deref()
                    == Some("0x000000000000000000000000000000000000000000000000000000000000c0de")
        })
        .returning(|id, patch| {
            let mut patched = open_record(id);
            patched.status = OrderStatus::Cancelled;
            patched.cancelled_tx_hash = patch.cancelled_tx_hash;
            Ok(patched)
        });

    let orchestrator = CancelOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        Some(600_000),
        Arc::new(SingleFlight::new()),
    );

    let patched = orchestrator.cancel(&record, None).await.unwrap();
    assert_eq!(patched.status, OrderStatus::Cancelled);
    assert!(patched.cancelled_tx_hash.is_some());
    // Original identity preserved for audit.
    assert_eq!(patched.input_amount, record.input_amount);
}

#[tokio::test]
async fn test_missing_witness_passes_exists_false_through() {
    let mut record = open_record("0xbbb");
    record.protocol.witness = None;

    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_encode_cancellation()
        .times(1)
        .withf(|_, exists| !exists)
        .returning(|_, _| {
            Ok(TxPayload {
                to: CORE,
                data: alloy::primitives::Bytes::new(),
                value: U256::ZERO,
            })
        });

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_send_transaction()
        .times(1)
        .returning(|_, _| Ok(TxHandle { hash: alloy::primitives::B256::ZERO }));

    let mut history = MockHistory::new();
    history.expect_patch().returning(|id, patch| {
        let mut patched = open_record(id);
        patched.status = OrderStatus::Cancelled;
        patched.cancelled_tx_hash = patch.cancelled_tx_hash;
        Ok(patched)
    });

    let orchestrator = CancelOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        Some(600_000),
        Arc::new(SingleFlight::new()),
    );

    // Attempted, not rejected locally.
    orchestrator.cancel(&record, None).await.unwrap();
}

#[tokio::test]
async fn test_cancellation_applies_default_gas_limit() {
    let record = open_record("0xccc");

    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_encode_cancellation().returning(|_, _| {
        Ok(TxPayload {
            to: CORE,
            data: alloy::primitives::Bytes::new(),
            value: U256::ZERO,
        })
    });

    let mut dispatcher = MockDispatcher::new();
    dispatcher
        .expect_send_transaction()
        .withf(|_, overrides| overrides.gas_limit == Some(600_000))
        .returning(|_, _| Ok(TxHandle { hash: alloy::primitives::B256::ZERO }));

    let mut history = MockHistory::new();
    history.expect_patch().returning(|id, patch| {
        let mut patched = open_record(id);
        patched.status = OrderStatus::Cancelled;
        patched.cancelled_tx_hash = patch.cancelled_tx_hash;
        Ok(patched)
    });

    let orchestrator = CancelOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        Some(600_000),
        Arc::new(SingleFlight::new()),
    );

    orchestrator.cancel(&record, None).await.unwrap();
}

#[tokio::test]
async fn test_cancellation_dispatch_failure_patches_nothing() {
    let record = open_record("0xddd");

    let mut exec = MockExecClient::new();
    exec.expect_is_ready().return_const(true);
    exec.expect_encode_cancellation().returning(|_, _| {
        Ok(TxPayload {
            to: CORE,
            data: alloy::primitives::Bytes::new(),
            value: U256::ZERO,
        })
    });

    let mut dispatcher = MockDispatcher::new();
    dispatcher.expect_send_transaction().returning(|_, _| {
        Err(DeskError::TransactionRejected("nonce too low".to_string()))
    });

    let mut history = MockHistory::new();
    history.expect_patch().times(0);

    let orchestrator = CancelOrchestrator::new(
        Arc::new(exec),
        Arc::new(dispatcher),
        Arc::new(history),
        context(),
        Some(600_000),
        Arc::new(SingleFlight::new()),
    );

    let err = orchestrator.cancel(&record, None).await.unwrap_err();
    assert_eq!(
        err,
        DeskError::TransactionRejected("nonce too low".to_string())
    );
}
