//! Tests for the maturity gate.
//!
//! These live as integration tests rather than a unit-test module: they drive the provider with
//! `FakeChain` from `fedgw-test-utils`, which itself links `fedgw-monitor`, and the trait
//! identities only unify when both sides link the same library build.
#![allow(unused_crate_dependencies)]

use std::sync::Arc;

use bitcoin::Amount;
use fedgw_monitor::{
    deposit_extractor::DepositExtractor,
    errors::MaturedBlocksErr,
    matured_blocks::MaturedBlocksProvider,
    op_return::OpReturnAddressReader,
};
use fedgw_test_utils::{
    chain::FakeChain,
    multisig::{random_target_address, MultisigFixture},
    tx::{build_annotated_payment_tx, build_block},
};

fn provider_over(
    fixture: &MultisigFixture,
    chain: Arc<FakeChain>,
    min_confirmations: u64,
) -> MaturedBlocksProvider {
    let settings = fixture.settings(min_confirmations, 30);
    let extractor = DepositExtractor::new(&settings, Arc::new(OpReturnAddressReader));
    MaturedBlocksProvider::new(chain.clone(), chain, extractor, &settings)
}

fn deposit_block(fixture: &MultisigFixture, amount: Amount) -> (bitcoin::Block, String) {
    let address = random_target_address();
    let block = build_block(vec![build_annotated_payment_tx(
        fixture.script_pubkey(),
        amount,
        address.as_bytes(),
    )]);
    (block, address)
}

#[test]
fn nothing_matures_below_the_confirmation_threshold() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());
    chain.extend_with_empty_blocks(8); // heights 0..=8, tip depth of height 0 is 9

    let provider = provider_over(&fixture, chain, 10);

    assert!(provider.retrieve_deposits(0).expect("scan must succeed").is_none());
}

#[test]
fn block_matures_exactly_at_the_confirmation_threshold() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());

    let (block, address) = deposit_block(&fixture, Amount::from_int_btc(3));
    chain.add_block(block, 0);
    chain.extend_with_empty_blocks(9); // tip 9, height 0 now has depth 10

    let provider = provider_over(&fixture, chain, 10);

    let batch = provider
        .retrieve_deposits(0)
        .expect("scan must succeed")
        .expect("height 0 must be mature");

    assert_eq!(batch.matured_to, 0);
    assert_eq!(batch.deposits.len(), 1);
    assert_eq!(batch.deposits[0].target_address(), address);
    assert_eq!(batch.deposits[0].block_height(), 0);
}

#[test]
fn concatenates_deposits_across_the_matured_range_in_height_order() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());

    let (first, _) = deposit_block(&fixture, Amount::from_int_btc(1));
    let (second, _) = deposit_block(&fixture, Amount::from_int_btc(2));
    chain.add_block(first, 0);
    chain.add_block(second, 1);
    chain.extend_with_empty_blocks(4); // tip 4

    let provider = provider_over(&fixture, chain, 3);

    let batch = provider
        .retrieve_deposits(0)
        .expect("scan must succeed")
        .expect("heights 0..=2 must be mature");

    assert_eq!(batch.matured_to, 2);
    assert_eq!(batch.deposits.len(), 2);
    assert_eq!(batch.deposits[0].block_height(), 0);
    assert_eq!(batch.deposits[0].amount(), Amount::from_int_btc(1));
    assert_eq!(batch.deposits[1].block_height(), 1);
    assert_eq!(batch.deposits[1].amount(), Amount::from_int_btc(2));
}

#[test]
fn starting_height_beyond_matured_range_yields_nothing() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());
    chain.extend_with_empty_blocks(9); // tip 9, matured_to = 0 with min 10

    let provider = provider_over(&fixture, chain, 10);

    assert!(provider.retrieve_deposits(1).expect("scan must succeed").is_none());
}

#[test]
fn zero_configured_confirmations_behaves_as_one() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());
    chain.extend_with_empty_blocks(5); // tip 5

    // A floor of 0 must not push the matured range past the tip.
    let provider = provider_over(&fixture, chain, 0);

    let batch = provider
        .retrieve_deposits(0)
        .expect("scan must stay within the recorded chain")
        .expect("everything up to the tip is mature");
    assert_eq!(batch.matured_to, 5);
}

#[test]
fn missing_block_in_matured_range_is_fatal() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());

    chain.add_header_without_block(0);
    chain.extend_with_empty_blocks(9);

    let provider = provider_over(&fixture, chain, 10);

    let err = provider
        .retrieve_deposits(0)
        .expect_err("a hole in buried history must surface");
    assert!(matches!(err, MaturedBlocksErr::MissingBlock { height: 0, .. }));
}

#[test]
fn missing_header_in_matured_range_is_fatal() {
    let fixture = MultisigFixture::new_random();
    let chain = Arc::new(FakeChain::new());

    // Heights 1..=9 exist but 0 was never recorded.
    for height in 1..=9 {
        chain.add_block(build_block(vec![]), height);
    }

    let provider = provider_over(&fixture, chain, 10);

    let err = provider
        .retrieve_deposits(0)
        .expect_err("a hole in the chain index must surface");
    assert!(matches!(err, MaturedBlocksErr::MissingHeader(0)));
}
