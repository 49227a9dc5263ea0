use super::*;

/// Init function that creates a new, empty auction registry.
#[init(contract = "BictoryAuctionRegistry")]
fn init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::empty(state_builder))
}

/// Open a new auction owned by the sender.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - The item description is empty.
/// - The duration is zero or overflows the end time.
/// - It fails to log `CreateEvent`.
#[receive(
    contract = "BictoryAuctionRegistry",
    name = "create",
    parameter = "CreateParams",
    mutable,
    enable_logger
)]
fn create<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: CreateParams = ctx.parameter_cursor().get()?;

    let owner = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
        Address::Account(account_address) => account_address,
    };

    ensure!(
        !params.description.is_empty(),
        CustomContractError::EmptyDescription
    );
    ensure!(
        params.duration.millis() > 0,
        CustomContractError::InvalidDuration
    );
    let end_time = ctx
        .metadata()
        .slot_time()
        .checked_add(params.duration)
        .ok_or(CustomContractError::InvalidDuration)?;

    let auction_id = host.state_mut().create_auction(
        owner,
        params.description,
        params.starting_price,
        end_time,
    );

    // Event for creating an auction.
    logger.log(&CustomEvent::Create(CreateEvent {
        auction_id,
        owner,
        starting_price: params.starting_price,
        duration: params.duration,
    }))?;

    Ok(())
}

/// Receive function in which accounts can bid on an active auction before
/// its end time. The amount sent with the call is the bid and is kept by
/// the registry until it is either won by the seller or refunded.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - No auction exists with the given id.
/// - The auction is finalized or past its end time.
/// - The amount does not exceed the highest bid or meet the starting price.
/// - It fails to log `BidingEvent`.
#[receive(
    contract = "BictoryAuctionRegistry",
    name = "bid",
    parameter = "AuctionId",
    mutable,
    enable_logger,
    payable
)]
fn bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let auction_id: AuctionId = ctx.parameter_cursor().get()?;

    let bidder = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
        Address::Account(account_address) => account_address,
    };

    let slot_time = ctx.metadata().slot_time();
    host.state_mut().bid(auction_id, bidder, amount, slot_time)?;

    // Event for Biding.
    logger.log(&CustomEvent::Biding(BidingEvent {
        auction_id,
        bidder,
        amount,
    }))?;

    Ok(())
}

/// Receive function used to finalize the auction once its end time has
/// passed. The highest bid and bidder become the binding result. No money
/// moves here: the seller and outbid participants withdraw their amounts
/// themselves afterwards.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - No auction exists with the given id.
/// - The auction was already finalized.
/// - The end time has not passed yet.
/// - It fails to log `FinalizeEvent`.
#[receive(
    contract = "BictoryAuctionRegistry",
    name = "finalize",
    parameter = "AuctionId",
    mutable,
    enable_logger
)]
fn finalize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let auction_id: AuctionId = ctx.parameter_cursor().get()?;

    let slot_time = ctx.metadata().slot_time();
    let (winner, winning_bid) = host.state_mut().finalize(auction_id, slot_time)?;

    // Event for Finalize.
    logger.log(&CustomEvent::Finalize(FinalizeEvent {
        auction_id,
        winner,
        winning_bid,
    }))?;

    Ok(())
}

/// Receive function with which the seller collects the winning bid and
/// outbid accounts collect their refunds after the auction was finalized.
/// What is paid out depends only on who the sender is. The owed amount is
/// zeroed in the state before the transfer is issued; a failed transfer
/// rejects the whole update, so no balance can be paid out twice.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - No auction exists with the given id.
/// - The auction has not been finalized.
/// - The sender has nothing to claim for this auction.
/// - The transfer could not be invoked.
#[receive(
    contract = "BictoryAuctionRegistry",
    name = "withdraw",
    parameter = "AuctionId",
    mutable
)]
fn withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let auction_id: AuctionId = ctx.parameter_cursor().get()?;

    let caller = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
        Address::Account(account_address) => account_address,
    };

    let payout = host.state_mut().withdraw(auction_id, caller)?;
    host.invoke_transfer(&caller, payout)?;

    Ok(())
}

/// View function that returns the stored fields of a single auction.
#[receive(
    contract = "BictoryAuctionRegistry",
    name = "view",
    parameter = "AuctionId",
    return_value = "Auction"
)]
fn view<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Auction> {
    let auction_id: AuctionId = ctx.parameter_cursor().get()?;

    let auction = host
        .state()
        .auctions
        .get(&auction_id)
        .ok_or(CustomContractError::AuctionNotFound)?;

    Ok(auction.clone())
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const BIDDER_1: AccountAddress = AccountAddress([1u8; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([2u8; 32]);
    const ANYONE: AccountAddress = AccountAddress([3u8; 32]);

    const CREATION_TIME: u64 = 0;
    const DURATION_MILLIS: u64 = 3_600_000;
    const AUCTION_END: u64 = CREATION_TIME + DURATION_MILLIS;

    fn fresh_host() -> TestHost<State<TestStateApi>> {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();
        let state = init(&ctx, &mut state_builder)
            .expect_report("Failed during init_BictoryAuctionRegistry");
        TestHost::new(state, state_builder)
    }

    /// Open an auction with the default item, starting price of 1 CCD and
    /// one hour duration.
    fn new_auction(host: &mut TestHost<State<TestStateApi>>) -> AuctionId {
        let params = to_bytes(&CreateParams {
            description: String::from("Rare Digital Artwork"),
            starting_price: Amount::from_ccd(1),
            duration: Duration::from_millis(DURATION_MILLIS),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(CREATION_TIME));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();

        let auction_id = host.state().next_auction_id;
        create(&ctx, host, &mut logger).expect_report("Creating auction failed");
        auction_id
    }

    fn bid_on(
        host: &mut TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: u64,
    ) -> ContractResult<()> {
        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(bidder));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_time));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();
        bid(&ctx, host, amount, &mut logger)
    }

    fn finalize_at(
        host: &mut TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        slot_time: u64,
    ) -> ContractResult<()> {
        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ANYONE));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_time));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();
        finalize(&ctx, host, &mut logger)
    }

    fn withdraw_by(
        host: &mut TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        caller: AccountAddress,
    ) -> ContractResult<()> {
        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(caller));
        ctx.set_parameter(&params);
        withdraw(&ctx, host)
    }

    fn refund_credit(
        host: &TestHost<State<TestStateApi>>,
        auction_id: AuctionId,
        account: AccountAddress,
    ) -> Option<Amount> {
        host.state()
            .refunds
            .get(&RefundKey {
                auction_id,
                account,
            })
            .map(|c| *c)
    }

    #[concordium_test]
    /// Test that initialization creates a registry with no auctions.
    fn test_init() {
        let host = fresh_host();
        let state = host.state();

        claim_eq!(state.next_auction_id, 0, "No identifier should be assigned");
        claim!(state.auctions.is_empty(), "No auctions should be stored");
        claim!(state.refunds.is_empty(), "No refunds should be owed");
    }

    #[concordium_test]
    /// Test that creating an auction stores it with the expected fields and
    /// logs a `CreateEvent` carrying the assigned identifier.
    fn test_create() {
        let mut host = fresh_host();

        let params = to_bytes(&CreateParams {
            description: String::from("Rare Digital Artwork"),
            starting_price: Amount::from_ccd(1),
            duration: Duration::from_millis(DURATION_MILLIS),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(CREATION_TIME));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();

        let result = create(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Creating auction results in rejection");

        let state = host.state();
        claim_eq!(state.next_auction_id, 1, "Next identifier should advance");
        let auction = state
            .auctions
            .get(&0)
            .expect_report("Auction 0 should be stored");
        claim_eq!(auction.owner, OWNER, "Sender should become the owner");
        claim_eq!(
            auction.description,
            String::from("Rare Digital Artwork"),
            "Description should be kept verbatim"
        );
        claim_eq!(auction.starting_price, Amount::from_ccd(1), "Starting price should be kept");
        claim_eq!(
            auction.end_time,
            Timestamp::from_timestamp_millis(AUCTION_END),
            "End time should be creation time plus duration"
        );
        claim_eq!(auction.highest_bid, Amount::zero(), "No bid yet");
        claim_eq!(auction.highest_bidder, None, "No bidder yet");
        claim_eq!(
            auction.auction_state,
            AuctionState::Active,
            "Auction should start active"
        );
        claim!(!auction.proceeds_withdrawn, "Nothing withdrawn yet");

        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Create(CreateEvent {
                auction_id: 0,
                owner: OWNER,
                starting_price: Amount::from_ccd(1),
                duration: Duration::from_millis(DURATION_MILLIS),
            })),
            "Wrong create event logged"
        );
    }

    #[concordium_test]
    /// Identifiers are assigned sequentially and never reused.
    fn test_create_assigns_sequential_ids() {
        let mut host = fresh_host();

        let first = new_auction(&mut host);
        let second = new_auction(&mut host);

        claim_eq!(first, 0, "First auction should get id 0");
        claim_eq!(second, 1, "Second auction should get id 1");
        claim_eq!(host.state().next_auction_id, 2, "Next identifier should be 2");
    }

    #[concordium_test]
    /// Creating an auction without an item description should fail.
    fn test_create_empty_description() {
        let mut host = fresh_host();

        let params = to_bytes(&CreateParams {
            description: String::from(""),
            starting_price: Amount::from_ccd(1),
            duration: Duration::from_millis(DURATION_MILLIS),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(CREATION_TIME));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();

        let result = create(&ctx, &mut host, &mut logger);
        claim_eq!(
            result,
            Err(CustomContractError::EmptyDescription),
            "Empty description should be rejected"
        );
    }

    #[concordium_test]
    /// Creating an auction with a zero duration should fail.
    fn test_create_zero_duration() {
        let mut host = fresh_host();

        let params = to_bytes(&CreateParams {
            description: String::from("Rare Digital Artwork"),
            starting_price: Amount::from_ccd(1),
            duration: Duration::from_millis(0),
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(OWNER));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(CREATION_TIME));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();

        let result = create(&ctx, &mut host, &mut logger);
        claim_eq!(
            result,
            Err(CustomContractError::InvalidDuration),
            "Zero duration should be rejected"
        );
    }

    #[concordium_test]
    /// Test a sequence of bids on one auction:
    /// 1. Bidder 1 successfully bids 2 CCD.
    /// 2. Bidder 2 bids 1 CCD, which is rejected for not exceeding the
    ///    highest bid. The auction is unchanged by the rejection.
    /// 3. Bidder 2 successfully bids 3 CCD, making bidder 1's 2 CCD a
    ///    claimable refund.
    fn test_bid_and_outbid() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let result = bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10);
        claim!(result.is_ok(), "First bid should pass");

        let result = bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(1), 20);
        claim_eq!(
            result,
            Err(CustomContractError::BidTooLow),
            "Bid below the highest bid should be rejected"
        );
        {
            let state = host.state();
            let auction = state.auctions.get(&auction_id).expect_report("Missing auction");
            claim_eq!(auction.highest_bid, Amount::from_ccd(2), "Rejected bid must not change state");
            claim_eq!(auction.highest_bidder, Some(BIDDER_1), "Leader must be unchanged");
            claim!(state.refunds.is_empty(), "Rejected bid must not credit refunds");
        }

        let result = bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(3), 30);
        claim!(result.is_ok(), "Overbidding should pass");

        let state = host.state();
        let auction = state.auctions.get(&auction_id).expect_report("Missing auction");
        claim_eq!(auction.highest_bid, Amount::from_ccd(3), "Highest bid should be 3 CCD");
        claim_eq!(auction.highest_bidder, Some(BIDDER_2), "Bidder 2 should lead");
        claim_eq!(
            refund_credit(&host, auction_id, BIDDER_1),
            Some(Amount::from_ccd(2)),
            "Outbid amount should be claimable"
        );
    }

    #[concordium_test]
    /// A first bid below the starting price should be rejected even though
    /// it exceeds the zero highest bid.
    fn test_bid_below_starting_price() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let result = bid_on(
            &mut host,
            auction_id,
            BIDDER_1,
            Amount::from_micro_ccd(500_000),
            10,
        );
        claim_eq!(
            result,
            Err(CustomContractError::BidTooLow),
            "Bid below the starting price should be rejected"
        );
    }

    #[concordium_test]
    /// A first bid exactly at the starting price should be accepted.
    fn test_bid_at_starting_price() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let result = bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(1), 10);
        claim!(result.is_ok(), "Bid meeting the starting price should pass");

        let state = host.state();
        let auction = state.auctions.get(&auction_id).expect_report("Missing auction");
        claim_eq!(auction.highest_bid, Amount::from_ccd(1));
        claim_eq!(auction.highest_bidder, Some(BIDDER_1));
    }

    #[concordium_test]
    /// Bids for 0 CCD should be rejected.
    fn test_bid_zero() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let result = bid_on(&mut host, auction_id, BIDDER_1, Amount::zero(), 10);
        claim_eq!(
            result,
            Err(CustomContractError::BidTooLow),
            "Bidding zero should fail"
        );
    }

    #[concordium_test]
    /// Bidding on an unknown identifier should be rejected.
    fn test_bid_unknown_auction() {
        let mut host = fresh_host();

        let result = bid_on(&mut host, 7, BIDDER_1, Amount::from_ccd(2), 10);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionNotFound),
            "Bidding on an unknown auction should fail"
        );
    }

    #[concordium_test]
    /// Bids are closed from the end time on.
    fn test_bid_after_end_time() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let result = bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), AUCTION_END);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionEnded),
            "Bidding at the end time should fail"
        );
    }

    #[concordium_test]
    /// Auctions are independent: bids and leaders are tracked per id.
    fn test_auctions_are_independent() {
        let mut host = fresh_host();
        let first = new_auction(&mut host);
        let second = new_auction(&mut host);

        claim!(bid_on(&mut host, first, BIDDER_1, Amount::from_ccd(5), 10).is_ok());
        claim!(
            bid_on(&mut host, second, BIDDER_2, Amount::from_ccd(2), 20).is_ok(),
            "A lower bid on another auction should pass"
        );

        let state = host.state();
        let auction = state.auctions.get(&first).expect_report("Missing auction");
        claim_eq!(auction.highest_bidder, Some(BIDDER_1));
        claim_eq!(auction.highest_bid, Amount::from_ccd(5));
        let auction = state.auctions.get(&second).expect_report("Missing auction");
        claim_eq!(auction.highest_bidder, Some(BIDDER_2));
        claim_eq!(auction.highest_bid, Amount::from_ccd(2));
    }

    #[concordium_test]
    /// Test finalization:
    /// 1. Finalizing before the end time fails and leaves the auction active.
    /// 2. Finalizing at the end time succeeds and logs the winner.
    /// 3. Finalizing again fails.
    /// 4. Bidding afterwards fails.
    fn test_finalize() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(3), 20).is_ok());

        let result = finalize_at(&mut host, auction_id, AUCTION_END - 1);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionStillActive),
            "Finalizing before the end time should fail"
        );
        claim_eq!(
            host.state()
                .auctions
                .get(&auction_id)
                .expect_report("Missing auction")
                .auction_state,
            AuctionState::Active,
            "Failed finalization must leave the auction active"
        );

        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ANYONE));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(AUCTION_END));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = finalize(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Finalizing at the end time should pass");

        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Finalize(FinalizeEvent {
                auction_id,
                winner: Some(BIDDER_2),
                winning_bid: Amount::from_ccd(3),
            })),
            "Wrong finalize event logged"
        );
        claim_eq!(
            host.state()
                .auctions
                .get(&auction_id)
                .expect_report("Missing auction")
                .auction_state,
            AuctionState::Ended,
            "Auction should be ended"
        );

        let result = finalize_at(&mut host, auction_id, AUCTION_END + 100);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionEnded),
            "Finalizing a second time should fail"
        );

        let result = bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(5), AUCTION_END + 100);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionEnded),
            "Bidding should fail because the auction is finalized"
        );
    }

    #[concordium_test]
    /// Finalizing an unknown identifier should be rejected.
    fn test_finalize_unknown_auction() {
        let mut host = fresh_host();

        let result = finalize_at(&mut host, 7, AUCTION_END);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionNotFound),
            "Finalizing an unknown auction should fail"
        );
    }

    #[concordium_test]
    /// An auction without bids finalizes with no winner, and the owner has
    /// nothing to withdraw.
    fn test_finalize_without_bids() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(ANYONE));
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(AUCTION_END));
        ctx.set_parameter(&params);
        let mut logger = TestLogger::init();
        let result = finalize(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Finalizing without bids should pass");

        claim_eq!(
            logger.logs[0],
            to_bytes(&CustomEvent::Finalize(FinalizeEvent {
                auction_id,
                winner: None,
                winning_bid: Amount::zero(),
            })),
            "Wrong finalize event logged"
        );

        let result = withdraw_by(&mut host, auction_id, OWNER);
        claim_eq!(
            result,
            Err(CustomContractError::NothingToWithdraw),
            "Owner of an auction without bids has nothing to claim"
        );
    }

    #[concordium_test]
    /// Test the full settlement flow:
    /// 1. Bidder 1 bids 2 CCD, bidder 2 bids 3 CCD, the auction is finalized.
    /// 2. The owner collects the winning 3 CCD exactly once.
    /// 3. Bidder 1 collects the 2 CCD refund exactly once.
    /// 4. The winner has nothing to claim.
    /// 5. Everything paid out together equals everything received.
    fn test_withdraw_flow() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(3), 20).is_ok());
        claim!(finalize_at(&mut host, auction_id, AUCTION_END).is_ok());

        // The registry holds both bids at this point.
        host.set_self_balance(Amount::from_ccd(5));

        let result = withdraw_by(&mut host, auction_id, OWNER);
        claim!(result.is_ok(), "Owner withdrawal should pass");
        claim!(
            host.transfer_occurred(&OWNER, Amount::from_ccd(3)),
            "Owner should receive the winning bid"
        );
        claim!(
            host.state()
                .auctions
                .get(&auction_id)
                .expect_report("Missing auction")
                .proceeds_withdrawn,
            "Proceeds should be marked withdrawn"
        );

        let result = withdraw_by(&mut host, auction_id, OWNER);
        claim_eq!(
            result,
            Err(CustomContractError::NothingToWithdraw),
            "A second owner withdrawal should fail"
        );

        let result = withdraw_by(&mut host, auction_id, BIDDER_1);
        claim!(result.is_ok(), "Refund withdrawal should pass");
        claim!(
            host.transfer_occurred(&BIDDER_1, Amount::from_ccd(2)),
            "Outbid account should receive its refund"
        );
        claim_eq!(
            refund_credit(&host, auction_id, BIDDER_1),
            None,
            "Refund credit should be cleared"
        );

        let result = withdraw_by(&mut host, auction_id, BIDDER_1);
        claim_eq!(
            result,
            Err(CustomContractError::NothingToWithdraw),
            "A second refund withdrawal should fail"
        );

        let result = withdraw_by(&mut host, auction_id, BIDDER_2);
        claim_eq!(
            result,
            Err(CustomContractError::NothingToWithdraw),
            "The winner has nothing to claim"
        );

        let total_paid = host
            .get_transfers()
            .iter()
            .fold(Amount::zero(), |acc, (_, amount)| acc + *amount);
        claim_eq!(total_paid, Amount::from_ccd(5), "Payouts must equal the amounts received");
    }

    #[concordium_test]
    /// Withdrawing is only possible once the auction was finalized.
    fn test_withdraw_active_auction() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        host.set_self_balance(Amount::from_ccd(2));

        let result = withdraw_by(&mut host, auction_id, BIDDER_1);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionStillActive),
            "Withdrawing before finalization should fail"
        );
    }

    #[concordium_test]
    /// Withdrawing from an unknown identifier should be rejected.
    fn test_withdraw_unknown_auction() {
        let mut host = fresh_host();

        let result = withdraw_by(&mut host, 7, OWNER);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionNotFound),
            "Withdrawing from an unknown auction should fail"
        );
    }

    #[concordium_test]
    /// An account that outbids itself keeps the superseded amount as a
    /// refund, also when it wins the auction.
    fn test_overbid_own_bid() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(3), 20).is_ok());
        claim_eq!(
            refund_credit(&host, auction_id, BIDDER_1),
            Some(Amount::from_ccd(2)),
            "Superseded own bid should be claimable"
        );

        claim!(finalize_at(&mut host, auction_id, AUCTION_END).is_ok());
        host.set_self_balance(Amount::from_ccd(5));

        let result = withdraw_by(&mut host, auction_id, BIDDER_1);
        claim!(result.is_ok(), "Winner should still collect the superseded amount");
        claim!(
            host.transfer_occurred(&BIDDER_1, Amount::from_ccd(2)),
            "Only the superseded amount should be refunded"
        );

        let result = withdraw_by(&mut host, auction_id, OWNER);
        claim!(result.is_ok(), "Owner withdrawal should pass");
        claim!(
            host.transfer_occurred(&OWNER, Amount::from_ccd(3)),
            "Owner should receive the winning bid"
        );
    }

    #[concordium_test]
    /// Repeated mutual outbidding accumulates refund credits, and the
    /// final payouts still add up to the amounts received.
    fn test_repeated_outbidding() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(3), 20).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(4), 30).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(5), 40).is_ok());

        claim_eq!(
            refund_credit(&host, auction_id, BIDDER_1),
            Some(Amount::from_ccd(6)),
            "Bidder 1 should have both superseded amounts credited"
        );
        claim_eq!(
            refund_credit(&host, auction_id, BIDDER_2),
            Some(Amount::from_ccd(3)),
            "Bidder 2 should have the first superseded amount credited"
        );

        claim!(finalize_at(&mut host, auction_id, AUCTION_END).is_ok());
        host.set_self_balance(Amount::from_ccd(14));

        claim!(withdraw_by(&mut host, auction_id, OWNER).is_ok());
        claim!(withdraw_by(&mut host, auction_id, BIDDER_1).is_ok());
        claim!(withdraw_by(&mut host, auction_id, BIDDER_2).is_ok());

        claim!(host.transfer_occurred(&OWNER, Amount::from_ccd(5)));
        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_ccd(6)));
        claim!(host.transfer_occurred(&BIDDER_2, Amount::from_ccd(3)));

        let total_paid = host
            .get_transfers()
            .iter()
            .fold(Amount::zero(), |acc, (_, amount)| acc + *amount);
        claim_eq!(total_paid, Amount::from_ccd(14), "Payouts must equal the amounts received");
    }

    #[concordium_test]
    /// A withdrawal whose transfer cannot be covered is rejected as a whole.
    fn test_withdraw_transfer_fails() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);

        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());
        claim!(bid_on(&mut host, auction_id, BIDDER_2, Amount::from_ccd(3), 20).is_ok());
        claim!(finalize_at(&mut host, auction_id, AUCTION_END).is_ok());

        host.set_self_balance(Amount::from_ccd(1));

        let result = withdraw_by(&mut host, auction_id, OWNER);
        claim_eq!(
            result,
            Err(CustomContractError::InvokeTransferError),
            "Uncovered transfer should reject the withdrawal"
        );
        claim_eq!(host.get_transfers().len(), 0, "No transfer should be recorded");
    }

    #[concordium_test]
    /// The view function returns the stored auction.
    fn test_view() {
        let mut host = fresh_host();
        let auction_id = new_auction(&mut host);
        claim!(bid_on(&mut host, auction_id, BIDDER_1, Amount::from_ccd(2), 10).is_ok());

        let params = to_bytes(&auction_id);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&params);

        let result = view(&ctx, &host);
        let auction = result.expect_report("Viewing auction failed");
        claim_eq!(auction.owner, OWNER);
        claim_eq!(auction.description, String::from("Rare Digital Artwork"));
        claim_eq!(auction.highest_bid, Amount::from_ccd(2));
        claim_eq!(auction.highest_bidder, Some(BIDDER_1));
        claim_eq!(auction.auction_state, AuctionState::Active);

        let params = to_bytes(&7u64);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&params);

        let result = view(&ctx, &host);
        claim_eq!(
            result,
            Err(CustomContractError::AuctionNotFound),
            "Viewing an unknown auction should fail"
        );
    }
}
