use super::*;

// Functions for creating, updating and querying the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates an empty registry with no auctions.
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        State {
            next_auction_id: 0,
            auctions: state_builder.new_map(),
            refunds: state_builder.new_map(),
        }
    }

    /// Store a new active auction under the next sequential identifier.
    pub fn create_auction(
        &mut self,
        owner: AccountAddress,
        description: String,
        starting_price: Amount,
        end_time: Timestamp,
    ) -> AuctionId {
        let auction_id = self.next_auction_id;
        self.next_auction_id += 1;
        self.auctions.insert(
            auction_id,
            Auction {
                owner,
                description,
                starting_price,
                end_time,
                highest_bid: Amount::zero(),
                highest_bidder: None,
                auction_state: AuctionState::Active,
                proceeds_withdrawn: false,
            },
        );
        auction_id
    }

    /// Register a bid on an active auction. The previous leader, if any,
    /// keeps their full amount as a refund credit.
    pub fn bid(
        &mut self,
        auction_id: AuctionId,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> ContractResult<()> {
        let mut auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(CustomContractError::AuctionNotFound)?;

        match auction.auction_state {
            AuctionState::Active => (),
            AuctionState::Ended => bail!(CustomContractError::AuctionEnded),
        }
        ensure!(
            slot_time < auction.end_time,
            CustomContractError::AuctionEnded
        );

        // Ensure that the new bid exceeds the highest bid so far and meets
        // the starting price. The second check only matters for the first
        // bid, afterwards the highest bid is at least the starting price.
        ensure!(
            amount > auction.highest_bid && amount >= auction.starting_price,
            CustomContractError::BidTooLow
        );

        if let Some(previous) = auction.highest_bidder {
            let mut credit = self
                .refunds
                .entry(RefundKey {
                    auction_id,
                    account: previous,
                })
                .or_insert_with(Amount::zero);
            *credit += auction.highest_bid;
        }

        auction.highest_bid = amount;
        auction.highest_bidder = Some(bidder);

        Ok(())
    }

    /// Irreversibly end an active auction once its end time has passed.
    /// Returns the winning account and bid for the event log. Moves no
    /// money; it only makes withdrawals eligible.
    pub fn finalize(
        &mut self,
        auction_id: AuctionId,
        slot_time: Timestamp,
    ) -> ContractResult<(Option<AccountAddress>, Amount)> {
        let mut auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(CustomContractError::AuctionNotFound)?;

        match auction.auction_state {
            AuctionState::Active => (),
            AuctionState::Ended => bail!(CustomContractError::AuctionEnded),
        }
        ensure!(
            slot_time >= auction.end_time,
            CustomContractError::AuctionStillActive
        );

        auction.auction_state = AuctionState::Ended;

        Ok((auction.highest_bidder, auction.highest_bid))
    }

    /// Clear and return everything the registry owes `caller` for an ended
    /// auction: the winning bid if the caller is the owner and has not
    /// collected it yet, plus any refund credit from being outbid. The
    /// bookkeeping is zeroed here, before the caller issues the transfer.
    pub fn withdraw(
        &mut self,
        auction_id: AuctionId,
        caller: AccountAddress,
    ) -> ContractResult<Amount> {
        let mut auction = self
            .auctions
            .get_mut(&auction_id)
            .ok_or(CustomContractError::AuctionNotFound)?;

        match auction.auction_state {
            AuctionState::Ended => (),
            AuctionState::Active => bail!(CustomContractError::AuctionStillActive),
        }

        let mut payout = Amount::zero();

        if caller == auction.owner && !auction.proceeds_withdrawn && auction.highest_bidder.is_some()
        {
            auction.proceeds_withdrawn = true;
            payout += auction.highest_bid;
        }

        let refund_key = RefundKey {
            auction_id,
            account: caller,
        };
        let credit = self.refunds.get(&refund_key).map(|c| *c);
        if let Some(credit) = credit {
            self.refunds.remove(&refund_key);
            payout += credit;
        }

        ensure!(
            payout > Amount::zero(),
            CustomContractError::NothingToWithdraw
        );

        Ok(payout)
    }
}
