use super::*;

/// Identifier of an auction. Assigned sequentially starting at 0.
pub type AuctionId = u64;

/// The state in which an auction can be.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq, Clone)]
pub enum AuctionState {
    /// The auction is either
    /// - still accepting bids or
    /// - not accepting bids because it's past the auction end, but nobody has
    ///   finalized the auction yet.
    Active,
    /// The auction was finalized; the highest bid and bidder at that point
    /// are the binding result.
    Ended,
}

/// A single auction kept by the registry.
/// This is what will be shown when the contract is queried using
/// `concordium-client contract invoke` with the `view` function.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq, Clone)]
pub struct Auction {
    /// Account that created the auction and collects the winning bid.
    pub owner: AccountAddress,
    /// The sold item (to be displayed to the auction participants).
    pub description: String,
    /// Smallest amount the first bid must reach.
    pub starting_price: Amount,
    /// Time at which bids are closed; fixed at creation.
    pub end_time: Timestamp,
    /// The highest bid so far (stored explicitly so that bidders can quickly
    /// see it).
    pub highest_bid: Amount,
    /// Account currently winning the auction, absent until the first bid.
    pub highest_bidder: Option<AccountAddress>,
    /// Has the auction been finalized?
    pub auction_state: AuctionState,
    /// Whether the owner already collected the winning bid.
    pub proceeds_withdrawn: bool,
}

/// Key of a refund credit: one outbid account on one auction.
#[derive(Debug, Serialize, Clone, Copy, Eq, PartialEq)]
pub struct RefundKey {
    /// Identifier of the auction the bid was placed on.
    pub auction_id: AuctionId,
    /// Account that was outbid.
    pub account: AccountAddress,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Identifier that will be assigned to the next auction.
    pub next_auction_id: AuctionId,
    /// All auctions ever created, keyed by id.
    pub auctions: StateMap<AuctionId, Auction, S>,
    /// Keeping track of how much money the registry holds for accounts that
    /// were outbid, keyed by auction and account.
    pub refunds: StateMap<RefundKey, Amount, S>,
}

/// Type of the parameter to the `create` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct CreateParams {
    /// The item to be sold.
    pub description: String,
    /// Smallest amount the first bid must reach.
    pub starting_price: Amount,
    /// How long the auction accepts bids, counted from the creation time.
    pub duration: Duration,
}
