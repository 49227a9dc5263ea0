use super::*;

/// Tag for the CreateEvent.
pub const CREATE_TAG: u8 = 0;
/// Tag for the BidingEvent.
pub const BIDING_TAG: u8 = 1;
/// Tag for the FinalizeEvent.
pub const FINALIZE_TAG: u8 = 2;

/// An untagged event of a new auction being opened.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct CreateEvent {
    /// Identifier assigned to the auction.
    pub auction_id: AuctionId,
    /// Account that created the auction.
    pub owner: AccountAddress,
    /// Smallest amount the first bid must reach.
    pub starting_price: Amount,
    /// How long the auction accepts bids.
    pub duration: Duration,
}

/// An untagged event of a bid taking the lead.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct BidingEvent {
    /// Identifier of the auction being bid on.
    pub auction_id: AuctionId,
    /// Account the bid was placed from.
    pub bidder: AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// An untagged event of an auction being finalized.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq)]
pub struct FinalizeEvent {
    /// Identifier of the finalized auction.
    pub auction_id: AuctionId,
    /// Account that won the auction, if any bid was placed.
    pub winner: Option<AccountAddress>,
    /// The winning bid.
    pub winning_bid: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum CustomEvent {
    /// Creating an auction
    Create(CreateEvent),
    /// Biding
    Biding(BidingEvent),
    /// Finalizing an auction
    Finalize(FinalizeEvent),
}

impl Serial for CustomEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::Create(event) => {
                out.write_u8(CREATE_TAG)?;
                event.serial(out)
            }
            CustomEvent::Biding(event) => {
                out.write_u8(BIDING_TAG)?;
                event.serial(out)
            }
            CustomEvent::Finalize(event) => {
                out.write_u8(FINALIZE_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for CustomEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            CREATE_TAG => CreateEvent::deserial(source).map(CustomEvent::Create),
            BIDING_TAG => BidingEvent::deserial(source).map(CustomEvent::Biding),
            FINALIZE_TAG => FinalizeEvent::deserial(source).map(CustomEvent::Finalize),
            _ => Err(ParseError::default()),
        }
    }
}
