use super::*;

pub type ContractResult<A> = Result<A, CustomContractError>;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Only account addresses can create auctions, bid and withdraw
    /// (Error code: -4).
    OnlyAccountAddress,
    /// No auction exists with the given identifier (Error code: -5).
    AuctionNotFound,
    /// Raised if a bid or finalization is attempted on an auction that is
    /// already over (Error code: -6).
    AuctionEnded,
    /// Raised if there is an attempt to finalize or withdraw from the auction
    /// before its end time (Error code: -7).
    AuctionStillActive,
    /// Raised if bid does not exceed the highest bid or does not meet the
    /// starting price (Error code: -8).
    BidTooLow,
    /// Caller holds no funds to claim for this auction (Error code: -9).
    NothingToWithdraw,
    /// Auctioned item description must not be empty (Error code: -10).
    EmptyDescription,
    /// Auction duration must be positive and the end time representable
    /// (Error code: -11).
    InvalidDuration,
    /// Failed to invoke a transfer (Error code: -12).
    InvokeTransferError,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to transfer invocations to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}
