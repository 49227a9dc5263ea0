//! # Implementation of an auction registry smart contract
//!
//! The contract keeps any number of auctions at the same time. Auctions are
//! identified by sequential ids, handed out at creation and never reused.
//! Anyone can open an auction by providing an item description, a starting
//! price and a duration; the auction closes for bids once the duration has
//! passed.
//!
//! To bid, participants send CCD using the bid function. The amount sent
//! with the call is the bid. Only bids that meet the starting price and
//! exceed the currently highest bid are accepted. A bidder who is outbid
//! keeps their full amount as a claimable refund, tracked per auction.
//!
//! After the auction end, any account can finalize the auction. An auction
//! can be finalized only once; the highest bid and bidder at that point
//! become the binding result. Finalization moves no money: the seller and
//! every outbid participant each withdraw what they are owed themselves.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{errors::*, events::*, structs::*};
use concordium_std::*;

mod contract;
mod errors;
mod events;
mod impls;
mod structs;
