//! Domain services (business logic)

pub mod access;
pub mod tender_service;
pub mod bid_service;

pub use tender_service::{CreateTenderRequest, TenderService, UpdateTenderRequest};
pub use bid_service::{BidService, CreateBidRequest, EditBidRequest};
