pub mod query;
pub mod requests;
pub mod responses;
pub mod storage;
