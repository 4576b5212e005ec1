pub mod cache;
pub mod log;
pub mod remote;
pub mod storage;
