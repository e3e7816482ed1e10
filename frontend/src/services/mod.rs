pub mod api;
pub mod dom;
pub mod errors;
pub mod logging;
pub mod notifications;
pub mod page;
pub mod storage;
