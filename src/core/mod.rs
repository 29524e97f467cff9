pub mod dispatch;
pub mod log;
pub mod session;
