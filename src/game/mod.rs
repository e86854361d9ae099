pub mod judgment;
pub mod session;
pub mod timing;
