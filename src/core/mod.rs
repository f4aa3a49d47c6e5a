pub mod inference;
pub mod session;
pub mod speech;
