pub mod ai;
pub mod conversation;
pub mod scheduling;
