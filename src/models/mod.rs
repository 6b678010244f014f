pub mod booking;
pub mod conversation;
pub mod invocation;

pub use booking::{Booking, Slot};
pub use conversation::{Conversation, Message, Role};
pub use invocation::{ClinicFunction, Invocation, Reply};
