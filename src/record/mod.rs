//! Player records and their lifecycle.

pub mod codec;
mod service;
mod types;


pub use codec::UserRecord;
pub use service::RecordService;
pub use types::{CreateOutcome, Created, Listing};
