mod acknowledgement;
mod aggregator;
mod battery_check;
mod classifier;
mod composer;
mod config;
mod cooldown_store;
mod device_state;
mod dispatcher;
mod error;
mod local_time;
mod recipient;
#[cfg(feature = "scheduler")]
mod schedule;
mod state_condition;
mod threshold;

pub use acknowledgement::*;
pub use aggregator::*;
pub use battery_check::*;
pub use classifier::*;
pub use composer::*;
pub use config::*;
pub use cooldown_store::*;
pub use device_state::*;
pub use dispatcher::*;
pub use error::*;
pub use local_time::*;
pub use recipient::*;
#[cfg(feature = "scheduler")]
pub use schedule::*;
pub use state_condition::*;
pub use threshold::*;
