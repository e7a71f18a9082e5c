//! Process-wide event bus with a closed event-name vocabulary and a
//! bounded ring-buffer history (spec §4.8, §6).

mod bus;
mod event;

pub use bus::{HandlerId, VoidwaveEventBus, DEFAULT_CAPACITY};
pub use event::{Event, EventName};
