mod coercion;
mod poller;

pub use poller::{PollHandle, PropertyPoller};
