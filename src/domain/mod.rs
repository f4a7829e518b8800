pub mod device;
pub mod events;
pub mod host;
pub mod property_value;
pub mod request;
