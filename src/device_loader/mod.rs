mod loader;
mod serialized_device;

pub use loader::load_devices_from;
