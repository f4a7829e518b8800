mod action_invoker;
mod http_device;

pub use action_invoker::ActionInvoker;
pub use http_device::HttpDevice;
