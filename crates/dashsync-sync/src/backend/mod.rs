//! Deployment backends
//!
//! - [`HttpBackend`] pushes each asset to the running device.
//! - [`UsbSerialBackend`] rebuilds the firmware with the assets embedded and
//!   flashes it over a serial port.

pub mod http;
pub mod usb;

pub use http::HttpBackend;
pub use usb::{FlashPlan, FlashTool, UsbSerialBackend};
