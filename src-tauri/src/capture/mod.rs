//! Screen capture, infrastructure side.
//!
//! Region math and cropping live in the core crate; this module only
//! talks to the OS.

mod screenshot;

pub use screenshot::XcapCapture;
