/*! Processing

Offline tooling that works on already produced batch artifacts.
!*/
pub mod status;

pub use status::Status;
