//! Background processing for the Snapbooth backend.
//!
//! Owns everything that runs off the request path: the job
//! orchestrator ([`orchestrator::Orchestrator`]), the bounded
//! notification registry ([`notifications::NotificationCenter`]), the
//! external video-task ticker ([`ticker`]), and the periodic booth
//! settings sync ([`settings_sync`]).
//!
//! All shared state is created in `main` and passed down as explicit
//! cheaply-cloneable handles; teardown goes through cancellation
//! tokens. Nothing here persists — every job and notification is lost
//! on restart by design.

pub mod notifications;
pub mod orchestrator;
pub mod settings_sync;
pub mod ticker;

pub use notifications::NotificationCenter;
pub use orchestrator::Orchestrator;
pub use settings_sync::SettingsHandle;
