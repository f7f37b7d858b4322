//! BytePlus ARK (ModelArk) generation client.
//!
//! Wraps the ARK REST endpoints this booth uses: synchronous image
//! generation (`/images/generations`) and asynchronous video task
//! submission (`/contents/generations/tasks`). Outgoing image
//! references are normalized in [`normalize`]; the heterogeneous
//! upstream response shapes are decoded in [`extract`].

pub mod client;
pub mod extract;
pub mod normalize;

pub use client::{ArkClient, ArkError, VideoTaskRequest};
