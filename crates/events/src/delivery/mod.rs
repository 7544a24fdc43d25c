//! External delivery channels.
//!
//! Email is the only channel that leaves the platform; realtime pushes go
//! through the API's websocket manager.

pub mod email;
