//! Room-state synchronization server for the Chalkboard whiteboard.
//!
//! Clients connect over WebSocket, identify themselves with `CONNECT`, and
//! from then on every shape or presence change they send is applied to the
//! in-memory room registry and relayed to the other members of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
