//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID, trace span, metrics)
//!     → server.rs (router, body limit, timeout)
//!     → gate.rs (wallet + contract role check per route group)
//!     → handlers.rs / websocket.rs
//!     → error.rs (typed errors → JSON bodies)
//! ```

pub mod gate;
pub mod handlers;
pub mod multipart;
pub mod request;
pub mod server;
pub mod state;
pub mod websocket;

pub use server::{build_router, HttpServer};
pub use state::AppState;
