//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the provider, the persistent store, the clock
//!   and the figure encoder
//! - **Services**: The two-tier series cache
//! - **Use Cases**: Input collection, data acquisition and rendering

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
