//! Domain logic for the fake streaming server.
//!
//! - `chat_completion`: wire types shared by the simulator and its clients
//! - `simulator`: fabricated streaming chat-completion responses
//! - `completion`: text generation through the upstream completion API
//! - `fake_data`: random values used to fill simulated content

pub mod chat_completion;
pub mod completion;
pub mod error;
pub mod fake_data;
pub mod simulator;

pub mod gateway;
