//! BukidMate: a terminal chat client for regional crop price forecasts.
//!
//! Type `Region, Crop` and the forecasting backend answers as a bot turn.

pub mod classifier;
pub mod client;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod directory;
pub mod error;
pub mod events;
pub mod handler;
pub mod logging;
pub mod session;
pub mod ui;

pub use classifier::{classify, Classification, ConfirmToken, Query};
pub use client::{BackendClient, BackendPayload, HealthStatus};
pub use config::Config;
pub use conversation::{Conversation, Entry, FollowUp, Message, RequestSeq};
pub use error::ClientError;
pub use events::{AppEvent, Sender};
pub use handler::{Dispatch, InputHandler};
pub use session::SessionMemory;
