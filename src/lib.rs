//! Rust client for Amazon Kinesis Data Streams.
//!
//! ```no_run
//! # async fn run() -> Result<(), kinesis::types::KinesisError> {
//! use kinesis::{
//!     Credentials, Kinesis,
//!     types::{KinesisConfig, PutRecordInput},
//! };
//!
//! let config = KinesisConfig::new(Credentials::new("AKID", "SECRET"), "us-east-1")?;
//! let kinesis = Kinesis::new(config)?;
//! let output = kinesis
//!     .put_record(PutRecordInput::new("events", "hello", "user-1"))
//!     .await?;
//! println!("{} on {}", output.sequence_number, output.shard_id);
//! # Ok(())
//! # }
//! ```

mod api;
mod codec;
mod ops;

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod types;

pub use api::{OPERATIONS, Operation};
pub use auth::Credentials;
pub use ops::Kinesis;

pub use bytes;
pub use http;
