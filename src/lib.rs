pub mod client;
pub mod error;
pub mod geo;
pub mod geopoint;
pub mod interpreter;
pub mod ops;
pub mod prompt;
pub mod safety;
pub mod service;
pub mod types;

pub use client::{ChatMessage, LlmClient};
pub use error::MapLlmError;
pub use geo::{CircleRequest, Polygon};
pub use geopoint::GeoPoint;
pub use interpreter::{interpret_model_reply, CodeResult, InterpretError};
pub use ops::{parse_operations, MapOperation, MapScene};
pub use service::MapCommandService;
pub use types::{MapCommandReply, MapCommandRequest, MapState};
