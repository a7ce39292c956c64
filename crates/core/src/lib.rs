pub mod error;
pub mod event;
pub mod history;
pub mod sample;
pub mod state;

pub use error::{Result, VigilError};
pub use event::Message;
pub use history::History;
pub use sample::{Metric, Reading, Sample};
