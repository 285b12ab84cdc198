pub mod browser;
pub mod payload;
pub mod session;
pub mod source;
pub mod types;

pub use payload::extract_json;
pub use session::DeviceSession;
pub use source::{DeviceSource, HttpSource};
pub use types::{ChannelValue, DeviceApiStatus, ParsedReading, Reading};
