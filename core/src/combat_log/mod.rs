mod error;
mod log_line;
mod parser;
mod reader;

pub use error::{ReadStage, ReaderError};
pub use log_line::{LogLine, ParsedLine};
pub use parser::{CleanedLine, LogParser, wall_clock_time};
pub use reader::Reader;
