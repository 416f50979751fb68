pub mod error;
pub mod fs;
pub mod naming;

pub use error::{CompressorError, CompressorResult};
pub use fs::{file_name, file_size, format_size_mb};
pub use naming::download_file_name;
