pub mod fs;
pub mod http;
pub mod lenient;
pub mod progress;
pub mod text;
