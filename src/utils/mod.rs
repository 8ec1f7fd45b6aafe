pub mod data_path;
pub mod media_type;
pub mod merge;
pub mod redact;
pub mod suggest;
pub mod text;
