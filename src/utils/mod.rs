pub mod environment;
pub mod files;
pub mod query;

pub use environment::{CONFIG_ENV_VAR, get_config_path};
pub use files::{read_to_string_limited, validate_file_size};
pub use query::{decode_filter_param, encode_filter_param};
