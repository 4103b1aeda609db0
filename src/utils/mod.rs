pub mod environment;

pub use environment::{STORE_ENV_VAR, get_store_dir, repo_name_from_path};
