pub mod env_file;
pub mod probe;
pub mod provider;
