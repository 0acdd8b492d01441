mod file_system;
#[cfg(test)]
pub mod memory;

use crate::adapters::outbound::storage::file_system::FileSystem;
use crate::config::Config;
use crate::ports::outbound::storage::Storage;

#[must_use]
pub fn init_storage(config: &Config) -> impl Storage {
    FileSystem::new(&config.data_dir)
}
