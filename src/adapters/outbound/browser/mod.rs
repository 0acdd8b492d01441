mod chromium;
mod fixture;

use crate::adapters::outbound::browser::chromium::Chromium;
use crate::adapters::outbound::browser::fixture::Fixture;
use crate::config::Config;
use crate::ports::outbound::browser::Browser;

#[must_use]
pub fn init_chromium(config: &Config) -> impl Browser {
    Chromium::new(&config.chrome_path, config.chrome_port, config.http_timeout)
}

#[must_use]
pub fn init_fixture(config: &Config) -> impl Browser {
    Fixture::new(&config.fixture_dir)
}
