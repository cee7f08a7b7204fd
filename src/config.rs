// src/config.rs
// Startup configuration. Every option can come from a flag or from the environment.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "pendulum-lab")]
#[command(version, about = "Web front end for the pendulum simulation service")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "PENDULUM_LAB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PENDULUM_LAB_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the simulation service; requests go to <url>/sim/pendulum
    #[arg(long, env = "SIM_SERVICE_URL", default_value = "http://127.0.0.1:8000")]
    pub sim_service_url: String,

    /// Directory served under /static
    #[arg(long, env = "PENDULUM_LAB_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Number of HTTP worker threads (defaults to the number of CPUs)
    #[arg(long, env = "PENDULUM_LAB_WORKERS")]
    pub workers: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Config::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "pendulum-lab",
            "--port",
            "8080",
            "--sim-service-url",
            "http://physics.internal:9000/",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.sim_service_url, "http://physics.internal:9000/");
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }
}
