use std::path::Path;

use log::*;
use pcsim_core::{run_command, Clock, NoDelay, RealClock, StandardOutput};

mod config;
use config::*;

fn run(path: &Path, clock: fn() -> Box<dyn Clock>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let mut computer = match setup_pc(&config, clock, Box::new(StandardOutput))? {
        Some(computer) => computer,
        None => return Ok(()),
    };
    println!("{computer}");
    let catalog = software_catalog(&config);
    for command in commands(&config) {
        let result = run_command(&mut computer, &catalog, command);
        debug!("{command:?} -> {result:?}");
    }
    Ok(())
}

fn real_clock() -> Box<dyn Clock> {
    Box::new(RealClock)
}

fn no_delay() -> Box<dyn Clock> {
    Box::new(NoDelay)
}

fn main() {
    env_logger::init();
    let our_arguments: Vec<String> = std::env::args().collect();
    let (path, clock) = match our_arguments.get(1..).unwrap_or(&[]) {
        [path] => (path.as_str(), real_clock as fn() -> Box<dyn Clock>),
        [path, flag] if flag == "--no-delay" => (path.as_str(), no_delay as fn() -> Box<dyn Clock>),
        _ => {
            error!("Wrong number of arguments. Please provide the path to a configuration file.");
            error!("Usage: pcsim path/to/config.json [--no-delay]");
            std::process::exit(2);
        }
    };
    if let Err(e) = run(Path::new(path), clock) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
