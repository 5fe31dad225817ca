use log::*;

use crate::{computer::Computer, software::Software};

/// One line of the command script, e.g. `install editor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install(String),
    Uninstall(String),
    Launch(String),
    Close(String),
}

impl Command {
    /// `None` for anything we don't understand. Anything after the target
    /// name is ignored.
    pub fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let target = words.next()?.to_string();
        match verb {
            "install" => Some(Command::Install(target)),
            "uninstall" => Some(Command::Uninstall(target)),
            "launch" => Some(Command::Launch(target)),
            "close" => Some(Command::Close(target)),
            _ => None,
        }
    }
}

/// Runs one line of the command script. Unknown commands, software that
/// isn't in the catalog, and computers without an OS all do nothing at all.
/// Otherwise returns whether the operating system succeeded.
pub fn run_command(computer: &mut Computer, catalog: &[Software], line: &str) -> Option<bool> {
    let command = match Command::parse(line) {
        Some(command) => command,
        None => {
            debug!("Ignoring command {line:?}");
            return None;
        }
    };
    if computer.get_os().is_none() {
        debug!("No operating system to run {command:?}");
        return None;
    }
    match command {
        Command::Install(name) => match catalog.iter().find(|x| x.get_name() == name) {
            Some(software) => computer.install(software),
            None => {
                debug!("Nothing called {name} in the catalog");
                None
            }
        },
        Command::Uninstall(name) => computer.uninstall(&name),
        Command::Launch(name) => computer.launch(&name),
        Command::Close(name) => computer.close(&name),
    }
}
