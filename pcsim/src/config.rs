//! The JSON file that describes a computer, the software we can install on
//! it, and what to do with that software.
//!
//! Every field is optional. Anything missing gets a default, except for the
//! `computer` section: no computer, no simulation.

use anyhow::{bail, Context};
use log::*;
use pcsim_core::{Clock, Computer, Cpu, Disk, OperatingSystem, Output, Ram, Software};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

const DEFAULT_CPU_NAME: &str = "UNNAMED CPU";
const DEFAULT_CPU_SPEED_MHZ: u32 = 1600;
const DEFAULT_RAM_NAME: &str = "UNNAMED RAM";
const DEFAULT_RAM_SPEED_MHZ: u32 = 1;
const DEFAULT_RAM_SIZE_MB: u32 = 2048;
const DEFAULT_DISK_NAME: &str = "UNNAMED DISK";
const DEFAULT_DISK_SPEED_MBPS: u32 = 100;
const DEFAULT_DISK_SIZE_MB: u32 = 60000;
const DEFAULT_OS_NAME: &str = "UNNAMED OS";
const DEFAULT_OS_SIZE_MB: u32 = 10000;
const DEFAULT_SOFTWARE_NAME: &str = "UNNAMED SOFTWARE";
const DEFAULT_SOFTWARE_SIZE_MB: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub computer: Option<ComputerConfig>,
    pub software: Option<Vec<SoftwareConfig>>,
    pub commands: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComputerConfig {
    pub cpu: Option<CpuConfig>,
    pub ram: Option<RamConfig>,
    pub disk: Option<DiskConfig>,
    pub os: Option<OsConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CpuConfig {
    pub name: Option<String>,
    pub speed_mhz: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RamConfig {
    pub name: Option<String>,
    pub speed_mhz: Option<u32>,
    pub size_mb: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiskConfig {
    pub name: Option<String>,
    pub speed_mbps: Option<u32>,
    pub size_mb: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsConfig {
    pub name: Option<String>,
    pub size_mb: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SoftwareConfig {
    pub name: Option<String>,
    pub size_mb: Option<u32>,
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    info!("Attempting to open path: '{}'", path.display());
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a valid configuration file", path.display()))?;
    Ok(config)
}

fn nonzero_speed(speed: u32, what: &str) -> anyhow::Result<u32> {
    if speed == 0 {
        bail!("{what} speed can't be zero, nothing would ever finish loading");
    }
    Ok(speed)
}

/// Builds the computer described by `config`, plugging `clock()` into each
/// store and giving the OS `output`. Also installs the OS, if there is one.
///
/// `Ok(None)` means the config has no `computer` section at all.
pub fn setup_pc(
    config: &Config,
    clock: impl Fn() -> Box<dyn Clock>,
    output: Box<dyn Output>,
) -> anyhow::Result<Option<Computer>> {
    let computer_config = match &config.computer {
        Some(computer_config) => computer_config,
        None => {
            info!("No computer in this configuration, nothing to do");
            return Ok(None);
        }
    };
    let mut computer = Computer::new();
    if let Some(cpu) = &computer_config.cpu {
        computer.set_cpu(Cpu::new(
            cpu.name.as_deref().unwrap_or(DEFAULT_CPU_NAME),
            cpu.speed_mhz.unwrap_or(DEFAULT_CPU_SPEED_MHZ),
        ));
    }
    if let Some(ram) = &computer_config.ram {
        computer.set_ram(Ram::new(
            ram.name.as_deref().unwrap_or(DEFAULT_RAM_NAME),
            nonzero_speed(ram.speed_mhz.unwrap_or(DEFAULT_RAM_SPEED_MHZ), "RAM")?,
            ram.size_mb.unwrap_or(DEFAULT_RAM_SIZE_MB),
            clock(),
        ));
    }
    if let Some(disk) = &computer_config.disk {
        computer.set_disk(Disk::new(
            disk.name.as_deref().unwrap_or(DEFAULT_DISK_NAME),
            nonzero_speed(disk.speed_mbps.unwrap_or(DEFAULT_DISK_SPEED_MBPS), "Disk")?,
            disk.size_mb.unwrap_or(DEFAULT_DISK_SIZE_MB),
            clock(),
        ));
    }
    if let Some(os) = &computer_config.os {
        let os = OperatingSystem::with_output(
            os.name.as_deref().unwrap_or(DEFAULT_OS_NAME),
            os.size_mb.unwrap_or(DEFAULT_OS_SIZE_MB),
            output,
        );
        if !computer.install_os(os) {
            warn!("The operating system didn't install, commands will be ignored");
        }
    }
    Ok(Some(computer))
}

/// Everything the `install` command can pick from.
pub fn software_catalog(config: &Config) -> Vec<Software> {
    config
        .software
        .iter()
        .flatten()
        .map(|x| {
            Software::new(
                x.name.as_deref().unwrap_or(DEFAULT_SOFTWARE_NAME),
                x.size_mb.unwrap_or(DEFAULT_SOFTWARE_SIZE_MB),
            )
        })
        .collect()
}

pub fn commands(config: &Config) -> &[String] {
    config.commands.as_deref().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcsim_core::{CapturedOutput, NoDelay, SilentOutput};
    use std::io::Write;

    fn no_delay() -> Box<dyn Clock> {
        Box::new(NoDelay)
    }

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn no_computer_no_pc() {
        let config = parse(r#"{"software": [], "commands": ["install x"]}"#);
        assert!(setup_pc(&config, no_delay, Box::new(SilentOutput))
            .unwrap()
            .is_none());
    }

    #[test]
    fn defaults_fill_in_the_blanks() {
        let config = parse(r#"{"computer": {"cpu": {}, "ram": {}, "disk": {}, "os": {}}}"#);
        let output = CapturedOutput::new();
        let computer = setup_pc(&config, no_delay, Box::new(output.clone()))
            .unwrap()
            .unwrap();
        let cpu = computer.get_cpu().unwrap();
        assert_eq!(cpu.get_name(), "UNNAMED CPU");
        assert_eq!(cpu.get_speed(), 1600);
        let ram = computer.get_ram().unwrap();
        assert_eq!(ram.get_name(), "UNNAMED RAM");
        assert_eq!((ram.get_speed(), ram.get_capacity()), (1, 2048));
        let disk = computer.get_disk().unwrap();
        assert_eq!(disk.get_name(), "UNNAMED DISK");
        assert_eq!((disk.get_speed(), disk.get_capacity()), (100, 60000));
        let os = computer.get_os().unwrap();
        assert_eq!((os.get_name(), os.get_size()), ("UNNAMED OS", 10000));
        assert_eq!(
            output.get_messages().last().map(String::as_str),
            Some("Successfully installed UNNAMED OS")
        );
    }

    #[test]
    fn missing_parts_stay_missing() {
        let config = parse(r#"{"computer": {"ram": {"size_mb": 4096}}}"#);
        let computer = setup_pc(&config, no_delay, Box::new(SilentOutput))
            .unwrap()
            .unwrap();
        assert!(computer.get_cpu().is_none());
        assert!(computer.get_disk().is_none());
        assert!(computer.get_os().is_none());
        assert_eq!(computer.get_ram().unwrap().get_capacity(), 4096);
    }

    #[test]
    fn zero_speed_is_an_error() {
        let config = parse(r#"{"computer": {"disk": {"speed_mbps": 0}}}"#);
        assert!(setup_pc(&config, no_delay, Box::new(SilentOutput)).is_err());
    }

    #[test]
    fn catalog_and_commands() {
        let config = parse(
            r#"{
                "software": [{"name": "editor", "size_mb": 250}, {}],
                "commands": ["install editor", "launch editor"]
            }"#,
        );
        assert_eq!(
            software_catalog(&config),
            vec![
                Software::new("editor", 250),
                Software::new("UNNAMED SOFTWARE", 100),
            ]
        );
        assert_eq!(commands(&config), ["install editor", "launch editor"]);
        let empty = parse("{}");
        assert!(software_catalog(&empty).is_empty());
        assert!(commands(&empty).is_empty());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"computer": {{"cpu": {{"name": "Z80", "speed_mhz": 4}}}}}}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        let cpu = config.computer.unwrap().cpu.unwrap();
        assert_eq!(cpu.name.as_deref(), Some("Z80"));
        assert_eq!(cpu.speed_mhz, Some(4));
    }

    #[test]
    fn load_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not json").unwrap();
        assert!(load_config(file.path()).is_err());
        assert!(load_config(Path::new("/definitely/not/here.json")).is_err());
    }
}
