use log::*;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    cpu::Cpu,
    os::{Devices, OperatingSystem},
    software::Software,
    store::{Disk, Ram},
};

/// A computer. Parts get plugged in once when it's assembled, then an
/// operating system gets installed on it, then the operating system runs the
/// show.
#[derive(Default)]
pub struct Computer {
    cpu: Option<Cpu>,
    ram: Option<Ram>,
    disk: Option<Disk>,
    os: Option<OperatingSystem>,
}

fn or_none<T: Display>(part: Option<&T>) -> String {
    match part {
        Some(part) => part.to_string(),
        None => "none".to_string(),
    }
}

impl Display for Computer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "PC Configuration:")?;
        writeln!(f, "\tCPU: {}", or_none(self.cpu.as_ref()))?;
        writeln!(f, "\tRAM: {}", or_none(self.ram.as_ref()))?;
        writeln!(f, "\tDisk: {}", or_none(self.disk.as_ref()))?;
        write!(
            f,
            "\tOS: {}",
            self.os.as_ref().map(|x| x.get_name()).unwrap_or("none")
        )
    }
}

impl Computer {
    pub fn new() -> Computer {
        Default::default()
    }
    pub fn set_cpu(&mut self, cpu: Cpu) {
        self.cpu = Some(cpu);
    }
    pub fn set_ram(&mut self, ram: Ram) {
        self.ram = Some(ram);
    }
    pub fn set_disk(&mut self, disk: Disk) {
        self.disk = Some(disk);
    }
    pub fn get_cpu(&self) -> Option<&Cpu> {
        self.cpu.as_ref()
    }
    pub fn get_ram(&self) -> Option<&Ram> {
        self.ram.as_ref()
    }
    pub fn get_disk(&self) -> Option<&Disk> {
        self.disk.as_ref()
    }
    pub fn get_os(&self) -> Option<&OperatingSystem> {
        self.os.as_ref()
    }

    /// Bootstraps `os` onto this computer. Same dance as installing any other
    /// software, except there's no operating system to do it for us yet, and
    /// the OS stays loaded in RAM afterwards (it's running now!).
    ///
    /// Only works once. A computer with no RAM or no disk can't take an OS.
    pub fn install_os(&mut self, mut os: OperatingSystem) -> bool {
        if let Some(current) = &self.os {
            warn!(
                "Refusing to install {} over {}, which is already installed",
                os.get_name(),
                current.get_name()
            );
            return false;
        }
        let name = os.get_name().to_string();
        os.emit(&format!("Loading setup for {name} into RAM"));
        let loaded = match self.ram.as_mut() {
            Some(ram) => ram.insert(os.get_software()),
            None => {
                warn!("There's no RAM to load {name} into");
                false
            }
        };
        if !loaded {
            os.emit("Not enough RAM to load the OS installer, aborting");
            return false;
        }
        os.emit(&format!("Installing {name} into disk"));
        let installed = match self.disk.as_mut() {
            Some(disk) => disk.insert(os.get_software()),
            None => {
                warn!("There's no disk to install {name} onto");
                false
            }
        };
        if !installed {
            // The installer stays in RAM. Nobody is around to unload it.
            os.emit("Not enough disk space, aborting");
            return false;
        }
        os.emit(&format!("Successfully installed {name}"));
        info!("{name} is now managing this computer");
        self.os = Some(os);
        return true;
    }

    /// Splits the computer into its operating system and the devices the
    /// operating system gets to mess with. `None` until an OS is installed.
    pub fn os_and_devices(&mut self) -> Option<(&mut OperatingSystem, Devices<'_>)> {
        match (self.os.as_mut(), self.ram.as_mut(), self.disk.as_mut()) {
            (Some(os), Some(ram), Some(disk)) => Some((os, Devices { ram, disk })),
            _ => None,
        }
    }

    pub fn install(&mut self, software: &Software) -> Option<bool> {
        let (os, mut devices) = self.os_and_devices()?;
        Some(os.install(&mut devices, software))
    }
    pub fn uninstall(&mut self, name: &str) -> Option<bool> {
        let (os, mut devices) = self.os_and_devices()?;
        Some(os.uninstall(&mut devices, name))
    }
    pub fn launch(&mut self, name: &str) -> Option<bool> {
        let (os, mut devices) = self.os_and_devices()?;
        Some(os.launch(&mut devices, name))
    }
    pub fn close(&mut self, name: &str) -> Option<bool> {
        let (os, mut devices) = self.os_and_devices()?;
        Some(os.close(&mut devices, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{component::NoDelay, os::CapturedOutput};

    fn assemble(ram_size: u32, disk_size: u32) -> Computer {
        let mut computer = Computer::new();
        computer.set_cpu(Cpu::new("cpu", 1600));
        computer.set_ram(Ram::new("ram", 1, ram_size, Box::new(NoDelay)));
        computer.set_disk(Disk::new("disk", 100, disk_size, Box::new(NoDelay)));
        computer
    }

    fn test_os(output: &CapturedOutput) -> OperatingSystem {
        OperatingSystem::with_output("TestOS", 1000, Box::new(output.clone()))
    }

    #[test]
    fn os_install_keeps_os_in_ram() {
        let output = CapturedOutput::new();
        let mut computer = assemble(2048, 60000);
        assert!(computer.install_os(test_os(&output)));
        assert_eq!(computer.get_os().map(|x| x.get_name()), Some("TestOS"));
        assert!(computer.get_ram().unwrap().contains("TestOS"));
        assert!(computer.get_disk().unwrap().contains("TestOS"));
        assert_eq!(
            output.take(),
            vec![
                "Loading setup for TestOS into RAM",
                "Installing TestOS into disk",
                "Successfully installed TestOS",
            ]
        );
    }

    #[test]
    fn os_install_only_once() {
        let mut computer = assemble(2048, 60000);
        assert!(computer.install_os(test_os(&CapturedOutput::new())));
        let output = CapturedOutput::new();
        let second = OperatingSystem::with_output("Other", 10, Box::new(output.clone()));
        assert!(!computer.install_os(second));
        assert_eq!(computer.get_os().map(|x| x.get_name()), Some("TestOS"));
        assert!(!computer.get_disk().unwrap().contains("Other"));
        assert!(output.get_messages().is_empty());
    }

    #[test]
    fn os_install_failures() {
        let output = CapturedOutput::new();
        let mut computer = assemble(100, 60000);
        assert!(!computer.install_os(test_os(&output)));
        assert!(computer.get_os().is_none());
        assert_eq!(
            output.take(),
            vec![
                "Loading setup for TestOS into RAM",
                "Not enough RAM to load the OS installer, aborting",
            ]
        );

        let mut computer = assemble(2048, 500);
        assert!(!computer.install_os(test_os(&output)));
        assert!(computer.get_os().is_none());
        assert!(computer.get_ram().unwrap().contains("TestOS"));
        assert_eq!(
            output.take(),
            vec![
                "Loading setup for TestOS into RAM",
                "Installing TestOS into disk",
                "Not enough disk space, aborting",
            ]
        );
    }

    #[test]
    fn os_install_needs_parts() {
        let output = CapturedOutput::new();
        let mut computer = Computer::new();
        assert!(!computer.install_os(test_os(&output)));
        assert_eq!(
            output.take(),
            vec![
                "Loading setup for TestOS into RAM",
                "Not enough RAM to load the OS installer, aborting",
            ]
        );
    }

    #[test]
    fn unmanaged_computer_does_nothing() {
        let mut computer = assemble(2048, 60000);
        assert_eq!(computer.install(&Software::new("editor", 100)), None);
        assert_eq!(computer.launch("editor"), None);
        assert!(computer.get_disk().unwrap().get_resident().is_empty());
    }

    #[test]
    fn managed_computer_runs_software() {
        let mut computer = assemble(2048, 60000);
        computer.install_os(test_os(&CapturedOutput::new()));
        assert_eq!(computer.install(&Software::new("editor", 100)), Some(true));
        assert_eq!(computer.launch("editor"), Some(true));
        assert_eq!(computer.close("editor"), Some(true));
        assert_eq!(computer.uninstall("editor"), Some(true));
        assert_eq!(computer.uninstall("editor"), Some(false));
        let ram = computer.get_ram().unwrap();
        assert!(ram.used() <= ram.get_capacity() as f64);
        assert_eq!(ram.get_resident(), &[Software::new("TestOS", 1000)]);
    }

    #[test]
    fn summary() {
        let mut computer = assemble(2048, 60000);
        computer.install_os(test_os(&CapturedOutput::new()));
        assert_eq!(
            computer.to_string(),
            "PC Configuration:\n\
            \tCPU: cpu @ 1600Mhz\n\
            \tRAM: ram (2048MB) @ 1Mhz\n\
            \tDisk: disk (60000MB) @ 100MBPS\n\
            \tOS: TestOS"
        );
        assert_eq!(
            Computer::new().to_string(),
            "PC Configuration:\n\tCPU: none\n\tRAM: none\n\tDisk: none\n\tOS: none"
        );
    }
}
