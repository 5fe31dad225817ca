//! The operating system: the only thing allowed to shuffle software between
//! RAM and the disk once the computer is up and running.

use log::*;
use std::{cell::RefCell, rc::Rc};

use crate::{
    software::Software,
    store::{Disk, Ram},
};

/// Where the operating system reports what it's doing. Users read these, and
/// so do the tests, so the exact wording matters.
pub trait Output {
    fn emit(&mut self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardOutput;

impl Output for StandardOutput {
    fn emit(&mut self, message: &str) {
        println!("{message}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentOutput;

impl Output for SilentOutput {
    fn emit(&mut self, _message: &str) {}
}

/// Keeps every message. Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    messages: Rc<RefCell<Vec<String>>>,
}

impl CapturedOutput {
    pub fn new() -> CapturedOutput {
        Default::default()
    }
    pub fn get_messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
    /// Hands back everything captured so far and starts over.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

impl Output for CapturedOutput {
    fn emit(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// The parts of the computer the operating system works on. Borrowed fresh
/// for each operation.
pub struct Devices<'a> {
    pub ram: &'a mut Ram,
    pub disk: &'a mut Disk,
}

pub struct OperatingSystem {
    /// The OS is software too. It takes up space like anything else.
    software: Software,
    output: Box<dyn Output>,
}

impl OperatingSystem {
    pub fn with_output(
        name: impl Into<String>,
        size_mb: u32,
        output: Box<dyn Output>,
    ) -> OperatingSystem {
        return OperatingSystem {
            software: Software::new(name, size_mb),
            output,
        };
    }
    pub fn get_software(&self) -> &Software {
        &self.software
    }
    pub fn get_name(&self) -> &str {
        self.software.get_name()
    }
    pub fn get_size(&self) -> u32 {
        self.software.get_size()
    }
    pub fn emit(&mut self, message: &str) {
        self.output.emit(message);
    }

    /// Loads the installer into RAM, copies the software to disk, then
    /// unloads the installer. RAM ends up exactly how it started no matter
    /// what happens.
    pub fn install(&mut self, devices: &mut Devices, software: &Software) -> bool {
        let name = software.get_name();
        self.emit(&format!("Loading setup for {name} into RAM"));
        if !devices.ram.insert(software) {
            self.emit(&format!("Not enough RAM to install {name}"));
            return false;
        }
        self.emit(&format!("Installing {name} into disk"));
        let installed = devices.disk.insert(software);
        // The installer has to go either way. It's the newest copy, a
        // running program with the same name stays open.
        if !devices.ram.remove_newest(name) {
            error!("Installer for {name} vanished from RAM mid-install");
        }
        if installed {
            info!("{name} is now installed");
            self.emit(&format!("Successfully installed {name}"));
        } else {
            self.emit(&format!("Not enough space in disk to install {name}"));
        }
        return installed;
    }

    pub fn uninstall(&mut self, devices: &mut Devices, name: &str) -> bool {
        self.emit(&format!("Attempting to uninstall {name}"));
        if devices.disk.remove(name) {
            self.emit(&format!("Successfully uninstalled {name}"));
            return true;
        }
        self.emit(&format!(
            "Failed to uninstall {name}, installation not found"
        ));
        return false;
    }

    /// Reads the software off the disk and into RAM. The disk copy stays put,
    /// so there is nothing to undo if RAM is full.
    pub fn launch(&mut self, devices: &mut Devices, name: &str) -> bool {
        self.emit(&format!("Looking for an installation of {name}"));
        let software = match devices.disk.retrieve(name) {
            Some(software) => software,
            None => {
                self.emit(&format!("Could not find an installation named {name}"));
                return false;
            }
        };
        self.emit(&format!("Loading {name} into RAM"));
        if devices.ram.insert(&software) {
            self.emit(&format!("Application {name} launched!"));
            return true;
        }
        self.emit(&format!("Not enough RAM to launch {name}"));
        return false;
    }

    pub fn close(&mut self, devices: &mut Devices, name: &str) -> bool {
        self.emit(&format!("Attempting to close {name}"));
        if devices.ram.remove(name) {
            self.emit(&format!("{name} has been closed"));
            return true;
        }
        self.emit(&format!("Failed to unload {name}, was not open"));
        return false;
    }
}
