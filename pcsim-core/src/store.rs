//! Capacity-limited storage: the shared machinery behind RAM and the disk.
//!
//! A [`Store`] holds a list of resident [`Software`] and refuses anything
//! that doesn't fit. What "fits" means depends on the [`StoreKind`]: RAM
//! keeps things compressed at a tenth of their size, the disk keeps them
//! whole.

use log::*;
use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    marker::PhantomData,
};

use crate::{
    component::{component_name, Clock},
    software::Software,
};

/// How RAM squishes software. Not configurable, every program compresses
/// equally well in this universe.
const RAM_COMPRESSION_RATIO: f64 = 10.0;
/// Seconds spent looking for a program to close that isn't open.
const RAM_MISS_PENALTY: f64 = 1.0;
/// Seconds spent looking for a program to uninstall that isn't installed.
const DISK_MISS_PENALTY: f64 = 2.0;
/// Seconds spent looking for a program to read that isn't installed.
const DISK_RETRIEVE_MISS_PENALTY: f64 = 3.0;

pub trait StoreKind {
    /// Unit of the transfer speed, for display.
    const SPEED_UNIT: &'static str;
    /// What a failed `remove` costs.
    const MISS_PENALTY: f64;
    /// How much capacity `software` takes up while it's in this store.
    fn footprint(software: &Software) -> f64;
}

pub struct RamKind;
pub struct DiskKind;

impl StoreKind for RamKind {
    const SPEED_UNIT: &'static str = "Mhz";
    const MISS_PENALTY: f64 = RAM_MISS_PENALTY;
    fn footprint(software: &Software) -> f64 {
        software.get_size() as f64 / RAM_COMPRESSION_RATIO
    }
}

impl StoreKind for DiskKind {
    const SPEED_UNIT: &'static str = "MBPS";
    const MISS_PENALTY: f64 = DISK_MISS_PENALTY;
    fn footprint(software: &Software) -> f64 {
        software.get_size() as f64
    }
}

pub type Ram = Store<RamKind>;
pub type Disk = Store<DiskKind>;

pub struct Store<K: StoreKind> {
    name: String,
    /// Transfer speed. MHz for RAM, MB/s for the disk, and we divide sizes
    /// by it either way.
    speed: u32,
    /// Total capacity in MB.
    capacity: u32,
    /// Whatever is in here right now, oldest first.
    resident: Vec<Software>,
    clock: Box<dyn Clock>,
    kind: PhantomData<K>,
}

impl<K: StoreKind> Debug for Store<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{name}: {used}/{capacity}MB [",
            name = self.name,
            used = self.used(),
            capacity = self.capacity,
        )?;
        for (n, software) in self.resident.iter().enumerate() {
            if n != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", software.get_name())?;
        }
        write!(f, "]")
    }
}

impl<K: StoreKind> Display for Store<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} ({}MB) @ {}{}",
            self.name,
            self.capacity,
            self.speed,
            K::SPEED_UNIT
        )
    }
}

impl<K: StoreKind> Store<K> {
    pub fn new(name: &str, speed: u32, capacity: u32, clock: Box<dyn Clock>) -> Store<K> {
        return Store {
            name: component_name(Some(name)),
            speed,
            capacity,
            resident: Vec::new(),
            clock,
            kind: PhantomData,
        };
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }
    pub fn get_speed(&self) -> u32 {
        self.speed
    }
    pub fn get_capacity(&self) -> u32 {
        self.capacity
    }
    pub fn get_resident(&self) -> &[Software] {
        &self.resident
    }
    /// Capacity currently taken, in MB.
    pub fn used(&self) -> f64 {
        // Not .sum(): that starts from -0.0 and an empty store would say so.
        self.resident
            .iter()
            .fold(0.0, |used, x| used + K::footprint(x))
    }
    /// Capacity left, in MB.
    pub fn free(&self) -> f64 {
        self.capacity as f64 - self.used()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
    fn position(&self, name: &str) -> Option<usize> {
        self.resident.iter().position(|x| x.get_name() == name)
    }
    /// Always the raw size over the speed, even for RAM where the software
    /// only takes up a tenth of that.
    fn transfer_time(&self, software: &Software) -> f64 {
        software.get_size() as f64 / self.speed as f64
    }
    fn transfer(&mut self, software: &Software) {
        let seconds = self.transfer_time(software);
        debug!(
            "{}: moving {} ({}MB) takes {seconds}s",
            self.name,
            software.get_name(),
            software.get_size()
        );
        self.clock.wait(seconds);
    }
    fn miss(&mut self, name: &str, penalty: f64) {
        debug!("{}: no {name} in here, that cost us {penalty}s", self.name);
        self.clock.wait(penalty);
    }
    /// Puts `software` in the store, if it fits. It has to fit with room to
    /// spare: exactly filling the store is a no.
    pub fn insert(&mut self, software: &Software) -> bool {
        let footprint = K::footprint(software);
        let free = self.free();
        if footprint < free {
            self.resident.push(software.clone());
            self.transfer(software);
            return true;
        }
        debug!(
            "{}: {} needs {footprint}MB but only {free}MB is free",
            self.name,
            software.get_name()
        );
        return false;
    }
    /// Takes out the first resident piece of software called `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let index = self.position(name);
        self.remove_at(name, index)
    }
    /// Takes out the most recently inserted piece of software called `name`,
    /// leaving any older copies where they are.
    pub fn remove_newest(&mut self, name: &str) -> bool {
        let index = self.resident.iter().rposition(|x| x.get_name() == name);
        self.remove_at(name, index)
    }
    fn remove_at(&mut self, name: &str, index: Option<usize>) -> bool {
        match index {
            Some(index) => {
                let software = self.resident.remove(index);
                self.transfer(&software);
                true
            }
            None => {
                self.miss(name, K::MISS_PENALTY);
                false
            }
        }
    }
}

impl Store<DiskKind> {
    /// Reads a copy of the first installed software called `name`. It stays
    /// installed.
    pub fn retrieve(&mut self, name: &str) -> Option<Software> {
        match self.position(name) {
            Some(index) => {
                let software = self.resident[index].clone();
                self.transfer(&software);
                Some(software)
            }
            None => {
                self.miss(name, DISK_RETRIEVE_MISS_PENALTY);
                None
            }
        }
    }
}
