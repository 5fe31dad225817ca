use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::component::component_name;

/// The CPU. It doesn't compute anything, it's just here to look good in the
/// configuration summary.
#[derive(Debug, Clone)]
pub struct Cpu {
    name: String,
    /// Clock speed in MHz.
    speed: u32,
}

impl Cpu {
    pub fn new(name: &str, speed_mhz: u32) -> Cpu {
        return Cpu {
            name: component_name(Some(name)),
            speed: speed_mhz,
        };
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }
    pub fn get_speed(&self) -> u32 {
        self.speed
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} @ {}Mhz", self.name, self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_name_and_speed() {
        let cpu = Cpu::new("Ryzen", 3600);
        assert_eq!(cpu.get_speed(), 3600);
        assert_eq!(cpu.to_string(), "Ryzen @ 3600Mhz");
    }
}
