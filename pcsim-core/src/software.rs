/// A piece of software, as far as the stores care: a name and how many
/// megabytes it takes up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Software {
    name: String,
    size: u32,
}

impl Software {
    pub fn new(name: impl Into<String>, size: u32) -> Software {
        Software {
            name: name.into(),
            size,
        }
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }
    /// Size in MB.
    pub fn get_size(&self) -> u32 {
        self.size
    }
}
