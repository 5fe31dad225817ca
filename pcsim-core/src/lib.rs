//! The insides of a pretend computer: RAM and a disk that fill up, and an
//! operating system that moves software between them.

mod command;
pub use command::*;
mod component;
pub use component::*;
mod computer;
pub use computer::*;
mod cpu;
pub use cpu::*;
mod os;
pub use os::*;
mod software;
pub use software::*;
mod store;
pub use store::*;
