//! Response types for system information

mod battery;
mod bluetooth;
mod connectivity;
mod cpu;
mod disk;
mod environment;
mod hardware;
mod identity;
mod load;
mod memory;
mod network;
mod os;
mod ports;
mod process;
mod temperature;
mod uptime;
mod wifi;

pub use battery::*;
pub use bluetooth::*;
pub use connectivity::*;
pub use cpu::*;
pub use disk::*;
pub use environment::*;
pub use hardware::*;
pub use identity::*;
pub use load::*;
pub use memory::*;
pub use network::*;
pub use os::*;
pub use ports::*;
pub use process::*;
pub use temperature::*;
pub use uptime::*;
pub use wifi::*;
