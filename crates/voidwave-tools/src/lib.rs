//! Tool specs, argv builders, output parsers and the spawn+stream+
//! classify runner for every pentest tool the chain model can invoke
//! (spec §6).

pub mod airodump;
pub mod generic;
pub mod gobuster;
pub mod hashcat;
pub mod hydra;
pub mod john;
pub mod masscan;
pub mod nmap;
pub mod nuclei;
pub mod output;
pub mod registry;
pub mod runner;
pub mod spec;
pub mod subfinder;
pub mod whatweb;

pub use registry::ToolRegistry;
pub use runner::{classify_line, LineClass};
pub use spec::Tool;
