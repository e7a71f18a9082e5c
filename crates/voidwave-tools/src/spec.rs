//! The closed tool-spec enum (spec §9 design note: tagged-variant
//! polymorphism over trait objects for a fixed tool roster). Each
//! variant pairs a tool name with its `build_command`/`parse_output`
//! pair; `Tool::Generic` is the escape hatch for anything else.

use serde_json::{Map, Value};

use crate::{airodump, gobuster, generic, hashcat, hydra, john, masscan, nmap, nuclei, subfinder, whatweb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Nmap,
    Masscan,
    Hashcat,
    John,
    Hydra,
    Gobuster,
    Subfinder,
    Nuclei,
    Airodump,
    WhatWeb,
    Generic,
}

impl Tool {
    /// Resolve a tool binary name to its closed variant, falling back
    /// to [`Tool::Generic`] for anything this crate doesn't model.
    pub fn for_name(name: &str) -> Tool {
        match name {
            "nmap" => Tool::Nmap,
            "masscan" => Tool::Masscan,
            "hashcat" => Tool::Hashcat,
            "john" => Tool::John,
            "hydra" => Tool::Hydra,
            "gobuster" => Tool::Gobuster,
            "subfinder" => Tool::Subfinder,
            "nuclei" => Tool::Nuclei,
            "airodump-ng" => Tool::Airodump,
            "whatweb" => Tool::WhatWeb,
            _ => Tool::Generic,
        }
    }

    pub fn binary_name(&self, requested_name: &str) -> String {
        match self {
            Tool::Nmap => "nmap".to_string(),
            Tool::Masscan => "masscan".to_string(),
            Tool::Hashcat => "hashcat".to_string(),
            Tool::John => "john".to_string(),
            Tool::Hydra => "hydra".to_string(),
            Tool::Gobuster => "gobuster".to_string(),
            Tool::Subfinder => "subfinder".to_string(),
            Tool::Nuclei => "nuclei".to_string(),
            Tool::Airodump => "airodump-ng".to_string(),
            Tool::WhatWeb => "whatweb".to_string(),
            Tool::Generic => requested_name.to_string(),
        }
    }

    pub fn build_command(&self, requested_name: &str, target: &str, options: &Map<String, Value>) -> Vec<String> {
        match self {
            Tool::Nmap => nmap::build_command(target, options),
            Tool::Masscan => masscan::build_command(target, options),
            Tool::Hashcat => hashcat::build_command(target, options),
            Tool::John => john::build_command(target, options),
            Tool::Hydra => hydra::build_command(target, options),
            Tool::Gobuster => gobuster::build_command(target, options),
            Tool::Subfinder => subfinder::build_command(target, options),
            Tool::Nuclei => nuclei::build_command(target, options),
            Tool::Airodump => airodump::build_command(target, options),
            Tool::WhatWeb => whatweb::build_command(target, options),
            Tool::Generic => generic::build_command(requested_name, target, options),
        }
    }

    pub fn parse_output(&self, raw: &str) -> Value {
        match self {
            Tool::Nmap => nmap::parse_output(raw),
            Tool::Masscan => masscan::parse_output(raw),
            Tool::Hashcat => hashcat::parse_output(raw),
            Tool::John => john::parse_output(raw),
            Tool::Hydra => hydra::parse_output(raw),
            Tool::Gobuster => gobuster::parse_output(raw),
            Tool::Subfinder => subfinder::parse_output(raw),
            Tool::Nuclei => nuclei::parse_output(raw),
            Tool::Airodump => airodump::parse_output(raw),
            Tool::WhatWeb => whatweb::parse_output(raw),
            Tool::Generic => generic::parse_output(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_tool_names() {
        assert_eq!(Tool::for_name("nmap"), Tool::Nmap);
        assert_eq!(Tool::for_name("airodump-ng"), Tool::Airodump);
    }

    #[test]
    fn unknown_tool_names_fall_back_to_generic() {
        assert_eq!(Tool::for_name("sqlmap"), Tool::Generic);
    }
}
