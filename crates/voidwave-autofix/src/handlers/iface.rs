//! AUTO-IFACE: select a network interface, auto-picking when exactly
//! one candidate of the required type exists.

use std::sync::Mutex;

use voidwave_core::SessionAccessor;

use crate::handler::{AutoFixHandler, FixOutcome};

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub name: String,
    pub is_wireless: bool,
}

pub fn list_interfaces(required_type: &str) -> Vec<InterfaceInfo> {
    let mut interfaces = Vec::new();
    let Ok(entries) = std::fs::read_dir("/sys/class/net") else {
        return interfaces;
    };
    for entry in entries.flatten() {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else { continue };
        let is_wireless = entry.path().join("wireless").exists();
        if required_type == "wireless" && !is_wireless {
            continue;
        }
        if required_type == "wired" && is_wireless {
            continue;
        }
        interfaces.push(InterfaceInfo { name, is_wireless });
    }
    interfaces
}

#[derive(Default)]
pub struct IfaceHandler {
    pub required_type: String,
    selected: Mutex<Option<String>>,
}

impl IfaceHandler {
    pub fn new(required_type: impl Into<String>) -> Self {
        Self { required_type: required_type.into(), selected: Mutex::new(None) }
    }

    /// The interface chosen by the last successful `fix()` call.
    pub fn selected_interface(&self) -> Option<String> {
        self.selected.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AutoFixHandler for IfaceHandler {
    async fn can_fix(&self, _session: &dyn SessionAccessor) -> bool {
        !list_interfaces(&self.required_type).is_empty()
    }

    async fn fix(&self, _session: &dyn SessionAccessor) -> FixOutcome {
        let interfaces = list_interfaces(&self.required_type);
        match interfaces.first() {
            Some(iface) => {
                *self.selected.lock().unwrap() = Some(iface.name.clone());
                FixOutcome::Fixed
            }
            None => FixOutcome::Failed { reason: format!("no {} interfaces found", self.required_type) },
        }
    }

    fn ui_prompt(&self) -> String {
        let interfaces = list_interfaces(&self.required_type);
        match interfaces.as_slice() {
            [] => format!("no {} interfaces found.", self.required_type),
            [single] => format!("use {} for this operation?", single.name),
            many => format!("select interface: {}", many.iter().map(|i| i.name.as_str()).collect::<Vec<_>>().join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_interfaces_filters_by_required_type() {
        let wireless = list_interfaces("wireless");
        assert!(wireless.iter().all(|i| i.is_wireless));
        let wired = list_interfaces("wired");
        assert!(wired.iter().all(|i| !i.is_wireless));
    }
}
