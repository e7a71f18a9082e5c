use voidwave_requirements::Requirement;

/// Outcome of checking every requirement for one action.
#[derive(Clone)]
pub struct PreflightResult {
    pub action: String,
    pub requirements: Vec<Requirement>,
    pub all_met: bool,
    pub missing: Vec<Requirement>,
    pub fixable: Vec<Requirement>,
    pub manual: Vec<Requirement>,
}

impl PreflightResult {
    pub fn new(action: impl Into<String>, requirements: Vec<Requirement>) -> Self {
        Self {
            action: action.into(),
            requirements,
            all_met: true,
            missing: Vec::new(),
            fixable: Vec::new(),
            manual: Vec::new(),
        }
    }

    /// True if nothing blocks the action (no missing/manual requirements
    /// remain, even if all_met hasn't been recomputed yet).
    pub fn can_proceed(&self) -> bool {
        self.all_met || (self.missing.is_empty() && self.manual.is_empty())
    }

    pub fn needs_user_action(&self) -> bool {
        !self.manual.is_empty()
    }

    pub fn can_auto_fix(&self) -> bool {
        !self.fixable.is_empty() && self.manual.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.all_met {
            return format!("All requirements met for {}", self.action);
        }
        let mut parts = Vec::new();
        if !self.fixable.is_empty() {
            parts.push(format!("{} fixable", self.fixable.len()));
        }
        if !self.manual.is_empty() {
            parts.push(format!("{} manual", self.manual.len()));
        }
        if !self.missing.is_empty() {
            parts.push(format!("{} missing", self.missing.len()));
        }
        format!("{}: {}", self.action, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_can_proceed() {
        let result = PreflightResult::new("scan_quick", Vec::new());
        assert!(result.can_proceed());
        assert!(!result.needs_user_action());
    }

    #[test]
    fn manual_requirement_blocks_proceeding() {
        let mut result = PreflightResult::new("scan_quick", Vec::new());
        result.all_met = false;
        result.manual.push(voidwave_requirements::tool_requirement("nmap", "", Vec::new()));
        assert!(!result.can_proceed());
        assert!(result.needs_user_action());
    }
}
