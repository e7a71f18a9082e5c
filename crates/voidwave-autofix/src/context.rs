//! Parameters a fix handler needs, gathered by the preflight checker
//! from the failing requirement before dispatch. The original passes
//! these as constructor `**kwargs` to whichever class `AUTO_REGISTRY`
//! returns for a label; a closed struct plays the same role here.

#[derive(Debug, Clone, Default)]
pub struct FixContext {
    pub tool_name: Option<String>,
    pub interface: Option<String>,
    pub input_type: Option<String>,
    pub data_type: Option<String>,
    pub service: Option<String>,
    pub setup_type: Option<String>,
    pub primary_tool: Option<String>,
    pub guide_type: Option<String>,
    pub update_source: Option<String>,
    pub validate_value: Option<String>,
}

impl FixContext {
    pub fn for_tool(tool_name: impl Into<String>) -> Self {
        Self { tool_name: Some(tool_name.into()), ..Default::default() }
    }

    pub fn for_interface(interface: impl Into<String>) -> Self {
        Self { interface: Some(interface.into()), ..Default::default() }
    }
}
