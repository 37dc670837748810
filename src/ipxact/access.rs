use std::{fmt::Display, str::FromStr};

use crate::error::ConvError;

/// Generic access
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Access {
    /// Read/Write
    RW,
    /// Read-Only
    RO,
    /// Write-Only
    WO,
}

impl FromStr for Access {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "read-only"  => Ok(Access::RO),
            "read-write" => Ok(Access::RW),
            "write-only" => Ok(Access::WO),
            _ => Err(ConvError::unsupported_access(s)),
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Access::RW => write!(f, "read-write"),
            Access::RO => write!(f, "read-only"),
            Access::WO => write!(f, "write-only"),
        }
    }
}

/// Modified write value triggering the write-one-to-clear property
pub const ONE_TO_CLEAR: &str = "oneToClear";

fn default_prefix(is_reg_default: bool) -> &'static str {
    if is_reg_default {"default "} else {""}
}

/// Software access property
pub fn map_sw_access(access: &str, modified_write_value: Option<&str>, is_reg_default: bool) -> Result<String, ConvError> {
    let pre = default_prefix(is_reg_default);
    let rdl = match access.parse::<Access>()? {
        Access::RO => "sw = r",
        Access::RW if modified_write_value.map(str::trim) == Some(ONE_TO_CLEAR) => "sw = rw; woclr",
        Access::RW => "sw = rw",
        Access::WO => "sw = w",
    };
    Ok(format!("{pre}{rdl}"))
}

/// Hardware access property: dual of the software access
pub fn map_hw_access(access: &str, is_reg_default: bool) -> Result<String, ConvError> {
    let pre = default_prefix(is_reg_default);
    let rdl = match access.parse::<Access>()? {
        Access::RO => "hw = w",
        Access::RW |
        Access::WO => "hw = r",
    };
    Ok(format!("{pre}{rdl}"))
}
