use std::path::Path;

/// Output artifact kind
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum RdlFlavor {#[default]
    /// Plain RDL: addresses written `@0x10`
    Rdl,
    /// Piped RDL (pre-processed by perl): addresses written `\@0x10`
    Rdlp,
}

impl RdlFlavor {
    /// Select the flavor from the output file extension (`.rdlp` for piped RDL)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension() {
            Some(ext) if ext == "rdlp" => RdlFlavor::Rdlp,
            _ => RdlFlavor::Rdl,
        }
    }

    /// Prefix of address literals
    pub fn addr_prefix(&self) -> &'static str {
        match self {
            RdlFlavor::Rdl => "@",
            RdlFlavor::Rdlp => "\\@",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum NamingMode {#[default]
    /// Keyword escaping, map prefix and reserved field suppression available
    Canonical,
    /// Names emitted unchanged, no prefix, no suppression
    Legacy,
}

impl NamingMode {
    pub fn is_legacy(&self) -> bool {
        *self==NamingMode::Legacy
    }
}

#[derive(Clone, Debug, Default)]
pub struct RdlSetting {
    /// Instance name of the address maps (default to the map name)
    pub inst_name: Option<String>,
    /// Prefix added to the map name
    pub prefix: Option<String>,
    /// Name replacing the memory map name
    pub map_name: Option<String>,
    /// Plain or piped RDL
    pub flavor: RdlFlavor,
    /// Naming convention
    pub naming: NamingMode,
    /// Replace fields containing `reserved` in their name by a comment
    pub skip_reserved: bool,
    /// Write hardware access properties
    pub hw_access: bool,
    /// Additional names to escape (on top of the RDL keywords)
    pub keywords: Vec<String>,
}
