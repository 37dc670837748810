use super::gen_common::NamingMode;

/// Instance names colliding with RDL properties
pub const RDL_KEYWORDS: [&str; 3] = ["reset", "enable", "type"];

/// Convert register/field/block names into RDL instance names:
/// keywords are upper-cased, all other names lower-cased.
#[derive(Clone, Debug, Default)]
pub struct NameNormalizer {
    mode: NamingMode,
    extra: Vec<String>,
}

impl NameNormalizer {

    pub fn new(mode: NamingMode, extra: &[String]) -> Self {
        NameNormalizer {
            mode,
            extra: extra.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_keyword(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        RDL_KEYWORDS.contains(&name.as_str()) || self.extra.contains(&name)
    }

    pub fn normalize(&self, name: &str) -> String {
        match self.mode {
            NamingMode::Legacy => name.to_owned(),
            NamingMode::Canonical if self.is_keyword(name) => name.to_uppercase(),
            NamingMode::Canonical => name.to_lowercase(),
        }
    }
}

/// Normalize a name using the default keyword list
pub fn normalize(name: &str) -> String {
    NameNormalizer::default().normalize(name)
}

pub trait ToRdlName {
    fn to_rdl_name(&self, normalizer: &NameNormalizer) -> String;
}

impl<T> ToRdlName for T where T: AsRef<str> {
    fn to_rdl_name(&self, normalizer: &NameNormalizer) -> String {
        normalizer.normalize(self.as_ref())
    }
}
