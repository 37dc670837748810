//! Conversion of IP-XACT register maps into RDL

pub mod error;
pub mod ipxact;
pub mod parser;
pub mod generator;

pub use error::{ConvError, ConvErrorKind};
pub use generator::{to_rdl, GeneratorRdl, NamingMode, RdlFlavor, RdlSetting};
pub use ipxact::Component;
