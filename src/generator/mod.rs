pub mod gen_common;
pub mod naming;
pub mod gen_rdl;

pub use {gen_common::*, naming::*, gen_rdl::*};
