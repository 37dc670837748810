pub mod component;
pub mod reset;
pub mod access;
pub mod description;

pub use {component::*, reset::*, access::*, description::*};
