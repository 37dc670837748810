pub mod parser_common;
pub mod parser_ipxact;

pub use {
	parser_common::*,
	parser_ipxact::*,
};
