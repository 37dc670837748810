use winnow::{
    ascii::{digit0, digit1, hex_digit1, Caseless},
    combinator::{alt, eof, preceded, terminated},
    error::{ContextError, ParseError},
    PResult, Parser
};

use crate::error::{ConvError, ConvErrorKind};

//--------------------------------
// General parsing rules
pub type Res<'a, T> = PResult<T>;
pub type ResF<'a, T> = Result<T, ParseError<&'a str, ContextError>>;

/// Verilog-like size prefix: `32'`, `'`
fn sized<'a>(input: &mut &'a str) -> Res<'a, &'a str> {
    (digit0, "'").recognize().parse_next(input)
}

/// Unsigned value in one of the IP-XACT/Verilog notations:
/// `0x1F`, `#1F`, `8'h1F`, `'b101`, `4'o17`, `8'd31` or plain decimal
#[allow(clippy::from_str_radix_10)]
pub fn val_u128<'a>(input: &mut &'a str) -> Res<'a, u128> {
    alt((
        preceded((sized, Caseless("b")), digit1).try_map(|v| u128::from_str_radix(v, 2)),
        preceded((sized, Caseless("o")), digit1).try_map(|v| u128::from_str_radix(v, 8)),
        preceded((sized, Caseless("d")), digit1).try_map(|v| u128::from_str_radix(v, 10)),
        preceded((sized, Caseless("h")), hex_digit1).try_map(|v| u128::from_str_radix(v, 16)),
        preceded(Caseless("0x"), hex_digit1).try_map(|v| u128::from_str_radix(v, 16)),
        preceded("#", hex_digit1).try_map(|v| u128::from_str_radix(v, 16)),
        digit1.try_map(str::parse),
    ))
    .parse_next(input)
}

pub fn val_u128_last(input: &str) -> ResF<u128> {
    terminated(val_u128, eof).parse(input)
}

/// Parse a numeric element content, ignoring whitespace and `_` separators
pub fn parse_u128(s: &str) -> Result<u128, ConvError> {
    let clean : String = s.chars().filter(|c| *c != '_' && !c.is_whitespace()).collect();
    Ok(val_u128_last(&clean)?)
}

fn too_wide(s: &str, bits: u8) -> ConvError {
    ConvError {
        kind: ConvErrorKind::Parse,
        txt: format!("'{s}' (exceeds {bits} bits)"),
    }
}

pub fn parse_u64(s: &str) -> Result<u64, ConvError> {
    u64::try_from(parse_u128(s)?).map_err(|_| too_wide(s, 64))
}

pub fn parse_u32(s: &str) -> Result<u32, ConvError> {
    u32::try_from(parse_u128(s)?).map_err(|_| too_wide(s, 32))
}

//------- TEST -------//
