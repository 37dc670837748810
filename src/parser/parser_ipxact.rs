use std::{fs::File, io::{BufRead, BufReader}, path::Path};

use quick_xml::{events::Event, name::QName, Reader};

use crate::{
    error::{ConvError, ConvErrorKind},
    ipxact::{AddressBlock, Component, FieldDef, MemoryMap, RegisterDef, ResetPath, ResetSpec},
};

use super::{parse_u128, parse_u32, parse_u64};

/// Register size when the IP-XACT description does not provide one
pub const DEFAULT_REG_SIZE: u32 = 32;

fn unexpected_eof() -> ConvError {
    ConvError {
        kind: ConvErrorKind::Xml,
        txt: "unexpected end of file".to_owned(),
    }
}

fn invalid_range(parent: &str, range: &str) -> ConvError {
    ConvError {
        kind: ConvErrorKind::Parse,
        txt: format!("invalid {range} in {parent}"),
    }
}

/// Skip the content of the element with the given qualified name
fn skip_element<R: BufRead>(reader: &mut Reader<R>, qname: &[u8]) -> Result<(), ConvError> {
    let mut buf = Vec::new();
    reader.read_to_end_into(QName(qname), &mut buf)?;
    Ok(())
}

/// Iterate over all child elements of the current element, calling `visit` with the
/// element local name (i.e. without the `spirit:`/`ipxact:` namespace prefix).
/// `visit` returns false when the element was not consumed: it is then skipped.
fn read_children<R, F>(reader: &mut Reader<R>, mut visit: F) -> Result<(), ConvError>
where
    R: BufRead,
    F: FnMut(&mut Reader<R>, &str) -> Result<bool, ConvError>,
{
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let qname = e.name().as_ref().to_vec();
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if !visit(reader, &tag)? {
                    skip_element(reader, &qname)?;
                }
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }
}

/// Text content of the current element (nested elements are ignored)
fn read_text<R: BufRead>(reader: &mut Reader<R>) -> Result<String, ConvError> {
    let mut buf = Vec::new();
    let mut txt = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(t) => txt.push_str(&t.unescape()?),
            Event::CData(c) => txt.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(e) => {
                let qname = e.name().as_ref().to_vec();
                skip_element(reader, &qname)?;
            }
            Event::End(_) => return Ok(txt.trim().to_owned()),
            Event::Eof => return Err(unexpected_eof()),
            _ => {}
        }
        buf.clear();
    }
}

/// Read a `reset` element: returns None when no value is defined
fn read_reset<R: BufRead>(reader: &mut Reader<R>, path: ResetPath) -> Result<Option<ResetSpec>, ConvError> {
    let mut value = None;
    let mut mask = None;
    read_children(reader, |r, tag| {
        match tag {
            "value" => value = Some(parse_u128(&read_text(r)?)?),
            "mask"  => mask  = Some(parse_u128(&read_text(r)?)?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    Ok(value.map(|v| ResetSpec::new(v, mask, path)))
}

/// Read a `resets` element: only the first reset definition is kept
fn read_resets<R: BufRead>(reader: &mut Reader<R>) -> Result<Option<ResetSpec>, ConvError> {
    let mut reset = None;
    read_children(reader, |r, tag| {
        match tag {
            "reset" => {
                let rst = read_reset(r, ResetPath::Nested)?;
                if reset.is_none() {
                    reset = rst;
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    Ok(reset)
}

/// Merge reset information found in both paths: the flat one has priority
fn merge_reset(flat: Option<ResetSpec>, nested: Option<ResetSpec>) -> Option<ResetSpec> {
    flat.or(nested)
}

fn read_field<R: BufRead>(reader: &mut Reader<R>, reg_name: &str) -> Result<FieldDef, ConvError> {
    let mut name = None;
    let mut bit_offset = None;
    let mut bit_width = None;
    let mut field = FieldDef::default();
    let mut flat = None;
    let mut nested = None;
    read_children(reader, |r, tag| {
        match tag {
            "name"               => name = Some(read_text(r)?),
            "description"        => field.description = Some(read_text(r)?),
            "bitOffset"          => bit_offset = Some(parse_u32(&read_text(r)?)?),
            "bitWidth"           => bit_width = Some(parse_u32(&read_text(r)?)?),
            "access"             => field.access = Some(read_text(r)?),
            "modifiedWriteValue" => field.modified_write_value = Some(read_text(r)?),
            "reset"              => flat = read_reset(r, ResetPath::Flat)?,
            "resets"             => nested = read_resets(r)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    let parent = format!("field of register {reg_name}");
    field.name = name.ok_or_else(|| ConvError::missing("name", &parent))?;
    let parent = format!("field {reg_name}.{}", field.name);
    field.bit_offset = bit_offset.ok_or_else(|| ConvError::missing("bitOffset", &parent))?;
    field.bit_width = bit_width.ok_or_else(|| ConvError::missing("bitWidth", &parent))?;
    if field.bit_width == 0 || field.bit_offset.checked_add(field.bit_width).is_none() {
        return Err(invalid_range(&parent, &format!("bitOffset {} / bitWidth {}", field.bit_offset, field.bit_width)));
    }
    field.reset = merge_reset(flat, nested);
    Ok(field)
}

fn read_register<R: BufRead>(reader: &mut Reader<R>, block_name: &str) -> Result<RegisterDef, ConvError> {
    let mut name = None;
    let mut offset = None;
    let mut size = None;
    let mut reg = RegisterDef::default();
    let mut flat = None;
    let mut nested = None;
    read_children(reader, |r, tag| {
        match tag {
            "name"          => name = Some(read_text(r)?),
            "description"   => reg.description = Some(read_text(r)?),
            "addressOffset" => offset = Some(parse_u64(&read_text(r)?)?),
            "size"          => size = Some(parse_u32(&read_text(r)?)?),
            "access"        => reg.access = Some(read_text(r)?),
            "reset"         => flat = read_reset(r, ResetPath::Flat)?,
            "resets"        => nested = read_resets(r)?,
            "field"         => {
                let reg_name = name.as_deref().unwrap_or("?");
                reg.fields.push(read_field(r, reg_name)?);
            }
            "dim" => {
                log::warn!("Register arrays are not supported: dimension ignored in block {block_name}");
                return Ok(false);
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    let parent = format!("register of block {block_name}");
    reg.name = name.ok_or_else(|| ConvError::missing("name", &parent))?;
    let parent = format!("register {block_name}.{}", reg.name);
    reg.address_offset = offset.ok_or_else(|| ConvError::missing("addressOffset", &parent))?;
    reg.size = size.unwrap_or(DEFAULT_REG_SIZE);
    if reg.size == 0 {
        return Err(invalid_range(&parent, "size 0"));
    }
    reg.reset = merge_reset(flat, nested);
    Ok(reg)
}

fn read_address_block<R: BufRead>(reader: &mut Reader<R>) -> Result<AddressBlock, ConvError> {
    let mut block = AddressBlock::default();
    read_children(reader, |r, tag| {
        match tag {
            "name"        => block.name = read_text(r)?,
            "baseAddress" => block.base_address = parse_u64(&read_text(r)?)?,
            "register"    => {
                let reg = read_register(r, &block.name)?;
                block.registers.push(reg);
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    Ok(block)
}

fn read_memory_map<R: BufRead>(reader: &mut Reader<R>) -> Result<MemoryMap, ConvError> {
    let mut map = MemoryMap::default();
    read_children(reader, |r, tag| {
        match tag {
            "name"         => map.name = read_text(r)?,
            "addressBlock" => map.blocks.push(read_address_block(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    if map.name.is_empty() {
        return Err(ConvError::missing("name", "memoryMap"));
    }
    Ok(map)
}

fn read_component<R: BufRead>(reader: &mut Reader<R>) -> Result<Component, ConvError> {
    let mut comp = Component::default();
    read_children(reader, |r, tag| {
        match tag {
            "name" => comp.name = read_text(r)?,
            "memoryMaps" => {
                read_children(r, |r, tag| {
                    match tag {
                        "memoryMap" => comp.memory_maps.push(read_memory_map(r)?),
                        _ => return Ok(false),
                    }
                    Ok(true)
                })?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;
    Ok(comp)
}

/// Read an IP-XACT document: the root element must be a `component`
fn read_document<R: BufRead>(mut reader: Reader<R>) -> Result<Component, ConvError> {
    reader.trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if e.local_name().as_ref() != b"component" {
                    return Err(ConvError {
                        kind: ConvErrorKind::Xml,
                        txt: format!("expecting root element <component>, got <{}>", String::from_utf8_lossy(e.name().as_ref())),
                    });
                }
                return read_component(&mut reader);
            }
            Event::Eof => return Err(ConvError::missing("component", "document")),
            _ => {}
        }
        buf.clear();
    }
}

impl Component {

    pub fn from_file<P>(filename: P) -> Result<Component, ConvError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(filename)?;
        read_document(Reader::from_reader(BufReader::new(file)))
    }

    pub fn from_xml(xml: &str) -> Result<Component, ConvError> {
        read_document(Reader::from_reader(xml.as_bytes()))
    }
}

//------- TEST -------//
