/// Location of the reset information in the source document
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ResetPath {#[default]
    /// Direct `reset` element (`reset/value`, `reset/mask`)
    Flat,
    /// Nested `resets/reset` element
    Nested,
}

/// Reset value with optional mask, attached to a register or a field
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ResetSpec {
    pub value: u128,
    pub mask: Option<u128>,
    pub path: ResetPath,
}

impl ResetSpec {
    pub fn new(value: u128, mask: Option<u128>, path: ResetPath) -> Self {
        ResetSpec { value, mask, path }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub bit_offset: u32,
    pub bit_width: u32,
    /// Raw access string (e.g. `read-write`), validated when emitted
    pub access: Option<String>,
    /// Raw modified write value (e.g. `oneToClear`)
    pub modified_write_value: Option<String>,
    pub reset: Option<ResetSpec>,
}

impl FieldDef {
    pub fn new(name: &str, bit_offset: u32, bit_width: u32) -> Self {
        FieldDef {
            name: name.to_owned(),
            bit_offset,
            bit_width,
            ..Default::default()
        }
    }

    pub fn lsb(&self) -> u32 {
        self.bit_offset
    }

    /// Bit offset and width are checked at ingestion (`bit_width > 0`, no overflow)
    pub fn msb(&self) -> u32 {
        self.bit_offset.saturating_add(self.bit_width.saturating_sub(1))
    }

    pub fn width(&self) -> u32 {
        self.msb() - self.lsb() + 1
    }

    pub fn with_access(mut self, access: &str) -> Self {
        self.access = Some(access.to_owned());
        self
    }

    pub fn with_reset(mut self, reset: ResetSpec) -> Self {
        self.reset = Some(reset);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RegisterDef {
    pub name: String,
    pub description: Option<String>,
    pub address_offset: u64,
    pub size: u32,
    pub access: Option<String>,
    pub reset: Option<ResetSpec>,
    pub fields: Vec<FieldDef>,
}

impl RegisterDef {
    pub fn new(name: &str, address_offset: u64, size: u32) -> Self {
        RegisterDef {
            name: name.to_owned(),
            address_offset,
            size,
            ..Default::default()
        }
    }

    /// Fields sorted by increasing bit offset (stable for equal offsets)
    pub fn sorted_fields(&self) -> Vec<&FieldDef> {
        let mut fields : Vec<&FieldDef> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.bit_offset);
        fields
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AddressBlock {
    pub name: String,
    pub base_address: u64,
    pub registers: Vec<RegisterDef>,
}

impl AddressBlock {
    pub fn new(name: &str, base_address: u64) -> Self {
        AddressBlock {
            name: name.to_owned(),
            base_address,
            registers: Vec::new(),
        }
    }

    /// Registers sorted by increasing address offset (stable for equal offsets)
    pub fn sorted_registers(&self) -> Vec<&RegisterDef> {
        let mut regs : Vec<&RegisterDef> = self.registers.iter().collect();
        regs.sort_by_key(|r| r.address_offset);
        regs
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct MemoryMap {
    pub name: String,
    pub blocks: Vec<AddressBlock>,
}

impl MemoryMap {
    pub fn is_multiblock(&self) -> bool {
        self.blocks.len() > 1
    }
}

/// Top level component: the list of memory maps found in the IP-XACT file
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Component {
    pub name: String,
    pub memory_maps: Vec<MemoryMap>,
}
