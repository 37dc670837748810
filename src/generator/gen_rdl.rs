use std::{io::Write, path::Path};

use crate::{
    error::ConvError,
    ipxact::{map_hw_access, map_sw_access, resolve_reset, sanitize, AddressBlock, Component, FieldDef, MemoryMap, RegisterDef},
};

use super::{
    gen_common::RdlSetting,
    naming::{NameNormalizer, ToRdlName},
};

const INDENT: &str = "    ";

/// Description of the field inserted in registers without any field
pub const RESERVED_DESC: &str = "Reserved: register without field definition";

/// Depth of each RDL block
#[derive(Clone, Copy, Debug, PartialEq)]
enum Level {
    Map = 1,
    Regfile = 2,
    Reg = 3,
    RegBody = 4,
    FieldBody = 5,
}

pub struct GeneratorRdl {
    setting: RdlSetting,
    normalizer: NameNormalizer,
    txt: String,
}

impl GeneratorRdl {

    pub fn new(setting: RdlSetting) -> Self {
        let normalizer = NameNormalizer::new(setting.naming, &setting.keywords);
        GeneratorRdl {
            setting,
            normalizer,
            txt: String::with_capacity(10000),
        }
    }

    fn write(&mut self, string: &str) {
        self.txt.push_str(string);
    }

    /// Write one line indented at a given level
    fn write_line(&mut self, level: Level, line: &str) {
        for _ in 1..level as usize {
            self.txt.push_str(INDENT);
        }
        self.txt.push_str(line);
        self.txt.push('\n');
    }

    fn hex(v: u128) -> String {
        format!("{v:#x}")
    }

    fn addr(&self, v: u64) -> String {
        format!("{}{v:#x}", self.setting.flavor.addr_prefix())
    }

    pub fn txt(&self) -> &str {
        &self.txt
    }

    /// Write the generated text to a file, or to the standard output when no path is given
    pub fn save(&self, path: Option<&Path>) -> Result<(), ConvError> {
        match path {
            Some(path) => std::fs::write(path, self.txt.as_bytes())?,
            None => {
                let mut out = std::io::stdout().lock();
                out.write_all(self.txt.as_bytes())?;
                out.flush()?;
            }
        }
        Ok(())
    }

    //-----------------------------

    pub fn gen(&mut self, comp: &Component) -> Result<(), ConvError> {
        self.txt.clear();
        self.write_prologue();
        for map in comp.memory_maps.iter() {
            self.gen_map(map)?;
        }
        Ok(())
    }

    fn write_prologue(&mut self) {
        self.write("// ----------------------------------------------------------------\n");
        self.write("// RDL(p) file generated from IP-XACT file using ipxact2rdl\n");
        self.write("// Do not edit\n");
        self.write("\n");
    }

    /// Name of the addrmap: override or memory map name, with optional prefix
    pub fn map_name(&self, map: &MemoryMap) -> String {
        let name = self.setting.map_name.as_deref().unwrap_or(&map.name);
        let name = match &self.setting.prefix {
            Some(prefix) if !self.setting.naming.is_legacy() => format!("{prefix}_{name}"),
            _ => name.to_owned(),
        };
        name.to_uppercase()
    }

    fn gen_map(&mut self, map: &MemoryMap) -> Result<(), ConvError> {
        let mname = self.map_name(map);
        log::info!("Memory map {} -> addrmap {mname}", map.name);
        self.write_line(Level::Map, &format!("addrmap {mname} {{"));
        for block in map.blocks.iter() {
            let bname =
                if map.is_multiblock() {format!("{mname}_{}", block.name.to_rdl_name(&self.normalizer))}
                else {mname.clone()};
            self.gen_block(block, &bname)?;
        }
        let inst_name = match &self.setting.inst_name {
            Some(name) => name.to_owned(),
            None => map.name.to_lowercase(),
        };
        self.write_line(Level::Map, &format!("}} {inst_name};"));
        Ok(())
    }

    fn gen_block(&mut self, block: &AddressBlock, bname: &str) -> Result<(), ConvError> {
        log::debug!("Address block {} ({} registers)", block.name, block.registers.len());
        self.write_line(Level::Regfile, "regfile {");
        for reg in block.sorted_registers() {
            self.gen_reg(reg).map_err(|e| e.within(&format!("{}.{}", block.name, reg.name)))?;
        }
        let addr = self.addr(block.base_address);
        self.write_line(Level::Regfile, &format!("}} {bname} {addr};"));
        self.write("\n");
        Ok(())
    }

    fn gen_reg(&mut self, reg: &RegisterDef) -> Result<(), ConvError> {
        self.write_line(Level::Reg, "reg {");
        self.write_line(Level::RegBody, &format!("regwidth = {};", reg.size));
        if let Some(rst) = &reg.reset {
            self.write_line(Level::RegBody, &format!("default reset = {};", Self::hex(rst.value)));
        }
        if let Some(access) = &reg.access {
            let sw = map_sw_access(access, None, true)?;
            let hw = map_hw_access(access, true)?;
            self.write_line(Level::RegBody, &format!("{sw};"));
            if self.setting.hw_access {
                self.write_line(Level::RegBody, &format!("{hw};"));
            }
        }
        let mut nb_field = 0;
        for field in reg.sorted_fields() {
            if self.gen_field(reg, field).map_err(|e| e.within(&field.name))? {
                nb_field += 1;
            }
        }
        if nb_field == 0 {
            log::debug!("Register {} has no field: adding reserved field", reg.name);
            self.gen_reserved_field(reg.size);
        }
        let rname = reg.name.to_rdl_name(&self.normalizer);
        let addr = self.addr(reg.address_offset);
        self.write_line(Level::Reg, &format!("}} {rname} {addr};"));
        self.write("\n");
        Ok(())
    }

    /// Generate a field definition, returning false when the field was suppressed
    fn gen_field(&mut self, reg: &RegisterDef, field: &FieldDef) -> Result<bool, ConvError> {
        let name = field.name.to_rdl_name(&self.normalizer);
        let (msb, lsb) = (field.msb(), field.lsb());
        if self.setting.skip_reserved && !self.setting.naming.is_legacy() && name.contains("reserved") {
            log::debug!("Skipping reserved field {}.{}", reg.name, field.name);
            self.write_line(Level::RegBody, &format!("// {name}[{msb}:{lsb}] reserved"));
            return Ok(false);
        }
        // Access is validated even when hardware access is not written
        let access = match &field.access {
            Some(access) => Some((
                map_sw_access(access, field.modified_write_value.as_deref(), false)?,
                map_hw_access(access, false)?,
            )),
            None => None,
        };
        let desc = match &field.description {
            Some(desc) => sanitize(desc),
            None => sanitize(&field.name),
        };
        self.write_line(Level::RegBody, "field {");
        self.write_line(Level::FieldBody, &format!("name = \"{}\";", sanitize(&field.name)));
        self.write_line(Level::FieldBody, &format!("desc = \"{desc}\";"));
        let reset = resolve_reset(field, reg);
        log::debug!("{}.{}[{msb}:{lsb}] reset = {reset}", reg.name, field.name);
        if let Some(rst) = reset.value() {
            self.write_line(Level::FieldBody, &format!("reset = {};", Self::hex(rst)));
        }
        if let Some((sw, hw)) = access {
            self.write_line(Level::FieldBody, &format!("{sw};"));
            if self.setting.hw_access {
                self.write_line(Level::FieldBody, &format!("{hw};"));
            }
        }
        self.write_line(Level::RegBody, &format!("}} {name}[{msb}:{lsb}];"));
        Ok(true)
    }

    /// Read-only field covering the whole register
    fn gen_reserved_field(&mut self, size: u32) {
        let msb = size.saturating_sub(1);
        self.write_line(Level::RegBody, "field {");
        self.write_line(Level::FieldBody, "name = \"reserved\";");
        self.write_line(Level::FieldBody, &format!("desc = \"{RESERVED_DESC}\";"));
        self.write_line(Level::FieldBody, "reset = 0x0;");
        self.write_line(Level::FieldBody, "sw = r;");
        self.write_line(Level::RegBody, &format!("}} reserved[{msb}:0];"));
    }
}

/// Convert a component into RDL text
pub fn to_rdl(comp: &Component, setting: RdlSetting) -> Result<String, ConvError> {
    let mut gen = GeneratorRdl::new(setting);
    gen.gen(comp)?;
    Ok(gen.txt)
}

//------- TEST -------//

#[cfg(test)]
mod tests_gen {
    use super::*;
    use crate::{
        error::ConvErrorKind,
        generator::gen_common::{NamingMode, RdlFlavor},
        ipxact::{ResetPath, ResetSpec},
    };

    fn single_reg_comp(reg: RegisterDef) -> Component {
        let mut block = AddressBlock::new("regs", 0x4000_0000);
        block.registers.push(reg);
        Component {
            name: "ip".to_owned(),
            memory_maps: vec![MemoryMap { name: "ip_map".to_owned(), blocks: vec![block] }],
        }
    }

    fn setting() -> RdlSetting {
        RdlSetting {
            inst_name: Some("ip_inst".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_reset_slice() {
        let mut reg = RegisterDef::new("ctrl", 4, 32);
        reg.reset = Some(ResetSpec::new(0xDEADBEEF, None, ResetPath::Flat));
        reg.fields.push(FieldDef::new("ctrl", 0, 4).with_access("read-write"));
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        let expected = [
            "        reg {",
            "            regwidth = 32;",
            "            default reset = 0xdeadbeef;",
            "            field {",
            "                name = \"ctrl\";",
            "                desc = \"ctrl\";",
            "                reset = 0xf;",
            "                sw = rw;",
            "            } ctrl[3:0];",
            "        } ctrl @0x4;",
        ].join("\n");
        assert!(txt.contains(&expected), "{txt}");
        assert!(!txt.contains("default sw"));
        assert!(!txt.contains("hw ="));
    }

    #[test]
    fn test_document_structure() {
        let mut reg = RegisterDef::new("STATUS", 0x10, 16);
        reg.access = Some("read-only".to_owned());
        reg.fields.push(FieldDef::new("busy", 0, 1).with_access("read-only"));
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        let expected = [
            "// ----------------------------------------------------------------",
            "// RDL(p) file generated from IP-XACT file using ipxact2rdl",
            "// Do not edit",
            "",
            "addrmap IP_MAP {",
            "    regfile {",
            "        reg {",
            "            regwidth = 16;",
            "            default sw = r;",
            "            field {",
            "                name = \"busy\";",
            "                desc = \"busy\";",
            "                sw = r;",
            "            } busy[0:0];",
            "        } status @0x10;",
            "",
            "    } IP_MAP @0x40000000;",
            "",
            "} ip_inst;",
            "",
        ].join("\n");
        assert_eq!(txt, expected);
    }

    #[test]
    fn test_reserved_backfill() {
        let mut reg = RegisterDef::new("empty", 0, 32);
        reg.reset = Some(ResetSpec::new(0x5, None, ResetPath::Flat));
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        assert_eq!(txt.matches("field {").count(), 1);
        assert!(txt.contains("                reset = 0x0;\n                sw = r;\n            } reserved[31:0];"));
        assert!(txt.contains(RESERVED_DESC));
    }

    #[test]
    fn test_skip_reserved() {
        let mut reg = RegisterDef::new("cfg", 0, 8);
        reg.fields.push(FieldDef::new("Reserved0", 0, 4).with_access("read-only"));
        reg.fields.push(FieldDef::new("rsvd_reserved", 4, 4).with_access("read-only"));
        let comp = single_reg_comp(reg);
        // Suppression disabled: both fields present
        let txt = to_rdl(&comp, setting()).unwrap();
        assert!(txt.contains("} reserved0[3:0];"));
        assert!(!txt.contains("reserved[7:0]"));
        // Suppression enabled: all fields removed and replaced by a single reserved field
        let txt = to_rdl(&comp, RdlSetting { skip_reserved: true, ..setting() }).unwrap();
        assert!(txt.contains("// reserved0[3:0] reserved"));
        assert!(txt.contains("// rsvd_reserved[7:4] reserved"));
        assert_eq!(txt.matches("field {").count(), 1);
        assert!(txt.contains("} reserved[7:0];"));
        // Legacy mode ignores suppression
        let txt = to_rdl(&comp, RdlSetting { skip_reserved: true, naming: NamingMode::Legacy, ..setting() }).unwrap();
        assert!(txt.contains("} Reserved0[3:0];"));
    }

    #[test]
    fn test_ordering() {
        let mut block = AddressBlock::new("regs", 0);
        let mut r8 = RegisterDef::new("r8", 8, 32);
        r8.fields.push(FieldDef::new("hi", 16, 16).with_access("read-write"));
        r8.fields.push(FieldDef::new("lo", 0, 8).with_access("read-write"));
        r8.fields.push(FieldDef::new("mid", 8, 8).with_access("read-write"));
        block.registers.push(r8);
        block.registers.push(RegisterDef::new("r0", 0, 32));
        block.registers.push(RegisterDef::new("r4", 4, 32));
        let comp = Component {
            name: "ip".to_owned(),
            memory_maps: vec![MemoryMap { name: "m".to_owned(), blocks: vec![block] }],
        };
        let txt = to_rdl(&comp, setting()).unwrap();
        let pos = |s: &str| txt.find(s).unwrap();
        assert!(pos("} r0 @0x0;") < pos("} r4 @0x4;"));
        assert!(pos("} r4 @0x4;") < pos("} r8 @0x8;"));
        assert!(pos("} lo[7:0];") < pos("} mid[15:8];"));
        assert!(pos("} mid[15:8];") < pos("} hi[31:16];"));
        // Generation is deterministic
        assert_eq!(txt, to_rdl(&comp, setting()).unwrap());
    }

    #[test]
    fn test_naming() {
        let mut reg = RegisterDef::new("Type", 0, 32);
        reg.fields.push(FieldDef::new("Enable", 0, 1).with_access("read-write"));
        reg.fields.push(FieldDef::new("Mode", 1, 2).with_access("read-write"));
        let mut comp = single_reg_comp(reg);
        comp.memory_maps[0].blocks.push(AddressBlock::new("Extra", 0x100));
        let txt = to_rdl(&comp, RdlSetting { prefix: Some("soc".to_owned()), ..setting() }).unwrap();
        assert!(txt.starts_with("// ---"));
        assert!(txt.contains("addrmap SOC_IP_MAP {"));
        assert!(txt.contains("} SOC_IP_MAP_regs @0x40000000;"));
        assert!(txt.contains("} SOC_IP_MAP_extra @0x100;"));
        assert!(txt.contains("} TYPE @0x0;"));
        assert!(txt.contains("name = \"Enable\";"));
        assert!(txt.contains("} ENABLE[0:0];"));
        assert!(txt.contains("} mode[2:1];"));

        let txt = to_rdl(&comp, RdlSetting { map_name: Some("top".to_owned()), inst_name: None, ..setting() }).unwrap();
        assert!(txt.contains("addrmap TOP {"));
        assert!(txt.ends_with("} ip_map;\n"));

        let txt = to_rdl(&comp, RdlSetting { prefix: Some("soc".to_owned()), naming: NamingMode::Legacy, ..setting() }).unwrap();
        assert!(txt.contains("addrmap IP_MAP {"));
        assert!(txt.contains("} Type @0x0;"));
        assert!(txt.contains("} IP_MAP_Extra @0x100;"));
    }

    #[test]
    fn test_piped_flavor() {
        let mut reg = RegisterDef::new("data", 0x20, 32);
        reg.fields.push(FieldDef::new("val", 0, 32).with_access("write-only"));
        let txt = to_rdl(&single_reg_comp(reg), RdlSetting { flavor: RdlFlavor::Rdlp, ..setting() }).unwrap();
        assert!(txt.contains("} data \\@0x20;"));
        assert!(txt.contains("} IP_MAP \\@0x40000000;"));
        assert!(!txt.contains(" @0x"));
    }

    #[test]
    fn test_access() {
        let mut reg = RegisterDef::new("irq", 0, 32);
        reg.access = Some("read-write".to_owned());
        let mut f = FieldDef::new("pending", 0, 1).with_access("read-write");
        f.modified_write_value = Some("oneToClear".to_owned());
        reg.fields.push(f);
        reg.fields.push(FieldDef::new("inherit", 1, 1));
        let comp = single_reg_comp(reg);
        let txt = to_rdl(&comp, setting()).unwrap();
        assert!(txt.contains("            default sw = rw;\n"));
        assert!(txt.contains("                sw = rw; woclr;\n"));
        assert!(txt.contains("                desc = \"inherit\";\n            } inherit[1:1];"));
        assert!(!txt.contains("hw ="));

        let txt = to_rdl(&comp, RdlSetting { hw_access: true, ..setting() }).unwrap();
        assert!(txt.contains("            default hw = r;\n"));
        assert!(txt.contains("                sw = rw; woclr;\n                hw = r;\n"));
    }

    #[test]
    fn test_unsupported_access() {
        let mut reg = RegisterDef::new("ctrl", 0, 32);
        reg.fields.push(FieldDef::new("en", 0, 1).with_access("read-writeOnce"));
        let mut gen = GeneratorRdl::new(setting());
        let err = gen.gen(&single_reg_comp(reg)).unwrap_err();
        assert_eq!(err.kind, ConvErrorKind::UnsupportedAccess);
        assert_eq!(err.txt, "regs.ctrl: en: read-writeOnce");

        let mut reg = RegisterDef::new("ctrl", 0, 32);
        reg.access = Some("writeOnce".to_owned());
        let err = to_rdl(&single_reg_comp(reg), setting()).unwrap_err();
        assert_eq!(err.kind, ConvErrorKind::UnsupportedAccess);
    }

    #[test]
    fn test_description() {
        let mut reg = RegisterDef::new("ctrl", 0, 32);
        let mut f = FieldDef::new("en", 0, 1).with_access("read-write");
        f.description = Some("Enable \"all\"\n   channels (±5%)".to_owned());
        reg.fields.push(f);
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        assert!(txt.contains("desc = \"Enable 'all' channels (5%)\";"));
    }

    #[test]
    fn test_wide_register() {
        let mut reg = RegisterDef::new("key", 0, 128);
        reg.reset = Some(ResetSpec::new(0x1_0000_0000_0000_0005, None, ResetPath::Flat));
        reg.fields.push(FieldDef::new("hi", 64, 64).with_access("read-only"));
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        assert!(txt.contains("            regwidth = 128;\n            default reset = 0x10000000000000005;\n"));
        assert!(txt.contains("                reset = 0x1;\n                sw = r;\n            } hi[127:64];"));
    }

    #[test]
    fn test_masked_register_reset() {
        let mut reg = RegisterDef::new("ctrl", 0, 32);
        reg.reset = Some(ResetSpec::new(0xFFFF_FFFF, Some(0x0000_00F0), ResetPath::Flat));
        reg.fields.push(FieldDef::new("a", 0, 4).with_access("read-write"));
        reg.fields.push(FieldDef::new("b", 4, 4).with_access("read-write"));
        let txt = to_rdl(&single_reg_comp(reg), setting()).unwrap();
        let field_a = txt.find("name = \"a\"").unwrap();
        let field_b = txt.find("name = \"b\"").unwrap();
        assert!(!txt[field_a..field_b].contains("reset ="));
        assert!(txt[field_b..].contains("reset = 0xf;"));
    }
}
