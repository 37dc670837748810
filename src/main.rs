use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ipxact2rdl::{Component, GeneratorRdl, NamingMode, RdlFlavor, RdlSetting};

#[derive(Parser)]
#[command(version, rename_all="snake_case")]
/// Generate a RDL/RDLp file from an IP-XACT description
struct Ipxact2RdlArgs {
    /// IP-XACT file to parse
    ipxact_file: PathBuf,
    /// Write output to file (standard output if not set)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Instance name for the addressmap (default to the memory map name)
    #[arg(short, long)]
    inst_name: Option<String>,
    /// Prefix added to the addressmap name
    #[arg(long)]
    prefix: Option<String>,
    /// Override the addressmap name
    #[arg(long)]
    name: Option<String>,
    /// Output kind (default based on output file extension)
    #[arg(long)]
    flavor: Option<RdlFlavorArg>,
    /// Replace fields with 'reserved' in their name by a comment
    #[arg(long, action)]
    skip_reserved: bool,
    /// Legacy naming: no keyword escaping, no prefix, no reserved field suppression
    #[arg(long, action)]
    legacy: bool,
    /// Write hardware access properties
    #[arg(long, action)]
    hw_access: bool,
    /// Additional instance names to escape
    #[arg(short, long)]
    keyword: Vec<String>,
    /// Verbosity level (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum RdlFlavorArg {
    Rdl, Rdlp
}

impl From<RdlFlavorArg> for RdlFlavor {
    fn from(value: RdlFlavorArg) -> Self {
        match value {
            RdlFlavorArg::Rdl => RdlFlavor::Rdl,
            RdlFlavorArg::Rdlp => RdlFlavor::Rdlp,
        }
    }
}

impl Ipxact2RdlArgs {
    fn setting(&self) -> RdlSetting {
        let flavor = match (self.flavor, &self.output) {
            (Some(f), _) => f.into(),
            (None, Some(path)) => RdlFlavor::from_path(path),
            (None, None) => RdlFlavor::Rdl,
        };
        RdlSetting {
            inst_name: self.inst_name.clone(),
            prefix: self.prefix.clone(),
            map_name: self.name.clone(),
            flavor,
            naming: if self.legacy {NamingMode::Legacy} else {NamingMode::Canonical},
            skip_reserved: self.skip_reserved,
            hw_access: self.hw_access,
            keywords: self.keyword.clone(),
        }
    }
}

fn main() -> ExitCode {

    let args = Ipxact2RdlArgs::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = SimpleLogger::new().with_level(level).init();

    log::info!("Parsing of {:?}", args.ipxact_file);
    let comp = match Component::from_file(&args.ipxact_file) {
        Ok(comp) => comp,
        Err(e) => {
            log::error!("Parsing of {:?} failed: {e}", args.ipxact_file);
            return ExitCode::FAILURE;
        }
    };
    log::info!(" -> Parsing successful: {} memory map(s)", comp.memory_maps.len());

    let mut gen = GeneratorRdl::new(args.setting());
    if let Err(e) = gen.gen(&comp) {
        log::error!("RDL generation failed: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = gen.save(args.output.as_deref()) {
        log::error!("Unable to write output: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
