use std::error::Error as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use clap::{Parser, Subcommand, ValueEnum};
use color_print::ceprintln;

use board::image::{ADDR_CELLS, MemoryImage};
use mapfile::{ConfigParser, MapParser};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Parser)]
#[clap(name = "mbcfg", version, about, help_template = HELP_TEMPLATE)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an image file into another format
    Convert {
        /// Input file
        input: String,

        /// Output file
        output: String,

        #[clap(short, long, value_enum)]
        from: Format,

        #[clap(short, long, value_enum)]
        to: Format,

        /// Load address for input formats that do not carry one
        #[clap(short, long, default_value = "0")]
        start: String,
    },

    /// Build an image from a memory-map file and write it out
    Map {
        /// Memory-map file
        mapfile: String,

        /// Output file
        output: String,

        #[clap(short, long, value_enum, default_value = "raw")]
        to: Format,
    },

    /// Turn a plain binary file into a flashable block stream
    Flash {
        /// Input file (plain binary)
        input: String,

        /// Output file
        output: String,

        /// Flash destination address of the first block
        #[clap(short, long, default_value = "0")]
        base: String,
    },

    /// Parse a board-config file and echo the validated result
    Config {
        /// Board-config file
        input: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Intel,
    Papertape,
    Bin,
    Prg,
    Raw,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        ceprintln!("<red,bold>error</>: {}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            ceprintln!("  <blue>caused by</>: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Convert {
            input,
            output,
            from,
            to,
            start,
        } => {
            let start = scan::bounded_uint(&start, 0xFFFF)? as u16;
            let mut image = MemoryImage::new();
            println!("  < {}", input);
            let (start, count) = read_image(&input, from, start, &mut image)?;
            println!("  > {}", output);
            write_image(&output, to, &image, start, count)
        }

        Command::Map { mapfile, output, to } => {
            println!("  < {}", mapfile);
            let text = fs::read_to_string(&mapfile)?;
            let segments = MapParser::parse_str(&text)?;
            for seg in &segments {
                println!(
                    "   * {:04X}-{:04X} {}",
                    seg.start,
                    seg.limit() - 1,
                    seg.file.as_deref().unwrap_or_default()
                );
            }
            let mut image = MemoryImage::new();
            board::build::apply(&mut image, &segments)?;

            let start = segments.iter().map(|s| s.start).min().unwrap_or(0);
            let limit = segments
                .iter()
                .map(|s| s.limit())
                .max()
                .unwrap_or(start as u32);
            println!("  > {}", output);
            write_image(&output, to, &image, start, limit - start as u32)
        }

        Command::Flash {
            input,
            output,
            base,
        } => {
            let base = scan::bounded_uint(&base, u32::MAX as u64)? as u32;
            println!("  < {}", input);
            let data = fs::read(&input)?;
            let mut out = BufWriter::new(File::create(&output)?);
            let total = codec::flash::write_blocks(&data, base, &mut out)?;
            out.flush()?;
            println!("  > {} ({} blocks)", output, total);
            Ok(())
        }

        Command::Config { input } => {
            let text = fs::read_to_string(&input)?;
            let config = ConfigParser::parse_str(&text)?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

/// Decode `input` into `image`; returns the covering (start, count) span.
fn read_image(
    input: &str,
    format: Format,
    start: u16,
    image: &mut MemoryImage,
) -> Result<(u16, u32), Box<dyn std::error::Error>> {
    match format {
        Format::Intel | Format::Papertape => {
            let dialect = dialect(format);
            let file = BufReader::new(File::open(input)?);
            let blocks = codec::record::decode(dialect, file, image)?;
            let lo = blocks
                .iter()
                .filter_map(|b| b.start)
                .min()
                .ok_or("input contained no data records")?;
            let hi = blocks
                .iter()
                .filter_map(|b| b.start.map(|s| s as u32 + b.count))
                .max()
                .unwrap_or(lo as u32);
            Ok((lo, hi - lo as u32))
        }
        Format::Bin => {
            let mut file = File::open(input)?;
            let block = codec::binary::read_plain(&mut file, image, start)?;
            Ok((start, block.count))
        }
        Format::Prg => {
            let mut file = File::open(input)?;
            let block = codec::binary::read_prg(&mut file, image)?;
            Ok((block.start.unwrap_or(0), block.count))
        }
        Format::Raw => {
            let mut file = File::open(input)?;
            codec::binary::read_raw(&mut file, image)?;
            Ok((0, ADDR_CELLS as u32))
        }
    }
}

fn write_image(
    output: &str,
    format: Format,
    image: &MemoryImage,
    start: u16,
    count: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = BufWriter::new(File::create(output)?);
    match format {
        Format::Intel | Format::Papertape => {
            codec::record::encode(dialect(format), image, start, count, &mut out)?;
        }
        Format::Bin => codec::binary::write_plain(image, start, count, &mut out)?,
        Format::Prg => codec::binary::write_prg(image, start, count, &mut out)?,
        Format::Raw => codec::binary::write_raw(image, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn dialect(format: Format) -> &'static codec::record::Dialect {
    match format {
        Format::Papertape => &codec::record::PAPERTAPE,
        _ => &codec::record::INTEL,
    }
}
