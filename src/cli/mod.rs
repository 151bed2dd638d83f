//! CLI utilities shared by the uf2patch binary
//!
//! No stability guarantees apply.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Args;
use log::debug;
use miette::{Result, WrapErr};
use strum::VariantNames;

use crate::{erase::AddressRange, error::Error, family::Family, image::Image};

use self::config::Config;

pub mod config;

/// XIP flash base address of the supported targets.
pub const FLASH_BASE: u32 = 0x1000_0000;

#[derive(Debug, Args)]
pub struct EraseRegionArgs {
    /// UF2 image to extend
    pub image: PathBuf,
    /// Where to write the extended image
    pub output: PathBuf,
    /// Base address of the region to erase; defaults to the last `--length`
    /// bytes of the configured flash
    #[arg(long, value_parser = parse_u32)]
    pub base: Option<u32>,
    /// Length of the region to erase in bytes
    #[arg(long, value_parser = parse_u32)]
    pub length: Option<u32>,
    /// Byte value the erased region is filled with
    #[arg(long, value_parser = parse_u8)]
    pub fill_byte: Option<u8>,
    /// Family ID for the new blocks: a known family name or a raw (hex) ID;
    /// defaults to the family the image itself is tagged with
    #[arg(long, value_parser = parse_family)]
    pub family: Option<u32>,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// UF2 image to inspect
    pub image: PathBuf,
}

/// Append erase blocks covering the configured region and write the extended
/// image.
///
/// Nothing is written unless the whole transform succeeds, so a failure
/// never leaves a partial output file behind.
pub fn erase_region(args: EraseRegionArgs, config: &Config) -> Result<()> {
    let data = read_image(&args.image)?;
    let mut image = Image::from_bytes(&data)?;
    let original = image.len();

    let length = args.length.unwrap_or(config.flash.reserved);
    let base = match args.base {
        Some(base) => base,
        None => config
            .flash
            .capacity
            .checked_sub(length)
            .and_then(|offset| FLASH_BASE.checked_add(offset))
            .ok_or(Error::AddressOverflow {
                base: FLASH_BASE,
                length,
            })?,
    };
    let fill_byte = args.fill_byte.unwrap_or(config.flash.fill_byte);
    let region = AddressRange::new(base, length)?;

    let added = match args.family {
        Some(family_id) => image.extend_with_erase_blocks(&region, fill_byte, family_id),
        None => image.extend_with_erase_region(&region, fill_byte),
    };

    fs::write(&args.output, image.to_bytes())
        .map_err(Error::from)
        .wrap_err_with(|| format!("Failed to write {}", args.output.display()))?;

    println!("Added {added} erase blocks covering {length:#x} bytes at {base:#010x}");
    println!("Original: {original} blocks, Modified: {} blocks", image.len());

    Ok(())
}

/// Print a summary of a UF2 image and exit.
pub fn image_info(args: InfoArgs) -> Result<()> {
    let data = read_image(&args.image)?;
    let image = Image::from_bytes(&data)?;

    let family = match image.family_id() {
        Some(id) => match Family::from_id(id) {
            Some(family) => format!("{family} ({id:#010x})"),
            None => format!("{id:#010x}"),
        },
        None => "none".into(),
    };
    let payload_bytes: u64 = image
        .blocks()
        .iter()
        .map(|block| u64::from(block.payload_size))
        .sum();
    let start = image
        .blocks()
        .iter()
        .map(|block| u64::from(block.target_addr))
        .min()
        .unwrap_or_default();
    let end = image
        .blocks()
        .iter()
        .map(|block| u64::from(block.target_addr) + u64::from(block.payload_size))
        .max()
        .unwrap_or_default();

    println!("Blocks:        {}", image.len());
    println!("Family:        {family}");
    println!("Address range: {start:#010x}..{end:#010x}");
    println!("Payload bytes: {payload_bytes}");

    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    debug!("reading image from {}", path.display());

    let data = fs::read(path)
        .map_err(Error::from)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    Ok(data)
}

fn parse_u32(input: &str) -> Result<u32, String> {
    let digits = input.replace('_', "");
    let (digits, radix) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (digits.as_str(), 10),
    };

    u32::from_str_radix(digits, radix).map_err(|error| error.to_string())
}

fn parse_u8(input: &str) -> Result<u8, String> {
    let value = parse_u32(input)?;
    u8::try_from(value).map_err(|_| format!("{value} does not fit in a byte"))
}

fn parse_family(input: &str) -> Result<u32, String> {
    if let Ok(family) = Family::from_str(input) {
        return Ok(family.id());
    }

    parse_u32(input).map_err(|_| {
        format!(
            "unknown family '{input}'; expected one of {}, or a raw ID",
            Family::VARIANTS.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_decimal_and_separators() {
        assert_eq!(parse_u32("0x10000000"), Ok(0x1000_0000));
        assert_eq!(parse_u32("0X4000"), Ok(0x4000));
        assert_eq!(parse_u32("16384"), Ok(16384));
        assert_eq!(parse_u32("0x20_0000"), Ok(0x20_0000));
        assert!(parse_u32("0xgg").is_err());
        assert!(parse_u32("").is_err());
    }

    #[test]
    fn fill_byte_must_fit_a_byte() {
        assert_eq!(parse_u8("0xff"), Ok(0xFF));
        assert_eq!(parse_u8("0"), Ok(0));
        assert!(parse_u8("0x100").is_err());
    }

    #[test]
    fn family_accepts_names_and_raw_ids() {
        assert_eq!(parse_family("rp2040"), Ok(0xe48b_ff56));
        assert_eq!(parse_family("samd51"), Ok(0x5511_4460));
        assert_eq!(parse_family("0xdeadbeef"), Ok(0xdead_beef));
        assert!(parse_family("rp9999").is_err());
    }
}
