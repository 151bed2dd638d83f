use std::{fs, path::PathBuf, process::Command};

use assert_cmd::prelude::*;
use uf2patch::{block::DATA_AREA_SIZE, Block, BlockFlags, Family, Image, PAYLOAD_CAPACITY};

fn fixture_image(blocks: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..blocks {
        let mut data = [0u8; DATA_AREA_SIZE];
        data[..PAYLOAD_CAPACITY].fill(i as u8);

        let block = Block {
            flags: BlockFlags::FAMILY_ID_PRESENT,
            target_addr: 0x1000_0000 + (i * PAYLOAD_CAPACITY) as u32,
            payload_size: PAYLOAD_CAPACITY as u32,
            block_index: i as u32,
            block_count: blocks as u32,
            family_id: Family::Rp2040.id(),
            data,
        };
        bytes.extend_from_slice(&block.encode());
    }
    bytes
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("uf2patch-test-{}-{name}", std::process::id()))
}

#[test]
fn erase_region_extends_image() -> Result<(), Box<dyn std::error::Error>> {
    let input = scratch_path("in.uf2");
    let output = scratch_path("out.uf2");
    fs::write(&input, fixture_image(100))?;

    let mut cmd = Command::cargo_bin("uf2patch")?;
    cmd.arg("erase-region").arg(&input).arg(&output);

    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Added 64 erase blocks"));
    assert!(stdout.contains("Original: 100 blocks, Modified: 164 blocks"));

    let image = Image::from_bytes(&fs::read(&output)?).unwrap();
    assert_eq!(image.len(), 164);
    assert!(image.blocks().iter().all(|b| b.block_count == 164));
    assert!(image.blocks()[100..]
        .iter()
        .all(|b| b.payload().iter().all(|&byte| byte == 0xFF)));

    fs::remove_file(&input)?;
    fs::remove_file(&output)?;
    Ok(())
}

#[test]
fn erase_region_accepts_explicit_region_flags() -> Result<(), Box<dyn std::error::Error>> {
    let input = scratch_path("explicit-in.uf2");
    let output = scratch_path("explicit-out.uf2");
    fs::write(&input, fixture_image(4))?;

    let mut cmd = Command::cargo_bin("uf2patch")?;
    cmd.arg("erase-region")
        .arg(&input)
        .arg(&output)
        .args(["--base", "0x10100000"])
        .args(["--length", "0x200"])
        .args(["--fill-byte", "0x00"])
        .args(["--family", "nrf52840"]);
    cmd.assert().success();

    let image = Image::from_bytes(&fs::read(&output)?).unwrap();
    assert_eq!(image.len(), 6);
    assert_eq!(image.blocks()[4].target_addr, 0x1010_0000);
    assert_eq!(image.blocks()[5].target_addr, 0x1010_0100);
    assert_eq!(image.blocks()[4].family_id, Family::Nrf52840.id());
    assert!(image.blocks()[4].payload().iter().all(|&byte| byte == 0x00));

    fs::remove_file(&input)?;
    fs::remove_file(&output)?;
    Ok(())
}

#[test]
fn truncated_input_fails_without_writing_output() -> Result<(), Box<dyn std::error::Error>> {
    let input = scratch_path("truncated-in.uf2");
    let output = scratch_path("truncated-out.uf2");
    let mut bytes = fixture_image(2);
    bytes.truncate(700);
    fs::write(&input, bytes)?;

    let mut cmd = Command::cargo_bin("uf2patch")?;
    cmd.arg("erase-region").arg(&input).arg(&output);
    cmd.assert().failure();

    assert!(!output.exists());

    fs::remove_file(&input)?;
    Ok(())
}

#[test]
fn info_reports_block_census() -> Result<(), Box<dyn std::error::Error>> {
    let input = scratch_path("info.uf2");
    fs::write(&input, fixture_image(3))?;

    let mut cmd = Command::cargo_bin("uf2patch")?;
    cmd.arg("info").arg(&input);

    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Blocks:        3"));
    assert!(stdout.contains("rp2040"));
    assert!(stdout.contains("0x10000000"));

    fs::remove_file(&input)?;
    Ok(())
}
