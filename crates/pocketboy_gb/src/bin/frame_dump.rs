use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pocketboy_gb::{GameBoy, BYTES_PER_PIXEL, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "usage: frame_dump <rom_path> <out_rgba_path> [frames]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).context(USAGE)?;
    let out_path: PathBuf = args.next().map(PathBuf::from).context(USAGE)?;
    let frames: u32 = args
        .next()
        .map(|s| s.parse())
        .transpose()
        .context("frame count must be an integer")?
        .unwrap_or(120);

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let mut gb = GameBoy::new();
    gb.load_rom(&rom);

    for frame in 0..frames {
        gb.step_frame();
        if gb.cpu.is_locked() {
            bail!(
                "CPU locked on an unrecognized opcode during frame {} (PC=0x{:04X})",
                frame,
                gb.cpu.regs.pc
            );
        }
    }

    std::fs::write(&out_path, gb.framebuffer())
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;

    println!(
        "Wrote {} bytes ({}x{} rgba) after {} frames to '{}'",
        SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL,
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        frames,
        out_path.display()
    );
    Ok(())
}
