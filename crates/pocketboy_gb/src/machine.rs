mod bus;
mod console;
mod gpu;

pub(crate) use bus::SystemBus;
pub use console::GameBoy;
pub use gpu::{
    Gpu, Mode, FRAME_CLOCKS, HBLANK_CLOCKS, LINE_CLOCKS, OAM_SCAN_CLOCKS, VRAM_SCAN_CLOCKS,
};

/// Total addressable memory (64 KiB). The 16-bit address space and the
/// backing array match exactly, so no bounds failures are possible.
pub(crate) const MEMORY_SIZE: usize = 0x10000;

#[cfg(test)]
mod tests;
