//! Flash storage driver for RP2040
//!
//! Wear-leveled key-value storage in the last 64KB of flash, on
//! sequential-storage.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use tornado_hal::flash::{FlashError, StorageKey, MAX_VALUE_LEN};

/// 2MB flash on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the config partition
pub const CONFIG_RANGE: core::ops::Range<u32> = (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one stored item (key, value and item header)
const ITEM_BUFFER_LEN: usize = MAX_VALUE_LEN + 32;

/// RP2040 flash storage
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> tornado_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_LEN];

        let data = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &key,
        )
        .await
        .map_err(|_| FlashError::Storage)?
        .ok_or(FlashError::NotFound)?;

        let target = buffer.get_mut(..data.len()).ok_or(FlashError::BufferTooSmall)?;
        target.copy_from_slice(data);
        Ok(data.len())
    }
}
