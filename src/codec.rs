//! # 位通道编解码模块
//!
//! 核心隐写算法。载荷以 64 位长度前缀 (最高位在前) 开头，随后是每个字节的 8 位，
//! 按 [`SlotCursor`] 的遍历顺序逐比特写入各强度值的当前位平面。
//!
//! 每次写入只改变强度值中的一个比特，其余比特保持不变。

use crate::bits::{from_bits, to_bits};
use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS};
use crate::cursor::{SlotCursor, masks};
use crate::error::{Result, StegError};
use crate::grid::PixelGrid;
use log::{debug, trace};

/// 按遍历顺序向网格逐比特写入。
pub struct BitWriter<'a> {
    grid: &'a mut PixelGrid,
    cursor: SlotCursor,
}

impl<'a> BitWriter<'a> {
    pub fn new(grid: &'a mut PixelGrid) -> Self {
        let cursor = SlotCursor::for_grid(grid);
        Self { grid, cursor }
    }

    /// 在当前槽位写入一个比特，然后前进到下一个槽位。
    ///
    /// # Errors
    ///
    /// 所有位平面均已用尽时返回 [`StegError::CapacityExhausted`]。
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        let slot = self.cursor.slot()?;
        let (set, clear) = masks(slot.bit_depth);
        let value = self.grid.get(slot.row, slot.col, slot.channel);
        let value = if bit { value | set } else { value & clear };
        self.grid.set(slot.row, slot.col, slot.channel, value);
        step(&mut self.cursor);
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &[bool]) -> Result<()> {
        bits.iter().try_for_each(|&bit| self.write_bit(bit))
    }

    pub fn remaining(&self) -> u64 {
        self.cursor.remaining()
    }
}

/// 按与 [`BitWriter`] 相同的遍历顺序从网格逐比特读取。
pub struct BitReader<'a> {
    grid: &'a PixelGrid,
    cursor: SlotCursor,
}

impl<'a> BitReader<'a> {
    pub fn new(grid: &'a PixelGrid) -> Self {
        let cursor = SlotCursor::for_grid(grid);
        Self { grid, cursor }
    }

    /// 读取当前槽位的比特，然后前进到下一个槽位。
    ///
    /// # Errors
    ///
    /// 所有位平面均已用尽时返回 [`StegError::CapacityExhausted`]。
    pub fn read_bit(&mut self) -> Result<bool> {
        let slot = self.cursor.slot()?;
        let (set, _) = masks(slot.bit_depth);
        let bit = self.grid.get(slot.row, slot.col, slot.channel) & set != 0;
        step(&mut self.cursor);
        Ok(bit)
    }

    pub fn read_bits(&mut self, count: usize) -> Result<Vec<bool>> {
        (0..count).map(|_| self.read_bit()).collect()
    }

    pub fn remaining(&self) -> u64 {
        self.cursor.remaining()
    }
}

/// 最后一个位平面的最后一个槽位仍然可用；越过它之后游标进入耗尽状态，
/// 下一次读写才会报告 `CapacityExhausted`。
fn step(cursor: &mut SlotCursor) {
    if cursor.advance().is_err() {
        trace!("cursor exhausted after the last slot of the last bit-plane");
    }
}

/// 载荷长度为 `len` 字节时需要的总比特数。
fn required_bits(len: u64) -> Option<u64> {
    len.checked_mul(u64::from(BITS_PER_BYTE))?
        .checked_add(u64::from(LENGTH_PREFIX_BITS))
}

/// 网格在单个位平面内可容纳的最大载荷长度 (字节)。长度前缀都放不下时返回 `None`。
pub fn max_payload_len(grid: &PixelGrid) -> Option<u64> {
    grid.capacity_bits()
        .checked_sub(u64::from(LENGTH_PREFIX_BITS))
        .map(|free| free / u64::from(BITS_PER_BYTE))
}

/// 将 `payload` 隐写进 `grid`，就地修改并返回同一个网格。
///
/// 需要 `64 + 8 * payload.len()` 个槽位，且只使用最低有效位平面。
/// 容量检查在任何写入之前完成，因此容量不足时网格保持原样。
///
/// # Errors
///
/// * [`StegError::CarrierTooSmall`] - 网格容量不足以容纳长度前缀和载荷。
/// * [`StegError::CapacityExhausted`] - 写入过程中游标耗尽 (容量检查通过后不应发生)。
pub fn encode<'g>(grid: &'g mut PixelGrid, payload: &[u8]) -> Result<&'g mut PixelGrid> {
    let len = payload.len() as u64;
    let available = grid.capacity_bits();
    let required = required_bits(len).ok_or(StegError::CarrierTooSmall {
        required: u64::MAX,
        available,
    })?;

    if available < required {
        return Err(StegError::CarrierTooSmall {
            required,
            available,
        });
    }

    debug!(
        "encoding {len} bytes ({required} bits) into a {}x{}x{} carrier ({available} bits)",
        grid.height(),
        grid.width(),
        grid.channels()
    );

    let mut writer = BitWriter::new(grid);
    writer.write_bits(&to_bits(len, LENGTH_PREFIX_BITS)?)?;
    for &byte in payload {
        writer.write_bits(&to_bits(u64::from(byte), BITS_PER_BYTE)?)?;
    }

    Ok(grid)
}

/// 从 `grid` 中恢复先前由 [`encode`] 隐写的载荷。
///
/// 解码从不修改网格。长度前缀不可信：剩余槽位不足以容纳声明的长度时直接判定为损坏。
///
/// # Errors
///
/// 长度前缀无法读出、声明的长度超出剩余容量，或读取中途游标耗尽时，
/// 返回 [`StegError::TruncatedOrCorruptData`]。
pub fn decode(grid: &PixelGrid) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(grid);
    let len = from_bits(&reader.read_bits(LENGTH_PREFIX_BITS as usize).map_err(truncated)?)?;

    let needed = len.checked_mul(u64::from(BITS_PER_BYTE));
    let remaining = reader.remaining();
    debug!("length prefix declares {len} bytes, {remaining} slots remain");

    if needed.is_none_or(|bits| bits > remaining) {
        return Err(StegError::TruncatedOrCorruptData);
    }
    let len = usize::try_from(len).map_err(|_| StegError::TruncatedOrCorruptData)?;

    let mut payload = Vec::with_capacity(len);
    for _ in 0..len {
        let bits = reader
            .read_bits(BITS_PER_BYTE as usize)
            .map_err(truncated)?;
        payload.push(from_bits(&bits)? as u8);
    }

    Ok(payload)
}

fn truncated(err: StegError) -> StegError {
    match err {
        StegError::CapacityExhausted => StegError::TruncatedOrCorruptData,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sets_and_clears_single_bits() {
        let mut grid = PixelGrid::new(1, 1, 2, vec![0b1010_1010, 0b0101_0101]).unwrap();
        let mut writer = BitWriter::new(&mut grid);
        writer.write_bits(&[true, false, false, true]).unwrap();

        assert_eq!(grid.as_raw(), &[0b1010_1001, 0b0101_0110]);
    }

    #[test]
    fn reader_follows_writer_order() {
        let mut grid = PixelGrid::new(1, 2, 1, vec![0, 0]).unwrap();
        let pattern = [true, false, false, true, true];
        BitWriter::new(&mut grid).write_bits(&pattern).unwrap();

        let mut reader = BitReader::new(&grid);
        assert_eq!(reader.read_bits(pattern.len()).unwrap(), pattern);
        assert_eq!(reader.remaining(), 16 - 5);
    }

    #[test]
    fn max_payload_len_accounts_for_length_prefix() {
        let grid = PixelGrid::new(10, 10, 3, vec![0; 300]).unwrap();
        assert_eq!(max_payload_len(&grid), Some(29));

        let tiny = PixelGrid::new(1, 1, 3, vec![0; 3]).unwrap();
        assert_eq!(max_payload_len(&tiny), None);
    }
}
