//! # 槽位游标模块
//!
//! 按确定的顺序遍历网格中的每个槽位：通道最快，其次是列，再次是行；
//! 整个网格扫完一遍后才进入下一个位平面 (从最低有效位到最高有效位)。
//! 编码与解码必须使用完全相同的遍历顺序，否则数据会被静默破坏。

use crate::constants::BIT_PLANES;
use crate::error::{Result, StegError};
use crate::grid::PixelGrid;
use log::trace;

/// 返回位平面 `bit_depth` 对应的掩码对 `(置位掩码, 清零掩码)`。
///
/// 调用方保证 `bit_depth < 8`。
pub fn masks(bit_depth: u8) -> (u8, u8) {
    let set = 1u8 << bit_depth;
    (set, !set)
}

/// 一个可读写一比特的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
    pub bit_depth: u8,
}

#[derive(Debug, Clone)]
pub struct SlotCursor {
    height: usize,
    width: usize,
    channels: usize,
    row: usize,
    col: usize,
    channel: usize,
    bit_depth: u8,
    exhausted: bool,
}

impl SlotCursor {
    /// 从网格的起点 `(0, 0, 0)`、第 0 位平面开始。网格的尺寸已保证均不为 0。
    pub fn for_grid(grid: &PixelGrid) -> Self {
        Self::new(grid.height(), grid.width(), grid.channels())
    }

    fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
            row: 0,
            col: 0,
            channel: 0,
            bit_depth: 0,
            exhausted: false,
        }
    }

    /// 当前槽位。
    ///
    /// # Errors
    ///
    /// 游标已越过最后一个位平面时返回 [`StegError::CapacityExhausted`]。
    pub fn slot(&self) -> Result<Slot> {
        if self.exhausted {
            return Err(StegError::CapacityExhausted);
        }
        Ok(Slot {
            row: self.row,
            col: self.col,
            channel: self.channel,
            bit_depth: self.bit_depth,
        })
    }

    /// 移动到下一个槽位。
    ///
    /// 从最高位平面的最后一个槽位继续前进时，游标进入耗尽状态并返回
    /// [`StegError::CapacityExhausted`]；此后的每次调用都会返回同样的错误。
    pub fn advance(&mut self) -> Result<()> {
        if self.exhausted {
            return Err(StegError::CapacityExhausted);
        }

        if self.channel < self.channels - 1 {
            self.channel += 1;
            return Ok(());
        }
        self.channel = 0;

        if self.col < self.width - 1 {
            self.col += 1;
            return Ok(());
        }
        self.col = 0;

        if self.row < self.height - 1 {
            self.row += 1;
            return Ok(());
        }
        self.row = 0;

        if self.bit_depth == BIT_PLANES - 1 {
            self.exhausted = true;
            return Err(StegError::CapacityExhausted);
        }
        self.bit_depth += 1;
        trace!("cursor wrapped, moving to bit-plane {}", self.bit_depth);
        Ok(())
    }

    /// 尚未访问的槽位数 (含当前槽位)。
    pub fn remaining(&self) -> u64 {
        if self.exhausted {
            return 0;
        }
        let plane = (self.height * self.width * self.channels) as u64;
        let offset = ((self.row * self.width + self.col) * self.channels + self.channel) as u64;
        let planes_left = u64::from(BIT_PLANES - self.bit_depth);
        planes_left * plane - offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
