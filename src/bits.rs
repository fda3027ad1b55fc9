//! 整数与定宽二进制位序列之间的转换，最高位在前。

use crate::error::{Result, StegError};

/// 将 `value` 转换为恰好 `width` 位的二进制序列，最高位在前，高位补零。
///
/// # Errors
///
/// `value` 需要超过 `width` 位才能表示时，返回 [`StegError::ValueTooLarge`]。
pub fn to_bits(value: u64, width: u32) -> Result<Vec<bool>> {
    let needed = u64::BITS - value.leading_zeros();
    if needed > width {
        return Err(StegError::ValueTooLarge { needed, width });
    }

    Ok((0..width)
        .rev()
        .map(|i| i < u64::BITS && (value >> i) & 1 == 1)
        .collect())
}

/// 将最高位在前的二进制序列解析为整数。
///
/// # Errors
///
/// 序列表示的值超过 64 位时，返回 [`StegError::ValueTooLarge`]。
pub fn from_bits(bits: &[bool]) -> Result<u64> {
    let significant = bits.iter().skip_while(|&&bit| !bit).count();
    if significant > u64::BITS as usize {
        return Err(StegError::ValueTooLarge {
            needed: significant as u32,
            width: u64::BITS,
        });
    }

    Ok(bits
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
}
