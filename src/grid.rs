//! # 像素网格模块
//!
//! `PixelGrid` 是载体图像在内存中的表示：`height × width × channels` 个 8 位强度值，
//! 按行优先、通道交错的方式存储 (与 `image` crate 的原始缓冲区布局一致)。
//! 编解码核心只借用网格，从不改变其尺寸。

use crate::constants::BIT_PLANES;
use crate::error::{Result, StegError};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// 用给定尺寸和原始强度数据构造网格。
    ///
    /// # Errors
    ///
    /// 任一维度为 0、尺寸乘积溢出，或 `data` 的长度与尺寸不符时，返回 [`StegError::InvalidCarrier`]。
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if height == 0 || width == 0 || channels == 0 {
            return Err(StegError::InvalidCarrier(format!(
                "empty carrier ({height}x{width}x{channels})"
            )));
        }

        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                StegError::InvalidCarrier(format!(
                    "carrier dimensions overflow ({height}x{width}x{channels})"
                ))
            })?;

        if data.len() != expected {
            return Err(StegError::InvalidCarrier(format!(
                "buffer holds {} values, {height}x{width}x{channels} needs {expected}",
                data.len()
            )));
        }

        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// 从已解码的图像构造网格。
    ///
    /// 8 位的 Luma / LumaA / Rgb / Rgba 图像保持原有通道数，其余像素格式统一转换为 RGBA8。
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let (channels, data) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self::new(height, width, channels, data)
    }

    /// 将网格转换回可以交给图像编码器的 `DynamicImage`。
    ///
    /// # Errors
    ///
    /// 通道数不在 1..=4 范围内，或尺寸超出 `u32` 时，返回 [`StegError::InvalidCarrier`]。
    pub fn into_image(self) -> Result<DynamicImage> {
        let to_u32 = |n: usize| {
            u32::try_from(n).map_err(|_| {
                StegError::InvalidCarrier(format!("dimension {n} exceeds image limits"))
            })
        };
        let (width, height) = (to_u32(self.width)?, to_u32(self.height)?);
        let channels = self.channels;
        let data = self.data;

        let image = match channels {
            1 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, data)
                .map(DynamicImage::ImageRgba8),
            _ => None,
        };

        image.ok_or_else(|| {
            StegError::InvalidCarrier(format!(
                "{channels} channels per pixel cannot be written as an image"
            ))
        })
    }

    /// 将灰度网格扩展为彩色网格：Luma 变为 RGB，LumaA 变为 RGBA，其余布局原样返回。
    ///
    /// 灰度值被复制到三个颜色通道，alpha 保持不变。
    pub fn into_color(self) -> Self {
        let channels = match self.channels {
            1 => 3,
            2 => 4,
            _ => return self,
        };
        let data = self
            .data
            .chunks_exact(self.channels)
            .flat_map(|pixel| {
                let gray = pixel[0];
                let mut color = vec![gray, gray, gray];
                color.extend_from_slice(&pixel[1..]);
                color
            })
            .collect();

        Self {
            channels,
            data,
            ..self
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// 单个位平面上的槽位数，即 `height * width * channels`。
    pub fn capacity_bits(&self) -> u64 {
        self.data.len() as u64
    }

    /// 全部 8 个位平面上的槽位总数。
    pub fn total_slots(&self) -> u64 {
        self.capacity_bits() * u64::from(BIT_PLANES)
    }

    /// 读取 `(row, col, channel)` 处的强度值。越界时 panic。
    pub fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.data[self.index(row, col, channel)]
    }

    /// 写入 `(row, col, channel)` 处的强度值。越界时 panic。
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let index = self.index(row, col, channel);
        self.data[index] = value;
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        assert!(
            row < self.height && col < self.width && channel < self.channels,
            "slot ({row}, {col}, {channel}) outside {}x{}x{} grid",
            self.height,
            self.width,
            self.channels
        );
        (row * self.width + col) * self.channels + channel
    }
}
