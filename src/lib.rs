//! # bitplane_steg 库
//!
//! 本库包含位平面 LSB 隐写工具的核心逻辑：槽位遍历、位平面掩码、
//! 长度前缀帧格式，以及围绕它们的图像/文件 I/O 外壳。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod handler;

pub use codec::{decode, encode};
pub use error::StegError;
pub use grid::PixelGrid;
