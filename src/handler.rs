//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责协调文件与图像 I/O、调用核心编解码算法以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::codec::{decode, encode, max_payload_len};
use crate::constants::{
    DEFAULT_IMAGE_EXTENSION, DEFAULT_PAYLOAD_EXTENSION, ENCODED_PREFIX, GRAY_EXTENSIONS,
    LOSSY_EXTENSIONS, RECOVERED_PREFIX,
};
use crate::error::StegError;
use crate::grid::PixelGrid;
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取载体图像和待隐藏文件、检查隐写空间是否足够、调用编码核心写入长度和内容，
/// 最后将结果以无损格式写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Returns
///
/// 实际写入的图像路径 (可能因有损扩展名而被改写)。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入图像，或无法读取待隐藏文件。
/// * 图像没有足够的空间来隐藏文件。
/// * 无法写入目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<PathBuf> {
    let dest = match args.output {
        Some(path) => lossless_output(path),
        None => default_output(&args.input, ENCODED_PREFIX, DEFAULT_IMAGE_EXTENSION),
    };
    ensure_writable(&dest, args.force)?;

    let image = image::open(&args.input).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.input.to_string_lossy().red().bold()
        )
    })?;

    let payload = fs::read(&args.file).with_context(|| {
        format!(
            "Unable to read payload file: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;

    let grid = PixelGrid::from_image(image).with_context(|| {
        format!(
            "Image cannot be used as a carrier: {}",
            args.input.to_string_lossy().red().bold()
        )
    })?;
    let mut grid = if keeps_gray_layout(&dest) {
        grid
    } else {
        grid.into_color()
    };
    debug!(
        "carrier {}x{}x{}, room for {:?} payload bytes",
        grid.height(),
        grid.width(),
        grid.channels(),
        max_payload_len(&grid)
    );

    match encode(&mut grid, &payload) {
        Ok(_) => {}
        Err(StegError::CarrierTooSmall {
            required,
            available,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the file. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "Failed to hide {} bytes in the image.",
                    payload.len().to_string().red().bold()
                )
            });
        }
    }

    let output = grid
        .clone()
        .into_image()
        .context("Unable to rebuild the image from the modified pixels.")?;
    output.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    verify_saved(&dest, &grid)?;

    info!("hid {} bytes in {}", payload.len(), dest.display());
    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、调用解码核心恢复长度和内容，最后将恢复的字节写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Returns
///
/// 实际写入的文件路径。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取或解码输入图像。
/// * 图像中没有可用的隐藏数据，或数据已被截断/损坏。
/// * 无法写入目标文件。
pub fn handle_decode(args: DecodeArgs) -> Result<PathBuf> {
    let dest = args.output.unwrap_or_else(|| {
        default_output(&args.input, RECOVERED_PREFIX, DEFAULT_PAYLOAD_EXTENSION)
    });
    ensure_writable(&dest, args.force)?;

    let image = image::open(&args.input).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.input.to_string_lossy().red().bold()
        )
    })?;

    let grid = PixelGrid::from_image(image).with_context(|| {
        format!(
            "Image cannot be used as a carrier: {}",
            args.input.to_string_lossy().red().bold()
        )
    })?;

    let payload = decode(&grid).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.input.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!("recovered {} bytes into {}", payload.len(), dest.display());
    println!(
        "The file has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 在输入文件同目录下生成 `<prefix><stem>.<extension>`。
fn default_output(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 有损格式会破坏低位数据，将其扩展名改为 PNG；没有扩展名时同样补上 PNG。
fn lossless_output(path: PathBuf) -> PathBuf {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension {
        Some(ext) if !LOSSY_EXTENSIONS.contains(&ext.as_str()) => path,
        Some(ext) => {
            let changed = path.with_extension(DEFAULT_IMAGE_EXTENSION);
            warn!("{ext} is lossy, writing {} instead", changed.display());
            println!(
                "Output file changed to {} ({} would destroy the hidden bits)",
                changed.to_string_lossy().yellow().bold(),
                ext.yellow()
            );
            changed
        }
        None => path.with_extension(DEFAULT_IMAGE_EXTENSION),
    }
}

/// 只有这些格式的编码器会原样保留 Luma8 / LumaA8 布局。
fn keeps_gray_layout(dest: &Path) -> bool {
    dest.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| GRAY_EXTENSIONS.contains(&ext.as_str()))
}

/// 重新读取已保存的图像，确认其像素布局与每个强度值都和写入的网格一致。
fn verify_saved(dest: &Path, expected: &PixelGrid) -> Result<()> {
    let reloaded = image::open(dest)
        .map_err(anyhow::Error::from)
        .and_then(|image| Ok(PixelGrid::from_image(image)?))
        .with_context(|| {
            format!(
                "Unable to re-read the saved image: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;

    anyhow::ensure!(
        reloaded == *expected,
        "The saved image does not preserve the hidden bits: {}. \nExpected a {}x{}x{} carrier, the file holds {}x{}x{}. Try a PNG output.",
        dest.to_string_lossy().red().bold(),
        expected.height(),
        expected.width(),
        expected.channels(),
        reloaded.height(),
        reloaded.width(),
        reloaded.channels()
    );
    Ok(())
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}
