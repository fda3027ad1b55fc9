//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于位平面 LSB 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于位平面 LSB 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。\n数据先写入所有像素通道的最低有效位，容量用尽后才会使用更高的位平面。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v, -vv, -vvv)。也可以通过 RUST_LOG 环境变量设置。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏) 和 decode (恢复)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将文件内容隐藏到无损格式图像 (如 PNG, BMP) 中。
    Encode(EncodeArgs),

    /// 从经过隐写的图像中恢复隐藏的文件。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用作载体的输入图像文件路径。
    #[arg(short, long)]
    pub input: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub file: PathBuf,

    /// 结果图像的输出路径。默认为输入图像同目录下的 `doctored_<名称>.png`。
    /// 有损格式 (如 JPEG) 会被自动改为 PNG。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub input: PathBuf,

    /// 恢复出的文件的保存路径。默认为输入图像同目录下的 `recovered_<名称>.bin`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}
