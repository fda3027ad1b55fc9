use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use bitplane_steg::{
    cli::{Cli, Commands},
    handler::{handle_decode, handle_encode},
};

/// 根据 `-v` 的次数确定默认日志级别；设置了 `RUST_LOG` 时以环境变量为准。
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format_timestamp(None)
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`encode` 或 `decode`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Encode(args) => handle_encode(args).map(drop),
        Commands::Decode(args) => handle_decode(args).map(drop),
    }
}
