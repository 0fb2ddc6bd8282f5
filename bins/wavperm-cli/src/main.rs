//! wavperm - 节拍切块重排命令行工具
//!
//! 把 PCM WAV 按十六分音符切块, 对每块加窗, 再按置换向量逐组重排后写出.
//!
//! ```text
//! wavperm input.wav 120 0 4 "3 2 1 0" output.wav
//! ```

mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use log::info;

use wavperm::{PermuteConfig, parse_bpm, parse_group_size, parse_offset_ms, parse_permutation};

#[derive(Parser, Debug)]
#[command(name = "wavperm", version, about = "按节拍切块并重排 PCM WAV 音频")]
struct Cli {
    /// 输入 WAV 文件路径
    input: PathBuf,

    /// 节拍 (每分钟拍数, 正实数)
    #[arg(allow_negative_numbers = true)]
    bpm: String,

    /// 切块前跳过的毫秒数 (非负整数)
    #[arg(allow_negative_numbers = true)]
    offset_ms: String,

    /// 分组大小 n (正整数)
    #[arg(allow_negative_numbers = true)]
    n: String,

    /// 置换向量, 以空白分隔 (如 "3 2 1 0")
    p: String,

    /// 输出 WAV 文件路径
    output: PathBuf,

    /// 只解码并输出处理规划 (JSON), 不写文件
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// 额外写入日志文件的目录
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,

    /// 日志详细程度 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose, cli.log_dir.as_deref()) {
        eprintln!("警告: {e:#}");
    }

    if let Err(e) = run(&cli) {
        eprintln!("错误: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = PermuteConfig::new(
        parse_bpm(&cli.bpm)?,
        parse_offset_ms(&cli.offset_ms)?,
        parse_group_size(&cli.n)?,
        parse_permutation(&cli.p)?,
    );
    info!(
        "wavperm {}: {} -> {}",
        wavperm::version(),
        cli.input.display(),
        cli.output.display()
    );

    if cli.dry_run {
        let summary = wavperm::plan_file(&cli.input, &config)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let summary = wavperm::run_file(&cli.input, &cli.output, &config)?;
    info!(
        "完成: {} 个块 -> {} 个块, {:.3} 秒",
        summary.chunks, summary.output_chunks, summary.output_duration_secs
    );
    Ok(())
}
