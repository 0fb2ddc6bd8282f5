//! 处理管线.
//!
//! 解码 → 切块 → 加窗 → 重排 → 拼接 → 编码. 全部在内存中完成,
//! 文件读写只发生在 [`run_file`] / [`plan_file`] 的两端.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use wavperm_chunk::{ChunkLayout, PermutePlan, Window};
use wavperm_core::{AudioFormat, PermError, PermResult, SampleBuffer};

use crate::config::PermuteConfig;

/// 一次运行的统计信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// 输入音频格式 (输出与之相同)
    pub format: AudioFormat,
    /// 输入采样字节数
    pub input_bytes: usize,
    /// 每块帧数
    pub frames_per_chunk: usize,
    /// 每块字节数
    pub bytes_per_chunk: usize,
    /// 开头跳过的字节数
    pub offset_bytes: usize,
    /// 切出的块数
    pub chunks: usize,
    /// 完整组数
    pub groups: usize,
    /// 重排槽位总数
    pub slots: usize,
    /// 被填充的槽位数
    pub filled_slots: usize,
    /// 输出块数
    pub output_chunks: usize,
    /// 输出采样字节数
    pub output_bytes: usize,
    /// 输出时长 (秒)
    pub output_duration_secs: f64,
}

/// 处理结果: 编码后的 WAV 与统计信息
#[derive(Debug, Clone)]
pub struct Processed {
    pub output: Vec<u8>,
    pub summary: RunSummary,
}

/// 已解码并完成切块规划的输入
struct Prepared {
    format: AudioFormat,
    samples: SampleBuffer,
    layout: ChunkLayout,
}

fn prepare(input: &[u8], config: &PermuteConfig) -> PermResult<Prepared> {
    config.validate()?;
    let (format, samples) = wavperm_format::decode(input)?;
    info!(
        "输入: {}, {} 帧 ({:.3} 秒)",
        format,
        samples.frames(),
        format.duration_secs(samples.len())
    );
    let layout = ChunkLayout::new(&format, config.bpm, config.offset_ms)?;
    Ok(Prepared {
        format,
        samples,
        layout,
    })
}

fn summarize(prepared: &Prepared, plan: &PermutePlan) -> RunSummary {
    let output_chunks = plan.filled();
    let output_bytes = output_chunks * prepared.layout.bytes_per_chunk;
    RunSummary {
        format: prepared.format,
        input_bytes: prepared.samples.len(),
        frames_per_chunk: prepared.layout.frames_per_chunk,
        bytes_per_chunk: prepared.layout.bytes_per_chunk,
        offset_bytes: prepared.layout.offset_bytes,
        chunks: prepared.layout.chunk_count(prepared.samples.len()),
        groups: plan.groups(),
        slots: plan.slot_count(),
        filled_slots: plan.filled(),
        output_chunks,
        output_bytes,
        output_duration_secs: prepared.format.duration_secs(output_bytes),
    }
}

/// 在内存中完成整条管线
pub fn process(input: &[u8], config: &PermuteConfig) -> PermResult<Processed> {
    let prepared = prepare(input, config)?;
    let format = prepared.format;

    let mut chunks = prepared.layout.split(&prepared.samples);
    // 至少切出一块时, 块长不超过输入长度, 增益表大小有界
    if !chunks.is_empty() {
        let window = Window::new(prepared.layout.frames_per_chunk);
        for chunk in &mut chunks {
            window.apply(chunk, &format);
        }
        debug!("已对 {} 个块加窗", chunks.len());
    }

    let plan = PermutePlan::new(chunks.len(), config.group_size, &config.permutation)?;
    let ordered = plan.apply(&chunks);
    info!(
        "重排: {} 组, {} 槽位, 填充 {} 个",
        plan.groups(),
        plan.slot_count(),
        plan.filled()
    );

    let mut data = Vec::with_capacity(ordered.len() * prepared.layout.bytes_per_chunk);
    for chunk in &ordered {
        data.extend_from_slice(chunk.as_bytes());
    }
    let samples = SampleBuffer::new(data, &format)?;
    let output = wavperm_format::encode(&format, &samples)?;

    let summary = summarize(&prepared, &plan);
    info!(
        "输出: {} 块, {} 字节采样 ({:.3} 秒)",
        summary.output_chunks, summary.output_bytes, summary.output_duration_secs
    );
    Ok(Processed { output, summary })
}

/// 处理 WAV 字节, 返回重排后的 WAV 字节
pub fn run(input: &[u8], config: &PermuteConfig) -> PermResult<Vec<u8>> {
    process(input, config).map(|processed| processed.output)
}

/// 只做解码与规划, 不加窗也不编码
pub fn plan(input: &[u8], config: &PermuteConfig) -> PermResult<RunSummary> {
    let prepared = prepare(input, config)?;
    let chunk_count = prepared.layout.chunk_count(prepared.samples.len());
    let plan = PermutePlan::new(chunk_count, config.group_size, &config.permutation)?;
    Ok(summarize(&prepared, &plan))
}

fn read_input(path: &Path) -> PermResult<Vec<u8>> {
    fs::read(path)
        .map_err(|e| PermError::Decode(format!("无法读取输入文件 {}: {e}", path.display())))
}

/// 读取输入文件, 处理后写入输出文件
///
/// 参数非法时不做任何 I/O, 直接返回 [`PermError::Usage`].
/// 输入不可读返回 [`PermError::Decode`], 输出不可写返回 [`PermError::Encode`].
pub fn run_file(
    input_path: &Path,
    output_path: &Path,
    config: &PermuteConfig,
) -> PermResult<RunSummary> {
    config.validate()?;
    let input = read_input(input_path)?;
    info!("读取 {} ({} 字节)", input_path.display(), input.len());

    let processed = process(&input, config)?;
    fs::write(output_path, &processed.output).map_err(|e| {
        PermError::Encode(format!("无法写入输出文件 {}: {e}", output_path.display()))
    })?;
    info!(
        "写入 {} ({} 字节)",
        output_path.display(),
        processed.output.len()
    );
    Ok(processed.summary)
}

/// 读取输入文件并给出处理规划, 不写任何文件
pub fn plan_file(input_path: &Path, config: &PermuteConfig) -> PermResult<RunSummary> {
    config.validate()?;
    let input = read_input(input_path)?;
    plan(&input, config)
}
