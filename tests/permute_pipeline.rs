//! 端到端集成测试: 节拍切块重排管线.
//!
//! 测试流程: 生成 PCM 数据 → 封装为 WAV → 切块/加窗/重排 → 解封装 → 验证

use std::fs;

use wavperm::core::sample::read_sample;
use wavperm::{AudioFormat, PermError, PermuteConfig, SampleBuffer};

// ============================================================
// 辅助函数
// ============================================================

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 按帧生成交错采样并封装为 WAV, `f(frame, channel)` 给出采样值
fn make_wav(format: &AudioFormat, frames: usize, f: impl Fn(usize, usize) -> i64) -> Vec<u8> {
    let bps = format.bytes_per_sample();
    let channels = format.channels as usize;
    let mut data = vec![0u8; frames * format.frame_size()];
    for frame in 0..frames {
        for ch in 0..channels {
            let offset = (frame * channels + ch) * bps;
            wavperm::core::sample::write_sample(
                &mut data[offset..offset + bps],
                f(frame, ch),
                format.encoding(),
            );
        }
    }
    let samples = SampleBuffer::new(data, format).unwrap();
    wavperm::format::encode(format, &samples).unwrap()
}

/// 读取输出中第 `frame` 帧第 `ch` 声道的采样
fn sample_at(format: &AudioFormat, samples: &SampleBuffer, frame: usize, ch: usize) -> i64 {
    let bps = format.bytes_per_sample();
    let offset = (frame * format.channels as usize + ch) * bps;
    read_sample(&samples.as_bytes()[offset..offset + bps], format.encoding())
}

/// 16000 Hz / 240 bpm 时每块恰好 1000 帧, 块 k 的值为 (k+1)*1000
fn stepped_mono_s16(chunks: usize) -> (AudioFormat, Vec<u8>) {
    let format = AudioFormat::new(16000, 16, 1).unwrap();
    let wav = make_wav(&format, chunks * 1000, |frame, _| {
        ((frame / 1000 + 1) * 1000) as i64
    });
    (format, wav)
}

/// 输出中第 `chunk` 块中心处的采样值, 按 1000 取整后还原源块序号
fn source_of(format: &AudioFormat, samples: &SampleBuffer, chunk: usize) -> usize {
    let value = sample_at(format, samples, chunk * 1000 + 500, 0);
    ((value + 500) / 1000 - 1) as usize
}

// ============================================================
// 管线
// ============================================================

#[test]
fn test_silent_one_second_identity() {
    init_logger();
    let format = AudioFormat::new(44100, 16, 1).unwrap();
    let input = make_wav(&format, 44100, |_, _| 0);
    let config = PermuteConfig::new(120.0, 0, 4, vec![0, 1, 2, 3]);

    let processed = wavperm::process(&input, &config).unwrap();
    let summary = &processed.summary;
    assert_eq!(summary.frames_per_chunk, 5512);
    assert_eq!(summary.bytes_per_chunk, 11024);
    assert_eq!(summary.chunks, 8);
    assert_eq!(summary.groups, 2);
    assert_eq!(summary.output_chunks, 8);

    let (out_format, samples) = wavperm::format::decode(&processed.output).unwrap();
    assert_eq!(out_format, format);
    assert_eq!(samples.len(), 8 * 11024);
    assert!(samples.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_reverse_groups() {
    init_logger();
    let (format, input) = stepped_mono_s16(8);
    let config = PermuteConfig::new(240.0, 0, 4, vec![3, 2, 1, 0]);
    let output = wavperm::run(&input, &config).unwrap();
    let (_, samples) = wavperm::format::decode(&output).unwrap();

    assert_eq!(samples.frames(), 8000);
    let order: Vec<usize> = (0..8).map(|c| source_of(&format, &samples, c)).collect();
    assert_eq!(order, vec![3, 2, 1, 0, 7, 6, 5, 4]);

    // 每块首帧增益为 0
    for c in 0..8 {
        assert_eq!(sample_at(&format, &samples, c * 1000, 0), 0);
    }
}

#[test]
fn test_out_of_range_slots_are_compacted() {
    init_logger();
    let (format, input) = stepped_mono_s16(4);
    let config = PermuteConfig::new(240.0, 0, 2, vec![1, 5, 0]);
    let processed = wavperm::process(&input, &config).unwrap();
    assert_eq!(processed.summary.slots, 6);
    assert_eq!(processed.summary.filled_slots, 4);

    let (_, samples) = wavperm::format::decode(&processed.output).unwrap();
    let order: Vec<usize> = (0..4).map(|c| source_of(&format, &samples, c)).collect();
    assert_eq!(order, vec![1, 0, 3, 2]);
}

#[test]
fn test_repeats_and_partial_group() {
    init_logger();
    // 5 块, n=2: 末尾第 5 块不足一组, 被忽略
    let (format, input) = stepped_mono_s16(5);
    let config = PermuteConfig::new(240.0, 0, 2, vec![0, 0, 1]);
    let processed = wavperm::process(&input, &config).unwrap();
    assert_eq!(processed.summary.groups, 2);
    assert_eq!(processed.summary.slots, 9);
    assert_eq!(processed.summary.output_chunks, 6);

    let (_, samples) = wavperm::format::decode(&processed.output).unwrap();
    let order: Vec<usize> = (0..6).map(|c| source_of(&format, &samples, c)).collect();
    assert_eq!(order, vec![0, 0, 1, 2, 2, 3]);
}

#[test]
fn test_offset_skips_frames() {
    init_logger();
    let (format, input) = stepped_mono_s16(4);
    // 100 毫秒 = 1600 帧
    let config = PermuteConfig::new(240.0, 100, 1, vec![0]);
    let processed = wavperm::process(&input, &config).unwrap();
    assert_eq!(processed.summary.offset_bytes, 1600 * 2);
    assert_eq!(processed.summary.chunks, 2);

    let (_, samples) = wavperm::format::decode(&processed.output).unwrap();
    assert_eq!(samples.frames(), 2000);
    // 输出第 0 块中心对应源第 2100 帧, 位于源块 2
    assert_eq!(source_of(&format, &samples, 0), 2);
}

#[test]
fn test_stereo_24bit_channels_share_gain() {
    init_logger();
    let format = AudioFormat::new(16000, 24, 2).unwrap();
    let input = make_wav(&format, 2000, |_, ch| if ch == 0 { 4_000_000 } else { -4_000_000 });
    let config = PermuteConfig::new(240.0, 0, 2, vec![1, 0]);
    let output = wavperm::run(&input, &config).unwrap();
    let (out_format, samples) = wavperm::format::decode(&output).unwrap();
    assert_eq!(out_format, format);
    assert_eq!(samples.frames(), 2000);

    for frame in [0, 1, 250, 500, 999, 1500] {
        let left = sample_at(&format, &samples, frame, 0);
        let right = sample_at(&format, &samples, frame, 1);
        assert_eq!(left, -right, "frame {frame}");
    }
    assert!(sample_at(&format, &samples, 500, 0) > 3_999_000);
}

#[test]
fn test_unsigned_8bit_fades_to_silence() {
    init_logger();
    let format = AudioFormat::new(16000, 8, 1).unwrap();
    let input = make_wav(&format, 1000, |_, _| 100);
    let config = PermuteConfig::new(240.0, 0, 1, vec![0]);
    let output = wavperm::run(&input, &config).unwrap();

    // 头部 44 字节之后为采样, 静音为 128
    assert_eq!(output[44], 128);
    // 中心增益略小于 1, 100 截断为 99
    assert_eq!(output[44 + 500], 227);
}

// ============================================================
// 退化输入
// ============================================================

#[test]
fn test_offset_beyond_input_yields_empty_wav() {
    init_logger();
    let (format, input) = stepped_mono_s16(2);
    let config = PermuteConfig::new(240.0, 10_000, 2, vec![1, 0]);
    let output = wavperm::run(&input, &config).unwrap();
    assert_eq!(output.len(), 44);

    let (out_format, samples) = wavperm::format::decode(&output).unwrap();
    assert_eq!(out_format, format);
    assert!(samples.is_empty());
}

#[test]
fn test_fewer_chunks_than_group() {
    init_logger();
    let (_, input) = stepped_mono_s16(3);
    let config = PermuteConfig::new(240.0, 0, 4, vec![0, 1, 2, 3]);
    let processed = wavperm::process(&input, &config).unwrap();
    assert_eq!(processed.summary.groups, 0);
    assert_eq!(processed.summary.slots, 4);
    assert_eq!(processed.output.len(), 44);
}

#[test]
fn test_empty_permutation() {
    init_logger();
    let (_, input) = stepped_mono_s16(4);
    let config = PermuteConfig::new(240.0, 0, 2, Vec::new());
    let output = wavperm::run(&input, &config).unwrap();
    assert_eq!(output.len(), 44);
}

// ============================================================
// 错误
// ============================================================

#[test]
fn test_bpm_too_fast_is_usage_error() {
    init_logger();
    let (_, input) = stepped_mono_s16(1);
    let config = PermuteConfig::new(1.0e9, 0, 1, vec![0]);
    assert!(matches!(
        wavperm::run(&input, &config),
        Err(PermError::Usage(_))
    ));
}

#[test]
fn test_garbage_is_decode_error() {
    init_logger();
    let config = PermuteConfig::new(120.0, 0, 1, vec![0]);
    assert!(matches!(
        wavperm::run(b"RIFF\x04\x00\x00\x00WAVE", &config),
        Err(PermError::Decode(_))
    ));
    assert!(matches!(
        wavperm::run(b"definitely not audio", &config),
        Err(PermError::Decode(_))
    ));
}

// ============================================================
// 文件驱动
// ============================================================

#[test]
fn test_run_file_roundtrip() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    let (format, input) = stepped_mono_s16(4);
    fs::write(&input_path, &input).unwrap();

    let config = PermuteConfig::new(240.0, 0, 2, vec![1, 0]);
    let summary = wavperm::run_file(&input_path, &output_path, &config).unwrap();
    assert_eq!(summary.output_chunks, 4);

    let output = fs::read(&output_path).unwrap();
    let (_, samples) = wavperm::format::decode(&output).unwrap();
    let order: Vec<usize> = (0..4).map(|c| source_of(&format, &samples, c)).collect();
    assert_eq!(order, vec![1, 0, 3, 2]);

    let planned = wavperm::plan_file(&input_path, &config).unwrap();
    assert_eq!(planned, summary);
}

#[test]
fn test_run_file_unwritable_output() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.wav");
    let (_, input) = stepped_mono_s16(2);
    fs::write(&input_path, &input).unwrap();

    let output_path = dir.path().join("missing-dir").join("out.wav");
    let config = PermuteConfig::new(240.0, 0, 1, vec![0]);
    let err = wavperm::run_file(&input_path, &output_path, &config).unwrap_err();
    assert!(matches!(err, PermError::Encode(_)));
    assert!(!output_path.exists());
}
