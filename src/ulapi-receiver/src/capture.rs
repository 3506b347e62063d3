// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! IQ capture to `.fc32` files (raw little-endian interleaved f32).
//!
//! One file per slot, named from a template with `%TASK%` / `%SLOT%`
//! placeholders. An optional JSON-Lines index records every capture.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use num_complex::Complex32;
use serde::Serialize;
use tracing::debug;
use ulapi_core::{SlotHeader, UplinkSlotMessage};

use crate::config::CaptureConfig;

/// One line of the capture index.
#[derive(Debug, Serialize)]
struct CaptureRecord<'a> {
    ts_ms: i64,
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev_file: Option<&'a str>,
    message_type: u32,
    rnti: u16,
    rnti_type: u16,
    slot_idx: u32,
    task_idx: u32,
    sf_len: u32,
    offset: u32,
    snr_db: f32,
    timestamp_secs: f64,
    time_diff: f64,
    nof_prb: u32,
    start_symbol: u32,
    nof_symbol: u32,
    prb_usage: String,
}

pub struct SampleCapture {
    dir: PathBuf,
    file_template: String,
    prev_template: Option<String>,
    index: Option<BufWriter<File>>,
}

impl SampleCapture {
    /// Create the capture writer from config, or return `None` when disabled.
    pub fn from_config(cfg: &CaptureConfig) -> Result<Option<Self>, String> {
        if !cfg.enabled {
            return Ok(None);
        }

        let dir = PathBuf::from(cfg.dir.trim());
        create_dir_all(&dir)
            .map_err(|e| format!("create capture dir '{}': {}", dir.display(), e))?;

        let index = match cfg.index_file.as_deref() {
            Some(name) => {
                let path = dir.join(name);
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| format!("open capture index '{}': {}", path.display(), e))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        Ok(Some(Self {
            dir,
            file_template: cfg.file.clone(),
            prev_template: cfg.capture_prev.then(|| cfg.prev_file.clone()),
            index,
        }))
    }

    /// Write the slot's sample buffers and index entry.
    ///
    /// Returns the path of the current-slot capture.
    pub fn write(&mut self, msg: &UplinkSlotMessage) -> Result<PathBuf, String> {
        let header = msg.header();

        let file_name = resolve_file_name(&self.file_template, header);
        let path = self.dir.join(&file_name);
        write_fc32(&path, msg.curr_samples())?;
        debug!("Captured {} samples to {}", msg.curr_samples().len(), path.display());

        let prev_name = match &self.prev_template {
            Some(template) => {
                let name = resolve_file_name(template, header);
                write_fc32(&self.dir.join(&name), msg.prev_samples())?;
                Some(name)
            }
            None => None,
        };

        if let Some(index) = self.index.as_mut() {
            let record = CaptureRecord {
                ts_ms: Utc::now().timestamp_millis(),
                file: &file_name,
                prev_file: prev_name.as_deref(),
                message_type: header.message_type,
                rnti: header.rnti,
                rnti_type: header.rnti_type,
                slot_idx: header.slot_idx,
                task_idx: header.task_idx,
                sf_len: header.sf_len,
                offset: header.offset,
                snr_db: header.snr_db,
                timestamp_secs: header.timestamp_secs(),
                time_diff: header.time_diff,
                nof_prb: header.nof_prb,
                start_symbol: header.start_symbol,
                nof_symbol: header.nof_symbol,
                prb_usage: header.prb_usage_string(),
            };
            serde_json::to_writer(&mut *index, &record)
                .map_err(|e| format!("capture index serialization failed: {}", e))?;
            index
                .write_all(b"\n")
                .and_then(|_| index.flush())
                .map_err(|e| format!("capture index write failed: {}", e))?;
        }

        Ok(path)
    }
}

fn resolve_file_name(template: &str, header: &SlotHeader) -> String {
    template
        .replace("%TASK%", &header.task_idx.to_string())
        .replace("%SLOT%", &header.slot_idx.to_string())
}

fn write_fc32(path: &Path, samples: &[Complex32]) -> Result<(), String> {
    let file =
        File::create(path).map_err(|e| format!("create capture '{}': {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    for s in samples {
        writer
            .write_all(&s.re.to_le_bytes())
            .and_then(|_| writer.write_all(&s.im.to_le_bytes()))
            .map_err(|e| format!("write capture '{}': {}", path.display(), e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("flush capture '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulapi_core::MAX_PRB_NR;

    fn message() -> UplinkSlotMessage {
        let mut prb_map = vec![0u8; MAX_PRB_NR];
        prb_map[..2].copy_from_slice(&[1, 1]);
        let header = SlotHeader {
            message_type: 0,
            rnti: 17921,
            rnti_type: 2,
            slot_idx: 5,
            task_idx: 77,
            sf_len: 2,
            offset: 0,
            snr_db: 9.0,
            full_secs: 10,
            frac_secs: 0.5,
            time_diff: 0.0,
            nof_prb: 2,
            start_symbol: 0,
            nof_symbol: 14,
            prb_map,
        };
        UplinkSlotMessage::new(
            header,
            vec![Complex32::new(1.0, -1.0), Complex32::new(0.5, 0.25)],
            vec![Complex32::new(2.0, 3.0), Complex32::new(4.0, 5.0)],
        )
        .unwrap()
    }

    fn config(dir: &Path) -> CaptureConfig {
        CaptureConfig {
            dir: dir.to_string_lossy().to_string(),
            ..CaptureConfig::default()
        }
    }

    fn read_fc32(path: &Path) -> Vec<f32> {
        std::fs::read(path)
            .unwrap()
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_disabled_capture_is_none() {
        let cfg = CaptureConfig {
            enabled: false,
            ..CaptureConfig::default()
        };
        assert!(SampleCapture::from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_writes_current_samples_with_slot_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut capture = SampleCapture::from_config(&config(dir.path()))
            .unwrap()
            .unwrap();

        let path = capture.write(&message()).unwrap();
        assert_eq!(path, dir.path().join("pusch_77_5.fc32"));
        assert_eq!(read_fc32(&path), vec![1.0, -1.0, 0.5, 0.25]);
        assert!(!dir.path().join("last_pusch_77_5.fc32").exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut capture = SampleCapture::from_config(&config(&nested)).unwrap().unwrap();
        assert!(capture.write(&message()).unwrap().starts_with(&nested));
    }

    #[test]
    fn test_prev_capture_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CaptureConfig {
            capture_prev: true,
            index_file: Some("captures.jsonl".to_string()),
            ..config(dir.path())
        };
        let mut capture = SampleCapture::from_config(&cfg).unwrap().unwrap();
        capture.write(&message()).unwrap();
        capture.write(&message()).unwrap();

        assert_eq!(
            read_fc32(&dir.path().join("last_pusch_77_5.fc32")),
            vec![2.0, 3.0, 4.0, 5.0]
        );

        let index = std::fs::read_to_string(dir.path().join("captures.jsonl")).unwrap();
        let lines: Vec<&str> = index.lines().collect();
        assert_eq!(lines.len(), 2);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["file"], "pusch_77_5.fc32");
        assert_eq!(entry["prev_file"], "last_pusch_77_5.fc32");
        assert_eq!(entry["rnti"], 17921);
        assert_eq!(entry["prb_usage"], "11");
        assert_eq!(entry["timestamp_secs"], 10.5);
    }
}
