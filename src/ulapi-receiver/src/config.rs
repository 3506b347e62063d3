// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for ulapi-receiver.
//!
//! Config is loaded from the `[ulapi-receiver]` section of `ulapi.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./ulapi.toml`
//! 3. `~/.config/ulapi/ulapi.toml`
//! 4. `/etc/ulapi/ulapi.toml`

use serde::{Deserialize, Serialize};
use ulapi_app::ConfigFile;
use ulapi_core::{WireFormat, MAX_PRB_CAPACITY, MAX_PRB_NR};

/// Top-level receiver configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Subscriber socket settings
    pub subscribe: SubscribeConfig,
    /// Wire format parameters
    pub decoder: DecoderConfig,
    /// Console output
    pub output: OutputConfig,
    /// IQ capture to disk
    pub capture: CaptureConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Subscriber socket configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscribeConfig {
    /// Publisher endpoint to connect to
    pub endpoint: String,
    /// Subscription prefix; empty receives every message
    pub topic: String,
    /// Receive timeout in milliseconds; bounds shutdown latency
    pub poll_interval_ms: u64,
}

impl Default for SubscribeConfig {
    fn default() -> Self {
        Self {
            endpoint: "ipc:///tmp/sni5gect-ul-api.zmq".to_string(),
            topic: String::new(),
            poll_interval_ms: 200,
        }
    }
}

/// Producer-side layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// PRB map capacity the producer was built with
    pub max_prb: usize,
    /// IQ sample rate used to express `time_diff` in samples
    pub sample_rate_hz: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_prb: MAX_PRB_NR,
            sample_rate_hz: 23.04e6,
        }
    }
}

impl DecoderConfig {
    pub fn wire_format(&self) -> WireFormat {
        WireFormat::new(self.max_prb)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print a summary of every decoded slot to stdout
    pub print_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}

/// IQ capture configuration.
///
/// File name templates accept `%TASK%` and `%SLOT%` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Whether current-slot samples are written to disk
    pub enabled: bool,
    /// Directory for capture files
    pub dir: String,
    /// Current-slot capture file name template
    pub file: String,
    /// Also write previous-slot samples
    pub capture_prev: bool,
    /// Previous-slot capture file name template
    pub prev_file: String,
    /// Optional JSON-Lines index of written captures, relative to `dir`
    pub index_file: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "logs".to_string(),
            file: "pusch_%TASK%_%SLOT%.fc32".to_string(),
            capture_prev: false,
            prev_file: "last_pusch_%TASK%_%SLOT%.fc32".to_string(),
            index_file: None,
        }
    }
}

impl ReceiverConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.subscribe.endpoint.trim().is_empty() {
            return Err("[subscribe].endpoint must not be empty".to_string());
        }
        if !self.subscribe.endpoint.contains("://") {
            return Err(format!(
                "[subscribe].endpoint '{}' must be of the form <transport>://<address>",
                self.subscribe.endpoint
            ));
        }
        if self.subscribe.poll_interval_ms == 0 {
            return Err("[subscribe].poll_interval_ms must be > 0".to_string());
        }
        if self.subscribe.poll_interval_ms > i32::MAX as u64 {
            return Err("[subscribe].poll_interval_ms is too large".to_string());
        }

        if self.decoder.max_prb == 0 {
            return Err("[decoder].max_prb must be > 0".to_string());
        }
        if self.decoder.max_prb > MAX_PRB_CAPACITY {
            return Err(format!(
                "[decoder].max_prb {} exceeds the limit of {}",
                self.decoder.max_prb, MAX_PRB_CAPACITY
            ));
        }
        if !(self.decoder.sample_rate_hz.is_finite() && self.decoder.sample_rate_hz > 0.0) {
            return Err("[decoder].sample_rate_hz must be > 0".to_string());
        }

        if self.capture.enabled {
            if self.capture.dir.trim().is_empty() {
                return Err("[capture].dir must not be empty when capture is enabled".to_string());
            }
            validate_template("[capture].file", &self.capture.file)?;
            if self.capture.capture_prev {
                validate_template("[capture].prev_file", &self.capture.prev_file)?;
                if self.capture.prev_file == self.capture.file {
                    return Err(
                        "[capture].prev_file must differ from [capture].file".to_string(),
                    );
                }
            }
            if let Some(index) = &self.capture.index_file {
                if index.trim().is_empty() {
                    return Err("[capture].index_file must not be empty when set".to_string());
                }
            }
        }
        Ok(())
    }

    pub fn example_toml() -> String {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(rename = "ulapi-receiver")]
            inner: ReceiverConfig,
        }
        let mut example = ReceiverConfig::default();
        example.general.log_level = Some("info".to_string());
        example.capture.index_file = Some("captures.jsonl".to_string());
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

fn validate_template(path: &str, template: &str) -> Result<(), String> {
    if template.trim().is_empty() {
        return Err(format!("{path} must not be empty"));
    }
    if !template.contains("%TASK%") && !template.contains("%SLOT%") {
        return Err(format!(
            "{path} '{template}' must contain %TASK% or %SLOT% so captures do not overwrite each other"
        ));
    }
    Ok(())
}

impl ConfigFile for ReceiverConfig {
    fn section_key() -> &'static str {
        "ulapi-receiver"
    }
}
