/// Largest encoded payload the agent URL carries reliably (750 KiB).
pub const DEFAULT_SIZE_LIMIT: u64 = 750 * 1024;

/// Exact Base64 length for `raw_bytes` of input: every 3 bytes become 4
/// characters, the final partial group is padded to 4.
pub fn estimate_encoded_size(raw_bytes: u64) -> u64 {
    raw_bytes.div_ceil(3) * 4
}

/// Upper bound on the encoded payload accepted for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    limit: u64,
}

impl SizeBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn is_within_budget(&self, encoded_bytes: u64) -> bool {
        encoded_bytes <= self.limit
    }

    /// Speculative check on a raw file size, before any encoding happens.
    pub fn admits_raw(&self, raw_bytes: u64) -> bool {
        self.is_within_budget(estimate_encoded_size(raw_bytes))
    }
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_LIMIT)
    }
}

/// Human readable byte count using 1024-based units, e.g. `1.5 KB`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    format!("{text} {}", UNITS[unit])
}
