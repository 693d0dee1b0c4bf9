use quickprint_core::{estimate_encoded_size, SizeBudget, DEFAULT_SIZE_LIMIT};

#[test]
fn estimate_matches_known_values() {
    let cases = [(0, 0), (1, 4), (2, 4), (3, 4), (4, 8), (300_000, 400_000)];
    for (raw, expected) in cases {
        assert_eq!(estimate_encoded_size(raw), expected, "raw = {raw}");
    }
    assert_eq!(estimate_encoded_size(400_000), 533_336);
}

#[test]
fn estimate_is_always_a_multiple_of_four() {
    for raw in (0..2_000).chain([65_535, 65_536, 1 << 20, u32::MAX as u64]) {
        assert_eq!(estimate_encoded_size(raw) % 4, 0, "raw = {raw}");
    }
}

#[test]
fn budget_is_monotonic() {
    let budget = SizeBudget::new(683_000);
    assert!(budget.is_within_budget(683_000));
    assert!(!budget.is_within_budget(683_001));

    for x in [0u64, 1, 4, 400_000, 682_999, 683_000, 683_001, 900_000] {
        if budget.is_within_budget(x) {
            for y in [0, x / 2, x.saturating_sub(1), x] {
                assert!(budget.is_within_budget(y), "{y} <= {x}");
            }
        }
    }
}

#[test]
fn raw_admission_uses_the_estimate() {
    let budget = SizeBudget::new(683_000);
    assert!(budget.admits_raw(400_000));
    // 512_250 raw bytes encode to exactly 683_000 characters.
    assert!(budget.admits_raw(512_250));
    assert!(!budget.admits_raw(512_251));
}

#[test]
fn default_limit_is_750_kib() {
    assert_eq!(SizeBudget::default().limit(), DEFAULT_SIZE_LIMIT);
    assert_eq!(DEFAULT_SIZE_LIMIT, 768_000);
}
