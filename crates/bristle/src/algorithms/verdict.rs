use crate::types::Verdict;

/// Threshold decision on the per-frame zig-zag count. Holds no state between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictEngine {
    pub pass_threshold: u32,
}

impl VerdictEngine {
    pub fn new(pass_threshold: u32) -> Self {
        Self { pass_threshold }
    }

    pub fn decide(&self, zigzag_count: u32) -> Verdict {
        if zigzag_count >= self.pass_threshold {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl Default for VerdictEngine {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Single-byte codes sent to the actuator board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictCodes {
    pub pass: u8,
    pub fail: u8,
}

impl VerdictCodes {
    pub fn code(&self, verdict: Verdict) -> u8 {
        match verdict {
            Verdict::Pass => self.pass,
            Verdict::Fail => self.fail,
        }
    }
}

impl Default for VerdictCodes {
    fn default() -> Self {
        Self { pass: b'P', fail: b'F' }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let engine = VerdictEngine::default();
        assert_eq!(engine.decide(2), Verdict::Fail);
        assert_eq!(engine.decide(3), Verdict::Pass);
        assert_eq!(engine.decide(10), Verdict::Pass);
    }

    #[test]
    fn test_zero_count_fails() {
        for threshold in 1..5 {
            assert_eq!(VerdictEngine::new(threshold).decide(0), Verdict::Fail);
        }
    }

    #[test]
    fn test_raising_threshold_never_turns_fail_into_pass() {
        for count in 0..12 {
            let mut previous = Verdict::Pass;
            for threshold in 1..15 {
                let verdict = VerdictEngine::new(threshold).decide(count);
                assert!(
                    !(previous == Verdict::Fail && verdict == Verdict::Pass),
                    "count {count}: threshold {threshold} flipped FAIL back to PASS"
                );
                previous = verdict;
            }
        }
    }

    #[test]
    fn test_default_codes() {
        let codes = VerdictCodes::default();
        assert_eq!(codes.code(Verdict::Pass), 0x50);
        assert_eq!(codes.code(Verdict::Fail), 0x46);
    }
}
