// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::signal::{IndexingDecision, IndexingSignal};

/// Combine the signals into a decision. The force-allow override wins over
/// everything else.
pub fn evaluate(signal: &IndexingSignal) -> IndexingDecision {
    if signal.force_allow {
        return IndexingDecision::ALLOWED;
    }

    IndexingDecision {
        blocked: !signal.site_public || signal.upstream_disallow_all || signal.no_index_directive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_signals() -> Vec<IndexingSignal> {
        (0u8..16)
            .map(|bits| IndexingSignal {
                site_public: bits & 1 != 0,
                upstream_disallow_all: bits & 2 != 0,
                no_index_directive: bits & 4 != 0,
                force_allow: bits & 8 != 0,
            })
            .collect()
    }

    #[test]
    fn test_evaluate_exhaustive() {
        let signals = all_signals();
        assert_eq!(signals.len(), 16);

        for signal in signals {
            let expected = !signal.force_allow
                && (!signal.site_public
                    || signal.upstream_disallow_all
                    || signal.no_index_directive);
            assert_eq!(
                evaluate(&signal).is_blocked(),
                expected,
                "unexpected decision for {signal:?}"
            );
        }
    }

    #[test]
    fn test_force_allow_always_allows() {
        for signal in all_signals().into_iter().filter(|s| s.force_allow) {
            assert_eq!(evaluate(&signal), IndexingDecision::ALLOWED);
        }
    }

    #[test]
    fn test_default_signal_allows() {
        assert!(!evaluate(&IndexingSignal::default()).is_blocked());
    }

    #[test]
    fn test_private_site_blocks() {
        let signal = IndexingSignal {
            site_public: false,
            ..IndexingSignal::default()
        };
        assert_eq!(evaluate(&signal), IndexingDecision::BLOCKED);
    }
}
