use std::ops::Range;

use super::DecompiledDocument;

impl DecompiledDocument {
    /// Best line for `target`: the line with the greatest address not
    /// exceeding it.
    ///
    /// Lines are scanned in order and the scan stops at the first line whose
    /// address exceeds `target`. Decompiler output is expected to be
    /// non-decreasing in address; when it is not, the result is the best
    /// candidate seen before that first larger address, not a global best.
    /// If no line carries an address the first line is returned.
    #[must_use]
    pub fn line_for_address(&self, target: u64) -> Option<usize> {
        let mut candidate = 0;
        for (index, line) in self.lines.iter().enumerate() {
            if line.address.is_some_and(|address| address > target) {
                break;
            }
            let replaces = match (self.lines[candidate].address, line.address) {
                (None, Some(_)) => true,
                (Some(best), Some(address)) => address > best,
                (_, None) => false,
            };
            if replaces {
                candidate = index;
            }
        }
        (!self.lines.is_empty()).then_some(candidate)
    }

    /// Walk back from `index` to the earliest line sharing its address.
    ///
    /// Keeps navigation from landing on e.g. a closing brace attributed to the
    /// same address as the statement that opened it.
    #[must_use]
    pub fn first_of_run(&self, index: usize) -> usize {
        let mut first = index.min(self.lines.len().saturating_sub(1));
        while first > 0 && self.lines[first - 1].address == self.lines[first].address {
            first -= 1;
        }
        first
    }

    /// Line the caret should move to when the host focuses `offset`.
    #[must_use]
    pub fn caret_target(&self, offset: u64) -> Option<usize> {
        self.line_for_address(offset)
            .map(|index| self.first_of_run(index))
    }

    /// Lines that belong to the run starting at `start`.
    ///
    /// The run continues through lines with the same address and through
    /// lines without an address, and ends before the first line carrying a
    /// different address.
    #[must_use]
    pub fn address_run(&self, start: usize) -> Range<usize> {
        let Some(first) = self.lines.get(start) else {
            return start..start;
        };
        let Some(address) = first.address else {
            return start..start + 1;
        };
        let end = self.lines[start + 1..]
            .iter()
            .position(|line| line.address.is_some_and(|other| other != address))
            .map_or(self.lines.len(), |offset| start + 1 + offset);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use crate::document::test_support::document;

    #[test]
    fn picks_greatest_address_not_exceeding_target() {
        let doc = document(&[
            ("int f() {", Some(0x10)),
            ("a();", Some(0x14)),
            ("b();", Some(0x1c)),
            ("}", None),
        ]);
        assert_eq!(doc.line_for_address(0x10), Some(0));
        assert_eq!(doc.line_for_address(0x14), Some(1));
        assert_eq!(doc.line_for_address(0x18), Some(1));
        assert_eq!(doc.line_for_address(0x1c), Some(2));
        assert_eq!(doc.line_for_address(0xffff), Some(2));
    }

    #[test]
    fn never_returns_a_later_address() {
        let doc = document(&[
            ("{", None),
            ("a", Some(2)),
            ("", None),
            ("b", Some(4)),
            ("c", Some(4)),
            ("}", None),
            ("d", Some(9)),
        ]);
        for target in 0..12 {
            let index = doc.line_for_address(target).expect("candidate");
            if let Some(address) = doc.lines()[index].address() {
                assert!(address <= target, "target {target} got {address}");
                let closer = doc
                    .lines()
                    .iter()
                    .filter_map(|line| line.address())
                    .any(|other| other > address && other <= target);
                assert!(!closer, "target {target} skipped a closer address");
            }
        }
    }

    #[test]
    fn target_before_all_addresses_keeps_first_candidate() {
        let doc = document(&[("{", None), ("a", Some(8)), ("b", Some(9))]);
        assert_eq!(doc.line_for_address(4), Some(0));
    }

    #[test]
    fn document_without_addresses_resolves_to_first_line() {
        let doc = document(&[("/* empty */", None), ("", None)]);
        assert_eq!(doc.line_for_address(0x1234), Some(0));
        assert_eq!(doc.caret_target(0x1234), Some(0));
    }

    #[test]
    fn earliest_same_address_line_wins() {
        let doc = document(&[("L0", Some(5)), ("L1", Some(5)), ("L2", Some(7))]);
        assert_eq!(doc.line_for_address(5), Some(0));
        assert_eq!(doc.first_of_run(1), 0);
        assert_eq!(doc.caret_target(5), Some(0));
        assert_eq!(doc.caret_target(6), Some(0));
        assert_eq!(doc.caret_target(7), Some(2));
    }

    #[test]
    fn walk_back_stops_at_address_change() {
        let doc = document(&[("a", Some(1)), ("b", Some(2)), ("c", Some(2)), ("d", Some(2))]);
        assert_eq!(doc.first_of_run(3), 1);
        assert_eq!(doc.first_of_run(0), 0);
    }

    #[test]
    fn non_monotonic_output_degrades_to_first_larger_boundary() {
        // 0x30 appears after a larger address; the scan stops at 0x40.
        let doc = document(&[("a", Some(0x10)), ("b", Some(0x40)), ("c", Some(0x30))]);
        assert_eq!(doc.line_for_address(0x30), Some(0));
    }

    #[test]
    fn run_includes_unaddressed_lines_until_a_new_address() {
        let doc = document(&[
            ("if (x) {", Some(0x10)),
            ("", None),
            ("}", Some(0x10)),
            ("y();", Some(0x18)),
            ("}", None),
        ]);
        assert_eq!(doc.address_run(0), 0..3);
        assert_eq!(doc.address_run(3), 3..5);
    }

    #[test]
    fn run_of_unaddressed_start_is_single_line() {
        let doc = document(&[("{", None), ("a", Some(1))]);
        assert_eq!(doc.address_run(0), 0..1);
        assert_eq!(doc.address_run(9), 9..9);
    }
}
