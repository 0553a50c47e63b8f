// SPDX-License-Identifier: MIT

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Fixed-width tag used in text reports.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERR ",
        }
    }
}

/// What a finding is about. Each code has a fixed severity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FindingCode {
    /// An entry has no first block.
    MissingHead,
    /// A chain could not be walked to its terminal block.
    BrokenChain,
    /// A block is linked from two places.
    SharedBlock,
    /// The cached length differs from the reassembled one.
    LengthMismatch,
    /// A block holds more characters than the block size.
    OversizedBlock,
    /// A non-terminal block holds fewer characters than the block size.
    ShortBlock,
    /// A block record no chain reaches.
    OrphanBlock,
    /// A record in the data namespace that is not named like a block.
    ForeignRecord,
    Summary,
}

impl FindingCode {
    pub fn severity(self) -> Severity {
        use FindingCode::*;
        match self {
            MissingHead | BrokenChain | SharedBlock | LengthMismatch => Severity::Error,
            OversizedBlock | ShortBlock | OrphanBlock | ForeignRecord => Severity::Warn,
            Summary => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        use FindingCode::*;
        match self {
            MissingHead => "MISSING_HEAD",
            BrokenChain => "BROKEN_CHAIN",
            SharedBlock => "SHARED_BLOCK",
            LengthMismatch => "LENGTH_MISMATCH",
            OversizedBlock => "OVERSIZED_BLOCK",
            ShortBlock => "SHORT_BLOCK",
            OrphanBlock => "ORPHAN_BLOCK",
            ForeignRecord => "FOREIGN_RECORD",
            Summary => "SUMMARY",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub code: FindingCode,
    pub msg: String,
}

impl Finding {
    pub fn new(code: FindingCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Outcome of a consistency check, in discovery order.
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
}

impl VerifyReport {
    pub fn push(&mut self, f: Finding) {
        self.findings.push(f)
    }

    pub fn has_error(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn ok(&self) -> bool {
        !self.has_error()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    pub fn count(&self, s: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity() == s).count()
    }

    pub fn with_code(&self, code: FindingCode) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.code == code)
    }

    /// Message of the summary finding, if the check got that far.
    pub fn summary(&self) -> Option<&str> {
        self.with_code(FindingCode::Summary)
            .next()
            .map(|f| f.msg.as_str())
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for it in &self.findings {
            writeln!(f, "{}: {:<16} {}", it.severity().label(), it.code, it.msg)?;
        }
        write!(
            f,
            "errors={} warns={}",
            self.count(Severity::Error),
            self.count(Severity::Warn)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_display() {
        let mut rep = VerifyReport::default();
        rep.push(Finding::new(FindingCode::OrphanBlock, "Data/x.json"));
        rep.push(Finding::new(FindingCode::Summary, "2 entries"));
        assert!(rep.ok());
        assert_eq!(rep.summary(), Some("2 entries"));

        rep.push(Finding::new(FindingCode::BrokenChain, "notes.txt"));
        assert!(rep.has_error());
        assert_eq!(rep.errors().next().map(|f| f.msg.as_str()), Some("notes.txt"));
        assert_eq!(rep.count(Severity::Warn), 1);
        assert_eq!(rep.with_code(FindingCode::OrphanBlock).count(), 1);

        let text = rep.to_string();
        assert!(text.contains("WARN: ORPHAN_BLOCK     Data/x.json"));
        assert!(text.ends_with("errors=1 warns=1"));
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error > Severity::Warn);
        assert!(Severity::Warn > Severity::Info);
        assert_eq!(FindingCode::ShortBlock.severity(), Severity::Warn);
        assert_eq!(FindingCode::SharedBlock.severity(), Severity::Error);
    }
}
