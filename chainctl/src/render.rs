// SPDX-License-Identifier: MIT

use std::io::{self, Write};

use chainfs::prelude::*;
use chainfs::{format_optional, format_timestamp};
use colored::Colorize;

/// Writes one numbered line per listed entry (1-based).
pub fn write_listing<W: Write>(out: &mut W, rows: &[Listing<'_>], view: View) -> io::Result<()> {
    if rows.is_empty() {
        let msg = match view {
            View::Active => "No files available.",
            View::Recycled => "The recycle bin is empty.",
        };
        return writeln!(out, "{}", msg.dimmed());
    }

    for row in rows {
        let e = row.entry;
        match view {
            View::Active => writeln!(
                out,
                "{}. {} - {} characters - Created: {} - Modified: {}",
                row.index + 1,
                e.name.bold(),
                e.total_length,
                format_timestamp(e.created_at),
                or_dash(format_optional(e.modified_at)),
            )?,
            View::Recycled => writeln!(
                out,
                "{}. {} - {} characters - Deleted: {}",
                row.index + 1,
                e.name.bold(),
                e.total_length,
                or_dash(format_optional(e.deleted_at)),
            )?,
        }
    }
    Ok(())
}

pub fn write_opened<W: Write>(out: &mut W, file: &OpenedFile) -> io::Result<()> {
    let e = &file.entry;
    writeln!(out, "File: {}", e.name.bold())?;
    writeln!(out, "Size: {} characters", e.total_length)?;
    writeln!(out, "Created: {}", format_timestamp(e.created_at))?;
    writeln!(out, "Modified: {}", or_dash(format_optional(e.modified_at)))?;
    writeln!(out, "Content:")?;
    writeln!(out, "{}", file.content)
}

pub fn write_report<W: Write>(out: &mut W, report: &VerifyReport) -> io::Result<()> {
    for f in &report.findings {
        let label = f.severity().label();
        let tag = match f.severity() {
            Severity::Info => label.normal(),
            Severity::Warn => label.yellow(),
            Severity::Error => label.red(),
        };
        writeln!(out, "{tag}: {:<16} {}", f.code, f.msg)?;
    }

    let verdict = if report.ok() {
        "store is consistent".green()
    } else {
        "store has errors".red()
    };
    writeln!(
        out,
        "{verdict} (errors={} warns={})",
        report.count(Severity::Error),
        report.count(Severity::Warn)
    )
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".into() } else { s }
}
