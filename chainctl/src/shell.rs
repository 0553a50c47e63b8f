// SPDX-License-Identifier: MIT

//! Interactive menu over a mounted store.
//!
//! Selections are 1-based positions in the listing printed right before the
//! prompt. A failed operation is reported and the menu comes back.

use std::io::{BufRead, Write};

use chainfs::prelude::*;
use chainio::prelude::*;
use colored::Colorize;

use crate::render::{write_listing, write_opened};

const MENU: &[&str] = &[
    "Create a file",
    "List files",
    "Open a file",
    "Modify a file",
    "Delete a file",
    "Restore a file",
    "List the recycle bin",
    "Exit",
];

pub struct Shell<'a, IO: BlobIO, R: BufRead, W: Write> {
    fs: &'a mut FatSystem<IO>,
    input: R,
    out: W,
}

impl<'a, IO: BlobIO, R: BufRead, W: Write> Shell<'a, IO, R, W> {
    pub fn new(fs: &'a mut FatSystem<IO>, input: R, out: W) -> Self {
        Self { fs, input, out }
    }

    /// Runs until "Exit" is chosen or the input is exhausted.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.out, "\n--- FAT menu ---")?;
            for (i, item) in MENU.iter().enumerate() {
                writeln!(self.out, "{}. {item}", i + 1)?;
            }
            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(());
            };

            let res = match choice.as_str() {
                "1" => self.create(),
                "2" => self.list(View::Active).map(|_| ()),
                "3" => self.open(),
                "4" => self.modify(),
                "5" => self.delete(),
                "6" => self.restore(),
                "7" => self.list(View::Recycled).map(|_| ()),
                "8" => return Ok(()),
                _ => {
                    writeln!(self.out, "Invalid option.")?;
                    continue;
                }
            };

            match res {
                Ok(()) => {}
                Err(Step::Eof) => return Ok(()),
                Err(Step::Io(e)) => return Err(e.into()),
                Err(Step::Fs(e)) => writeln!(self.out, "{} {e}", "error:".red())?,
            }
        }
    }

    fn create(&mut self) -> StepResult {
        let name = self.ask("File name: ")?;
        let content = self.ask("File content: ")?;
        self.fs.create(&name, &content)?;
        writeln!(self.out, "File created.")?;
        Ok(())
    }

    fn open(&mut self) -> StepResult {
        let Some(index) = self.select(View::Active, "Select the file to open: ")? else {
            return Ok(());
        };
        let file = self.fs.open(index)?;
        write_opened(&mut self.out, &file)?;
        Ok(())
    }

    fn modify(&mut self) -> StepResult {
        let Some(index) = self.select(View::Active, "Select the file to modify: ")? else {
            return Ok(());
        };
        let content = self.ask("New content: ")?;
        self.fs.modify(index, &content)?;
        writeln!(self.out, "File modified.")?;
        Ok(())
    }

    fn delete(&mut self) -> StepResult {
        let Some(index) = self.select(View::Active, "Select the file to delete: ")? else {
            return Ok(());
        };
        self.fs.delete(index)?;
        writeln!(self.out, "File moved to the recycle bin.")?;
        Ok(())
    }

    fn restore(&mut self) -> StepResult {
        let Some(index) = self.select(View::Recycled, "Select the file to restore: ")? else {
            return Ok(());
        };
        self.fs.restore(index)?;
        writeln!(self.out, "File restored.")?;
        Ok(())
    }

    /// Prints the listing of `view` and returns how many rows it has.
    fn list(&mut self, view: View) -> Result<usize, Step> {
        let rows = self.fs.list(view);
        write_listing(&mut self.out, &rows, view)?;
        Ok(rows.len())
    }

    /// Shows `view`, then reads a 1-based selection. `None` when there is
    /// nothing to pick from or the answer is not a number.
    fn select(&mut self, view: View, prompt: &str) -> Result<Option<usize>, Step> {
        if self.list(view)? == 0 {
            return Ok(None);
        }
        let answer = self.ask(prompt)?;
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Some(n - 1)),
            _ => {
                writeln!(self.out, "Invalid number: '{answer}'.")?;
                Ok(None)
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, Step> {
        self.prompt(prompt)?.ok_or(Step::Eof)
    }

    fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Why a menu action stopped early.
enum Step {
    Eof,
    Io(std::io::Error),
    Fs(FsError),
}

type StepResult = Result<(), Step>;

impl From<std::io::Error> for Step {
    fn from(e: std::io::Error) -> Self {
        Step::Io(e)
    }
}

impl From<FsError> for Step {
    fn from(e: FsError) -> Self {
        Step::Fs(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(fs: &mut FatSystem<MemBlobIO>, script: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        Shell::new(fs, script.as_bytes(), &mut out).run().unwrap();
        String::from_utf8(out).unwrap()
    }

    fn mounted() -> FatSystem<MemBlobIO> {
        FatSystem::mount(MemBlobIO::new(), ChainMeta::default()).unwrap()
    }

    #[test]
    fn test_create_open_exit() {
        let mut fs = mounted();
        let text = session(
            &mut fs,
            "1\nnotes.txt\nhello world, this is a test of chunking\n3\n1\n8\n",
        );
        assert!(text.contains("File created."));
        assert!(text.contains("1. notes.txt - 39 characters"));
        assert!(text.contains("Content:\nhello world, this is a test of chunking\n"));
        assert_eq!(fs.list(View::Active).len(), 1);
    }

    #[test]
    fn test_delete_then_restore() {
        let mut fs = mounted();
        fs.create("a.txt", "alpha").unwrap();
        fs.create("b.txt", "bravo").unwrap();

        let text = session(&mut fs, "5\n2\n7\n");
        assert!(text.contains("File moved to the recycle bin."));
        assert!(text.contains("1. b.txt - 5 characters - Deleted: "));
        assert_eq!(fs.list(View::Active).len(), 1);

        let text = session(&mut fs, "6\n1\n2\n8\n");
        assert!(text.contains("File restored."));
        assert_eq!(fs.list(View::Active).len(), 2);
        assert!(fs.list(View::Recycled).is_empty());
    }

    #[test]
    fn test_modify() {
        let mut fs = mounted();
        fs.create("a.txt", "old").unwrap();
        let text = session(&mut fs, "4\n1\nnew content\n");
        assert!(text.contains("File modified."));
        assert_eq!(fs.open(0).unwrap().content, "new content");
    }

    #[test]
    fn test_bad_input_keeps_going() {
        let mut fs = mounted();
        fs.create("a.txt", "x").unwrap();

        let text = session(&mut fs, "9\n3\nabc\n3\n0\n3\n5\n6\n8\n");
        assert!(text.contains("Invalid option."));
        assert!(text.contains("Invalid number: 'abc'."));
        assert!(text.contains("Invalid number: '0'."));
        assert!(text.contains("error: Selection out of range (index: 4, entries: 1)"));
        assert!(text.contains("The recycle bin is empty."));
        // the menu came back after every failure
        assert_eq!(text.matches("--- FAT menu ---").count(), 6);
        assert_eq!(fs.open(0).unwrap().content, "x");
    }

    #[test]
    fn test_eof_ends_session() {
        let mut fs = mounted();
        let text = session(&mut fs, "1\nhalf");
        assert!(text.contains("File content: "));
        assert!(fs.list(View::Active).is_empty());
    }
}
