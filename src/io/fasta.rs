use anyhow::Result;
use std::io::BufRead;

/// A FASTA record; `seq` is upper-cased with all whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    /// Reads one line into `buf`; returns false on EOF.
    fn fill_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n == 0 {
            self.done = true;
        }
        Ok(n > 0)
    }

    fn header_of(line: &str) -> Option<String> {
        line.strip_prefix('>').map(|h| h.trim().to_string())
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // Skip anything before the first header
        let header = match self.peek_header.take() {
            Some(h) => h,
            None => loop {
                if !self.fill_line()? {
                    return Ok(None);
                }
                if let Some(h) = Self::header_of(&self.buf) {
                    break h;
                }
            },
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut seq: Vec<u8> = Vec::new();
        while self.fill_line()? {
            if let Some(h) = Self::header_of(&self.buf) {
                self.peek_header = Some(h);
                break;
            }
            seq.extend(
                self.buf
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }

    /// Reads every remaining record.
    pub fn read_all(&mut self) -> Result<Vec<FastaRecord>> {
        let mut records = Vec::new();
        while let Some(rec) = self.next_record()? {
            records.push(rec);
        }
        Ok(records)
    }
}
