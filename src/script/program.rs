//! Mutable program buffers
//!
//! A program is a raw byte sequence of newline-delimited lines. The first
//! byte of each line is a sigil selecting its instruction class. Zap and
//! restore mutate the buffer in place: a single-byte overwrite of a label's
//! leading sigil, safe under single-threaded cooperative execution.

/// Line sigils.
pub const SIGIL_NAME: u8 = b'@';
pub const SIGIL_LABEL: u8 = b':';
pub const SIGIL_COMMENT: u8 = b'\'';
pub const SIGIL_COMMAND: u8 = b'#';
pub const SIGIL_MOVE: u8 = b'/';
pub const SIGIL_TRY_MOVE: u8 = b'?';
pub const SIGIL_MENU: u8 = b'!';
pub const SIGIL_PRETTY: u8 = b'$';

/// The implied label that always resolves to instruction 0.
pub const RESTART_LABEL: &str = "RESTART";

/// A scripted thing's program text, owned by the board's program bank so
/// several things may be bound to one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBuffer {
    bytes: Vec<u8>,
}

impl ProgramBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Program length. Instruction pointers are signed 16-bit, so buffers
    /// are capped at i16::MAX bytes.
    pub fn len(&self) -> i16 {
        self.bytes.len().min(i16::MAX as usize) as i16
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The rest of the line starting at `ip` (excluding the newline), or
    /// None when `ip` is outside the buffer. `ip` may point mid-line: the
    /// movement sigils advance token by token within one line.
    pub fn line_at(&self, ip: i16) -> Option<&[u8]> {
        if ip < 0 || ip >= self.len() {
            return None;
        }
        let start = ip as usize;
        let end = self.bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|off| start + off)
            .unwrap_or(self.bytes.len());
        Some(&self.bytes[start..end])
    }

    /// Offset of the instruction following the line at `ip`.
    pub fn next_line(&self, ip: i16) -> i16 {
        match self.line_at(ip) {
            Some(line) => (ip + line.len() as i16 + 1).min(self.len()),
            None => self.len(),
        }
    }

    /// The `@` name from the program's first line, lowercased.
    pub fn name(&self) -> Option<String> {
        let first = self.line_at(0)?;
        if first.first() == Some(&SIGIL_NAME) {
            let name = String::from_utf8_lossy(&first[1..]).trim().to_ascii_lowercase();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        } else {
            None
        }
    }

    /// Find the instruction offset of `:label`, case-insensitive on both
    /// sides. The implied label RESTART always resolves to 0 without a scan.
    pub fn seek_label(&self, label: &str) -> Option<i16> {
        if label.eq_ignore_ascii_case(RESTART_LABEL) {
            return Some(0);
        }
        self.find_label(label, SIGIL_LABEL).first().copied()
    }

    /// Disable the first live occurrence of `:label` by overwriting its
    /// sigil with the comment sigil. Returns true if a label was zapped.
    pub fn zap(&mut self, label: &str) -> bool {
        if let Some(&offset) = self.find_label(label, SIGIL_LABEL).first() {
            self.bytes[offset as usize] = SIGIL_COMMENT;
            true
        } else {
            false
        }
    }

    /// Re-enable every zapped occurrence of `'label`. Returns how many were
    /// restored.
    pub fn restore(&mut self, label: &str) -> usize {
        let offsets = self.find_label(label, SIGIL_COMMENT);
        for &offset in &offsets {
            self.bytes[offset as usize] = SIGIL_LABEL;
        }
        offsets.len()
    }

    /// Offsets of every line whose sigil is `sigil` and whose first word
    /// matches `label` case-insensitively. This searches label definitions
    /// themselves, distinct from the seek used for jumps.
    fn find_label(&self, label: &str, sigil: u8) -> Vec<i16> {
        let mut found = vec![];
        let mut ip: i16 = 0;
        while let Some(line) = self.line_at(ip) {
            if line.first() == Some(&sigil) {
                let stored = line[1..]
                    .split(|&b| b == b' ' || b == b'\t')
                    .next()
                    .unwrap_or(&[]);
                if stored.eq_ignore_ascii_case(label.as_bytes()) {
                    found.push(ip);
                }
            }
            ip = self.next_line(ip);
        }
        found
    }
}
