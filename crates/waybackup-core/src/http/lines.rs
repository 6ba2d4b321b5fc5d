//! Incremental line splitting over arbitrary body chunks.

/// Buffers a partial line between chunks and emits each complete line once.
///
/// `\n` and `\r\n` endings are accepted, blank lines are dropped and invalid
/// UTF-8 is replaced rather than rejected.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    /// Feed one chunk; complete lines go to `on_line` in order.
    pub fn push(&mut self, chunk: &[u8], on_line: &mut dyn FnMut(&str)) {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.pending.extend_from_slice(&rest[..pos]);
            emit(&self.pending, on_line);
            self.pending.clear();
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
    }

    /// Flush a trailing line that had no terminator.
    pub fn finish(self, on_line: &mut dyn FnMut(&str)) {
        if !self.pending.is_empty() {
            emit(&self.pending, on_line);
        }
    }
}

fn emit(raw: &[u8], on_line: &mut dyn FnMut(&str)) {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim_end_matches('\r');
    if !line.trim().is_empty() {
        on_line(line);
    }
}
