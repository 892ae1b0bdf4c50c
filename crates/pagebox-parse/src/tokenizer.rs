//! Content stream tokenizer.
//!
//! Splits raw content stream bytes into [`Operator`]s, each carrying the
//! operands that preceded it. Only numbers and names are kept as values;
//! strings, arrays and dictionaries are consumed but kept opaque because
//! the path interpreter never reads them.

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Name(String),
    /// A string, array, dictionary, boolean or null, consumed but not decoded.
    Opaque,
}

impl Operand {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub operands: Vec<Operand>,
}

impl Operator {
    /// The operands as numbers, or `None` if the count differs from `n` or
    /// any operand is not numeric.
    pub fn numbers<const N: usize>(&self) -> Option<[f64; N]> {
        if self.operands.len() != N {
            return None;
        }
        let mut out = [0.0; N];
        for (slot, op) in out.iter_mut().zip(&self.operands) {
            *slot = op.as_f64()?;
        }
        Some(out)
    }
}

/// Tokenize a content stream.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays
/// or dictionaries and for malformed numbers.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut ops = Vec::new();
    let mut stack = Vec::new();

    while let Some(b) = lexer.peek_significant() {
        match b {
            b'/' => stack.push(Operand::Name(lexer.name())),
            b'0'..=b'9' | b'+' | b'-' | b'.' => stack.push(lexer.number()?),
            b'(' | b'<' | b'[' => {
                lexer.skip_value()?;
                stack.push(Operand::Opaque);
            }
            b']' | b'>' | b')' => {
                return Err(BackendError::Interpreter(format!(
                    "unbalanced delimiter {:?} at offset {}",
                    b as char, lexer.pos
                )));
            }
            _ if is_regular(b) => {
                let keyword = lexer.keyword();
                match keyword.as_str() {
                    "true" | "false" | "null" => stack.push(Operand::Opaque),
                    "BI" => {
                        lexer.skip_inline_image();
                        stack.clear();
                    }
                    _ => ops.push(Operator {
                        name: keyword,
                        operands: std::mem::take(&mut stack),
                    }),
                }
            }
            _ => lexer.pos += 1,
        }
    }

    Ok(ops)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    /// Skip whitespace and comments; return the next byte without consuming it.
    fn peek_significant(&mut self) -> Option<u8> {
        while let Some(&b) = self.input.get(self.pos) {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while let Some(&c) = self.input.get(self.pos) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                return Some(b);
            }
        }
        None
    }

    fn take_regular(&mut self) -> &[u8] {
        let start = self.pos;
        while self.input.get(self.pos).is_some_and(|&b| is_regular(b)) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn keyword(&mut self) -> String {
        String::from_utf8_lossy(self.take_regular()).into_owned()
    }

    /// `/Name`, with `#XX` escapes decoded.
    fn name(&mut self) -> String {
        self.pos += 1;
        let raw = self.take_regular();
        let mut out = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                let hex = std::str::from_utf8(&raw[i + 1..i + 3]).ok();
                if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    out.push(v);
                    i += 3;
                    continue;
                }
            }
            out.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.input.get(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(&b) = self.input.get(self.pos) {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let token = std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default();
        match token {
            "" | "+" | "-" | "." | "+." | "-." => Ok(Operand::Number(0.0)),
            _ => token
                .parse::<f64>()
                .map(Operand::Number)
                .map_err(|_| BackendError::Interpreter(format!("invalid number: {token}"))),
        }
    }

    /// Consume one string, array or dictionary.
    fn skip_value(&mut self) -> Result<(), BackendError> {
        match self.input.get(self.pos) {
            Some(b'(') => self.skip_literal_string(),
            Some(b'<') if self.input.get(self.pos + 1) == Some(&b'<') => {
                self.skip_nested(b"<<", b">>", "dictionary")
            }
            Some(b'<') => {
                match self.input[self.pos..].iter().position(|&b| b == b'>') {
                    Some(off) => {
                        self.pos += off + 1;
                        Ok(())
                    }
                    None => Err(BackendError::Interpreter("unterminated hex string".into())),
                }
            }
            Some(b'[') => self.skip_nested(b"[", b"]", "array"),
            _ => Ok(()),
        }
    }

    fn skip_literal_string(&mut self) -> Result<(), BackendError> {
        self.pos += 1;
        let mut depth = 1u32;
        while let Some(&b) = self.input.get(self.pos) {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(BackendError::Interpreter("unterminated literal string".into()))
    }

    /// Skip a bracketed value, descending through nested strings, arrays
    /// and dictionaries.
    fn skip_nested(&mut self, open: &[u8], close: &[u8], what: &str) -> Result<(), BackendError> {
        self.pos += open.len();
        loop {
            let Some(b) = self.peek_significant() else {
                return Err(BackendError::Interpreter(format!("unterminated {what}")));
            };
            if self.input[self.pos..].starts_with(close) {
                self.pos += close.len();
                return Ok(());
            }
            match b {
                b'(' | b'<' | b'[' => self.skip_value()?,
                b'/' => {
                    self.name();
                }
                _ if is_regular(b) => {
                    self.take_regular();
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skip `BI ... ID <data> EI`. The image data is binary, so scan for an
    /// `EI` keyword bounded by whitespace.
    fn skip_inline_image(&mut self) {
        let data = &self.input[self.pos..];
        let mut i = 0;
        while i + 1 < data.len() {
            let before_ok = i == 0 || is_whitespace(data[i - 1]);
            let after_ok = data.get(i + 2).is_none_or(|&b| is_whitespace(b));
            if data[i] == b'E' && data[i + 1] == b'I' && before_ok && after_ok {
                self.pos += i + 2;
                return;
            }
            i += 1;
        }
        self.pos = self.input.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_path_operators() {
        let ops = tokenize(b"1 0 0 1 10 20 cm\n50 60 300 200 re S").unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].name, "cm");
        assert_eq!(ops[0].numbers::<6>(), Some([1.0, 0.0, 0.0, 1.0, 10.0, 20.0]));
        assert_eq!(ops[1].name, "re");
        assert_eq!(ops[1].numbers::<4>(), Some([50.0, 60.0, 300.0, 200.0]));
        assert_eq!(ops[2].name, "S");
        assert!(ops[2].operands.is_empty());
    }

    #[test]
    fn parses_reals_and_signs() {
        let ops = tokenize(b"-.5 +3 4. 0.25 m").unwrap();
        assert_eq!(ops[0].numbers::<4>(), Some([-0.5, 3.0, 4.0, 0.25]));
    }

    #[test]
    fn skips_strings_arrays_and_dicts() {
        let ops = tokenize(b"BT /F1 12 Tf [(A) -120 (B(c)d)] TJ ET /P <</MCID 0 /Alt (x)>> BDC EMC")
            .unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["BT", "Tf", "TJ", "ET", "BDC", "EMC"]);
        assert_eq!(ops[1].operands[0], Operand::Name("F1".into()));
        assert_eq!(ops[2].operands, vec![Operand::Opaque]);
    }

    #[test]
    fn strips_comments() {
        let ops = tokenize(b"% a comment 1 2 m\n0 0 m").unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].numbers::<2>(), Some([0.0, 0.0]));
    }

    #[test]
    fn skips_inline_images() {
        let ops = tokenize(b"q BI /W 2 /H 1 /BPC 8 /CS /G ID \x00\xffEI\x01 EI Q").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["q", "Q"]);
    }

    #[test]
    fn decodes_name_escapes() {
        let ops = tokenize(b"/A#20B gs").unwrap();
        assert_eq!(ops[0].operands[0], Operand::Name("A B".into()));
    }

    #[test]
    fn unterminated_array_is_an_error() {
        assert!(tokenize(b"[1 2 3").is_err());
    }

    #[test]
    fn numbers_requires_exact_arity() {
        let ops = tokenize(b"1 2 3 l").unwrap();
        assert_eq!(ops[0].numbers::<2>(), None);
    }
}
