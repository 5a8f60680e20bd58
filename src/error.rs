use core::fmt;

/// Reasons a console request is refused. A refused request changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// Attribute byte outside the legal color set.
    IllegalColor(u8),
    /// Coordinate outside the visible grid.
    OutOfBounds { row: usize, col: usize },
    /// `putbytes` called with nothing to write.
    EmptyWrite,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::IllegalColor(raw) => write!(f, "illegal color attribute {:#04x}", raw),
            ConsoleError::OutOfBounds { row, col } => {
                write!(f, "position ({}, {}) is off screen", row, col)
            }
            ConsoleError::EmptyWrite => f.write_str("nothing to write"),
        }
    }
}
