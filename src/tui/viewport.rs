//! Windowing for long lists: which contiguous slice of rows is on screen.

pub const HEADER_ROWS: u16 = 3;
pub const STATUS_ROWS: u16 = 2;
/// Blank rows above and below the body.
pub const BODY_MARGIN: u16 = 1;
/// Current path line plus its spacer.
pub const PATH_ROWS: u16 = 2;
/// Key hints under the list.
pub const KEY_HINT_ROWS: u16 = 1;
/// Everything drawn around the browser list: header, status bar, body
/// margins, the panel's top and bottom border, path and help line.
pub const BROWSER_OVERHEAD: u16 =
    HEADER_ROWS + STATUS_ROWS + 2 * BODY_MARGIN + 2 + PATH_ROWS + KEY_HINT_ROWS;
/// Extra rows consumed while a search or new-directory input is shown.
pub const INLINE_INPUT_ROWS: u16 = 3;
/// The list always gets at least this many rows, drawn and windowed alike.
pub const MIN_ROWS: usize = 1;

/// Rows available to the list for a terminal `height` rows tall.
pub fn available_rows(height: u16, inline_input: bool) -> usize {
    let mut rows = height.saturating_sub(BROWSER_OVERHEAD);
    if inline_input {
        rows = rows.saturating_sub(INLINE_INPUT_ROWS);
    }
    (rows as usize).max(MIN_ROWS)
}

/// Half-open visible window `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub start: usize,
    pub end: usize,
}

impl Viewport {
    /// Move the window the least distance needed to keep `cursor` visible,
    /// then clamp it to `[0, total)`. `cursor` is clamped as well and the
    /// corrected value returned.
    pub fn follow(&mut self, total: usize, cursor: usize, rows: usize) -> usize {
        let rows = rows.max(1);
        if total == 0 {
            *self = Viewport::default();
            return 0;
        }
        let cursor = cursor.min(total - 1);

        if cursor < self.start {
            self.start = cursor;
        }
        if cursor >= self.start + rows {
            self.start = cursor + 1 - rows;
        }
        // a shrunken list may leave the window hanging past the end
        if self.start + rows > total {
            self.start = total.saturating_sub(rows).min(cursor);
        }
        self.end = (self.start + rows).min(total);
        cursor
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
