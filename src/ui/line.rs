use ratatui::buffer::Buffer;
use unicode_width::UnicodeWidthChar;

use crate::ui::theme::LineColors;

/// Write `text` into row `y` starting at column `x`, one cell per char.
///
/// The column advances by each char's display width, so wide (e.g. CJK)
/// chars take two columns and zero-width chars are overwritten by the next
/// one. Text is neither wrapped nor clipped; cells outside the buffer are
/// skipped. Returns the column after the last char.
pub fn draw_line(buf: &mut Buffer, x: u16, y: u16, text: &str, colors: LineColors) -> u16 {
    let mut col = x;
    for ch in text.chars() {
        if let Some(cell) = buf.cell_mut((col, y)) {
            cell.set_char(ch).set_fg(colors.fg).set_bg(colors.bg);
        }
        col = col.saturating_add(ch.width().unwrap_or(0) as u16);
    }
    col
}
