//! Box layout of an [`InvoiceView`] in view pixels.
//!
//! The layout is a flat list of draw operations; the rasterizer scales it.

use super::view::{BLANK_ROWS, InvoiceView};
use std::path::PathBuf;

pub type Color = [u8; 3];

pub const WHITE: Color = [255, 255, 255];
pub const BLACK: Color = [17, 24, 39];
pub const MUTED: Color = [75, 85, 99];
pub const BORDER: Color = [209, 213, 219];
pub const HEADER_FILL: Color = [243, 244, 246];
pub const ACCENT_PINK: Color = [251, 207, 232];
pub const ACCENT_TEAL: Color = [13, 148, 136];
pub const FOLD: Color = [214, 214, 214];
pub const PAPER_EDGE: Color = [250, 250, 250];
pub const PLACEHOLDER: Color = [229, 231, 235];

/// Native glyph cell of the bitmap font.
pub const GLYPH: u32 = 8;

const LINE: u32 = 12;
const ROW_H: u32 = 24;
const BLANK_ROW_H: u32 = 40;
const CELL_PAD: u32 = 8;
const ACCENT: u32 = 90;
const SIGNATURE_W: u32 = 150;
const SIGNATURE_H: u32 = 75;

/// Column shares of the item table, in percent of the inner width.
const COLUMN_SHARES: [u32; 5] = [8, 44, 12, 18, 18];
const HEADERS: [&str; 5] = ["NO", "DESCRIPTION", "QTY", "PRICE", "SUBTOTAL"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Corner {
    TopLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: Color,
    },
    Frame {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        color: Color,
    },
    Text {
        x: u32,
        y: u32,
        size: u32,
        text: String,
        color: Color,
    },
    Triangle {
        corner: Corner,
        size: u32,
        color: Color,
    },
    Image {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        source: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

pub fn text_width(text: &str, size: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * size
}

/// Cut `text` so that it fits `max_w` pixels at `size`, marking the cut with "..".
pub fn fit(text: &str, max_w: u32, size: u32) -> String {
    let max_chars = (max_w / (GLYPH * size.max(1))) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 2 {
        return text.chars().take(max_chars).collect();
    }
    let mut cut: String = text.chars().take(max_chars - 2).collect();
    cut.push_str("..");
    cut
}

struct Builder {
    ops: Vec<DrawOp>,
}

impl Builder {
    fn text(&mut self, x: u32, y: u32, size: u32, text: &str, color: Color) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            text: text.to_string(),
            color,
        });
    }

    fn centered(&mut self, x: u32, w: u32, y: u32, size: u32, text: &str, color: Color) {
        let text = fit(text, w, size);
        let tw = text_width(&text, size);
        self.text(x + w.saturating_sub(tw) / 2, y, size, &text, color);
    }

    fn right(&mut self, x: u32, w: u32, y: u32, size: u32, text: &str, color: Color) {
        let avail = w.saturating_sub(2 * CELL_PAD);
        let text = fit(text, avail, size);
        let tw = text_width(&text, size);
        self.text(x + w.saturating_sub(CELL_PAD + tw), y, size, &text, color);
    }

    fn left(&mut self, x: u32, w: u32, y: u32, size: u32, text: &str, color: Color) {
        let text = fit(text, w.saturating_sub(2 * CELL_PAD), size);
        self.text(x + CELL_PAD, y, size, &text, color);
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.ops.push(DrawOp::Fill { x, y, w, h, color });
    }

    fn frame(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.ops.push(DrawOp::Frame {
            x,
            y,
            w,
            h,
            color: BORDER,
        });
    }
}

fn column_widths(inner: u32) -> [u32; 5] {
    let mut widths = COLUMN_SHARES.map(|share| inner * share / 100);
    let used: u32 = widths.iter().sum();
    widths[1] += inner - used;
    widths
}

fn title_size(title: &str, inner: u32) -> u32 {
    (1..=3)
        .rev()
        .find(|&s| text_width(title, s) <= inner)
        .unwrap_or(1)
}

pub fn layout(view: &InvoiceView) -> Layout {
    let style = &view.style;
    let width = style.width.max(200);
    let pad = style.padding.min(width / 4);
    let inner = width - 2 * pad;
    let mut b = Builder { ops: Vec::new() };
    let mut y = pad;

    // Title
    let ts = title_size(&view.title, inner);
    b.centered(pad, inner, y, ts, &view.title, BLACK);
    y += GLYPH * ts + 32;

    // Date / number / recipient strip
    let third = inner / 3;
    let meta = [
        ("Date Issued", view.date_issued.as_str()),
        ("Invoice No.", view.invoice_number.as_str()),
        ("Issued To", view.issued_to.as_str()),
    ];
    for (i, (label, value)) in meta.iter().enumerate() {
        let x = pad + third * i as u32;
        b.centered(x, third, y, 1, label, MUTED);
        b.centered(x, third, y + 14, 1, value, BLACK);
    }
    y += 14 + GLYPH + 40;

    // Item table
    let cols = column_widths(inner);
    let col_x: Vec<u32> = cols
        .iter()
        .scan(pad, |x, w| {
            let here = *x;
            *x += w;
            Some(here)
        })
        .collect();

    b.fill(pad, y, inner, ROW_H, HEADER_FILL);
    for (i, header) in HEADERS.iter().enumerate() {
        if i < 2 {
            b.left(col_x[i], cols[i], y + CELL_PAD, 1, header, BLACK);
        } else {
            b.right(col_x[i], cols[i], y + CELL_PAD, 1, header, BLACK);
        }
        b.frame(col_x[i], y, cols[i], ROW_H);
    }
    y += ROW_H;

    let desc_chars = (cols[1].saturating_sub(2 * CELL_PAD) / GLYPH).max(1) as usize;
    for row in &view.rows {
        let lines = textwrap::wrap(&row.description, desc_chars);
        let row_h = ROW_H.max(lines.len() as u32 * LINE + LINE);

        b.left(col_x[0], cols[0], y + CELL_PAD, 1, &row.number, BLACK);
        for (n, line) in lines.iter().enumerate() {
            b.left(col_x[1], cols[1], y + CELL_PAD + n as u32 * LINE, 1, line, BLACK);
        }
        b.right(col_x[2], cols[2], y + CELL_PAD, 1, &row.quantity, BLACK);
        b.right(col_x[3], cols[3], y + CELL_PAD, 1, &row.price, BLACK);
        b.right(col_x[4], cols[4], y + CELL_PAD, 1, &row.subtotal, BLACK);

        for i in 0..cols.len() {
            b.frame(col_x[i], y, cols[i], row_h);
        }
        y += row_h;
    }

    for _ in 0..BLANK_ROWS {
        for i in 0..cols.len() {
            b.frame(col_x[i], y, cols[i], BLANK_ROW_H);
        }
        y += BLANK_ROW_H;
    }

    let label_w = inner - cols[4];
    b.right(pad, label_w, y + CELL_PAD, 1, "GRAND TOTAL", BLACK);
    b.frame(pad, y, label_w, ROW_H);
    b.right(col_x[4], cols[4], y + CELL_PAD, 1, &view.grand_total, BLACK);
    b.frame(col_x[4], y, cols[4], ROW_H);
    y += ROW_H + 40;

    // Closing line
    b.text(pad, y, 2, &view.closing, BLACK);
    y += GLYPH * 2 + 32;

    // Payment information (left) and signature block (right)
    let block_top = y;
    let half = inner / 2;
    b.text(pad, y, 2, "Payment Information", BLACK);
    let mut left_y = y + GLYPH * 2 + 16;
    for line in &view.payment_lines {
        b.text(pad, left_y, 1, &fit(line, half, 1), BLACK);
        left_y += 14;
    }

    let sig_w = SIGNATURE_W.min(half);
    let sig_x = pad + inner - sig_w;
    if let Some(source) = &view.signature {
        b.ops.push(DrawOp::Image {
            x: sig_x,
            y: block_top,
            w: sig_w,
            h: SIGNATURE_H,
            source: source.clone(),
        });
    }
    let rule_y = block_top + SIGNATURE_H + 8;
    b.fill(sig_x, rule_y, sig_w, 1, BLACK);
    b.centered(sig_x, sig_w, rule_y + 8, 1, &view.signatory_name, BLACK);
    b.centered(sig_x, sig_w, rule_y + 22, 1, &view.signatory_role, MUTED);
    let right_y = rule_y + 22 + GLYPH;

    let height = (left_y.max(right_y) + pad).max(style.min_height);

    // Decorations sit behind the content, the fold lines on top of it.
    let mut backdrop = Vec::new();
    if style.paper_edges {
        let edge = width / 20;
        backdrop.push(DrawOp::Fill {
            x: 0,
            y: 0,
            w: edge,
            h: height,
            color: PAPER_EDGE,
        });
        backdrop.push(DrawOp::Fill {
            x: width - edge,
            y: 0,
            w: edge,
            h: height,
            color: PAPER_EDGE,
        });
    }
    if style.corner_accents {
        backdrop.push(DrawOp::Triangle {
            corner: Corner::TopLeft,
            size: ACCENT,
            color: ACCENT_PINK,
        });
        backdrop.push(DrawOp::Triangle {
            corner: Corner::BottomRight,
            size: ACCENT,
            color: ACCENT_TEAL,
        });
    }

    let mut ops = backdrop;
    ops.append(&mut b.ops);

    if style.fold_lines {
        ops.push(DrawOp::Fill {
            x: 0,
            y: height / 2,
            w: width,
            h: 1,
            color: FOLD,
        });
        ops.push(DrawOp::Fill {
            x: width / 2,
            y: 0,
            w: 1,
            h: height,
            color: FOLD,
        });
    }

    Layout { width, height, ops }
}
