//! # User Interface Elements
//!
//! Small drawing helpers shared by the screens: stat bars and text wrapping.

use macroquad::prelude::*;

/// Splits `text` into lines of at most `max_chars` characters, breaking on spaces.
///
/// A single word longer than `max_chars` gets a line of its own.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Fraction of a bar to fill, clamped to 0..=1.
pub fn bar_fill(value: i32, max: i32) -> f32 {
    if max <= 0 {
        return 0.0;
    }
    (value as f32 / max as f32).clamp(0.0, 1.0)
}

/// Draws a labelled horizontal bar such as a health bar.
pub fn draw_bar(x: f32, y: f32, width: f32, value: i32, max: i32, color: Color) {
    draw_rectangle(x, y, width, 12.0, DARKGRAY);
    draw_rectangle(x, y, width * bar_fill(value, max), 12.0, color);
    draw_rectangle_lines(x, y, width, 12.0, 1.0, WHITE);
}
