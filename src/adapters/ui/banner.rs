//! Startup banner with a sunrise gradient (SOLAR).
//! Uses the figlet standard font bundled with figlet-rs.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Sunset Orange (#ff5f1f).
const SUNSET_ORANGE: (u8, u8, u8) = (0xff, 0x5f, 0x1f);
/// Solar Yellow (#ffd60a).
const SOLAR_YELLOW: (u8, u8, u8) = (0xff, 0xd6, 0x0a);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints "SOLAR" in figlet ASCII with a gradient from orange to yellow, then
/// version and the URL the UI will be served on. Falls back to plain text if the
/// font cannot be loaded.
pub fn print_welcome(url: &str) {
    let mut out = stdout();
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("SOLAR").map(|figure| figure.to_string()))
        .unwrap_or_else(|| "SOLAR".to_string());
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(SUNSET_ORANGE, SOLAR_YELLOW, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: SOLAR_YELLOW.0,
        g: SOLAR_YELLOW.1,
        b: SOLAR_YELLOW.2,
    }));
    let _ = out.execute(Print(format!("solar-assist v{}\r\n", version)));
    let _ = out.execute(Print(format!("Open {} in your browser (Ctrl+C to stop)\r\n", url)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_rgb(SUNSET_ORANGE, SOLAR_YELLOW, 0.0), SUNSET_ORANGE);
        assert_eq!(lerp_rgb(SUNSET_ORANGE, SOLAR_YELLOW, 1.0), SOLAR_YELLOW);
    }
}
