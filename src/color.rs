//! CSS color parsing and color math.
//!
//! Distances use an approximate Lab conversion with fixed constants
//! (sRGB gamma, D65 white point, `7.787t + 16/116` below `0.008856`). The
//! constants are kept as-is so match scores stay stable across releases; the
//! result is close to, but not exactly, CIE76. Contrast uses palette's WCAG 2.1
//! relative luminance.

use palette::color_difference::Wcag21RelativeContrast;
use palette::Srgb;

/// An 8-bit RGB color with unit-range alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn to_srgb(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }
}

/// Approximate Lab coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` and a handful of
/// keywords. Returns `None` for anything else.
pub fn parse_color(input: &str) -> Option<Rgba> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }
    if s.starts_with('#') {
        return parse_hex(&s);
    }
    if s.starts_with("rgb") {
        return parse_rgb_function(&s);
    }
    named_color(&s)
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let digits = s.trim_start_matches('#');
    match digits.len() {
        3 | 6 => {
            let rgb: Srgb<u8> = digits.parse().ok()?;
            Some(Rgba::rgb(rgb.red, rgb.green, rgb.blue))
        }
        8 => {
            let rgb: Srgb<u8> = digits[..6].parse().ok()?;
            let alpha = u8::from_str_radix(&digits[6..], 16).ok()?;
            Some(Rgba {
                r: rgb.red,
                g: rgb.green,
                b: rgb.blue,
                a: alpha as f64 / 255.0,
            })
        }
        _ => None,
    }
}

fn parse_rgb_function(s: &str) -> Option<Rgba> {
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = &s[open + 1..close];
    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let channel = |raw: &str| -> Option<u8> {
        let value = if let Some(pct) = raw.strip_suffix('%') {
            pct.parse::<f64>().ok()? * 2.55
        } else {
            raw.parse::<f64>().ok()?
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = match parts.get(3) {
        Some(raw) => {
            let value = if let Some(pct) = raw.strip_suffix('%') {
                pct.parse::<f64>().ok()? / 100.0
            } else {
                raw.parse::<f64>().ok()?
            };
            value.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

fn named_color(s: &str) -> Option<Rgba> {
    let rgb = match s {
        "black" => Rgba::rgb(0, 0, 0),
        "white" => Rgba::rgb(255, 255, 255),
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "transparent" => Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0.0,
        },
        _ => return None,
    };
    Some(rgb)
}

/// Approximate Lab conversion.
pub fn rgb_to_lab(color: &Rgba) -> Lab {
    let linear = |c: u8| {
        let v = c as f64 / 255.0;
        if v > 0.04045 {
            ((v + 0.055) / 1.055).powf(2.4)
        } else {
            v / 12.92
        }
    };
    let r = linear(color.r);
    let g = linear(color.g);
    let b = linear(color.b);

    let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) / 0.95047;
    let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) / 1.00000;
    let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) / 1.08883;

    let f = |t: f64| {
        if t > 0.008856 {
            t.powf(1.0 / 3.0)
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };
    let (fx, fy, fz) = (f(x), f(y), f(z));

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Euclidean distance between two colors in approximate Lab space.
pub fn color_distance(a: &Rgba, b: &Rgba) -> f64 {
    let la = rgb_to_lab(a);
    let lb = rgb_to_lab(b);
    let dl = la.l - lb.l;
    let da = la.a - lb.a;
    let db = la.b - lb.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Parse both strings and measure their distance.
pub fn css_color_distance(a: &str, b: &str) -> Option<f64> {
    Some(color_distance(&parse_color(a)?, &parse_color(b)?))
}

/// WCAG 2.1 relative luminance (0.0 for black, 1.0 for white).
pub fn relative_luminance(color: &Rgba) -> f64 {
    color.to_srgb().relative_luminance().luma as f64
}

/// WCAG contrast ratio `(Lmax + 0.05) / (Lmin + 0.05)`, in `1.0..=21.0`.
pub fn contrast_ratio(a: &Rgba, b: &Rgba) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_color("#336699"), Some(Rgba::rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_color("#369"), Some(Rgba::rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_color("  #FFFFFF "), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(
            parse_color("rgb(51, 102, 153)"),
            Some(Rgba::rgb(51, 102, 153))
        );
        let translucent = parse_color("rgba(0, 0, 0, 0.5)").expect("rgba parses");
        assert!((translucent.a - 0.5).abs() < 1e-9);
        let hex_alpha = parse_color("#00000080").expect("8-digit hex parses");
        assert!((hex_alpha.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(parse_color("white"), Some(Rgba::rgb(255, 255, 255)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("linear-gradient(red, blue)"), None);
    }

    #[test]
    fn distance_is_zero_for_identical_colors() {
        for c in [
            Rgba::rgb(0, 0, 0),
            Rgba::rgb(255, 255, 255),
            Rgba::rgb(0x33, 0x66, 0x99),
            Rgba::rgb(200, 10, 77),
        ] {
            assert_eq!(color_distance(&c, &c), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let samples = [
            Rgba::rgb(0, 0, 0),
            Rgba::rgb(255, 0, 0),
            Rgba::rgb(0x33, 0x66, 0x99),
            Rgba::rgb(250, 250, 240),
        ];
        for a in &samples {
            for b in &samples {
                assert!((color_distance(a, b) - color_distance(b, a)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn black_white_distance_is_full_lightness_range() {
        let d = color_distance(&Rgba::rgb(0, 0, 0), &Rgba::rgb(255, 255, 255));
        assert!((d - 100.0).abs() < 0.5, "got {d}");
    }

    #[test]
    fn lab_of_white_uses_fixed_white_point() {
        let lab = rgb_to_lab(&Rgba::rgb(255, 255, 255));
        assert!((lab.l - 100.0).abs() < 0.01);
        assert!(lab.a.abs() < 0.5);
        assert!(lab.b.abs() < 0.5);
    }

    #[test]
    fn contrast_of_black_on_white_is_twenty_one() {
        let ratio = contrast_ratio(&Rgba::rgb(0, 0, 0), &Rgba::rgb(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01, "got {ratio}");
        assert!((contrast_ratio(&Rgba::rgb(9, 9, 9), &Rgba::rgb(9, 9, 9)) - 1.0).abs() < 1e-6);
    }
}
