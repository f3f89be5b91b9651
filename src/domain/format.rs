//! Value formatting: render configuration nodes as display strings
//!
//! Scalars render as their canonical text, arrays and lists as comma-separated
//! numeric elements. Arrays and lists keep the acquisition tooling's element
//! policy: only integers and floats produce text, every other element leaves an
//! empty segment behind (`[1,,3]`).

use itertools::Itertools;

use crate::domain::node::ConfigNode;

/// Significant digits of the general float rendering used inside sequences.
const GENERAL_PRECISION: i32 = 6;

/// Rendering options for groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Render groups nested inside groups with the same block layout.
    /// When false a nested group renders as an empty string.
    pub expand_nested_groups: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            expand_nested_groups: true,
        }
    }
}

impl FormatOptions {
    /// One-level group rendering, matching the historic output.
    pub fn shallow() -> Self {
        Self {
            expand_nested_groups: false,
        }
    }
}

/// Render a single node.
///
/// Groups render as an empty string here; group blocks are built by
/// [`SettingResolver`](crate::domain::SettingResolver).
pub fn format_value(node: &ConfigNode) -> String {
    match node {
        ConfigNode::Integer(v) => v.to_string(),
        ConfigNode::Float(v) => format_fixed(*v),
        ConfigNode::Boolean(v) => u8::from(*v).to_string(),
        ConfigNode::String(v) => v.clone(),
        ConfigNode::Array(items) => format_sequence(items, '[', ']'),
        ConfigNode::List(items) => format_sequence(items, '(', ')'),
        ConfigNode::Group(_) => String::new(),
    }
}

fn format_sequence(items: &[ConfigNode], open: char, close: char) -> String {
    let body = items.iter().map(format_element).join(",");
    format!("{}{}{}", open, body, close)
}

fn format_element(node: &ConfigNode) -> String {
    match node {
        ConfigNode::Integer(v) => v.to_string(),
        ConfigNode::Float(v) => format_general(*v),
        _ => String::new(),
    }
}

/// Fixed notation with six decimals (`1.5` -> `1.500000`).
pub fn format_fixed(value: f64) -> String {
    match non_finite(value) {
        Some(text) => text.to_string(),
        None => format!("{:.6}", value),
    }
}

/// Shortest notation with six significant digits, `%g` style.
///
/// `1.5` -> `1.5`, `100000.0` -> `100000`, `1e6` -> `1e+06`, `0.00001` -> `1e-05`.
pub fn format_general(value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    if value == 0.0 {
        let zero = if value.is_sign_negative() { "-0" } else { "0" };
        return zero.to_string();
    }

    // the exponent after rounding to the target precision decides the notation
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        None
    }
}
