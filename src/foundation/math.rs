/// `x * y / 255`, truncated. Both operands read as [0,1] factors.
pub(crate) fn mul_div255(x: u8, y: u8) -> u8 {
    ((u16::from(x) * u16::from(y)) / 255) as u8
}

/// Map a percentage in [0,100] onto [0,255], rounded.
pub(crate) fn percent_to_u8(percent: u32) -> u8 {
    let p = f64::from(percent.min(100));
    (255.0 * p / 100.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
