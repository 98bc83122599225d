//! Vector drawing utilities

/// Generate PDF operators for stroking a rectangle outline
///
/// # Arguments
/// * `x` - X coordinate of the lower-left corner in points (PDF coordinates)
/// * `y` - Y coordinate of the lower-left corner in points (PDF coordinates)
/// * `width` - Rectangle width in points
/// * `height` - Rectangle height in points
/// * `line_width` - Stroke width in points
pub fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    line_width: f64,
) -> Vec<u8> {
    let mut ops = String::new();

    // Graphics state is saved and restored so the stroke settings don't leak
    // into subsequent content.
    ops.push_str("q\n");
    ops.push_str(&format!("{line_width} w\n"));
    ops.push_str("0 0 0 RG\n");
    ops.push_str(&format!("{x} {y} {width} {height} re\n"));
    ops.push_str("S\n");
    ops.push_str("Q\n");

    ops.into_bytes()
}
