/// Hash-based value noise in `[0, 1)`.
///
/// Pure function of its inputs: the classic `fract(sin(dot) * 43758.5453)`
/// hash. Evaluated in `f64` so large products keep enough fractional bits.
pub fn noise(x: f32, y: f32) -> f32 {
    let v = ((x as f64) * 12.9898 + (y as f64) * 78.233).sin() * 43758.5453;
    let f = (v - v.floor()) as f32;
    // f64 -> f32 can round 0.99999999 up to 1.0
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}
