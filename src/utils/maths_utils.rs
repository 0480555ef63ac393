use argminmax::ArgMinMax;

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

pub fn mean(vec: &[f64]) -> f64 {
    vec.iter().sum::<f64>() / vec.len() as f64
}

/// Rounds to `decimals` places. Presentation only: never feed the result
/// back into a recurrence.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
