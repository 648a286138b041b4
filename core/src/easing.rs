pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t).powi(3)
}

pub fn progress(now: f64, start: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now - start) / duration_ms).clamp(0.0, 1.0)
}
