/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Sample a standard normal variate (Box-Muller).
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    let u1 = f64_range(rng, f64::EPSILON, 1.0);
    let u2 = f64_range(rng, 0.0, core::f64::consts::TAU);
    (-2.0 * u1.ln()).sqrt() * u2.cos()
}

/// Build a component RNG from an optional base seed and a per-component offset.
pub(crate) fn seeded(seed: Option<u64>, offset: u64) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, |s| {
        fastrand::Rng::with_seed(s.wrapping_add(offset))
    })
}
