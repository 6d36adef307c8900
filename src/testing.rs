use rand::distr::StandardUniform;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Fixed random seed to support repeatable testing
const SEED: [u8; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6,
    5, 4, 3, 2, 1,
];

/// Get a random number generator with a const seed for repeatable testing
pub fn rng_fixed_seed() -> StdRng {
    StdRng::from_seed(SEED)
}

/// Generate `n` random numbers using provided generator
pub fn randn<T>(rng: &mut StdRng, n: usize) -> Vec<T>
where
    StandardUniform: rand::distr::Distribution<T>,
{
    (0..n).map(|_| rng.random::<T>()).collect()
}

/// A table of `n` knots with spacing in [0.1, 1.1) and y values in [-1, 1)
pub fn random_knots(rng: &mut StdRng, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut x = 0.0;
    let xs = randn::<f64>(rng, n)
        .into_iter()
        .map(|dx| {
            x += 0.1 + dx;
            x
        })
        .collect();
    let ys = randn::<f64>(rng, n)
        .into_iter()
        .map(|y| 2.0 * y - 1.0)
        .collect();
    (xs, ys)
}
