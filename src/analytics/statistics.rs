// Mean and population standard deviation over buffered readings

use libm::sqrtf;

/// Arithmetic mean, `0.0` for an empty input
pub fn mean<'a, I>(samples: I) -> f32
where
    I: IntoIterator<Item = &'a f32>,
{
    let (sum, count) = samples
        .into_iter()
        .fold((0.0f32, 0usize), |(sum, count), &x| (sum + x, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Population standard deviation around a given mean
///
/// Divides by the sample count, not count - 1. Returns `0.0` for an empty
/// input.
pub fn population_std_dev<'a, I>(samples: I, mean: f32) -> f32
where
    I: IntoIterator<Item = &'a f32>,
{
    let (sum_sq, count) = samples.into_iter().fold((0.0f32, 0usize), |(acc, count), &x| {
        let deviation = x - mean;
        (acc + deviation * deviation, count + 1)
    });

    if count == 0 {
        0.0
    } else {
        sqrtf(sum_sq / count as f32)
    }
}
