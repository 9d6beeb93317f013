/// Arithmetic mean, `None` for an empty input
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    match count {
        0 => None,
        n => Some(sum / n as f64),
    }
}

/// Population standard deviation, `None` for an empty input
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data.iter().copied())?;
    let variance = mean(data.iter().map(|v| (v - data_mean).powi(2)))?;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean([60.0, 60.0, 90.0, 90.0]), Some(75.0));
        assert_eq!(mean(vec![42.0]), Some(42.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_mean_of_scores() {
        let scores: [u8; 3] = [70, 80, 90];
        assert_eq!(mean(scores.iter().map(|s| *s as f64)), Some(80.0));
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), Some(0.0));
        assert_eq!(std_dev(&[60.0, 80.0]), Some(10.0));
        assert_eq!(std_dev(&[]), None);
        let spread = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((spread - 2.0).abs() < 1e-12);
    }
}
