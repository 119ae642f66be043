/// Evenly spaced samples over a closed interval, like numpy.linspace
pub(crate) struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            // REVIEW: try_from instead of cast?
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Samples from `min` to `max` (both included) spaced by roughly `step`.
    ///
    /// The sample count is `floor((max - min) / step) + 1`, with a small
    /// tolerance so that `(50 - 39) / 0.1` still yields 111 samples.
    pub(crate) fn with_step(min: f64, max: f64, step: f64) -> Self {
        let num = ((max - min) / step + 1e-9).floor() as usize + 1;

        Self::new(min, max, num)
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does, which pins
            // the last sample to the end point
            let i = self.index;
            self.index += 1;
            if i + 1 == self.len && i > 0 {
                return Some(self.end);
            }
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace_with_step() {
    let universe: Vec<f64> = Linspace::with_step(0., 10., 1.).collect();

    assert_eq!(universe, vec![0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10.]);

    let universe: Vec<f64> = Linspace::with_step(39., 50., 0.1).collect();

    assert_eq!(universe.len(), 111);
    assert_eq!(universe.first(), Some(&39.));
    assert_eq!(universe.last(), Some(&50.));
}

#[test]
fn test_linspace_single_point() {
    let universe: Vec<f64> = Linspace::with_step(5., 5., 1.).collect();

    assert_eq!(universe, vec![5.]);
}
