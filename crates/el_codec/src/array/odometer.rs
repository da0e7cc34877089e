use alloc::vec;
use alloc::vec::Vec;
use core::iter::FusedIterator;

/// Iterates every multi-index of a shape in row-major order.
///
/// The last index moves fastest. When it passes its bound it resets to zero
/// and carries into the index on its left, like the wheels of an odometer.
///
/// A rank-0 shape yields one empty index. A shape with a zero-sized
/// dimension yields nothing.
///
/// # Examples
///
/// ```
/// use el_codec::array::Odometer;
///
/// let visited: Vec<Vec<usize>> = Odometer::new(&[2, 3]).collect();
/// assert_eq!(visited, [
///     [0, 0], [0, 1], [0, 2],
///     [1, 0], [1, 1], [1, 2],
/// ]);
///
/// assert_eq!(Odometer::new(&[]).collect::<Vec<_>>(), [Vec::<usize>::new()]);
/// assert_eq!(Odometer::new(&[4, 0]).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Odometer {
    shape: Vec<usize>,
    current: Vec<usize>,
    remaining: usize,
}

impl Odometer {
    pub fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            current: vec![0; shape.len()],
            remaining: shape.iter().product(),
        }
    }

    // Advances `current` by one step.
    fn turn(&mut self) {
        for (index, bound) in self.current.iter_mut().zip(&self.shape).rev() {
            *index += 1;
            if *index < *bound {
                return;
            }
            *index = 0;
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let visited = self.current.clone();
        self.turn();
        Some(visited)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Odometer {}

impl FusedIterator for Odometer {}

#[cfg(test)]
mod tests {
    use super::Odometer;
    use alloc::vec::Vec;

    #[test]
    fn rank_three_order() {
        let visited: Vec<Vec<usize>> = Odometer::new(&[2, 1, 2]).collect();
        assert_eq!(visited, [[0, 0, 0], [0, 0, 1], [1, 0, 0], [1, 0, 1]]);
    }

    #[test]
    fn reports_exact_length() {
        let mut odometer = Odometer::new(&[3, 4]);
        assert_eq!(odometer.len(), 12);
        odometer.next();
        assert_eq!(odometer.len(), 11);
        assert_eq!(odometer.last(), Some(Vec::from([2, 3])));
    }
}
