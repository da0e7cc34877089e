use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use super::Odometer;

/// A rectangular array of any rank, stored in row-major order.
///
/// # Examples
///
/// ```
/// use el_codec::array::NdArray;
///
/// let grid = NdArray::from_fn(&[2, 3], |index| index[0] * 10 + index[1]);
///
/// assert_eq!(grid.rank(), 2);
/// assert_eq!(grid[&[1, 2]], 12);
/// assert_eq!(grid.as_slice(), [0, 1, 2, 10, 11, 12]);
/// assert!(grid.get(&[2, 0]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> NdArray<T> {
    /// Wraps `data` in the given shape.
    ///
    /// Returns `None` unless `data` holds exactly one value per cell.
    pub fn from_shape_vec(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Option<Self> {
        let shape = shape.into();
        let cells = shape.iter().try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))?;
        (cells == data.len()).then_some(Self { shape, data })
    }

    /// Builds an array by calling `f` with each multi-index, in row-major order.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let data = Odometer::new(shape).map(|index| f(&index)).collect();
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    /// A rank-1 array holding `data`.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// A rank-0 array holding one value.
    #[inline]
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// An array of the given shape with every cell set to `value`.
    pub fn filled(shape: &[usize], value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(shape, |_| value.clone())
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The size of each dimension.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The row-major position of a multi-index, if it lies inside the shape.
    #[inline]
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        row_major_offset(&self.shape, index)
    }

    #[inline]
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset(index).map(|offset| &self.data[offset])
    }

    #[inline]
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.offset(index).map(|offset| &mut self.data[offset])
    }

    /// Cells in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Cells with their multi-index, in row-major order.
    pub fn indexed_iter(&self) -> impl ExactSizeIterator<Item = (Vec<usize>, &T)> {
        Odometer::new(&self.shape).zip(self.data.iter())
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The cells in row-major order.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

pub(super) fn row_major_offset(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != shape.len() {
        return None;
    }
    let mut offset = 0;
    for (&at, &dim) in index.iter().zip(shape) {
        if at >= dim {
            return None;
        }
        offset = offset * dim + at;
    }
    Some(offset)
}

impl<T> Default for NdArray<T> {
    /// An empty rank-1 array.
    #[inline]
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<T> Index<&[usize]> for NdArray<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &T {
        match self.offset(index) {
            Some(offset) => &self.data[offset],
            None => panic!("index {index:?} is outside an array of shape {:?}", self.shape),
        }
    }
}

impl<T, const N: usize> Index<&[usize; N]> for NdArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: &[usize; N]) -> &T {
        &self[index.as_slice()]
    }
}

impl<T> IndexMut<&[usize]> for NdArray<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut T {
        match self.offset(index) {
            Some(offset) => &mut self.data[offset],
            None => panic!("index {index:?} is outside an array of shape {:?}", self.shape),
        }
    }
}

impl<T, const N: usize> IndexMut<&[usize; N]> for NdArray<T> {
    #[inline]
    fn index_mut(&mut self, index: &[usize; N]) -> &mut T {
        &mut self[index.as_slice()]
    }
}

impl<T> From<Vec<T>> for NdArray<T> {
    #[inline]
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<'a, T> IntoIterator for &'a NdArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::NdArray;

    #[test]
    fn offsets_are_row_major() {
        let array = NdArray::from_shape_vec([2, 2, 3], (0..12).collect()).unwrap();
        assert_eq!(array.offset(&[1, 0, 2]), Some(8));
        assert_eq!(array[&[1, 1, 0]], 9);
        assert_eq!(array.offset(&[1, 0]), None);
    }

    #[test]
    fn shape_must_match_data() {
        assert!(NdArray::from_shape_vec([2, 2], vec![1, 2, 3]).is_none());
        assert!(NdArray::<u8>::from_shape_vec([0, 5], vec![]).is_some());
        assert_eq!(NdArray::scalar('x').len(), 1);
    }

    #[test]
    fn indexed_iter_pairs_cells() {
        let mut array = NdArray::filled(&[2, 2], 0_u8);
        array[&[0, 1]] = 5;
        let found: Vec<_> = array
            .indexed_iter()
            .filter(|(_, value)| **value != 0)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(found, [vec![0, 1]]);
    }
}
