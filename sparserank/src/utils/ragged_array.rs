/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// A [ragged array](https://en.wikipedia.org/wiki/Ragged_array) with a fixed
/// number of rows.
///
/// This structure keeps track of a list of rows of different lengths in a
/// compact form: a vector of values contains all the rows concatenated, and a
/// vector of offsets contains the starting index of each row in the values
/// list. Testing whether a row is empty is thus a constant-time operation, and
/// no allocation per row is necessary.
///
/// Ragged arrays are immutable, and they are built in a single shot by
/// [`from_pairs`](RaggedArray::from_pairs), which groups values by row using a
/// counting sort.
///
/// # Examples
///
/// ```
/// use sparserank::utils::RaggedArray;
///
/// let ragged = RaggedArray::from_pairs(3, [(2, 'a'), (0, 'b'), (2, 'c')]);
/// assert_eq!(ragged.len(), 3);
/// assert_eq!(&ragged[0], &['b']);
/// assert!(ragged[1].is_empty());
/// assert_eq!(&ragged[2], &['a', 'c']);
/// assert_eq!(ragged.num_values(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaggedArray<T> {
    /// The first offset is always zero, and offsets contains one more element
    /// than the number of rows.
    offsets: Vec<usize>,
    /// The concatenation of all rows.
    values: Vec<T>,
}

impl<T> RaggedArray<T> {
    /// Returns the number of rows in the ragged array.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns true if the ragged array has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length of a row.
    #[inline(always)]
    pub fn row_len(&self, row: usize) -> usize {
        self.offsets[row + 1] - self.offsets[row]
    }

    /// Returns the overall number of values in the ragged array.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }
}

impl<T: Copy + Default> RaggedArray<T> {
    /// Builds a ragged array with `num_rows` rows from `(row, value)` pairs.
    ///
    /// Values are grouped by row with a counting sort, so the construction
    /// takes time and space linear in `num_rows` plus the number of pairs, and
    /// the values of each row appear in the order in which they were provided.
    ///
    /// The iterator is traversed twice, once to count the length of each row
    /// and once to place the values.
    ///
    /// # Panics
    ///
    /// Panics if a row index is greater than or equal to `num_rows`.
    pub fn from_pairs<I>(num_rows: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
        I::IntoIter: Clone,
    {
        let pairs = pairs.into_iter();
        let mut offsets = vec![0; num_rows + 1];
        for (row, _) in pairs.clone() {
            assert!(
                row < num_rows,
                "Row {row} does not exist (the array has {num_rows} rows)"
            );
            offsets[row + 1] += 1;
        }
        for i in 0..num_rows {
            offsets[i + 1] += offsets[i];
        }

        let mut values = vec![T::default(); offsets[num_rows]];
        let mut cursor = offsets[..num_rows].to_vec();
        for (row, value) in pairs {
            values[cursor[row]] = value;
            cursor[row] += 1;
        }

        Self { offsets, values }
    }
}

impl<T> core::ops::Index<usize> for RaggedArray<T> {
    type Output = [T];
    /// Retrieves the row at the given index.
    #[inline(always)]
    fn index(&self, row: usize) -> &Self::Output {
        let start = self.offsets[row];
        let end = self.offsets[row + 1];
        &self.values[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_groups_by_row() {
        let pairs = [(1, 10), (3, 30), (1, 11), (0, 0), (3, 31), (3, 32)];
        let grouped = RaggedArray::from_pairs(5, pairs);

        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped.num_values(), pairs.len());
        assert_eq!(&grouped[0], &[0]);
        assert_eq!(&grouped[1], &[10, 11]);
        assert!(grouped[2].is_empty());
        assert_eq!(&grouped[3], &[30, 31, 32]);
        assert!(grouped[4].is_empty());
        assert_eq!(
            (0..5).map(|row| grouped.row_len(row)).collect::<Vec<_>>(),
            vec![1, 2, 0, 3, 0]
        );
    }

    #[test]
    fn test_from_pairs_is_order_sensitive() {
        let a = RaggedArray::from_pairs(2, [(0, 1), (0, 2)]);
        let b = RaggedArray::from_pairs(2, [(0, 2), (0, 1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_pairs_no_rows() {
        let grouped = RaggedArray::<usize>::from_pairs(0, []);
        assert!(grouped.is_empty());
        assert_eq!(grouped.num_values(), 0);
    }

    #[test]
    #[should_panic]
    fn test_from_pairs_row_out_of_bounds() {
        RaggedArray::from_pairs(2, [(2, 0)]);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds() {
        let grouped = RaggedArray::from_pairs(1, [(0, 1)]);
        let _ = &grouped[1];
    }
}
