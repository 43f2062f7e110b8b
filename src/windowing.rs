//! Non-overlapping fixed-size window views.

use crate::errors::{MfdfaError, MfdfaResult};
use std::slice::ChunksExact;

/// Read-only view of a sequence as consecutive, non-overlapping windows.
///
/// Row `k` is `data[k * size .. (k + 1) * size]`. A trailing remainder shorter
/// than `size` is dropped; nothing is padded or copied.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    data: &'a [f64],
    size: usize,
}

impl<'a> WindowView<'a> {
    /// Create a view of `data` with windows of `size` samples.
    pub fn new(data: &'a [f64], size: usize) -> MfdfaResult<Self> {
        if size == 0 {
            return Err(MfdfaError::InvalidParameter {
                parameter: "window_size".to_string(),
                value: 0.0,
                constraint: "> 0".to_string(),
            });
        }
        Ok(Self { data, size })
    }

    /// Window length.
    pub fn window_size(&self) -> usize {
        self.size
    }

    /// Number of complete windows.
    pub fn len(&self) -> usize {
        self.data.len() / self.size
    }

    /// Whether not even one complete window fits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window `k`, if it exists.
    pub fn row(&self, k: usize) -> Option<&'a [f64]> {
        if k < self.len() {
            Some(&self.data[k * self.size..(k + 1) * self.size])
        } else {
            None
        }
    }

    /// Iterate over the complete windows in order.
    pub fn iter(&self) -> ChunksExact<'a, f64> {
        self.data.chunks_exact(self.size)
    }

    /// The prefix of the data covered by complete windows.
    pub fn covered(&self) -> &'a [f64] {
        &self.data[..self.len() * self.size]
    }
}

impl<'a> IntoIterator for WindowView<'a> {
    type Item = &'a [f64];
    type IntoIter = ChunksExact<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_shape_and_round_trip() {
        let data: Vec<f64> = (0..23).map(|i| i as f64).collect();
        let view = WindowView::new(&data, 5).unwrap();

        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|w| w.len() == 5));

        let joined: Vec<f64> = view.iter().flatten().copied().collect();
        assert_eq!(joined.as_slice(), &data[..20]);
        assert_eq!(view.covered(), &data[..20]);
    }

    #[test]
    fn test_rows_alias_input() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view = WindowView::new(&data, 2).unwrap();
        assert_eq!(view.row(0), Some(&data[0..2]));
        assert_eq!(view.row(2), Some(&data[4..6]));
        assert_eq!(view.row(3), None);
        assert_eq!(view.window_size(), 2);
    }

    #[test]
    fn test_window_larger_than_data() {
        let data = [1.0, 2.0, 3.0];
        let view = WindowView::new(&data, 4).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.into_iter().count(), 0);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            WindowView::new(&[1.0], 0),
            Err(MfdfaError::InvalidParameter { .. })
        ));
    }
}
