use super::UpsertError;

/// Slices a row source into consecutive batches.
///
/// # Arguments
///
/// * `data` - the rows to slice
/// * `batch_size` - the maximum number of rows in a batch
///
/// # Remarks
///
/// Batches are produced lazily and preserve the input order. Every batch holds `batch_size`
/// rows except possibly the last one. An empty input yields no batches. The source is
/// consumed exactly once, so slicing a one-shot iterator cannot be repeated.
pub fn slice_batches<I: IntoIterator>(
    data: I,
    batch_size: usize,
) -> Result<Batches<I::IntoIter>, UpsertError> {
    if batch_size == 0 {
        Err(UpsertError::InvalidBatchSize)
    } else {
        Ok(Batches {
            iter: data.into_iter(),
            size: batch_size,
        })
    }
}

/// Represents an iterator over fixed-size batches of rows.
pub struct Batches<I> {
    iter: I,
    size: usize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.size.min(self.iter.size_hint().0.max(1)));

        batch.extend(self.iter.by_ref().take(self.size));

        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|n| n.div_ceil(self.size)),
        )
    }
}
