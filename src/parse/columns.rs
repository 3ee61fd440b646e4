//! Fixed-width column handling for text recovered from PDF tables.
//!
//! `pdftotext -layout` aligns table cells with spaces, so offsets are counted in characters,
//! never in bytes.

use super::Error;

/// Start offsets of exactly `K` text columns. The last column runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBoundaries<const K: usize> {
    starts: [usize; K],
}

impl<const K: usize> ColumnBoundaries<K> {
    /// Fails unless there are exactly `K` distinct offsets.
    pub fn new(mut starts: Vec<usize>) -> Result<Self, Error> {
        starts.sort_unstable();
        if starts.len() != K {
            return Err(Error::missing_structure(format!(
                "{} of {K} columns detected",
                starts.len()
            )));
        }
        if starts.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(Error::missing_structure(format!(
                "column offsets overlap: {starts:?}"
            )));
        }
        let mut boundaries = [0; K];
        boundaries.copy_from_slice(&starts);
        Ok(Self { starts: boundaries })
    }

    pub const fn starts(&self) -> &[usize; K] {
        &self.starts
    }

    /// Cuts `line` into its `K` columns. Columns past the end of a short line are empty.
    pub fn slice<'a>(&self, line: &'a str) -> [&'a str; K] {
        std::array::from_fn(|i| {
            let end = self.starts.get(i + 1).copied().unwrap_or(usize::MAX);
            char_slice(line, self.starts[i], end)
        })
    }

    /// Appends every line's columns to one text blob per column, separated by a space.
    pub fn blobs<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> [String; K] {
        let mut blobs: [String; K] = std::array::from_fn(|_| String::new());
        for line in lines {
            for (blob, cell) in blobs.iter_mut().zip(self.slice(line)) {
                blob.push(' ');
                blob.push_str(cell);
            }
        }
        blobs
    }
}

/// The character offset of the byte offset `byte_idx` in `line`.
pub fn char_offset(line: &str, byte_idx: usize) -> usize {
    line.get(..byte_idx).map_or(0, |prefix| prefix.chars().count())
}

/// The characters `start..end` of `line`, clamped to its length.
pub fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let byte_at = |idx: usize| {
        line.char_indices()
            .nth(idx)
            .map_or(line.len(), |(byte, _)| byte)
    };
    let start = byte_at(start);
    let end = if end == usize::MAX { line.len() } else { byte_at(end) };
    line.get(start..end.max(start)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_exact_count() {
        assert!(ColumnBoundaries::<3>::new(vec![0, 10]).is_err());
        assert!(ColumnBoundaries::<2>::new(vec![4, 4]).is_err());
        let columns = ColumnBoundaries::<3>::new(vec![20, 0, 10]).unwrap();
        assert_eq!(columns.starts(), &[0, 10, 20]);
    }

    #[test]
    fn test_slice_counts_characters() {
        let columns = ColumnBoundaries::<3>::new(vec![0, 6, 12]).unwrap();
        assert_eq!(columns.slice("Müsli Kaffee€ 1,00"), ["Müsli ", "Kaffee", "€ 1,00"]);
        assert_eq!(columns.slice("Tee"), ["Tee", "", ""]);
    }

    #[test]
    fn test_blobs() {
        let columns = ColumnBoundaries::<2>::new(vec![0, 5]).unwrap();
        let [left, right] = columns.blobs(["ab   cd", "ef"]);
        assert_eq!(left, " ab    ef");
        assert_eq!(right, " cd ");
    }

    #[test]
    fn test_char_offset() {
        let line = "Grüß Gott";
        let byte = line.find("Gott").unwrap();
        assert_eq!(char_offset(line, byte), 5);
        assert_eq!(char_slice(line, 5, usize::MAX), "Gott");
    }
}
