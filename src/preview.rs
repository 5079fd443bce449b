//! Per-entry previews.
//!
//! Previews run the same pipeline as export, but failures are isolated: a
//! broken upload yields an `Err` in its own slot and every other entry is
//! still rendered. Entries are independent, so they are transformed on the
//! rayon pool; results come back in collection order.

use crate::collection::UploadCollection;
use crate::imaging::{self, ImageBackend, TransformError, TransformParams, Transformed};
use rayon::prelude::*;

/// Preview result for one collection entry.
#[derive(Debug)]
pub struct PreviewOutcome {
    pub index: usize,
    pub name: String,
    pub result: Result<Transformed, TransformError>,
}

impl PreviewOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Render a single entry, if it exists.
pub fn preview_entry(
    backend: &impl ImageBackend,
    collection: &UploadCollection,
    index: usize,
    params: &TransformParams,
) -> Option<PreviewOutcome> {
    let entry = collection.get(index)?;
    Some(PreviewOutcome {
        index,
        name: entry.name().to_string(),
        result: imaging::run(backend, entry, params),
    })
}

/// Render every entry, in parallel, in collection order.
pub fn preview_all(
    backend: &impl ImageBackend,
    collection: &UploadCollection,
    params: &TransformParams,
) -> Vec<PreviewOutcome> {
    collection
        .as_slice()
        .par_iter()
        .enumerate()
        .map(|(index, entry)| {
            let result = imaging::run(backend, entry, params);
            if let Err(e) = &result {
                tracing::warn!(entry = %e.entry_name, error = %e.cause, "Preview failed");
            }
            PreviewOutcome {
                index,
                name: entry.name().to_string(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::UploadEntry;
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::{OutputPolicy, SizePreset};

    fn params() -> TransformParams {
        TransformParams {
            size: SizePreset::Blog.spec(),
            sharpen: true,
            output: OutputPolicy::PreserveSource,
        }
    }

    fn collection() -> UploadCollection {
        let mut c = UploadCollection::new();
        c.append(vec![
            UploadEntry::new("a.png", b"A".to_vec()),
            UploadEntry::new("bad.png", b"BAD".to_vec()),
            UploadEntry::new("c.png", b"C".to_vec()),
        ]);
        c
    }

    #[test]
    fn failures_are_isolated_per_entry() {
        let backend = MockBackend::failing_on(&[b"BAD"]);
        let outcomes = preview_all(&backend, &collection(), &params());

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());
        let err = outcomes[1].result.as_ref().unwrap_err();
        assert_eq!(err.entry_name, "bad.png");
    }

    #[test]
    fn outcomes_keep_collection_order() {
        let backend = MockBackend::new();
        let outcomes = preview_all(&backend, &collection(), &params());
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "bad.png", "c.png"]);
        let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn preview_entry_out_of_range_is_none() {
        let backend = MockBackend::new();
        assert!(preview_entry(&backend, &collection(), 3, &params()).is_none());
        let one = preview_entry(&backend, &collection(), 2, &params()).unwrap();
        assert_eq!(one.name, "c.png");
        assert_eq!(one.result.unwrap().bytes, b"C");
    }

    #[test]
    fn empty_collection_has_no_previews() {
        let backend = MockBackend::new();
        assert!(preview_all(&backend, &UploadCollection::new(), &params()).is_empty());
    }
}
