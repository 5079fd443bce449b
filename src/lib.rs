//! # fitpack
//!
//! Batch-prepare images for a fixed output size and hand them over as one
//! zip archive. Each upload is sharpened, scaled to cover the target box,
//! center-cropped to exactly that box, and re-encoded; the results are
//! packed under sequential names (`c001.jpg`, `c002.jpg`, ...) or under their
//! original upload names.
//!
//! # Architecture: Collection → Pipeline → Archive
//!
//! ```text
//! uploads ──append/remove──▶ UploadCollection
//!                                 │
//!              ┌──────────────────┴──────────────────┐
//!              ▼                                     ▼
//!     preview (per entry,                   archive (all entries,
//!     failures isolated)                    all-or-nothing)
//!              │                                     │
//!              └────────▶ transform pipeline ◀───────┘
//!                decode → normalize → sharpen → fit → encode
//! ```
//!
//! Everything in the library is an explicit function of its inputs: the
//! collection is a value owned by the caller, configuration is passed in,
//! and bytes go in and come out. There is no global state, no filesystem
//! access outside [`scan`] and [`config`], and no network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collection`] | Ordered, name-deduplicated working set of uploads |
//! | [`imaging`] | Decode, color normalization, sharpening, fill-and-crop, encode |
//! | [`naming`] | Sequenced export filenames and the dated archive name |
//! | [`archive`] | Runs the pipeline over the collection into one zip |
//! | [`preview`] | Runs the pipeline per entry, isolating failures |
//! | [`config`] | `fitpack.toml` loading, layering, and start-number validation |
//! | [`scan`] | Reads files and directories into upload entries |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Sharpen Before Resize
//!
//! Lanczos downscaling smooths away fine detail. The fixed Laplacian kernel
//! runs on the full-resolution image first, so the resize starts from
//! boosted edges. Color normalization runs before both, so the kernel and
//! the JPEG encoder only ever see opaque 8-bit RGB.
//!
//! ## Two Naming Policies, One Pipeline
//!
//! Sequenced naming forces JPEG at maximum quality (hence the fixed `.jpg`
//! extension). Original naming keeps the upload name and its container.
//! Only the final encode step and the archive entry name differ; everything
//! else is shared.
//!
//! ## Fail Fast on Export, Degrade on Preview
//!
//! An invalid start number refuses the export before any image is touched.
//! During the build, the first failing image aborts the whole archive, so a
//! caller never receives a silently incomplete zip. Previews are the
//! opposite: each image succeeds or fails on its own.

pub mod archive;
pub mod collection;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod preview;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
