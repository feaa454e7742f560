//! Output generation for collected articles.
//!
//! # Submodules
//!
//! - [`excel`]: spreadsheet with one row per article
//! - [`json`]: the same rows as a JSON array
//! - [`pictures`]: concurrent download of article pictures
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── articles.xlsx
//! ├── articles.json
//! └── images/
//!     ├── photo-one.jpg
//!     └── photo-two.jpg
//! ```

pub mod excel;
pub mod json;
pub mod pictures;
