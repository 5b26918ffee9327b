//! Capture device adapter implementations
//!
//! Headless hosts have no camera, so capture is modelled as importing an
//! image that already exists, either as a file on disk or as bytes piped in.

mod file;

pub use file::FileCaptureAdapter;
