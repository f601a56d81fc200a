pub mod annotator;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod line_index;
pub mod logging;
pub mod models;
pub mod splice;

pub use annotator::{AnnotatedElement, Annotator};
pub use encoding::{
    decode, encode, encode_id, parse_id, parse_number, ATTR_COLUMN, ATTR_FILE, ATTR_ID, ATTR_LINE,
    ATTR_LOCATOR, ATTR_STYLED, MARKER_ATTRIBUTES,
};
pub use error::{LocatorError, Result};
pub use line_index::LineIndex;
pub use logging::{init, init_default, init_from_args};
pub use models::{AnnotateOptions, SourceLocation, TransformOutput};
pub use splice::{apply_insertions, Insertion};
