pub mod draft;
pub mod fragment;
pub mod surface;

pub use draft::{DraftEditor, DraftState, EditTarget, FormatOp};
pub use fragment::FragmentSurface;
pub use surface::{Alignment, InlineCommand, RichTextEditable, SurfaceId, TextRange};
