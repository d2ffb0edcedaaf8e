//! Domain entities representing core business objects.

pub mod qna;
pub mod token;
pub mod upload;

// Re-export commonly used types
pub use qna::{AnswerStatus, Category, QnaPost, Role};
pub use token::{Claims, TokenPair, TokenType};
pub use upload::{ImageKind, UploadedFileDescriptor};
