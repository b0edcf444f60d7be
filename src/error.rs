use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreadcrumbError {
    #[error("index {index} out of range for breadcrumb of size {len}")]
    IndexOutOfRange { index: isize, len: usize },
}

pub type Result<T> = std::result::Result<T, BreadcrumbError>;
