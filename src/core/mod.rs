pub mod conditions;
pub mod curated;
pub mod etl;
pub mod file_select;
pub mod naming;
pub mod rotation;
pub mod tsv;

pub use crate::domain::model::{Record, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
