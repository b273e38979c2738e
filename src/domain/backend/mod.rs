//! Backend module - vocabulary of the model API this front end talks to.
//!
//! - `operation` - the capabilities called (login, train, predict, ...)
//! - `inputs` - what callers hand to the backend client
//! - `records` - what the backend hands back
//! - `errors` - how a call can fail

mod errors;
mod inputs;
mod operation;
mod records;

pub use errors::BackendError;
pub use inputs::{Credentials, DatasetUpload, PredictionInput, PreviewDataset, TrainModel, UploadedFile};
pub use operation::BackendOperation;
pub use records::{
    Acknowledgement, Dataset, LoginResult, Model, ModelInfo, PredictionPage, PredictionRecord,
    PredictionResult, Preview, TrainResult, UploadResult,
};
