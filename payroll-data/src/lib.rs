pub mod batch;

pub use batch::{
    BatchOutcome, Direction, PayrollBatch, PayrollBatchError, PayrollRecord,
};
