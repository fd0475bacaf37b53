//! Read-only projections of the study aggregate.

pub mod presenter;

pub use presenter::{
    BoardView, CategoryView, CheckpointView, ListPresenter, RecordRow, RowAction, NO_RECORDS,
    UNKNOWN_DATE,
};
